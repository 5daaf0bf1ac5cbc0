use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::validation::{ValidationError, ValidationErrors};

/// Query parameter key the filter expression is read from, and the field its errors are
/// reported against.
pub const FILTER_PARAM: &str = "filter";

/// Comparison operator of a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FilterOperator {
    pub const ALL: [Self; 6] = [Self::Eq, Self::Ne, Self::Gt, Self::Ge, Self::Lt, Self::Le];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = ();

    /// Operators are matched exactly; `EQ` is not an operator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|op| op.as_str() == s).ok_or(())
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connector joining a condition to the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    /// Connectors are case-insensitive: `AND`, `And` and `and` are the same word.
    fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }
}

/// One `field operator value` clause of a filter expression.
///
/// `value` is kept as written (minus surrounding quotes); its type is only decided when the
/// condition is turned into a database predicate. `logical` is the connector that preceded
/// the condition. The first condition has no connector before it and always carries `And`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
    pub logical: LogicalOperator,
}

/// Parse a filter expression such as `status eq 'ACTIVE' and nextReminder lt '2026-03-01'`.
///
/// An absent or blank expression means "no filtering" and yields an empty list. Structural
/// problems (a connector with nothing on one side of it) stop parsing immediately; problems
/// with individual conditions are collected so every bad clause is reported.
///
/// # Errors
///
/// Returns the collected [`ValidationErrors`], all reported against [`FILTER_PARAM`].
pub fn parse_filter(
    raw: Option<&str>,
    allowed_fields: &[&str],
) -> Result<Vec<FilterCondition>, ValidationErrors> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Vec::new());
    };

    let clauses = split_clauses(raw)?;

    let mut errors = ValidationErrors::new();
    let mut conditions = Vec::with_capacity(clauses.len());
    for (logical, words) in clauses {
        if let Some(condition) = errors.check(parse_condition(&words, logical, allowed_fields)) {
            conditions.push(condition);
        }
    }

    errors.result().map(|()| conditions)
}

/// Split the expression on its connectors, pairing every clause with the connector that
/// was current when it started.
fn split_clauses(raw: &str) -> Result<Vec<(LogicalOperator, Vec<&str>)>, ValidationError> {
    let mut clauses = Vec::new();
    let mut logical = LogicalOperator::default();
    let mut words = Vec::new();

    for word in raw.split_whitespace() {
        match LogicalOperator::from_word(word) {
            Some(connector) => {
                if words.is_empty() {
                    return Err(invalid_expression(raw));
                }
                clauses.push((logical, std::mem::take(&mut words)));
                logical = connector;
            }
            None => words.push(word),
        }
    }

    if words.is_empty() {
        return Err(invalid_expression(raw));
    }
    clauses.push((logical, words));

    Ok(clauses)
}

fn parse_condition(
    words: &[&str],
    logical: LogicalOperator,
    allowed_fields: &[&str],
) -> Result<FilterCondition, ValidationError> {
    let [field, operator, value] = words else {
        return Err(ValidationError::new(
            FILTER_PARAM,
            format!("Invalid filter expression: {}", words.join(" ")),
        ));
    };

    if !allowed_fields.contains(field) {
        return Err(ValidationError::new(
            FILTER_PARAM,
            format!("Invalid filter field: {field}"),
        ));
    }

    let operator = operator.parse::<FilterOperator>().map_err(|()| {
        ValidationError::new(FILTER_PARAM, format!("Invalid operator: {operator}"))
    })?;

    Ok(FilterCondition {
        field: (*field).to_string(),
        operator,
        value: strip_quotes(value).to_string(),
        logical,
    })
}

/// Remove one pair of surrounding single quotes.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
        .unwrap_or(value)
}

fn invalid_expression(raw: &str) -> ValidationError {
    ValidationError::new(FILTER_PARAM, format!("Invalid filter expression: {raw}"))
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, SimpleExpr, Value},
};

use super::expression::{FilterCondition, FilterOperator, LogicalOperator};
use super::search::build_contains_condition;

/// A filter value after type inference.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    Text(String),
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Integer(i) => i.into(),
            FilterValue::Float(f) => f.into(),
            FilterValue::DateTime(dt) => dt.into(),
            FilterValue::Text(s) => s.into(),
        }
    }
}

/// Decide what a raw filter value should be compared as.
///
/// Numbers win over dates; anything starting with a `YYYY-MM-DD` date is compared as a
/// timestamp (midnight UTC when no time is given); everything else stays text.
#[must_use]
pub fn infer_value(raw: &str) -> FilterValue {
    if let Ok(integer) = raw.parse::<i64>() {
        return FilterValue::Integer(integer);
    }
    if let Ok(float) = raw.parse::<f64>()
        && float.is_finite()
    {
        return FilterValue::Float(float);
    }
    if let Some(datetime) = parse_datetime(raw) {
        return FilterValue::DateTime(datetime);
    }
    FilterValue::Text(raw.to_string())
}

fn has_date_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| bytes[i].is_ascii_digit())
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if !has_date_prefix(raw) {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn compare<C>(column: C, operator: FilterOperator, value: FilterValue) -> SimpleExpr
where
    C: ColumnTrait,
{
    let column = Expr::col(column);
    let value = Value::from(value);
    match operator {
        FilterOperator::Eq => column.eq(value),
        FilterOperator::Ne => column.ne(value),
        FilterOperator::Gt => column.gt(value),
        FilterOperator::Ge => column.gte(value),
        FilterOperator::Lt => column.lt(value),
        FilterOperator::Le => column.lte(value),
    }
}

/// Turn parsed filter conditions and an optional free-text term into a query condition.
///
/// Conditions are split by their own connector: every `and` condition (and the free-text
/// match, if any) must hold together, while each `or` condition is an alternative to that
/// whole group. `a and b or c` therefore means `(a AND b) OR c`, but `a or b and c` also
/// means `(a AND c) OR b`; there is no nesting.
///
/// Conditions whose field has no entry in `columns` are skipped. With nothing to filter
/// on, the result matches every row.
#[must_use]
pub fn build_condition<C>(
    filters: &[FilterCondition],
    columns: &[(&str, C)],
    text_columns: &[C],
    search: Option<&str>,
) -> Condition
where
    C: ColumnTrait + Copy,
{
    let mut and_group = Condition::all();
    let mut or_group = Vec::new();

    for filter in filters {
        let Some(&(_, column)) = columns.iter().find(|(name, _)| *name == filter.field) else {
            tracing::debug!(field = %filter.field, "Skipping filter on unmapped field");
            continue;
        };

        let expr = compare(column, filter.operator, infer_value(&filter.value));
        match filter.logical {
            LogicalOperator::And => and_group = and_group.add(expr),
            LogicalOperator::Or => or_group.push(expr),
        }
    }

    if let Some(term) = search
        && let Some(contains) = build_contains_condition(term, text_columns)
    {
        and_group = and_group.add(contains);
    }

    let condition = if or_group.is_empty() {
        and_group
    } else {
        let mut any = Condition::any();
        if !and_group.is_empty() {
            any = any.add(and_group);
        }
        or_group.into_iter().fold(any, |any, expr| any.add(expr))
    };

    tracing::debug!(?filters, ?condition, "Built search condition");
    condition
}

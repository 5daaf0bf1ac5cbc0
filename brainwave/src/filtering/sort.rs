use sea_orm::{ColumnTrait, sea_query::Order};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::validation::ValidationError;

/// Query parameter key the sort order is read from, and the field its errors are reported
/// against.
pub const ORDER_PARAM: &str = "orderBy";

/// Direction used when `orderBy` names a field without one.
pub const DEFAULT_SORT_DIRECTION: SortDirection = SortDirection::Desc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Case-sensitive: only `asc` and `desc` are directions.
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// A validated `field:direction` sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Resolve the field to one of the sortable columns.
    ///
    /// Falls back to `default_column` when the field has no column; fields are checked
    /// against the allow-list before this point, so that only happens when the allow-list
    /// and the column list disagree.
    #[must_use]
    pub fn resolve<C>(&self, columns: &[(&str, C)], default_column: C) -> (C, Order)
    where
        C: ColumnTrait + Copy,
    {
        let column = columns
            .iter()
            .find(|&&(name, _)| name == self.field)
            .map_or(default_column, |&(_, column)| column);
        (column, self.direction.into())
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Parse an `orderBy` value of the form `field` or `field:direction`.
///
/// An absent or empty value yields `default`. A bare field sorts descending.
///
/// # Errors
///
/// Fails when the value has more than one `:`, names a field outside `allowed_fields`, or
/// uses a direction other than `asc`/`desc`.
pub fn parse_order(
    raw: Option<&str>,
    allowed_fields: &[&str],
    default: &OrderSpec,
) -> Result<OrderSpec, ValidationError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(default.clone());
    };

    let mut parts = raw.split(':');
    let field = parts.next().unwrap_or_default();
    let direction = parts.next();
    if parts.next().is_some() {
        return Err(ValidationError::new(
            ORDER_PARAM,
            format!("Invalid order expression: {raw}"),
        ));
    }

    if !allowed_fields.contains(&field) {
        return Err(ValidationError::new(
            ORDER_PARAM,
            format!("Invalid order field: {field}"),
        ));
    }

    let direction = match direction {
        None => DEFAULT_SORT_DIRECTION,
        Some(word) => SortDirection::from_word(word).ok_or_else(|| {
            ValidationError::new(ORDER_PARAM, "Direction must be asc or desc")
        })?,
    };

    Ok(OrderSpec::new(field, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["title", "createdAt", "updatedAt"];

    fn default_order() -> OrderSpec {
        OrderSpec::new("updatedAt", SortDirection::Desc)
    }

    #[test]
    fn test_absent_uses_default() {
        assert_eq!(parse_order(None, FIELDS, &default_order()).unwrap(), default_order());
        assert_eq!(parse_order(Some(""), FIELDS, &default_order()).unwrap(), default_order());
    }

    #[test]
    fn test_field_and_direction() {
        let order = parse_order(Some("title:asc"), FIELDS, &default_order()).unwrap();
        assert_eq!(order, OrderSpec::new("title", SortDirection::Asc));
        assert_eq!(order.to_string(), "title:asc");
    }

    #[test]
    fn test_bare_field_sorts_descending() {
        let order = parse_order(Some("createdAt"), FIELDS, &default_order()).unwrap();
        assert_eq!(order, OrderSpec::new("createdAt", SortDirection::Desc));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = parse_order(Some("body:asc"), FIELDS, &default_order()).unwrap_err();
        assert_eq!(err.field, ORDER_PARAM);
        assert_eq!(err.message, "Invalid order field: body");
    }

    #[test]
    fn test_direction_is_case_sensitive() {
        let err = parse_order(Some("title:ASC"), FIELDS, &default_order()).unwrap_err();
        assert_eq!(err.message, "Direction must be asc or desc");

        assert!(parse_order(Some("title:"), FIELDS, &default_order()).is_err());
        assert!(parse_order(Some("title:up"), FIELDS, &default_order()).is_err());
    }

    #[test]
    fn test_extra_segments_are_rejected() {
        let err = parse_order(Some("title:asc:desc"), FIELDS, &default_order()).unwrap_err();
        assert!(err.message.starts_with("Invalid order expression"));
    }

    #[test]
    fn test_direction_into_order() {
        assert_eq!(Order::from(SortDirection::Asc), Order::Asc);
        assert_eq!(Order::from(SortDirection::Desc), Order::Desc);
    }
}

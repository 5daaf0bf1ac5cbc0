use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use super::expression::{FILTER_PARAM, FilterCondition, parse_filter};
use super::pagination::{PAGE_PARAM, offset_for};
use super::sort::{DEFAULT_SORT_DIRECTION, OrderSpec, parse_order};
use crate::validation::{ValidationError, ValidationErrors, validators::validate_range};

pub const SIZE_PARAM: &str = "size";
pub const SEARCH_PARAM: &str = "search";

/// Page size limits for a searchable collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub max_page_size: u64,
    pub default_page_size: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            default_page_size: 25,
        }
    }
}

/// Raw search parameters as they arrive on the query string.
///
/// Everything is kept as text so that malformed values are reported by
/// [`validate_search`] together with every other problem, instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Page number, starting at 1.
    #[param(example = "1")]
    pub page: Option<String>,
    /// Number of items per page.
    #[param(example = "25")]
    pub size: Option<String>,
    /// Text that must appear in one of the searchable fields.
    #[param(example = "groceries")]
    pub search: Option<String>,
    /// Sort order as `field` or `field:asc` / `field:desc`.
    #[serde(rename = "orderBy")]
    #[param(example = "updatedAt:desc")]
    pub order_by: Option<String>,
    /// Conditions such as `status eq 'ACTIVE' and nextReminder lt '2026-03-01'`.
    #[param(example = "status eq 'ACTIVE'")]
    pub filter: Option<String>,
}

/// A fully validated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
    pub order_by: OrderSpec,
    pub filter: Vec<FilterCondition>,
}

impl SearchRequest {
    #[must_use]
    pub const fn offset(&self) -> u64 {
        offset_for(self.page, self.size)
    }
}

fn parse_integer(field: &str, raw: &str) -> Result<u64, ValidationError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::new(field, "Must be a whole number"))
}

fn validate_page(raw: Option<&str>) -> Result<u64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(1);
    };
    let page = parse_integer(PAGE_PARAM, raw)?;
    validate_range(PAGE_PARAM, page, Some(1), None)?;
    Ok(page)
}

fn validate_size(raw: Option<&str>, config: &SearchConfig) -> Result<u64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(config.default_page_size);
    };
    let size = parse_integer(SIZE_PARAM, raw)?;
    if !(1..=config.max_page_size).contains(&size) {
        return Err(ValidationError::new(
            SIZE_PARAM,
            format!("Must be between 1 and {}", config.max_page_size),
        ));
    }
    Ok(size)
}

fn validate_search_term(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some("") => Err(ValidationError::new(SEARCH_PARAM, "Must not be blank")),
        Some(term) => Ok(Some(term.to_string())),
    }
}

/// Validate raw search parameters against a collection's limits and field allow-lists.
///
/// Every parameter is checked independently and all failures are returned together.
///
/// # Errors
///
/// Returns every problem found: `page` below 1 or not a number, `size` outside
/// `1..=max_page_size`, a blank `search`, a malformed `orderBy` or `filter`.
pub fn validate_search(
    query: &SearchQuery,
    config: &SearchConfig,
    filter_fields: &[&str],
    order_fields: &[&str],
    default_order_field: &str,
) -> Result<SearchRequest, ValidationErrors> {
    let default_order = OrderSpec::new(default_order_field, DEFAULT_SORT_DIRECTION);
    let mut errors = ValidationErrors::new();

    let page = errors.check(validate_page(query.page.as_deref()));
    let size = errors.check(validate_size(query.size.as_deref(), config));
    let search = errors.check(validate_search_term(query.search.as_deref()));
    let order_by = errors.check(parse_order(
        query.order_by.as_deref(),
        order_fields,
        &default_order,
    ));
    let filter = errors.merge(parse_filter(query.filter.as_deref(), filter_fields));

    match (page, size, search, order_by, filter) {
        (Some(page), Some(size), Some(search), Some(order_by), Some(filter)) if errors.is_empty() => {
            Ok(SearchRequest {
                page,
                size,
                search,
                order_by,
                filter,
            })
        }
        _ => {
            tracing::debug!(%errors, "Rejected search request");
            Err(errors)
        }
    }
}

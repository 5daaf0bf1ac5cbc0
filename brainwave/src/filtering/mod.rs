//! # Search, Filtering & Pagination
//!
//! Turns the query string of a list endpoint into a database query and the query result
//! back into a navigable page.
//!
//! ## Query Parameters
//!
//! | Parameter | Example                                              | Default            |
//! |-----------|------------------------------------------------------|--------------------|
//! | `page`    | `page=2`                                             | `1`                |
//! | `size`    | `size=10`                                            | configured default |
//! | `search`  | `search=groceries`                                   | none               |
//! | `orderBy` | `orderBy=title:asc`, `orderBy=createdAt`             | `<default>:desc`   |
//! | `filter`  | `filter=status eq 'ACTIVE' and nextReminder lt '2026-03-01'` | none      |
//!
//! ## Filter Expressions
//!
//! ```text
//! expr       := condition (CONNECTOR condition)*
//! condition  := FIELD OPERATOR VALUE
//! CONNECTOR  := "and" | "or"   (case-insensitive)
//! OPERATOR   := "eq" | "ne" | "gt" | "ge" | "lt" | "le"
//! VALUE      := bare-token | 'quoted token'
//! ```
//!
//! Values are compared as numbers when they parse as one, as timestamps when they start
//! with a `YYYY-MM-DD` date, and as text otherwise. There is no nesting: all `and`
//! conditions form one group and every `or` condition is an alternative to that group.
//!
//! ## Flow
//!
//! ```rust,ignore
//! let request = validate_search(&query, &config, FILTER_FIELDS, ORDER_FIELDS, "updatedAt")?;
//! let condition = build_condition(&request.filter, &columns, &text_columns, request.search.as_deref());
//! let (column, order) = request.order_by.resolve(&sortable, default_column);
//! let (rows, total) = Thought::get_page(&db, owner, condition, column, order, request.offset(), request.size).await?;
//! let result = SearchResult::new(rows, request.page, request.size, total, &request_url);
//! ```

pub mod conditions;
pub mod expression;
pub mod pagination;
pub mod request;
pub mod search;
pub mod sort;

// Re-export commonly used items
pub use conditions::{FilterValue, build_condition, infer_value};
pub use expression::{FilterCondition, FilterOperator, LogicalOperator, parse_filter};
pub use pagination::{PageLinks, SearchResult, SearchResultPage, build_page_link, offset_for};
pub use request::{SearchConfig, SearchQuery, SearchRequest, validate_search};
pub use search::build_contains_condition;
pub use sort::{OrderSpec, SortDirection, parse_order};

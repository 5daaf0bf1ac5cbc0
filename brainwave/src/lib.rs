//! # Brainwave
//!
//! Query-string search for owner-scoped collections: a small filter language, ordering,
//! page validation, and paginated responses with navigation links, on top of `sea-orm`.
//!
//! ```text
//! GET /thoughts?filter=status eq 'ACTIVE'&orderBy=title:asc&page=2&size=10&search=milk
//! ```
//!
//! - [`filtering`] parses and validates the query parameters and builds the database condition.
//! - [`core`](crate::core) runs owner-scoped CRUD and the count + fetch of a page.
//! - [`errors`] turns failures into HTTP responses.
//! - [`validation`] holds the field-level error types shared by all of the above.

pub mod core;
pub mod errors;
pub mod filtering;
pub mod validation;

pub use crate::core::{CRUDResource, IntoOwnedActiveModel, MergeIntoActiveModel};
pub use errors::{ApiError, ErrorResponse};
pub use filtering::{
    FilterCondition, FilterOperator, LogicalOperator, OrderSpec, PageLinks, SearchConfig,
    SearchQuery, SearchRequest, SearchResult, SearchResultPage, SortDirection, validate_search,
};
pub use validation::{ValidationError, ValidationErrors};

// Owner-scoped CRUD and paged search over sea-orm entities

pub mod traits;

pub use traits::{CRUDResource, IntoOwnedActiveModel, MergeIntoActiveModel};

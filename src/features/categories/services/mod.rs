mod category_resolver;
mod category_service;

pub use category_resolver::CategoryResolver;
pub use category_service::{CategoryListing, CategoryLookup, CategoryService, CategorySource};

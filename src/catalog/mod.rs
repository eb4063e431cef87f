pub mod catalog_manager;
pub mod tle;

pub use catalog_manager::{CatalogManager, DEFAULT_CATALOG_URL};
pub use tle::{parse_catalog, TleRecord};

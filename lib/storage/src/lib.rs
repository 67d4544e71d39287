pub mod json_file;
pub mod memory;

pub use json_file::{parse_catalog, CatalogDescription, JsonFileCatalog};
pub use memory::InMemoryCatalog;

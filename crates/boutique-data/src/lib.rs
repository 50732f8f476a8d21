pub mod loader;
pub mod schema;
pub mod store;

pub use loader::{DataLoadError, Format, load_catalog, load_catalog_file};
pub use store::FileSaveStore;

pub mod catalog;
pub mod loader;
pub mod model;

pub use catalog::{Catalog, FilterState, ALL_CATEGORIES};
pub use loader::{load_catalog, LoadedCatalog};
pub use model::{AppEntry, PlatformAction};

pub mod catalog;
pub mod models;

pub use catalog::{CatalogClient, CatalogError, DownloadedFile, RetryPolicy};
pub use models::*;

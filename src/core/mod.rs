pub mod importer;
pub mod patterns;
pub mod resolver;
pub mod session;

pub use crate::domain::model::{FieldValue, ImportSummary, Row};
pub use crate::domain::ports::{ConfigProvider, ListingSource};
pub use crate::utils::error::Result;

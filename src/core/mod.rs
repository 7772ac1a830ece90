pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod ownership;
pub mod registry;
pub mod report;

pub use crate::domain::model::{AddressQuery, ExportRow};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, RegistryApi};
pub use crate::utils::error::Result;

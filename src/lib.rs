pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use app::exports::{BbrDataExport, ExportVariant, VacationHouseExport};
pub use config::AppConfig;
pub use crate::core::{aggregator::AddressPipeline, engine::ExportEngine, report::OutputFormat};
pub use utils::error::{BbrError, Result};

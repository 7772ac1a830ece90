use crate::app::exports::{BbrDataExport, ExportVariant, VacationHouseExport};
use crate::config::toml_config::AppConfig;
use crate::core::engine::ExportEngine;
use crate::core::report::OutputFormat;
use crate::domain::model::AddressQuery;
use crate::utils::error::{BbrError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_numeric_code, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bbr-export", version)]
#[command(about = "Export Danish building registry data for a range of addresses")]
pub struct Cli {
    /// TOML file overriding endpoints, timeouts and concurrency.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON on stderr")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Export various BBR data from building and related floors.
    #[command(name = "export-bbr-data", visible_alias = "dawa:export-bbr-data")]
    ExportBbrData(ExportArgs),

    /// Export various BBR vacation house data from building and related floors.
    #[command(
        name = "export-bbr-vacation-house-data",
        visible_alias = "dawa:export-bbr-vacation-house-data"
    )]
    ExportBbrVacationHouseData(ExportArgs),
}

impl Command {
    pub fn args(&self) -> &ExportArgs {
        match self {
            Command::ExportBbrData(args) | Command::ExportBbrVacationHouseData(args) => args,
        }
    }

    pub fn variant(&self) -> &'static dyn ExportVariant {
        match self {
            Command::ExportBbrData(_) => &BbrDataExport,
            Command::ExportBbrVacationHouseData(_) => &VacationHouseExport,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Specify a municipality code.
    pub municipality_code: String,

    /// Specify a street code.
    pub street_code: String,

    /// Specify a house number from.
    pub house_number_from: String,

    /// Specify a house number to.
    pub house_number_to: String,

    /// Output format: table, tab, ssv or csv.
    #[arg(short, long, default_value = "table", value_parser = parse_output_format)]
    pub format: OutputFormat,
}

fn parse_output_format(value: &str) -> std::result::Result<OutputFormat, String> {
    value.parse().map_err(|e: BbrError| e.to_string())
}

impl ExportArgs {
    pub fn query(&self) -> AddressQuery {
        AddressQuery {
            municipality_code: self.municipality_code.trim().to_string(),
            street_code: self.street_code.trim().to_string(),
            house_number_from: self.house_number_from.trim().to_string(),
            house_number_to: self.house_number_to.trim().to_string(),
        }
    }
}

impl Validate for ExportArgs {
    fn validate(&self) -> Result<()> {
        validate_numeric_code("municipality-code", self.municipality_code.trim())?;
        validate_numeric_code("street-code", self.street_code.trim())?;
        validate_non_empty_string("house-number-from", &self.house_number_from)?;
        validate_non_empty_string("house-number-to", &self.house_number_to)?;
        Ok(())
    }
}

impl Cli {
    /// Loads configuration, validates input and returns the rendered report.
    /// Nothing touches the network until both have passed.
    pub async fn execute(&self) -> Result<String> {
        let config = AppConfig::load(self.config.as_deref())?;
        let args = self.command.args();
        args.validate()?;

        let engine = ExportEngine::from_config(&config)?;
        engine
            .run(self.command.variant(), &args.query(), args.format)
            .await
    }
}

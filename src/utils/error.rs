use thiserror::Error;

use crate::core::report::OutputFormat;

#[derive(Error, Debug)]
pub enum BbrError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error(
        "The specified format '{value}' is not valid. Only the following values are allowed: {}.",
        OutputFormat::allowed_names()
    )]
    InvalidFormat { value: String },

    #[error("Report rendering failed: {message}")]
    Render { message: String },
}

impl BbrError {
    /// Short message for the terminal, without the nested source chain.
    pub fn user_friendly_message(&self) -> String {
        match self {
            BbrError::Http(_) => "Could not set up the HTTP client".to_string(),
            BbrError::Io(e) => format!("File access failed: {}", e),
            BbrError::TomlParse(_) | BbrError::Config { .. } => {
                format!("Configuration problem: {}", self)
            }
            BbrError::InvalidConfigValue { .. } | BbrError::InvalidFormat { .. } => self.to_string(),
            BbrError::Render { .. } => format!("Could not produce the report: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            BbrError::InvalidFormat { .. }
            | BbrError::InvalidConfigValue { .. }
            | BbrError::Config { .. }
            | BbrError::TomlParse(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BbrError>;

//! CLI error types with miette diagnostics.
//!
//! Only startup failures reach here. Steady-state polling failures are
//! absorbed by the API client and rendered as part of the dashboard.

use miette::Diagnostic;
use thiserror::Error;

use hexdash_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Cannot connect to HexStrike server at {url}")]
    #[diagnostic(
        code(hexdash::unreachable),
        help("Please ensure the HexStrike AI server is running.")
    )]
    Unreachable { url: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hexdash::validation))]
    Validation { field: String, reason: String },

    #[error("Could not load configuration: {message}")]
    #[diagnostic(
        code(hexdash::config),
        help("Check the config file and any HEXDASH_* environment variables.")
    )]
    Config { message: String },

    #[error("Could not initialise the HTTP client")]
    #[diagnostic(code(hexdash::client))]
    Client(#[from] hexdash_api::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(e) => Self::Config {
                message: e.to_string(),
            },
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::Unreachable { .. } | Self::Client(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

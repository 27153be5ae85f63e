//! CLI configuration
//!
//! Every setting can be given as a flag or through the matching
//! `TERMADMIN_*` environment variable (a `.env` file is loaded first).

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Directory holding one JSON file per CodeSystem
    #[arg(
        long,
        env = "TERMADMIN_DATA_DIR",
        default_value = "./codesystems",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Spaces per nesting level when printing concept trees
    #[arg(long, env = "TERMADMIN_INDENT", default_value_t = 2, global = true)]
    pub indent: usize,

    #[command(flatten)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    #[arg(
        long = "log-level",
        env = "TERMADMIN_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    pub level: String,

    /// Emit logs as JSON lines
    #[arg(long = "log-json", env = "TERMADMIN_LOG_JSON", global = true)]
    pub json: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.indent > 16 {
            return Err(format!("indent must be at most 16, got {}", self.indent));
        }
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "log level must be one of {}, got '{}'",
                LEVELS.join(", "),
                self.logging.level
            ));
        }
        Ok(())
    }
}

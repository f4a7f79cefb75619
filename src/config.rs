use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "expenses.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub data_path: String,
    pub log_file: String,
    pub log_level: String,
    pub currency_suffix: String,
    pub export_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: "expenses.db".to_string(),
            log_file: "expense-tracker.log".to_string(),
            log_level: "info".to_string(),
            currency_suffix: "円".to_string(),
            export_path: "expenses.csv".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "expense-tracker", about = "Household expense tracker")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the SQLite file holding the expenses.
    #[arg(long)]
    pub data: Option<String>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write expenses to a CSV file and exit.
    Export {
        #[arg(long, short)]
        output: Option<String>,
        /// Only export this category (exact match).
        #[arg(long)]
        category: Option<String>,
    },
}

impl Settings {
    /// Layers the TOML file (if present) and `EXPENSES_*` variables over the
    /// defaults.
    pub fn from_sources(config_path: Option<&str>) -> Result<Self> {
        let config_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        let mut builder = config::Config::builder();
        builder = builder.add_source(config::File::with_name(config_path).required(false));
        builder = builder.add_source(config::Environment::with_prefix("EXPENSES"));
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(data) = &args.data {
            self.data_path = data.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }
}

pub fn load() -> Result<(Settings, Args)> {
    let args = Args::parse();
    let mut settings = Settings::from_sources(args.config.as_deref())?;
    settings.apply_args(&args);
    Ok((settings, args))
}

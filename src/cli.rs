use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for ffautoconfig
#[derive(Parser, Debug)]
#[command(name = "ffautoconfig", version)]
#[command(about = "Render, verify and install Firefox/LibreWolf autoconfig loader preferences")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the autoconfig.js declarations
    Render {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a preference file and print its declarations as JSON
    Show {
        /// Preference file to read
        file: PathBuf,

        /// Only keep keys matching these glob patterns
        #[arg(short, long)]
        query: Vec<String>,

        /// Print the raw value of a single key
        #[arg(long, conflicts_with = "query")]
        get: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputType::JsonObject)]
        output_type: OutputType,
    },

    /// Check that a file declares exactly the expected loader preferences
    Verify {
        /// autoconfig.js to check
        file: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge two autoconfig scripts and print the normalised result
    Diff {
        /// Script whose values win
        base: PathBuf,
        /// Script supplying missing keys
        compare: PathBuf,
    },

    /// Write autoconfig.js into a browser's default-pref directory
    Install {
        /// Installation root; located automatically when omitted
        #[arg(long)]
        prefix: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Replace an existing autoconfig.js with different content
        #[arg(short, long)]
        force: bool,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List browser installations found on this system
    Locate,
}

/// Settings layered over the shipped defaults
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// JSON file with obscure_value, filename and global_config_url
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Value for general.config.obscure_value
    #[arg(long)]
    pub obscure_value: Option<i64>,

    /// Value for general.config.filename
    #[arg(long)]
    pub filename: Option<String>,

    /// Value for autoadmin.global_config_url
    #[arg(long)]
    pub config_url: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// `{ "key": value, ... }`
    JsonObject,
    /// `[{ "key": ..., "value": ... }, ...]`
    JsonArray,
}

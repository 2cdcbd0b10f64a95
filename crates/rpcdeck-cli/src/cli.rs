//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rpcdeck",
    about = "rpcdeck - invoke JSON-RPC methods on a local Ethereum dev node",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (YAML or JSON)
    #[arg(long, short = 'c', env = "RPCDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides config and environment
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Directory for persisted slots, overrides config and environment
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Keep slots in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the method catalog
    Methods {
        /// Output format
        #[arg(long, value_enum, default_value = "table", help = "Output format")]
        format: OutputFormat,
    },

    /// Manage dashboard slots
    Slots {
        #[command(subcommand)]
        action: SlotsAction,
    },

    /// Execute the method configured on a slot
    Exec {
        /// Slot id (a unique prefix is enough)
        id: String,

        /// Parameter as name=value
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty", help = "Output format")]
        format: OutputFormat,
    },

    /// Call a catalog method directly, without a slot
    Call {
        /// Method name, e.g. getBalance
        method: String,

        /// Parameter as name=value
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty", help = "Output format")]
        format: OutputFormat,
    },

    /// Execute every configured slot concurrently
    RunAll {
        /// Parameter as SLOT_ID:name=value
        #[arg(short = 'p', long = "param", value_name = "ID:NAME=VALUE")]
        params: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SlotsAction {
    /// Show slots in order
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "table", help = "Output format")]
        format: OutputFormat,
    },
    /// Append a slot
    Add {
        /// Method to configure; omit for an empty slot
        method: Option<String>,
    },
    /// Remove a slot
    Remove { id: String },
    /// Change the method of a slot; omit METHOD to clear it
    Set { id: String, method: Option<String> },
    /// Move slot FROM to the position of slot TO
    Move { from: String, to: String },
    /// Replace all slots with one per catalog method
    LoadAll,
    /// Restore the default slots
    Reset,
    /// Remove every slot
    Clear,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// Pretty-printed JSON
    Pretty,
    /// Compact JSON
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Format a JSON value according to the output format
    pub fn format_json(&self, value: &JsonValue) -> Result<String, serde_json::Error> {
        match self {
            Self::Table | Self::Pretty => serde_json::to_string_pretty(value),
            Self::Json => serde_json::to_string(value),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| {
                serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("YAML serialization error: {}", e),
                ))
            }),
        }
    }
}

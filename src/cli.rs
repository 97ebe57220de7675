//! Command-line interface definition for IterView
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive browsing and one-shot lookups.

use clap::{Parser, Subcommand};

/// IterView - terminal pager for LLM iteration records
///
/// Pages through a remote collection of iterations one record at a time,
/// showing the prompt, generated text, token counts, cost and runtime.
#[derive(Parser, Debug, Clone)]
#[command(name = "iterview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the record source base URL (also ITERVIEW_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Disable ANSI colors in rendered output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute (defaults to `browse`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for IterView
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Page through iterations interactively
    Browse {
        /// Page to open first (1-based)
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Print a single iteration and exit
    Show {
        /// 1-based page number of the iteration
        page: u32,

        /// Output the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the collection size and exit
    Meta {
        /// Output the metadata as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run, falling back to `browse` at the configured start page
    pub fn command_or_default(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Browse { page: None })
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            api_base: None,
            no_color: false,
            verbose: false,
            command: None,
        }
    }
}

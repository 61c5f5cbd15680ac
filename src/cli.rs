//! Command-line interface definition for TutorChat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to serve the web chat and to ask a single question.

use clap::{Parser, Subcommand};

/// TutorChat - education-focused web chat over a hosted language model
#[derive(Parser, Debug, Clone)]
#[command(name = "tutorchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for TutorChat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the web chat interface
    Serve {
        /// Override the listen address from config (e.g. 0.0.0.0:8080)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Ask a single question and print the tutor's answer
    Ask {
        /// The question or learning goal
        prompt: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

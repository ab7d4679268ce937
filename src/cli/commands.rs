//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "ideaspark")]
#[command(about = "Project idea and execution plan generator for student projects")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },
    /// Generate project ideas for a topic
    Ideas {
        /// Topic or category text
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
        /// Use the topic as typed instead of extracting keywords first
        #[arg(long)]
        raw: bool,
    },
    /// Generate a step-by-step execution plan for a project
    Plan {
        /// Project description
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },
    /// List past projects most similar to a query
    Similar {
        /// Query text (may be empty)
        #[arg(num_args = 0..)]
        query: Vec<String>,
        /// Maximum number of projects to show
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },
    /// Extract topic keywords from free text
    Topic {
        /// Text to compress into keywords
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Draft with a reasoning model, then polish (needs a [refine] section)
    Refine {
        /// Message for the chatbot
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Validate configuration and dataset without serving
    Check,
}

//! CLI module for shortsmith.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// shortsmith - trending topics to vertical short videos
///
/// Searches trending news and YouTube videos, drafts a narration script with an
/// LLM, voices it, generates a thumbnail and renders a vertical MP4.
#[derive(Parser, Debug)]
#[command(name = "shortsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize shortsmith and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Draft a script from trending topics (news, youtube or mixed)
    Generate {
        /// Source of trending topics
        mode: String,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Synthesize narration audio for a script
    Voice {
        /// Script text to narrate
        script: String,
    },

    /// Generate a thumbnail image from a prompt
    Thumbnail {
        /// Image prompt
        prompt: String,
    },

    /// Run the whole chain: script, voice, thumbnail and video
    Complete {
        /// Source of trending topics (news, youtube or mixed)
        mode: String,

        /// Record the run against this channel
        #[arg(long)]
        channel: Option<i64>,
    },

    /// Brainstorm short ideas for a channel and store them as pending
    Ideas {
        /// Channel to brainstorm for
        channel: i64,

        /// Number of ideas to ask for
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,

        /// Print the stored ideas as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract script sections from a completion (file or stdin)
    Extract {
        /// File holding the completion text; reads stdin when absent
        file: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

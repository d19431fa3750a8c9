//! Command-line surface.

use clap::{Parser, Subcommand};

/// Proxy chat completions to an LLM provider and log every exchange.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "promptlog", version, about, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send one keyword to the provider and print the response body
    Call {
        /// User message content
        keyword: String,
    },
    /// Serve GET /api/openai on the configured address
    Serve,
}

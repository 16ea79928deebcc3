//! CLI definitions for UGT.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// UGT CLI.
#[derive(Parser)]
#[command(name = "ugt")]
#[command(about = "Translate a selection of an HTML document with an LLM, in place")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Translate the text of an element and write the patched document
    Translate {
        /// HTML file to translate
        file: PathBuf,

        /// Element whose contents form the selection (default: <body>)
        #[arg(long)]
        element_id: Option<String>,

        /// Where to write the patched document (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Provider override: openai, anthropic or gemini
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Target language override
        #[arg(long)]
        target: Option<String>,

        /// Use the non-streaming endpoint
        #[arg(long)]
        no_stream: bool,

        /// Leave the placeholder spans in the output
        #[arg(long)]
        keep_placeholders: bool,

        /// Write the last request/response snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Print the prompt that would be sent, without calling a provider
    Prompt {
        /// HTML file to read
        file: PathBuf,

        /// Element whose contents form the selection (default: <body>)
        #[arg(long)]
        element_id: Option<String>,

        /// Target language override
        #[arg(long)]
        target: Option<String>,
    },

    /// Validate the configuration file
    CheckConfig,
}

//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};

/// ragchat-rs: retrieval-augmented chat over a hosted search index.
///
/// Answers questions by retrieving snippets from a configured knowledge
/// base and grounding an LLM's responses in them.
#[derive(Parser, Debug)]
#[command(name = "ragchat-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question and print the grounded answer.
    #[command(after_help = r#"Examples:
  ragchat-rs ask "What is the refund policy?"
"#)]
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Start an interactive chat session.
    Chat,

    /// Query the knowledge base directly and print the retrieved snippets.
    ///
    /// Bypasses the chat model entirely; useful for inspecting what the
    /// retrieval tool would hand to the agent.
    Search {
        /// The query text.
        query: String,

        /// Collapse snippets that share a content id.
        #[arg(long)]
        dedup: bool,
    },
}

//! CLI layer for ragchat-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! asking one-shot questions, chatting interactively, and inspecting raw
//! retrieval output.

pub mod commands;
pub mod parser;

pub use commands::execute;
pub use parser::{Cli, Commands};

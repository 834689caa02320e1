//! CLI command implementations.
//!
//! Contains the business logic for each CLI command. Commands build their
//! output as a `String`; the binary entry point writes it out.

// Allow certain patterns that improve readability in CLI output formatting
#![allow(clippy::format_push_string)]

use std::fmt::Write as FmtWrite;
use std::io::{self, BufRead, Write as IoWrite};

use anyhow::Context;
use tracing::error;

use crate::agent::{AgentConfig, ChatSession, create_provider};
use crate::cli::parser::{Cli, Commands};
use crate::retrieval::{KnowledgeBase, RetrievalConfig, dedup_snippets};

/// User-visible banner for any failed turn; details go to the log.
const TURN_ERROR_BANNER: &str = "An error occurred, please try again later!";

/// Executes the parsed CLI command and returns its output.
///
/// # Errors
///
/// Returns an error for configuration problems or unrecoverable I/O
/// failures. Turn-level agent failures are reported inline and do not abort
/// an interactive session.
pub async fn execute(cli: Cli) -> anyhow::Result<String> {
    match cli.command {
        Commands::Ask { question } => cmd_ask(&question).await,
        Commands::Chat => cmd_chat().await,
        Commands::Search { query, dedup } => cmd_search(&query, dedup).await,
    }
}

/// Builds the knowledge base and chat session from the environment.
fn build_session() -> anyhow::Result<ChatSession> {
    let agent_config = AgentConfig::from_env().context("agent configuration")?;
    let retrieval_config = RetrievalConfig::from_env().context("retrieval configuration")?;

    let knowledge_base = KnowledgeBase::from_config(
        retrieval_config,
        &agent_config.api_key,
        agent_config.base_url.as_deref(),
        &agent_config.embedding_model,
    );
    let provider = create_provider(&agent_config).context("provider setup")?;

    Ok(ChatSession::new(provider, knowledge_base, agent_config))
}

/// One-shot question: run a single turn and return the answer.
async fn cmd_ask(question: &str) -> anyhow::Result<String> {
    let mut session = build_session()?;
    match session.ask(question).await {
        Ok(answer) => Ok(format!("{answer}\n")),
        Err(e) => {
            error!(error = %e, "turn failed");
            Ok(format!("{TURN_ERROR_BANNER}\n"))
        }
    }
}

/// Interactive REPL: one turn per input line until EOF or `/quit`.
async fn cmd_chat() -> anyhow::Result<String> {
    let mut session = build_session()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        {
            let mut handle = stdout.lock();
            handle
                .write_all(b"> ")
                .and_then(|()| handle.flush())
                .context("failed to write prompt")?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        let reply = match session.ask(input).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "turn failed");
                TURN_ERROR_BANNER.to_string()
            }
        };

        let mut handle = stdout.lock();
        handle
            .write_all(format!("{reply}\n\n").as_bytes())
            .context("failed to write reply")?;
    }

    Ok(String::new())
}

/// Direct retrieval: print the snippets the tool would return.
async fn cmd_search(query: &str, dedup: bool) -> anyhow::Result<String> {
    let agent_config = AgentConfig::from_env().context("agent configuration")?;
    let retrieval_config = RetrievalConfig::from_env().context("retrieval configuration")?;

    let knowledge_base = KnowledgeBase::from_config(
        retrieval_config,
        &agent_config.api_key,
        agent_config.base_url.as_deref(),
        &agent_config.embedding_model,
    );

    let mut snippets = knowledge_base.find_relevant_content(query).await?;
    if dedup {
        snippets = dedup_snippets(snippets);
    }

    if snippets.is_empty() {
        return Ok("No results.\n".to_string());
    }

    let mut out = String::new();
    for snippet in &snippets {
        let _ = writeln!(
            out,
            "[{}] (score {:.4})\n{}\n",
            snippet.id, snippet.similarity, snippet.text
        );
    }
    Ok(out)
}

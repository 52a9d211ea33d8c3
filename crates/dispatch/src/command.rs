//! Slash-command extraction from comment bodies.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[a-z0-9_\-/.,]+$").unwrap());

/// A parsed slash command.
///
/// `argv` is the whitespace-split first command line; `lines` keeps every
/// line of the comment that started with a slash, in order, for callers
/// that want the full command block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub argv: Vec<String>,
    pub lines: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    /// No line of the comment starts with `/`. Not worth a reply; the
    /// comment is ordinary conversation.
    #[error("comment contains no slash command")]
    NoSlashCommand,

    /// A slash line exists but its first token is not a well-formed
    /// command.
    #[error("first token '{token}' is not a valid command")]
    InvalidSyntax { token: String },
}

/// Extracts the slash command from a comment body.
///
/// Only the first slash-prefixed line is parsed. Its first token must
/// match `^/[a-z0-9_\-/.,]+$`; anything after it on the same line becomes
/// additional `argv` entries.
pub fn extract_command(body: &str) -> Result<SlashCommand, CommandParseError> {
    let lines: Vec<String> = body
        .split(['\r', '\n'])
        .filter(|line| line.starts_with('/'))
        .map(ToString::to_string)
        .collect();

    if lines.is_empty() {
        return Err(CommandParseError::NoSlashCommand);
    }

    let argv: Vec<String> = lines[0]
        .split_whitespace()
        .map(ToString::to_string)
        .collect();

    if !COMMAND_RE.is_match(&argv[0]) {
        return Err(CommandParseError::InvalidSyntax {
            token: argv[0].clone(),
        });
    }

    Ok(SlashCommand { argv, lines })
}

//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve input for commands that accept either an inline string or a file.
pub fn read_text_arg(text: Option<String>, from: Option<PathBuf>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t);
    }
    if let Some(path) = from {
        if path.as_os_str() == "-" {
            return read_stdin();
        }
        return fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    read_stdin()
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Strip the line terminator that shells and card readers append.
pub fn strip_line_end(input: &str) -> &str {
    input.trim_end_matches(['\r', '\n'])
}

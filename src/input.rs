use anyhow::{Context, Result};
use std::fmt;
use std::io::Read;
use tracing::debug;

/// Neither piped stdin nor the arguments carried any text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoInput;

impl fmt::Display for NoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no input provided")
    }
}

impl std::error::Error for NoInput {}

/// Gathers the prompt fragments in send order: piped stdin first, then the
/// joined arguments. `piped` is `None` when stdin is a terminal.
///
/// Stdin text is kept verbatim; it only has to contain something other than
/// whitespace to count. Fails with [`NoInput`] when both sources are blank.
pub fn collect<R: Read>(piped: Option<R>, args: &[String]) -> Result<Vec<String>> {
    let mut fragments = Vec::with_capacity(2);

    if let Some(mut reader) = piped {
        let mut raw = Vec::new();
        reader
            .read_to_end(&mut raw)
            .context("failed to read standard input")?;
        let text = String::from_utf8_lossy(&raw).into_owned();
        debug!(stdin_len = text.len(), "read piped input");
        if !text.trim().is_empty() {
            fragments.push(text);
        }
    }

    let query = args.join(" ");
    let query = query.trim();
    if !query.is_empty() {
        fragments.push(query.to_string());
    }

    if fragments.is_empty() {
        return Err(NoInput.into());
    }

    debug!(fragment_count = fragments.len(), "collected prompt input");
    Ok(fragments)
}

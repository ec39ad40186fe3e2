//! JSON input resolution shared by every subcommand.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Resolve a command's JSON input: `--input <file>` first, then piped stdin.
///
/// Returns `None` when neither is given, so the caller can fall back to
/// individual flags and project defaults.
pub fn load_input<T: DeserializeOwned>(path: Option<&str>) -> CliResult<Option<T>> {
    if let Some(path) = path {
        return read_json_file(path).map(Some);
    }
    match read_stdin()? {
        Some(data) => {
            log::debug!("reading input from stdin");
            Ok(Some(serde_json::from_value(data)?))
        }
        None => Ok(None),
    }
}

/// Read a JSON file (e.g. a custom base case) into a typed struct.
pub fn read_json_file<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let resolved = resolve_path(path)?;
    log::debug!("reading input from {}", resolved.display());
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e).into())
}

fn resolve_path(path: &str) -> CliResult<PathBuf> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("Input file not found or not a file: {}", resolved.display()).into());
    }
    Ok(resolved)
}

/// Piped JSON from stdin; None for an interactive terminal or empty input.
fn read_stdin() -> CliResult<Option<Value>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

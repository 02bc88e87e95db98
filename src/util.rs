use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// A line of an input file that does not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{path}:{line}: {reason}: '{content}'")]
pub struct ParseError {
    pub path: String,
    pub line: usize,
    pub reason: &'static str,
    pub content: String,
}

impl ParseError {
    pub fn new(path: &Path, line: usize, reason: &'static str, content: &str) -> Self {
        Self {
            path: path.display().to_string(),
            line,
            reason,
            content: content.to_string(),
        }
    }
}

/// `*.tsv` files directly inside `dir`, sorted by name.
pub fn tsv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "tsv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// First two whitespace separated fields of a training data line.
pub fn two_fields(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split_whitespace();
    Some((fields.next()?, fields.next()?))
}

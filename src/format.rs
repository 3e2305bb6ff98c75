//! Response file syntax detection and the free-form `key = value` parser.

use std::fmt;

use camino::Utf8Path;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::DatasetError;
use crate::fs_util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    /// One file name per line in a fixed order.
    Legacy,
    /// `Key = file` property lines.
    Freeform,
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestFormat::Legacy => write!(f, "legacy"),
            ManifestFormat::Freeform => write!(f, "freeform"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct PropertyParseError {
    pub line: usize,
    pub reason: &'static str,
}

/// Parsed `key = value` lines, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyFile {
    entries: Vec<(String, String)>,
}

impl PropertyFile {
    pub fn try_parse(content: &str) -> Result<Self, PropertyParseError> {
        let mut entries = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (key, value) = trimmed.split_once('=').ok_or(PropertyParseError {
                line: index + 1,
                reason: "expected key = value",
            })?;
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return Err(PropertyParseError {
                    line: index + 1,
                    reason: "invalid property name",
                });
            }
            entries.push((key.to_string(), unquote(value.trim()).to_string()));
        }
        Ok(Self { entries })
    }

    /// Value of the last occurrence of `key`, ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

/// Free-form iff the file parses as properties and names a control file.
pub fn detect_format_from_str(content: &str) -> ManifestFormat {
    match PropertyFile::try_parse(content) {
        Ok(properties) if properties.get("Control").is_some_and(|value| !value.is_empty()) => {
            ManifestFormat::Freeform
        }
        Ok(_) => {
            debug!("properties parsed but no Control entry; treating as legacy");
            ManifestFormat::Legacy
        }
        Err(err) => {
            debug!(%err, "not a property file; treating as legacy");
            ManifestFormat::Legacy
        }
    }
}

pub fn detect_format(path: &Utf8Path) -> Result<ManifestFormat, DatasetError> {
    let content =
        fs_util::read_text(path).map_err(|err| DatasetError::ManifestRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(detect_format_from_str(&content))
}

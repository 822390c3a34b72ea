//! Merges raw enumeration tool output into one deduplicated hostname list.
//!
//! Each line is tried against two shapes, in order:
//!
//! 1. graph-edge tokens, `host.example.com (FQDN)`, any number per line;
//! 2. when the line has no such token, the whole trimmed line as a bare domain.

use crate::domain::model::MergedResult;
use crate::utils::error::{Result, SubenumError};
use regex::Regex;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const MERGED_FILE_NAME: &str = "results_merged.tmp";
pub const RECOGNIZED_EXTENSION: &str = ".txt";

const FQDN_TOKEN_PATTERN: &str = r"([A-Za-z0-9._-]+\.[A-Za-z0-9._-]+)\s*\(FQDN\)";
const BARE_DOMAIN_PATTERN: &str = r"^([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$";

#[derive(Debug, Clone)]
pub struct ResultMerger {
    fqdn_token: Regex,
    bare_domain: Regex,
}

impl ResultMerger {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fqdn_token: Regex::new(FQDN_TOKEN_PATTERN)?,
            bare_domain: Regex::new(BARE_DOMAIN_PATTERN)?,
        })
    }

    /// Hostnames found on one trimmed line, lowercased, in order of appearance.
    pub fn extract_line(&self, line: &str) -> Vec<String> {
        let tagged: Vec<String> = self
            .fqdn_token
            .captures_iter(line)
            .map(|caps| caps[1].to_lowercase())
            .collect();
        if !tagged.is_empty() {
            return tagged;
        }

        let candidate = line.to_lowercase();
        if self.bare_domain.is_match(&candidate) {
            vec![candidate]
        } else {
            Vec::new()
        }
    }

    pub fn merge_text(&self, text: &str, merged: &mut MergedResult) {
        for line in text.split(['\n', '\r']) {
            let line = line.trim_matches(is_line_padding);
            if line.is_empty() {
                continue;
            }
            for hostname in self.extract_line(line) {
                merged.insert(&hostname);
            }
        }
    }

    /// Scans `dir` without writing anything.
    ///
    /// A missing or unreadable directory is fatal. A file that cannot be read
    /// is skipped and counted in [`MergedResult::skipped_files`].
    pub fn merge_directory(&self, dir: &Path) -> Result<MergedResult> {
        if !dir.is_dir() {
            return Err(SubenumError::WorkspaceMissing {
                path: dir.display().to_string(),
            });
        }

        let mut merged = MergedResult::new();
        for path in candidate_files(dir)? {
            match fs::read(&path) {
                Ok(bytes) => {
                    self.merge_text(&decode_permissive(&bytes), &mut merged);
                    merged.scanned_files += 1;
                    tracing::debug!("Merged {} ({} unique so far)", path.display(), merged.len());
                }
                Err(e) => {
                    merged.skipped_files += 1;
                    tracing::warn!("Skipping unreadable file {}: {}", path.display(), e);
                }
            }
        }

        Ok(merged)
    }

    /// Scans `dir` and writes the sorted list to [`MERGED_FILE_NAME`] inside it.
    pub fn merge_and_write(&self, dir: &Path) -> Result<MergedResult> {
        let merged = self.merge_directory(dir)?;
        fs::write(merged_path(dir), merged.render())?;
        Ok(merged)
    }
}

pub fn merged_path(dir: &Path) -> PathBuf {
    dir.join(MERGED_FILE_NAME)
}

/// Regular `.txt` files in `dir`, sorted by name, never including the merge output.
fn candidate_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        // Matched on raw bytes so names that are not valid UTF-8 are still read.
        let name = entry.file_name();
        if !name.as_encoded_bytes().ends_with(RECOGNIZED_EXTENSION.as_bytes())
            || name == OsStr::new(MERGED_FILE_NAME)
        {
            continue;
        }
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

/// Whitespace plus the ASCII file/group/record/unit separators.
fn is_line_padding(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Decodes UTF-8, dropping invalid byte sequences instead of failing.
pub fn decode_permissive(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

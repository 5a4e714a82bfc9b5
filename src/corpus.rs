//! Facilities for discovering input files and loading whitespace-tokenized text corpora.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{Result, SeqBucketError};

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Directories are traversed recursively by default; set [`IngestConfig::recursive`] to `false`
/// to limit discovery to the first level. Symlink traversal is controlled through
/// [`IngestConfig::follow_symlinks`]. Files inside a directory are returned in name order so
/// that vocabularies built from the same tree are stable.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(SeqBucketError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .symlink_metadata()
            .map_err(|err| SeqBucketError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            if cfg.recursive {
                let walker = WalkDir::new(path)
                    .follow_links(cfg.follow_symlinks)
                    .sort_by_file_name();
                for entry in walker {
                    let entry = entry.map_err(|err| {
                        let path = err.path().map(Path::to_path_buf);
                        SeqBucketError::io(err.into(), path)
                    })?;
                    if entry.file_type().is_file() {
                        files.push(entry.path().to_path_buf());
                    }
                }
            } else {
                let mut level = Vec::new();
                for entry in std::fs::read_dir(path)
                    .map_err(|err| SeqBucketError::io(err, Some(path.to_path_buf())))?
                {
                    let entry =
                        entry.map_err(|err| SeqBucketError::io(err, Some(path.to_path_buf())))?;
                    let entry_path = entry.path();
                    if entry_path.is_file() {
                        level.push(entry_path);
                    }
                }
                level.sort();
                files.extend(level);
            }
        } else if metadata.is_file() || (cfg.follow_symlinks && path.is_file()) {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(SeqBucketError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Splits one line into tokens, or returns `None` for a blank line.
#[must_use]
pub fn tokenize_line(line: &str, cfg: &IngestConfig, invalid_key: &str) -> Option<Vec<String>> {
    let mut tokens: Vec<String> = line
        .split_whitespace()
        .map(|token| {
            if cfg.lowercase {
                token.to_lowercase()
            } else {
                token.to_owned()
            }
        })
        .collect();
    if tokens.is_empty() {
        return None;
    }
    if cfg.append_invalid_key {
        tokens.push(invalid_key.to_owned());
    }
    Some(tokens)
}

/// Loads every non-blank line of every discovered file as one sentence.
///
/// Lines are split on whitespace. When [`IngestConfig::append_invalid_key`] is set, each
/// sentence ends with `invalid_key`, which a freshly built vocabulary maps to the invalid label.
pub fn load_sentences<P: AsRef<Path>>(
    inputs: &[P],
    cfg: &IngestConfig,
    invalid_key: &str,
) -> Result<Vec<Vec<String>>> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut sentences = Vec::new();
    for file_path in file_paths {
        let file =
            File::open(&file_path).map_err(|err| SeqBucketError::io(err, Some(file_path.clone())))?;
        let before = sentences.len();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|err| SeqBucketError::io(err, Some(file_path.clone())))?;
            if let Some(tokens) = tokenize_line(&line, cfg, invalid_key) {
                sentences.push(tokens);
            }
        }
        debug!(
            "loaded {} sentences from {}",
            sentences.len() - before,
            file_path.display()
        );
    }
    if sentences.is_empty() {
        return Err(SeqBucketError::InvalidConfig(
            "no sentences could be loaded from inputs".into(),
        ));
    }
    Ok(sentences)
}

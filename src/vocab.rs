//! Token vocabulary shared by the encoder and decoders.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqBucketError};

/// Integer label assigned to a token. Signed so that `-1` can serve as the invalid label.
pub type Label = i32;

/// Mapping between string tokens and integer labels.
///
/// Every vocabulary carries one reserved entry, `invalid_key -> invalid_label`, which marks
/// padding and end-of-sentence positions. No other token may use the reserved label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocab {
    index: AHashMap<String, Label>,
    inverse: AHashMap<Label, String>,
    invalid_key: String,
    invalid_label: Label,
}

#[derive(Serialize, Deserialize)]
struct VocabFile {
    invalid_key: String,
    invalid_label: Label,
    tokens: Vec<(String, Label)>,
}

impl Vocab {
    /// Creates a vocabulary holding only the reserved entry.
    #[must_use]
    pub fn new<S: Into<String>>(invalid_key: S, invalid_label: Label) -> Self {
        let invalid_key = invalid_key.into();
        let mut index = AHashMap::new();
        let mut inverse = AHashMap::new();
        index.insert(invalid_key.clone(), invalid_label);
        inverse.insert(invalid_label, invalid_key.clone());
        Self {
            index,
            inverse,
            invalid_key,
            invalid_label,
        }
    }

    /// Builds a vocabulary from existing `(token, label)` pairs.
    ///
    /// Fails when a token or label repeats, or when a token other than `invalid_key`
    /// claims the reserved label.
    pub fn from_pairs<S, I, T>(invalid_key: S, invalid_label: Label, pairs: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (T, Label)>,
        T: Into<String>,
    {
        let mut vocab = Self::new(invalid_key, invalid_label);
        for (token, label) in pairs {
            let token = token.into();
            if token == vocab.invalid_key {
                if label != invalid_label {
                    return Err(SeqBucketError::InvalidConfig(format!(
                        "invalid key {token:?} must map to {invalid_label}, found {label}"
                    )));
                }
                continue;
            }
            if label == invalid_label {
                return Err(SeqBucketError::InvalidConfig(format!(
                    "token {token:?} uses the reserved label {invalid_label}"
                )));
            }
            if vocab.index.contains_key(&token) {
                return Err(SeqBucketError::InvalidConfig(format!(
                    "duplicate token {token:?}"
                )));
            }
            if vocab.inverse.contains_key(&label) {
                return Err(SeqBucketError::InvalidConfig(format!(
                    "duplicate label {label}"
                )));
            }
            vocab.insert(token, label);
        }
        Ok(vocab)
    }

    pub(crate) fn insert(&mut self, token: String, label: Label) {
        self.inverse.insert(label, token.clone());
        self.index.insert(token, label);
    }

    /// Returns the label of `token`, if present.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<Label> {
        self.index.get(token).copied()
    }

    /// Returns `true` when `token` has a label.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Number of entries, including the reserved one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when only the reserved entry is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.len() <= 1
    }

    /// Key stored against the invalid label.
    #[must_use]
    pub fn invalid_key(&self) -> &str {
        &self.invalid_key
    }

    /// Label reserved for padding.
    #[must_use]
    pub fn invalid_label(&self) -> Label {
        self.invalid_label
    }

    /// Largest label held by any entry.
    #[must_use]
    pub fn max_label(&self) -> Option<Label> {
        self.inverse.keys().copied().max()
    }

    /// Returns all entries ordered by label.
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, Label)> {
        let mut entries: Vec<(&str, Label)> = self
            .index
            .iter()
            .map(|(token, &label)| (token.as_str(), label))
            .collect();
        entries.sort_by_key(|&(_, label)| label);
        entries
    }

    /// Looks up the token for `label`.
    #[must_use]
    pub fn decode(&self, label: Label) -> Option<&str> {
        self.inverse.get(&label).map(String::as_str)
    }

    /// Maps a whole encoded sentence back to tokens.
    pub fn decode_sentence(&self, labels: &[Label]) -> Result<Vec<&str>> {
        labels
            .iter()
            .map(|&label| self.decode(label).ok_or(SeqBucketError::UnknownLabel(label)))
            .collect()
    }

    /// Serialises the vocabulary to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let file = VocabFile {
            invalid_key: self.invalid_key.clone(),
            invalid_label: self.invalid_label,
            tokens: self
                .entries()
                .into_iter()
                .filter(|&(token, _)| token != self.invalid_key)
                .map(|(token, label)| (token.to_owned(), label))
                .collect(),
        };
        let json = if pretty {
            serde_json::to_string_pretty(&file)?
        } else {
            serde_json::to_string(&file)?
        };
        Ok(json)
    }

    /// Parses a vocabulary produced by [`Vocab::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let file: VocabFile = serde_json::from_str(json)?;
        Self::from_pairs(file.invalid_key, file.invalid_label, file.tokens)
    }

    /// Writes the vocabulary to `path` as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json(true)?;
        fs::write(path, json).map_err(|err| SeqBucketError::io(err, Some(path.to_path_buf())))
    }

    /// Reads a vocabulary previously written by [`Vocab::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).map_err(|err| SeqBucketError::io(err, Some(path.to_path_buf())))?;
        Self::from_json(&json)
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_INVALID_KEY, crate::config::DEFAULT_INVALID_LABEL)
    }
}

//! Configuration builders controlling encoding, bucketing, and corpus ingestion.

use crate::error::{Result, SeqBucketError};
use crate::vocab::Label;
use serde::{Deserialize, Serialize};

/// Default label reserved for padding and the end-of-sentence key.
pub const DEFAULT_INVALID_LABEL: Label = -1;
/// Default key mapped to [`DEFAULT_INVALID_LABEL`] in freshly built vocabularies.
pub const DEFAULT_INVALID_KEY: &str = "\n";
/// Default name of the data input in shape descriptors.
pub const DEFAULT_DATA_NAME: &str = "data";
/// Default name of the label input in shape descriptors.
pub const DEFAULT_LABEL_NAME: &str = "softmax_label";

/// Settings for [`crate::encoder::encode_sentences`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Label reserved for the invalid key; never handed out to a real token.
    pub invalid_label: Label,
    /// Token that maps to `invalid_label` in a freshly built vocabulary.
    pub invalid_key: String,
    /// Lowest label assigned to a new token.
    pub start_label: Label,
}

impl EncodeConfig {
    /// Returns a builder initialised with [`EncodeConfig::default`].
    #[must_use]
    pub fn builder() -> EncodeBuilder {
        EncodeBuilder::default()
    }

    /// Validates the invariants required for encoding.
    pub fn validate(&self) -> Result<()> {
        if self.start_label < 0 {
            return Err(SeqBucketError::InvalidConfig(format!(
                "start_label ({}) must be non-negative",
                self.start_label
            )));
        }
        Ok(())
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            invalid_label: DEFAULT_INVALID_LABEL,
            invalid_key: DEFAULT_INVALID_KEY.into(),
            start_label: 0,
        }
    }
}

/// Builder for [`EncodeConfig`].
#[derive(Debug, Default, Clone)]
pub struct EncodeBuilder {
    cfg: EncodeConfig,
}

impl EncodeBuilder {
    /// Creates a builder with [`EncodeConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reserved invalid label.
    #[must_use]
    pub fn invalid_label(mut self, value: Label) -> Self {
        self.cfg.invalid_label = value;
        self
    }

    /// Sets the key stored against the invalid label.
    #[must_use]
    pub fn invalid_key<S: Into<String>>(mut self, key: S) -> Self {
        self.cfg.invalid_key = key.into();
        self
    }

    /// Sets the first label handed out to new tokens.
    #[must_use]
    pub fn start_label(mut self, value: Label) -> Self {
        self.cfg.start_label = value;
        self
    }

    /// Finalises the builder, returning a validated [`EncodeConfig`].
    pub fn build(self) -> Result<EncodeConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Settings for [`crate::iter::BucketSentenceIter`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketConfig {
    /// Rows per emitted batch.
    pub batch_size: usize,
    /// Value used to pad rows and to fill the last label column.
    pub invalid_label: Label,
    /// Explicit bucket widths; `None` derives them from the sentence length histogram.
    pub buckets: Option<Vec<usize>>,
    /// Name reported for the data array in shape descriptors.
    pub data_name: String,
    /// Name reported for the label array in shape descriptors.
    pub label_name: String,
    /// Seed for shuffling; `None` draws one from the operating system.
    pub seed: Option<u64>,
}

impl BucketConfig {
    /// Returns a builder initialised with [`BucketConfig::default`].
    #[must_use]
    pub fn builder() -> BucketBuilder {
        BucketBuilder::default()
    }

    /// Validates the invariants required for bucketing.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SeqBucketError::InvalidConfig(
                "batch_size must be greater than zero".into(),
            ));
        }
        if let Some(buckets) = &self.buckets {
            if buckets.contains(&0) {
                return Err(SeqBucketError::InvalidConfig(
                    "bucket widths must be greater than zero".into(),
                ));
            }
        }
        if self.data_name.is_empty() || self.label_name.is_empty() {
            return Err(SeqBucketError::InvalidConfig(
                "data_name and label_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            invalid_label: DEFAULT_INVALID_LABEL,
            buckets: None,
            data_name: DEFAULT_DATA_NAME.into(),
            label_name: DEFAULT_LABEL_NAME.into(),
            seed: None,
        }
    }
}

/// Builder for [`BucketConfig`].
#[derive(Debug, Default, Clone)]
pub struct BucketBuilder {
    cfg: BucketConfig,
}

impl BucketBuilder {
    /// Creates a builder with [`BucketConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of rows per batch.
    #[must_use]
    pub fn batch_size(mut self, value: usize) -> Self {
        self.cfg.batch_size = value;
        self
    }

    /// Sets the padding value.
    #[must_use]
    pub fn invalid_label(mut self, value: Label) -> Self {
        self.cfg.invalid_label = value;
        self
    }

    /// Supplies explicit bucket widths.
    #[must_use]
    pub fn buckets<I>(mut self, widths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.cfg.buckets = Some(widths.into_iter().collect());
        self
    }

    /// Reverts to deriving buckets from the data.
    #[must_use]
    pub fn derive_buckets(mut self) -> Self {
        self.cfg.buckets = None;
        self
    }

    /// Overrides the data and label names used in shape descriptors.
    #[must_use]
    pub fn names<D: Into<String>, L: Into<String>>(mut self, data: D, label: L) -> Self {
        self.cfg.data_name = data.into();
        self.cfg.label_name = label.into();
        self
    }

    /// Fixes the shuffle seed.
    #[must_use]
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.cfg.seed = seed;
        self
    }

    /// Finalises the builder, returning a validated [`BucketConfig`].
    ///
    /// Explicit widths are sorted and deduplicated. An empty list is treated
    /// the same as no list and falls back to derivation.
    pub fn build(mut self) -> Result<BucketConfig> {
        if let Some(widths) = self.cfg.buckets.as_mut() {
            widths.sort_unstable();
            widths.dedup();
        }
        if self.cfg.buckets.as_ref().is_some_and(Vec::is_empty) {
            self.cfg.buckets = None;
        }
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Configuration controlling how text corpora are read from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConfig {
    /// Enables recursive directory traversal.
    pub recursive: bool,
    /// Follows symlinks encountered during traversal.
    pub follow_symlinks: bool,
    /// Appends the invalid key to every sentence as an end-of-sentence marker.
    pub append_invalid_key: bool,
    /// Lowercases tokens before they are returned.
    pub lowercase: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
            append_invalid_key: false,
            lowercase: false,
        }
    }
}

impl IngestConfig {
    /// Returns a builder initialised with [`IngestConfig::default`].
    #[must_use]
    pub fn builder() -> IngestBuilder {
        IngestBuilder::default()
    }
}

/// Builder for [`IngestConfig`].
#[derive(Debug, Default, Clone)]
pub struct IngestBuilder {
    cfg: IngestConfig,
}

impl IngestBuilder {
    /// Creates a new builder with [`IngestConfig::default`] settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables recursive directory traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.cfg.recursive = enabled;
        self
    }

    /// Enables or disables following of symlinks when traversing directories.
    #[must_use]
    pub fn follow_symlinks(mut self, enabled: bool) -> Self {
        self.cfg.follow_symlinks = enabled;
        self
    }

    /// Terminates each sentence with the invalid key.
    #[must_use]
    pub fn append_invalid_key(mut self, enabled: bool) -> Self {
        self.cfg.append_invalid_key = enabled;
        self
    }

    /// Lowercases every token.
    #[must_use]
    pub fn lowercase(mut self, enabled: bool) -> Self {
        self.cfg.lowercase = enabled;
        self
    }

    /// Finalises the builder, returning the [`IngestConfig`].
    pub fn build(self) -> IngestConfig {
        self.cfg
    }
}

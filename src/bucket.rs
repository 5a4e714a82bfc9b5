//! Bucket selection helpers and summary statistics.

use std::fmt;

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::BucketConfig;
use crate::error::Result;

/// Derives bucket widths from a sentence length histogram.
///
/// A length becomes a bucket when at least `batch_size` sentences have exactly that length.
/// Zero is never a bucket. The result is sorted ascending.
#[must_use]
pub fn derive_buckets<I>(lengths: I, batch_size: usize) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut histogram: FxHashMap<usize, usize> = FxHashMap::default();
    for len in lengths {
        *histogram.entry(len).or_insert(0) += 1;
    }
    let mut buckets: Vec<usize> = histogram
        .into_iter()
        .filter(|&(len, count)| len > 0 && count >= batch_size)
        .map(|(len, _)| len)
        .collect();
    buckets.sort_unstable();
    buckets
}

/// Returns the index of the smallest bucket that can hold `len` tokens.
///
/// `buckets` must be sorted ascending. `None` means the sentence is longer than every bucket.
#[must_use]
pub fn assign_bucket(buckets: &[usize], len: usize) -> Option<usize> {
    let idx = buckets.partition_point(|&width| width < len);
    (idx < buckets.len()).then_some(idx)
}

/// Shape of a bucketed dataset: rows, batches, discards and padding overhead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BucketStats {
    /// Bucket widths in ascending order.
    pub buckets: Vec<usize>,
    /// Number of sentences stored in each bucket.
    pub rows_per_bucket: Vec<usize>,
    /// Number of full batches each bucket yields per epoch.
    pub batches_per_bucket: Vec<usize>,
    /// Sentences offered to the bucketer.
    pub total_sentences: usize,
    /// Sentences dropped for exceeding the largest bucket.
    pub discarded: usize,
    /// Batches per epoch across all buckets.
    pub num_batches: usize,
    /// Fraction of stored cells that hold padding.
    pub padding_ratio: f64,
}

impl BucketStats {
    pub(crate) fn from_rows(
        buckets: Vec<usize>,
        rows_per_bucket: Vec<usize>,
        batch_size: usize,
        total_sentences: usize,
        discarded: usize,
        token_cells: usize,
    ) -> Self {
        let batches_per_bucket: Vec<usize> =
            rows_per_bucket.iter().map(|rows| rows / batch_size).collect();
        let num_batches = batches_per_bucket.iter().sum();
        let total_cells: usize = buckets
            .iter()
            .zip(&rows_per_bucket)
            .map(|(width, rows)| width * rows)
            .sum();
        let padding_ratio = if total_cells == 0 {
            0.0
        } else {
            (total_cells - token_cells) as f64 / total_cells as f64
        };
        Self {
            buckets,
            rows_per_bucket,
            batches_per_bucket,
            total_sentences,
            discarded,
            num_batches,
            padding_ratio,
        }
    }
}

/// Resolves the bucket widths used for a corpus with the given sentence lengths.
///
/// Supplied widths are sorted and deduplicated. A missing or empty list derives the
/// widths from the lengths with [`derive_buckets`].
#[must_use]
pub fn normalized_buckets<I>(cfg: &BucketConfig, lengths: I) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    match &cfg.buckets {
        Some(widths) if !widths.is_empty() => {
            let mut widths = widths.clone();
            widths.sort_unstable();
            widths.dedup();
            widths
        }
        _ => {
            let derived = derive_buckets(lengths, cfg.batch_size);
            debug!("derived buckets {derived:?} for batch size {}", cfg.batch_size);
            derived
        }
    }
}

/// Computes [`BucketStats`] from sentence lengths alone, without materialising any arrays.
pub fn summarize(lengths: &[usize], cfg: &BucketConfig) -> Result<BucketStats> {
    cfg.validate()?;
    let buckets = normalized_buckets(cfg, lengths.iter().copied());
    let mut rows = vec![0usize; buckets.len()];
    let mut discarded = 0usize;
    let mut token_cells = 0usize;
    for &len in lengths {
        match assign_bucket(&buckets, len) {
            Some(idx) => {
                rows[idx] += 1;
                token_cells += len;
            }
            None => discarded += 1,
        }
    }
    Ok(BucketStats::from_rows(
        buckets,
        rows,
        cfg.batch_size,
        lengths.len(),
        discarded,
        token_cells,
    ))
}

impl fmt::Display for BucketStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sentences    : {}", self.total_sentences)?;
        writeln!(f, "Discarded    : {}", self.discarded)?;
        writeln!(f, "Batches/epoch: {}", self.num_batches)?;
        writeln!(f, "Padding      : {:.2}%", self.padding_ratio * 100.0)?;
        writeln!(f, "{:>8} {:>10} {:>10}", "width", "rows", "batches")?;
        for ((width, rows), batches) in self
            .buckets
            .iter()
            .zip(&self.rows_per_bucket)
            .zip(&self.batches_per_bucket)
        {
            writeln!(f, "{width:>8} {rows:>10} {batches:>10}")?;
        }
        Ok(())
    }
}

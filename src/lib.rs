//! Vocabulary encoding and length-bucketed mini-batch iteration for language models.
//!
//! The crate turns tokenized sentences into integer labels and serves them as padded,
//! fixed-size batches grouped by sequence length. Each batch carries next-token labels (the
//! data shifted left by one) so it can feed an auto-regressive model directly.
//!
//! ```
//! use seqbucket::{encode_sentences, BucketConfig, BucketSentenceIter, DataIter, EncodeConfig};
//!
//! # fn main() -> seqbucket::Result<()> {
//! let sentences = vec![
//!     vec!["the", "cat", "sat"],
//!     vec!["a", "dog", "ran"],
//!     vec!["hello"],
//!     vec!["bye"],
//! ];
//! let (encoded, _vocab) = encode_sentences(&sentences, None, &EncodeConfig::default())?;
//!
//! let cfg = BucketConfig::builder().batch_size(2).seed(Some(42)).build()?;
//! let mut iter = BucketSentenceIter::<f32>::new(&encoded, &cfg)?;
//! assert_eq!(iter.buckets(), &[1, 3]);
//!
//! iter.reset();
//! let mut batches = 0;
//! while let Some(batch) = iter.next_batch() {
//!     assert_eq!(batch.data_array().dim(), (2, batch.bucket_key));
//!     batches += 1;
//! }
//! assert_eq!(batches, 2);
//! # Ok(())
//! # }
//! ```
//!
//! The `seqbucket` CLI is enabled by default through the `cli` feature. Library users can
//! disable default features to drop the CLI dependencies.

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod bucket;
pub mod config;
pub mod corpus;
pub mod encoder;
pub mod error;
pub mod iter;
pub mod vocab;

pub use bucket::{normalized_buckets, summarize, BucketStats};
pub use config::{BucketBuilder, BucketConfig, EncodeBuilder, EncodeConfig, IngestConfig};
pub use encoder::encode_sentences;
pub use error::{Result, SeqBucketError};
pub use iter::{BucketSentenceIter, DataBatch, DataDesc, DataIter, Element};
pub use vocab::{Label, Vocab};

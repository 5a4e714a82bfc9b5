//! Sentence encoding: maps string tokens to integer labels.

use log::debug;

use crate::config::EncodeConfig;
use crate::error::{Result, SeqBucketError};
use crate::vocab::{Label, Vocab};

/// Encodes `sentences`, optionally building the vocabulary as it goes.
///
/// With `vocab = None` a new vocabulary is created holding the reserved
/// `cfg.invalid_key -> cfg.invalid_label` entry, and every unseen token receives the next
/// label counting up from `cfg.start_label`. The invalid label is skipped, so it is never
/// handed to a real token. Labels follow first-occurrence order in the flattened stream.
///
/// With `vocab = Some(..)` the vocabulary is closed: any token it does not contain fails
/// with [`SeqBucketError::UnknownToken`].
///
/// ```
/// use seqbucket::{encode_sentences, EncodeConfig};
///
/// # fn main() -> seqbucket::Result<()> {
/// let sentences = vec![vec!["a", "b"], vec!["c"], vec!["a", "c", "b", "a"]];
/// let (encoded, vocab) = encode_sentences(&sentences, None, &EncodeConfig::default())?;
/// assert_eq!(encoded, vec![vec![0, 1], vec![2], vec![0, 2, 1, 0]]);
/// assert_eq!(vocab.get("c"), Some(2));
/// # Ok(())
/// # }
/// ```
pub fn encode_sentences<S, T>(
    sentences: &[S],
    vocab: Option<Vocab>,
    cfg: &EncodeConfig,
) -> Result<(Vec<Vec<Label>>, Vocab)>
where
    S: AsRef<[T]>,
    T: AsRef<str>,
{
    let (mut vocab, closed) = match vocab {
        Some(vocab) => (vocab, true),
        None => {
            cfg.validate()?;
            (Vocab::new(cfg.invalid_key.clone(), cfg.invalid_label), false)
        }
    };

    let mut next = cfg.start_label;
    let mut encoded = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let sentence = sentence.as_ref();
        let mut coded = Vec::with_capacity(sentence.len());
        for token in sentence {
            let token = token.as_ref();
            let label = match vocab.get(token) {
                Some(label) => label,
                None if closed => return Err(SeqBucketError::UnknownToken(token.to_owned())),
                None => {
                    if next == cfg.invalid_label {
                        next = bump(next)?;
                    }
                    let label = next;
                    vocab.insert(token.to_owned(), label);
                    next = bump(next)?;
                    label
                }
            };
            coded.push(label);
        }
        encoded.push(coded);
    }

    if !closed {
        debug!(
            "encoded {} sentences; vocabulary has {} entries",
            encoded.len(),
            vocab.len()
        );
    }
    Ok((encoded, vocab))
}

fn bump(label: Label) -> Result<Label> {
    label
        .checked_add(1)
        .ok_or_else(|| SeqBucketError::InvalidConfig("label space exhausted".into()))
}

//! Length-bucketed batch iteration for next-token prediction.
//!
//! [`BucketSentenceIter`] pads each encoded sentence to the smallest bucket that fits it,
//! stores every bucket as a dense `(rows, width)` array, and hands out fixed-size batches
//! whose labels are the data shifted left by one position.

use std::fmt;

use log::{debug, info, warn};
use ndarray::{s, Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::bucket::{assign_bucket, normalized_buckets, BucketStats};
use crate::config::BucketConfig;
use crate::error::Result;
use crate::vocab::Label;

/// Numeric element type stored in the bucket arrays.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Name reported in [`DataDesc::dtype`].
    const DTYPE: &'static str;

    /// Converts a vocabulary label into the element type.
    fn from_label(label: Label) -> Self;
}

impl Element for f32 {
    const DTYPE: &'static str = "float32";

    #[allow(clippy::cast_precision_loss)]
    fn from_label(label: Label) -> Self {
        label as f32
    }
}

impl Element for f64 {
    const DTYPE: &'static str = "float64";

    fn from_label(label: Label) -> Self {
        f64::from(label)
    }
}

impl Element for i32 {
    const DTYPE: &'static str = "int32";

    fn from_label(label: Label) -> Self {
        label
    }
}

impl Element for i64 {
    const DTYPE: &'static str = "int64";

    fn from_label(label: Label) -> Self {
        i64::from(label)
    }
}

/// Name, shape and element type of one input or label array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataDesc {
    /// Input name as seen by the consuming network.
    pub name: String,
    /// `(batch_size, sequence_length)`.
    pub shape: (usize, usize),
    /// Element type name, e.g. `float32`.
    pub dtype: &'static str,
}

impl DataDesc {
    fn new<T: Element>(name: &str, shape: (usize, usize)) -> Self {
        Self {
            name: name.to_owned(),
            shape,
            dtype: T::DTYPE,
        }
    }
}

/// One mini-batch of data and next-token labels drawn from a single bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBatch<T> {
    /// Data arrays, one per input.
    pub data: Vec<Array2<T>>,
    /// Label arrays, one per output.
    pub label: Vec<Array2<T>>,
    /// Width of the originating bucket, used to pick a matching network instance.
    pub bucket_key: usize,
    /// Descriptors of `data`.
    pub provide_data: Vec<DataDesc>,
    /// Descriptors of `label`.
    pub provide_label: Vec<DataDesc>,
}

impl<T> DataBatch<T> {
    /// The data array of a single-input batch.
    #[must_use]
    pub fn data_array(&self) -> &Array2<T> {
        &self.data[0]
    }

    /// The label array of a single-output batch.
    #[must_use]
    pub fn label_array(&self) -> &Array2<T> {
        &self.label[0]
    }
}

/// Epoch-based iteration protocol consumed by training loops.
///
/// `next_batch` returns `None` once the epoch is exhausted and keeps doing so until
/// `reset` starts a new one.
pub trait DataIter {
    /// Batch type produced by the iterator.
    type Item;

    /// Rewinds to the start of a new, reshuffled epoch.
    fn reset(&mut self);

    /// Returns the next batch, or `None` at the end of the epoch.
    fn next_batch(&mut self) -> Option<Self::Item>;

    /// Rows per batch.
    fn batch_size(&self) -> usize;

    /// Descriptors of the data inputs at their largest shape.
    fn provide_data(&self) -> &[DataDesc];

    /// Descriptors of the label inputs at their largest shape.
    fn provide_label(&self) -> &[DataDesc];

    /// Bucket key used when a single fixed shape is required.
    fn default_bucket_key(&self) -> usize;
}

/// Bucketing iterator for language-model training.
///
/// Labels for each step are built from the data of the next step; the final step of
/// every row is labelled with the invalid label.
///
/// Construction does not shuffle: the first epoch walks buckets in ascending width and
/// rows in input order. Call [`DataIter::reset`] to shuffle.
#[derive(Debug, Clone)]
pub struct BucketSentenceIter<T: Element = f32> {
    data: Vec<Array2<T>>,
    buckets: Vec<usize>,
    idx: Vec<(usize, usize)>,
    curr_idx: usize,
    batch_size: usize,
    invalid_label: Label,
    default_bucket_key: usize,
    data_name: String,
    label_name: String,
    provide_data: Vec<DataDesc>,
    provide_label: Vec<DataDesc>,
    total_sentences: usize,
    discarded: usize,
    token_cells: usize,
    rng: StdRng,
}

impl<T: Element> BucketSentenceIter<T> {
    /// Buckets and pads `sentences` according to `cfg`.
    ///
    /// Sentences longer than the largest bucket are dropped and reported once through
    /// `log::warn!`. An empty bucket set is allowed and yields no batches.
    pub fn new<S>(sentences: &[S], cfg: &BucketConfig) -> Result<Self>
    where
        S: AsRef<[Label]>,
    {
        cfg.validate()?;
        let batch_size = cfg.batch_size;
        let buckets = normalized_buckets(cfg, sentences.iter().map(|s| s.as_ref().len()));
        if buckets.is_empty() {
            warn!("no bucket has at least {batch_size} sentences; iterator will be empty");
        }

        let pad = T::from_label(cfg.invalid_label);
        let mut buffers: Vec<Vec<T>> = vec![Vec::new(); buckets.len()];
        let mut rows = vec![0usize; buckets.len()];
        let mut discarded = 0usize;
        let mut token_cells = 0usize;
        for sentence in sentences {
            let sentence = sentence.as_ref();
            let Some(buck) = assign_bucket(&buckets, sentence.len()) else {
                discarded += 1;
                continue;
            };
            let buffer = &mut buffers[buck];
            buffer.extend(sentence.iter().map(|&label| T::from_label(label)));
            buffer.resize(buffer.len() + buckets[buck] - sentence.len(), pad);
            rows[buck] += 1;
            token_cells += sentence.len();
        }

        let data = buffers
            .into_iter()
            .zip(buckets.iter().zip(&rows))
            .map(|(buffer, (&width, &count))| Array2::from_shape_vec((count, width), buffer))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if discarded > 0 {
            warn!("discarded {discarded} sentences longer than the largest bucket.");
        } else {
            debug!("no sentences exceeded the largest bucket");
        }

        let default_bucket_key = buckets.last().copied().unwrap_or(0);
        let provide_data = vec![DataDesc::new::<T>(
            &cfg.data_name,
            (batch_size, default_bucket_key),
        )];
        let provide_label = vec![DataDesc::new::<T>(
            &cfg.label_name,
            (batch_size, default_bucket_key),
        )];

        let mut idx = Vec::new();
        for (i, buck) in data.iter().enumerate() {
            let limit = (buck.nrows() + 1).saturating_sub(batch_size);
            idx.extend((0..limit).step_by(batch_size).map(|j| (i, j)));
        }

        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "bucketed {} sentences into {} buckets; {} batches per epoch",
            sentences.len() - discarded,
            buckets.len(),
            idx.len()
        );

        Ok(Self {
            data,
            buckets,
            idx,
            curr_idx: 0,
            batch_size,
            invalid_label: cfg.invalid_label,
            default_bucket_key,
            data_name: cfg.data_name.clone(),
            label_name: cfg.label_name.clone(),
            provide_data,
            provide_label,
            total_sentences: sentences.len(),
            discarded,
            token_cells,
            rng,
        })
    }

    /// Bucket widths in ascending order.
    #[must_use]
    pub fn buckets(&self) -> &[usize] {
        &self.buckets
    }

    /// Padded rows stored for bucket `i`.
    #[must_use]
    pub fn bucket_data(&self, i: usize) -> Option<&Array2<T>> {
        self.data.get(i)
    }

    /// Batches per epoch.
    #[must_use]
    pub fn num_batches(&self) -> usize {
        self.idx.len()
    }

    /// Batches already served in the current epoch.
    #[must_use]
    pub fn position(&self) -> usize {
        self.curr_idx
    }

    /// Sentences dropped for exceeding the largest bucket.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Padding value as a label.
    #[must_use]
    pub fn invalid_label(&self) -> Label {
        self.invalid_label
    }

    /// Summary of the bucketed storage.
    #[must_use]
    pub fn stats(&self) -> BucketStats {
        BucketStats::from_rows(
            self.buckets.clone(),
            self.data.iter().map(Array2::nrows).collect(),
            self.batch_size,
            self.total_sentences,
            self.discarded,
            self.token_cells,
        )
    }
}

impl<T: Element> DataIter for BucketSentenceIter<T> {
    type Item = DataBatch<T>;

    fn reset(&mut self) {
        self.curr_idx = 0;
        self.idx.shuffle(&mut self.rng);
        for buck in &mut self.data {
            let mut order: Vec<usize> = (0..buck.nrows()).collect();
            order.shuffle(&mut self.rng);
            *buck = buck.select(Axis(0), &order);
        }
        debug!("reset: reshuffled {} batches", self.idx.len());
    }

    fn next_batch(&mut self) -> Option<DataBatch<T>> {
        let &(i, j) = self.idx.get(self.curr_idx)?;
        self.curr_idx += 1;

        let data = self.data[i]
            .slice(s![j..j + self.batch_size, ..])
            .to_owned();
        let label = next_token_labels(data.view(), T::from_label(self.invalid_label));
        let provide_data = vec![DataDesc::new::<T>(&self.data_name, data.dim())];
        let provide_label = vec![DataDesc::new::<T>(&self.label_name, label.dim())];

        Some(DataBatch {
            data: vec![data],
            label: vec![label],
            bucket_key: self.buckets[i],
            provide_data,
            provide_label,
        })
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn provide_data(&self) -> &[DataDesc] {
        &self.provide_data
    }

    fn provide_label(&self) -> &[DataDesc] {
        &self.provide_label
    }

    fn default_bucket_key(&self) -> usize {
        self.default_bucket_key
    }
}

impl<T: Element> Iterator for BucketSentenceIter<T> {
    type Item = DataBatch<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.idx.len() - self.curr_idx;
        (remaining, Some(remaining))
    }
}

impl<T: Element> ExactSizeIterator for BucketSentenceIter<T> {}

/// Builds next-token labels: column `k` holds `data[:, k + 1]` and the last column is `pad`.
#[must_use]
pub fn next_token_labels<T: Element>(data: ArrayView2<'_, T>, pad: T) -> Array2<T> {
    let mut label = Array2::from_elem(data.raw_dim(), pad);
    let width = data.ncols();
    if width > 1 {
        label
            .slice_mut(s![.., ..width - 1])
            .assign(&data.slice(s![.., 1..]));
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodeConfig;
    use crate::encoder::encode_sentences;
    use ndarray::array;
    use rand::Rng;
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static WARNINGS: RefCell<Vec<String>> = RefCell::new(Vec::new());
    }

    struct WarnCapture;

    impl log::Log for WarnCapture {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: WarnCapture = WarnCapture;
    static INIT_LOGGER: Once = Once::new();

    fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        INIT_LOGGER.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Warn);
        });
        WARNINGS.with(|w| w.borrow_mut().clear());
        let out = f();
        (out, WARNINGS.with(|w| w.borrow_mut().drain(..).collect()))
    }

    fn config(batch_size: usize) -> BucketConfig {
        BucketConfig::builder()
            .batch_size(batch_size)
            .seed(Some(7))
            .build()
            .unwrap()
    }

    fn random_corpus(n: usize, max_len: usize, seed: u64) -> Vec<Vec<Label>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let len = rng.gen_range(1..=max_len);
                (0..len).map(|_| rng.gen_range(0..50)).collect()
            })
            .collect()
    }

    fn sorted_rows(array: &Array2<i32>) -> Vec<Vec<i32>> {
        let mut rows: Vec<Vec<i32>> = array.outer_iter().map(|row| row.to_vec()).collect();
        rows.sort();
        rows
    }

    #[test]
    fn derived_buckets_for_small_corpus() {
        let sentences = vec![vec!["a", "b"], vec!["c"], vec!["a", "c", "b", "a"]];
        let (encoded, vocab) =
            encode_sentences(&sentences, None, &EncodeConfig::default()).unwrap();
        let iter = BucketSentenceIter::<i32>::new(&encoded, &config(1)).unwrap();
        assert_eq!(iter.buckets(), &[1, 2, 4]);
        assert_eq!(iter.discarded(), 0);

        let (a, b, c) = (
            vocab.get("a").unwrap(),
            vocab.get("b").unwrap(),
            vocab.get("c").unwrap(),
        );
        assert_eq!(iter.bucket_data(0).unwrap(), &array![[c]]);
        assert_eq!(iter.bucket_data(1).unwrap(), &array![[a, b]]);
        assert_eq!(iter.bucket_data(2).unwrap(), &array![[a, c, b, a]]);
    }

    #[test]
    fn over_length_sentence_is_discarded() {
        let cfg = BucketConfig::builder()
            .batch_size(1)
            .buckets([2])
            .build()
            .unwrap();
        let iter = BucketSentenceIter::<f32>::new(&[vec![1, 2, 3], vec![4]], &cfg).unwrap();
        assert_eq!(iter.discarded(), 1);
        assert_eq!(iter.stats().discarded, 1);
        assert_eq!(iter.bucket_data(0).unwrap().nrows(), 1);
    }

    #[test]
    fn short_sentences_are_padded_with_invalid_label() {
        let cfg = BucketConfig::builder()
            .batch_size(1)
            .buckets([3])
            .invalid_label(-7)
            .build()
            .unwrap();
        let iter = BucketSentenceIter::<i64>::new(&[vec![5]], &cfg).unwrap();
        assert_eq!(iter.bucket_data(0).unwrap(), &array![[5i64, -7, -7]]);
    }

    #[test]
    fn each_sentence_lands_in_smallest_fitting_bucket() {
        let corpus = random_corpus(200, 12, 1);
        let cfg = BucketConfig::builder()
            .batch_size(4)
            .buckets([3, 6, 9])
            .seed(Some(1))
            .build()
            .unwrap();
        let iter = BucketSentenceIter::<i32>::new(&corpus, &cfg).unwrap();

        let mut expected = vec![0usize; 3];
        let mut too_long = 0;
        for sentence in &corpus {
            match sentence.len() {
                0..=3 => expected[0] += 1,
                4..=6 => expected[1] += 1,
                7..=9 => expected[2] += 1,
                _ => too_long += 1,
            }
        }
        let rows: Vec<usize> = (0..3)
            .map(|i| iter.bucket_data(i).unwrap().nrows())
            .collect();
        assert_eq!(rows, expected);
        assert_eq!(iter.discarded(), too_long);

        for (i, &width) in iter.buckets().iter().enumerate() {
            let lower = if i == 0 { 0 } else { iter.buckets()[i - 1] };
            for row in iter.bucket_data(i).unwrap().outer_iter() {
                let real = row.iter().take_while(|&&v| v != -1).count();
                assert!(real > lower && real <= width);
            }
        }
    }

    #[test]
    fn labels_are_data_shifted_by_one() {
        let corpus = random_corpus(300, 10, 2);
        let mut iter = BucketSentenceIter::<f32>::new(&corpus, &config(8)).unwrap();
        iter.reset();
        let mut seen = 0;
        while let Some(batch) = iter.next_batch() {
            let data = batch.data_array();
            let label = batch.label_array();
            let width = data.ncols();
            assert_eq!(data.dim(), label.dim());
            assert_eq!(width, batch.bucket_key);
            assert_eq!(label.slice(s![.., ..width - 1]), data.slice(s![.., 1..]));
            assert!(label.column(width - 1).iter().all(|&v| v == -1.0));
            seen += 1;
        }
        assert!(seen > 0);
    }

    #[test]
    fn epoch_length_matches_index_table() {
        let corpus = random_corpus(250, 6, 3);
        let mut iter = BucketSentenceIter::<f32>::new(&corpus, &config(5)).unwrap();
        let expected: usize = (0..iter.buckets().len())
            .map(|i| iter.bucket_data(i).unwrap().nrows() / 5)
            .sum();
        assert_eq!(iter.num_batches(), expected);
        assert_eq!(iter.len(), expected);

        let mut count = 0;
        while iter.next_batch().is_some() {
            count += 1;
        }
        assert_eq!(count, expected);
        assert!(iter.next_batch().is_none());

        iter.reset();
        assert_eq!(iter.position(), 0);
        assert_eq!(iter.by_ref().count(), expected);
    }

    #[test]
    fn reset_permutes_rows_without_changing_them() {
        let corpus = random_corpus(120, 5, 4);
        let mut iter = BucketSentenceIter::<i32>::new(&corpus, &config(3)).unwrap();
        let before: Vec<_> = (0..iter.buckets().len())
            .map(|i| sorted_rows(iter.bucket_data(i).unwrap()))
            .collect();
        iter.reset();
        iter.reset();
        let after: Vec<_> = (0..iter.buckets().len())
            .map(|i| sorted_rows(iter.bucket_data(i).unwrap()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn same_seed_gives_same_epochs() {
        let corpus = random_corpus(100, 6, 5);
        let mut first = BucketSentenceIter::<f32>::new(&corpus, &config(4)).unwrap();
        let mut second = BucketSentenceIter::<f32>::new(&corpus, &config(4)).unwrap();
        first.reset();
        second.reset();
        let a: Vec<_> = first.by_ref().collect();
        let b: Vec<_> = second.by_ref().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn first_epoch_follows_bucket_order() {
        let corpus = vec![vec![1, 2], vec![3], vec![4, 5], vec![6]];
        let iter = BucketSentenceIter::<i32>::new(&corpus, &config(2)).unwrap();
        let keys: Vec<usize> = iter.map(|batch| batch.bucket_key).collect();
        assert_eq!(keys, vec![1, 2]);
    }

    #[test]
    fn no_qualifying_length_yields_empty_iterator() {
        let corpus = vec![vec![1], vec![2, 3], vec![4, 5, 6]];
        let mut iter = BucketSentenceIter::<f32>::new(&corpus, &config(10)).unwrap();
        assert!(iter.buckets().is_empty());
        assert_eq!(iter.discarded(), 3);
        assert_eq!(iter.default_bucket_key(), 0);
        assert!(iter.next_batch().is_none());
        iter.reset();
        assert!(iter.next_batch().is_none());
    }

    #[test]
    fn descriptors_report_shapes_and_names() {
        let corpus = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7], vec![8]];
        let cfg = BucketConfig::builder()
            .batch_size(2)
            .names("tokens", "targets")
            .seed(Some(0))
            .build()
            .unwrap();
        let mut iter = BucketSentenceIter::<f32>::new(&corpus, &cfg).unwrap();
        assert_eq!(iter.default_bucket_key(), 3);
        assert_eq!(
            iter.provide_data(),
            &[DataDesc {
                name: "tokens".into(),
                shape: (2, 3),
                dtype: "float32"
            }]
        );
        assert_eq!(iter.provide_label()[0].name, "targets");

        let batch = iter.next_batch().unwrap();
        assert_eq!(batch.bucket_key, 1);
        assert_eq!(batch.provide_data[0].shape, (2, 1));
        assert_eq!(batch.provide_label[0].shape, (2, 1));
        assert_eq!(batch.label_array(), &array![[-1.0f32], [-1.0]]);
    }

    #[test]
    fn remainder_rows_do_not_form_batches() {
        let corpus = vec![vec![1, 1]; 7];
        let iter = BucketSentenceIter::<i32>::new(&corpus, &config(3)).unwrap();
        assert_eq!(iter.num_batches(), 2);
        let stats = iter.stats();
        assert_eq!(stats.rows_per_bucket, vec![7]);
        assert_eq!(stats.batches_per_bucket, vec![2]);
    }

    #[test]
    fn next_token_labels_handles_single_column() {
        let data = array![[4, 5, 6], [7, 8, 9]];
        assert_eq!(
            next_token_labels(data.view(), 0),
            array![[5, 6, 0], [8, 9, 0]]
        );
        let single = array![[3], [2]];
        assert_eq!(next_token_labels(single.view(), -1), array![[-1], [-1]]);
    }

    #[test]
    fn explicit_empty_widths_fall_back_to_derivation() {
        let cfg = BucketConfig {
            batch_size: 1,
            buckets: Some(Vec::new()),
            ..BucketConfig::default()
        };
        let iter = BucketSentenceIter::<i32>::new(&[vec![1, 2], vec![3]], &cfg).unwrap();
        assert_eq!(iter.buckets(), &[1, 2]);
        assert_eq!(iter.discarded(), 0);
        assert_eq!(iter.num_batches(), 2);
    }

    #[test]
    fn unsorted_widths_are_normalized() {
        let cfg = BucketConfig {
            batch_size: 1,
            buckets: Some(vec![4, 2, 4]),
            ..BucketConfig::default()
        };
        let iter = BucketSentenceIter::<i32>::new(&[vec![1, 2, 3], vec![4]], &cfg).unwrap();
        assert_eq!(iter.buckets(), &[2, 4]);
        assert_eq!(iter.bucket_data(0).unwrap(), &array![[4, -1]]);
        assert_eq!(iter.bucket_data(1).unwrap(), &array![[1, 2, 3, -1]]);
    }

    #[test]
    fn reset_shuffles_batch_order() {
        // one sentence per length, so every bucket yields exactly one batch
        let corpus: Vec<Vec<Label>> = (1..=40).map(|len| vec![0; len]).collect();
        let mut iter = BucketSentenceIter::<i32>::new(&corpus, &config(1)).unwrap();
        let ascending: Vec<usize> = (1..=40).collect();
        let first: Vec<usize> = iter.by_ref().map(|batch| batch.bucket_key).collect();
        assert_eq!(first, ascending);

        iter.reset();
        let second: Vec<usize> = iter.by_ref().map(|batch| batch.bucket_key).collect();
        assert_ne!(second, ascending);
        let mut sorted = second.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, ascending);

        iter.reset();
        let third: Vec<usize> = iter.by_ref().map(|batch| batch.bucket_key).collect();
        assert_ne!(third, second);
    }

    #[test]
    fn reset_shuffles_rows_within_bucket() {
        let corpus: Vec<Vec<Label>> = (0..50).map(|token| vec![token]).collect();
        let mut iter = BucketSentenceIter::<i32>::new(&corpus, &config(1)).unwrap();
        let original: Vec<i32> = (0..50).collect();
        assert_eq!(iter.bucket_data(0).unwrap().column(0).to_vec(), original);

        iter.reset();
        let shuffled = iter.bucket_data(0).unwrap().column(0).to_vec();
        assert_ne!(shuffled, original);
        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);

        let served: Vec<i32> = iter.by_ref().map(|batch| batch.data_array()[[0, 0]]).collect();
        assert_eq!(served.len(), 50);
        assert_ne!(served, original);
    }

    #[test]
    fn discard_warning_is_logged_once() {
        let cfg = BucketConfig::builder()
            .batch_size(1)
            .buckets([2])
            .build()
            .unwrap();
        let (iter, warnings) =
            capture_warnings(|| BucketSentenceIter::<f32>::new(&[vec![1, 2, 3]], &cfg).unwrap());
        assert_eq!(iter.discarded(), 1);
        let discards: Vec<&String> = warnings
            .iter()
            .filter(|msg| msg.contains("discarded"))
            .collect();
        assert_eq!(discards.len(), 1);
        assert!(discards[0].contains("discarded 1 sentences"));
    }

    #[test]
    fn no_discard_warning_when_everything_fits() {
        let cfg = BucketConfig::builder()
            .batch_size(1)
            .buckets([3])
            .build()
            .unwrap();
        let (_, warnings) =
            capture_warnings(|| BucketSentenceIter::<f32>::new(&[vec![1, 2]], &cfg).unwrap());
        assert!(warnings.iter().all(|msg| !msg.contains("discarded")));
    }
}

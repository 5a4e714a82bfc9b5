use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use seqbucket::config::{DEFAULT_INVALID_KEY, DEFAULT_INVALID_LABEL};
use seqbucket::corpus::load_sentences;
use seqbucket::{
    encode_sentences, summarize, BucketConfig, BucketSentenceIter, DataIter, EncodeConfig,
    IngestConfig, Label, Vocab,
};

const DEFAULT_ENCODED: &str = "encoded.json";
const DEFAULT_VOCAB: &str = "vocab.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Sequence bucketing toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode text files into integer label sequences
    Encode(EncodeArgs),
    /// Decode labels back into tokens
    Decode(DecodeArgs),
    /// Report bucket occupancy for an encoded corpus
    Inspect(InspectArgs),
    /// Run bucketed epochs over an encoded corpus
    Iterate(IterateArgs),
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Files or directories to ingest
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the encoded corpus
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_ENCODED)]
    output: PathBuf,

    /// Output path for the vocabulary
    #[arg(long, value_name = "PATH", default_value = DEFAULT_VOCAB)]
    vocab_out: PathBuf,

    /// Existing vocabulary to encode with; unknown tokens become errors
    #[arg(long, value_name = "PATH")]
    vocab: Option<PathBuf>,

    /// Label reserved for padding and the invalid key
    #[arg(long, value_name = "LABEL", default_value_t = DEFAULT_INVALID_LABEL, allow_negative_numbers = true)]
    invalid_label: Label,

    /// Key mapped to the invalid label
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_INVALID_KEY)]
    invalid_key: String,

    /// First label handed to a new token
    #[arg(long, value_name = "LABEL", default_value_t = 0)]
    start_label: Label,

    /// Terminate every sentence with the invalid key
    #[arg(long)]
    eos: bool,

    /// Lowercase tokens
    #[arg(long)]
    lowercase: bool,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,

    /// Emit pretty JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Vocabulary JSON to load
    #[arg(short = 'm', long, value_name = "PATH")]
    vocab: PathBuf,

    /// Path to whitespace separated labels
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Labels to decode when --input is omitted
    #[arg(
        value_name = "LABEL",
        required_unless_present = "input",
        allow_negative_numbers = true
    )]
    labels: Vec<Label>,
}

#[derive(Args, Debug)]
struct BucketArgs {
    /// Encoded corpus produced by `encode`
    encoded: PathBuf,

    /// Rows per batch
    #[arg(short, long, value_name = "N")]
    batch_size: usize,

    /// Explicit bucket width (repeat flag); derived from the data when omitted
    #[arg(long = "bucket", value_name = "WIDTH")]
    buckets: Vec<usize>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    bucket: BucketArgs,

    /// Emit machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct IterateArgs {
    #[command(flatten)]
    bucket: BucketArgs,

    /// Number of epochs to run
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    epochs: usize,

    /// Seed for shuffling
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Emit one JSON line per batch
    #[arg(long)]
    json: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Serialize, Deserialize)]
struct EncodedFile {
    invalid_label: Label,
    sentences: Vec<Vec<Label>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Encode(args) => run_encode(args),
        Commands::Decode(args) => run_decode(args),
        Commands::Inspect(args) => run_inspect(args),
        Commands::Iterate(args) => run_iterate(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let ingest = IngestConfig::builder()
        .recursive(!args.no_recursive)
        .follow_symlinks(args.follow_symlinks)
        .append_invalid_key(args.eos)
        .lowercase(args.lowercase)
        .build();
    let cfg = EncodeConfig::builder()
        .invalid_label(args.invalid_label)
        .invalid_key(args.invalid_key.clone())
        .start_label(args.start_label)
        .build()?;

    let vocab = match &args.vocab {
        Some(path) => Some(
            Vocab::load_json(path)
                .with_context(|| format!("failed to load vocabulary from {}", path.display()))?,
        ),
        None => None,
    };
    let invalid_key = vocab
        .as_ref()
        .map_or(args.invalid_key.as_str(), Vocab::invalid_key)
        .to_owned();
    let invalid_label = vocab.as_ref().map_or(cfg.invalid_label, Vocab::invalid_label);

    let sentences = load_sentences(&args.inputs, &ingest, &invalid_key)?;
    let (encoded, vocab) = encode_sentences(&sentences, vocab, &cfg)?;
    info!(
        "encoded {} sentences with {} vocabulary entries",
        encoded.len(),
        vocab.len()
    );

    let file = EncodedFile {
        invalid_label,
        sentences: encoded,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&file)?
    } else {
        serde_json::to_string(&file)?
    };
    fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    vocab
        .save_json(&args.vocab_out)
        .with_context(|| format!("failed to write {}", args.vocab_out.display()))?;
    println!(
        "wrote {} sentences to {} and {} vocabulary entries to {}",
        file.sentences.len(),
        args.output.display(),
        vocab.len(),
        args.vocab_out.display()
    );
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let vocab = Vocab::load_json(&args.vocab)
        .with_context(|| format!("failed to load vocabulary from {}", args.vocab.display()))?;

    let labels = if let Some(input_path) = &args.input {
        let contents = fs::read_to_string(input_path)
            .with_context(|| format!("failed to read {}", input_path.display()))?;
        parse_label_list(&contents)?
    } else {
        args.labels
    };

    let tokens = vocab.decode_sentence(&labels)?;
    println!("{}", tokens.join(" "));
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let (file, cfg) = load_encoded(&args.bucket, None)?;
    let lengths: Vec<usize> = file.sentences.iter().map(Vec::len).collect();
    let stats = summarize(&lengths, &cfg)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{stats}");
    }
    Ok(())
}

fn run_iterate(args: IterateArgs) -> Result<()> {
    let (file, cfg) = load_encoded(&args.bucket, args.seed)?;
    let mut iter = BucketSentenceIter::<f32>::new(&file.sentences, &cfg)?;
    if iter.num_batches() == 0 {
        warn!("no batches available for batch size {}", cfg.batch_size);
    }

    let show_progress = !args.json && !args.no_progress;
    let progress = if show_progress {
        let bar = ProgressBar::new((iter.num_batches() * args.epochs) as u64);
        bar.set_style(
            ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} batches")
                .context("invalid progress template")?,
        );
        Some(bar)
    } else {
        None
    };

    let mut served = 0usize;
    for epoch in 0..args.epochs {
        iter.reset();
        let mut batch_idx = 0usize;
        while let Some(batch) = iter.next_batch() {
            if args.json {
                let record = json!({
                    "epoch": epoch,
                    "batch": batch_idx,
                    "bucket_key": batch.bucket_key,
                    "provide_data": batch.provide_data,
                    "provide_label": batch.provide_label,
                });
                println!("{}", serde_json::to_string(&record)?);
            }
            if let Some(bar) = &progress {
                bar.inc(1);
            }
            batch_idx += 1;
        }
        served += batch_idx;
        info!("epoch {epoch}: {batch_idx} batches");
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    if !args.json {
        println!("Epochs      : {}", args.epochs);
        println!("Batches     : {served}");
        println!("Default key : {}", iter.default_bucket_key());
        println!("Discarded   : {}", iter.discarded());
    }
    Ok(())
}

fn load_encoded(args: &BucketArgs, seed: Option<u64>) -> Result<(EncodedFile, BucketConfig)> {
    let file = read_encoded(&args.encoded)?;
    let mut builder = BucketConfig::builder()
        .batch_size(args.batch_size)
        .invalid_label(file.invalid_label)
        .seed(seed);
    if !args.buckets.is_empty() {
        builder = builder.buckets(args.buckets.iter().copied());
    }
    Ok((file, builder.build()?))
}

fn read_encoded(path: &Path) -> Result<EncodedFile> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse encoded corpus {}", path.display()))
}

fn parse_label_list(contents: &str) -> Result<Vec<Label>> {
    contents
        .split_whitespace()
        .map(|item| {
            item.parse::<Label>()
                .with_context(|| format!("invalid label {item:?}"))
        })
        .collect()
}

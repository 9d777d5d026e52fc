use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, Level};

use streamsplit::tokenizer::PunktTrainer;
use streamsplit::{generate_sentences_async, FragmentReader, ReaderConfig, SplitterConfig, TokenizerKind};

#[derive(Parser, Debug)]
#[command(name = "streamsplit")]
#[command(about = "Incremental sentence splitter for streamed text")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a text stream into sentences, printing each as soon as it is decided
    Split(SplitArgs),
    /// Train a punkt model from a plain-text corpus
    Train(TrainArgs),
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Input file; stdin when omitted or '-'
    input: Option<PathBuf>,

    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tokenizer backend: rules or punkt
    #[arg(long)]
    tokenizer: Option<String>,

    /// Tokenizer language code
    #[arg(long)]
    language: Option<String>,

    /// Never download models
    #[arg(long)]
    offline: bool,

    /// Directory holding punkt models
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Base URL missing punkt models are downloaded from
    #[arg(long)]
    model_url: Option<String>,

    #[arg(long)]
    context_size: Option<usize>,

    #[arg(long)]
    minimum_sentence_length: Option<usize>,

    /// Emit the first fragment of the first sentence early
    #[arg(long)]
    quick_yield: bool,

    /// Emit the first fragment of every sentence early
    #[arg(long)]
    quick_yield_all: bool,

    /// Emit every fragment early
    #[arg(long)]
    quick_yield_every: bool,

    #[arg(long)]
    force_first_fragment_after_words: Option<usize>,

    /// Strip links from emitted sentences
    #[arg(long)]
    remove_links: bool,

    /// Strip emojis from emitted sentences
    #[arg(long)]
    remove_emojis: bool,

    /// Drop leading non-alphanumeric characters
    #[arg(long)]
    filter_non_alnum: bool,

    /// Log every fragment as it is consumed
    #[arg(long)]
    log_characters: bool,

    /// Print one JSON object per sentence
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Plain-text training corpus
    corpus: PathBuf,

    #[arg(long, default_value = "en")]
    language: String,

    /// Where to write the model JSON
    #[arg(long)]
    out: PathBuf,
}

#[derive(Serialize)]
struct SentenceRecord<'a> {
    index: usize,
    text: &'a str,
}

impl SplitArgs {
    fn input_path(&self) -> Option<PathBuf> {
        self.input.clone().filter(|path| path.as_os_str() != "-")
    }

    /// Config file (or defaults) with command-line overrides applied
    fn splitter_config(&self) -> Result<SplitterConfig> {
        let mut config = match &self.config {
            Some(path) => SplitterConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SplitterConfig::default(),
        };

        if let Some(name) = &self.tokenizer {
            config.tokenizer.kind = name.parse::<TokenizerKind>()?;
        }
        if let Some(language) = &self.language {
            config.tokenizer.language = language.clone();
        }
        if self.offline {
            config.tokenizer.offline = true;
        }
        if let Some(dir) = &self.model_dir {
            config.tokenizer.model_dir = Some(dir.clone());
        }
        if let Some(url) = &self.model_url {
            config.tokenizer.model_url = Some(url.clone());
        }
        if let Some(context_size) = self.context_size {
            config.context_size = context_size;
        }
        if let Some(minimum) = self.minimum_sentence_length {
            config.minimum_sentence_length = minimum;
        }
        if let Some(words) = self.force_first_fragment_after_words {
            config.force_first_fragment_after_words = words;
        }
        config.quick_yield_single_sentence_fragment |= self.quick_yield;
        config.quick_yield_for_all_sentences |= self.quick_yield_all;
        config.quick_yield_every_fragment |= self.quick_yield_every;
        config.cleanup_text_links |= self.remove_links;
        config.cleanup_text_emojis |= self.remove_emojis;
        config.filter_first_non_alnum_characters |= self.filter_non_alnum;
        config.log_characters |= self.log_characters;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // WHY: structured JSON logging on stderr keeps stdout clean for sentences
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .json()
        .init();

    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Command::Split(args) => run_split(args).await,
        Command::Train(args) => run_train(args).await,
    }
}

async fn run_split(args: SplitArgs) -> Result<()> {
    // WHY: configuration errors must surface before any input is read
    let config = args.splitter_config()?;
    let input = args.input_path();
    let source_name = input
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    // WHY: reading runs in its own task so a slow tokenizer never stalls the producer side
    let (tx, rx) = mpsc::channel::<String>(64);
    let producer = tokio::spawn(async move {
        let reader = FragmentReader::new(ReaderConfig::default());
        match input {
            Some(path) => forward_fragments(reader.open(&path).await?, tx).await,
            None => forward_fragments(reader.fragments(tokio::io::stdin()), tx).await,
        }
    });

    let start_time = std::time::Instant::now();
    let mut sentences = generate_sentences_async(ReceiverStream::new(rx), config).await?;
    let mut count = 0usize;

    while let Some(sentence) = sentences.next().await {
        let sentence = sentence.context("Sentence splitting failed")?;
        if args.json {
            let record = SentenceRecord {
                index: count,
                text: &sentence,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{sentence}");
        }
        count += 1;
    }

    producer
        .await?
        .with_context(|| format!("Failed to read {source_name}"))?;

    info!(
        source = %source_name,
        sentences = count,
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Split complete"
    );
    Ok(())
}

async fn forward_fragments<S>(mut fragments: S, tx: mpsc::Sender<String>) -> io::Result<()>
where
    S: Stream<Item = io::Result<String>> + Unpin,
{
    while let Some(fragment) = fragments.next().await {
        if tx.send(fragment?).await.is_err() {
            // Consumer stopped early
            break;
        }
    }
    Ok(())
}

async fn run_train(args: TrainArgs) -> Result<()> {
    let corpus = tokio::fs::read_to_string(&args.corpus)
        .await
        .with_context(|| format!("Failed to read corpus {}", args.corpus.display()))?;

    let model = PunktTrainer::default().train(&args.language, &corpus);
    model
        .to_json_file(&args.out)
        .with_context(|| format!("Failed to write model {}", args.out.display()))?;

    println!(
        "Trained {} model: {} abbreviations, {} sentence starters -> {}",
        model.language,
        model.abbreviations.len(),
        model.sentence_starters.len(),
        args.out.display()
    );
    Ok(())
}

// WHY: The sentence tokenizer oracle, selectable by name or supplied by the caller
// Each splitter owns its own Tokenizer value; nothing here is process-global

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::trace;

use crate::error::{Result, SplitError};

pub mod abbreviations;
pub mod candidates;
pub mod model_store;
pub mod punkt;
pub mod rules;
pub mod statistical;

pub use abbreviations::AbbreviationChecker;
pub use model_store::ModelStore;
pub use punkt::{PunktModel, PunktTrainer};
pub use rules::RuleTokenizer;
pub use statistical::{ModelState, StatisticalTokenizer};

/// Tokenizer backend names accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenizerKind {
    /// Fast rule-based tokenizer
    #[default]
    Rules,
    /// Model-backed statistical tokenizer
    Punkt,
    /// Caller-supplied function
    Custom,
}

impl TokenizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenizerKind::Rules => "rules",
            TokenizerKind::Punkt => "punkt",
            TokenizerKind::Custom => "custom",
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenizerKind {
    type Err = SplitError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rules" => Ok(TokenizerKind::Rules),
            "punkt" => Ok(TokenizerKind::Punkt),
            "custom" => Ok(TokenizerKind::Custom),
            _ => Err(SplitError::UnknownTokenizer(name.to_string())),
        }
    }
}

impl TryFrom<String> for TokenizerKind {
    type Error = SplitError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl From<TokenizerKind> for String {
    fn from(kind: TokenizerKind) -> Self {
        kind.as_str().to_string()
    }
}

/// How to build the tokenizer oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    pub kind: TokenizerKind,
    /// Language code, e.g. `en`
    pub language: String,
    /// Never fetch models over the network
    pub offline: bool,
    /// Directory holding statistical models (default: [`ModelStore::default_dir`])
    pub model_dir: Option<PathBuf>,
    /// Base URL models are downloaded from when missing locally
    pub model_url: Option<String>,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            kind: TokenizerKind::Rules,
            language: "en".to_string(),
            offline: false,
            model_dir: None,
            model_url: None,
        }
    }
}

impl TokenizerOptions {
    pub fn model_store(&self) -> ModelStore {
        let dir = self.model_dir.clone().unwrap_or_else(ModelStore::default_dir);
        ModelStore::new(dir, self.model_url.clone())
    }
}

/// Signature of a caller-supplied tokenizer
pub type TokenizeFn = dyn Fn(&str) -> Vec<String> + Send + Sync;

/// The tokenizer oracle: text blob in, ordered sentences out
#[derive(Clone)]
pub enum Tokenizer {
    Rules(RuleTokenizer),
    Statistical(StatisticalTokenizer),
    Custom(Arc<TokenizeFn>),
}

impl Tokenizer {
    /// Rule-based tokenizer for `language`
    pub fn rules(language: &str) -> Result<Self> {
        Ok(Tokenizer::Rules(RuleTokenizer::new(language)?))
    }

    /// Wrap a caller-supplied function; it receives the raw, unsanitized buffer
    pub fn custom<F>(tokenize: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        Tokenizer::Custom(Arc::new(tokenize))
    }

    pub fn kind(&self) -> TokenizerKind {
        match self {
            Tokenizer::Rules(_) => TokenizerKind::Rules,
            Tokenizer::Statistical(_) => TokenizerKind::Punkt,
            Tokenizer::Custom(_) => TokenizerKind::Custom,
        }
    }

    /// Split `text` into sentences
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let start = Instant::now();
        let sentences = match self {
            Tokenizer::Rules(rules) => rules.tokenize(text),
            Tokenizer::Statistical(statistical) => statistical.tokenize(text)?,
            Tokenizer::Custom(tokenize) => (**tokenize)(text),
        };
        trace!(
            tokenizer = %self.kind(),
            bytes = text.len(),
            sentences = sentences.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Tokenized buffer"
        );
        Ok(sentences)
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tokenizer::Rules(rules) => f.debug_tuple("Rules").field(rules).finish(),
            Tokenizer::Statistical(statistical) => f.debug_tuple("Statistical").field(statistical).finish(),
            Tokenizer::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Build and initialize the named built-in tokenizer
///
/// Statistical initialization failures do not error here: they are recorded in the
/// tokenizer and surface as [`SplitError::TokenizerUnavailable`] on first use.
pub async fn init_tokenizer(options: &TokenizerOptions) -> Result<Tokenizer> {
    match options.kind {
        TokenizerKind::Rules => Tokenizer::rules(&options.language),
        TokenizerKind::Punkt => {
            let mut statistical =
                StatisticalTokenizer::new(options.language.clone(), options.offline, options.model_store())?;
            statistical.initialize().await;
            Ok(Tokenizer::Statistical(statistical))
        }
        TokenizerKind::Custom => Err(SplitError::Config(
            "tokenizer 'custom' needs a function; build it with Tokenizer::custom".to_string(),
        )),
    }
}

/// Blocking variant of [`init_tokenizer`]
///
/// Outside a runtime, initialization runs on a private current-thread runtime.
/// Inside a multi-thread runtime it blocks the calling worker in place. A
/// current-thread runtime cannot be blocked, so there a model-backed tokenizer
/// is a [`SplitError::Config`]; use [`init_tokenizer`] instead.
pub fn init_tokenizer_blocking(options: &TokenizerOptions) -> Result<Tokenizer> {
    if options.kind == TokenizerKind::Rules {
        return Tokenizer::rules(&options.language);
    }

    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            trace!("Initializing tokenizer in place on a runtime worker");
            tokio::task::block_in_place(|| handle.block_on(init_tokenizer(options)))
        }
        Ok(_) => Err(SplitError::Config(format!(
            "tokenizer '{}' cannot be initialized synchronously inside a current-thread runtime; \
             use init_tokenizer or generate_sentences_async",
            options.kind
        ))),
        Err(_) => {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(init_tokenizer(options))
        }
    }
}

// WHY: One immutable table of tunables per splitter, loadable from JSON for the CLI

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SplitError};
use crate::sanitize::CleanOptions;
use crate::tokenizer::TokenizerOptions;

/// Soft boundary hints: clause punctuation and closing brackets
pub const DEFAULT_FRAGMENT_DELIMITERS: &str = ".?!;:,\n\u{2026})]}\u{3002}-";

/// Definitive sentence terminators
pub const DEFAULT_FULL_SENTENCE_DELIMITERS: &str = ".?!\n\u{2026}\u{3002}";

/// Configuration for a [`SentenceSplitter`](crate::SentenceSplitter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Trailing characters too close to the buffer tail to trust a delimiter in
    pub context_size: usize,
    /// Extra characters scanned just outside `context_size`
    pub context_size_look_overhead: usize,
    /// Shorter sentences are merged into the next one
    pub minimum_sentence_length: usize,
    /// Buffer length required before the first quick-yield fragment
    pub minimum_first_fragment_length: usize,
    /// Emit the first fragment of the first sentence early
    pub quick_yield_single_sentence_fragment: bool,
    /// Emit the first fragment of every sentence early
    pub quick_yield_for_all_sentences: bool,
    /// Emit every fragment early
    pub quick_yield_every_fragment: bool,
    /// Remove links from emitted text
    pub cleanup_text_links: bool,
    /// Remove emojis from emitted text
    pub cleanup_text_emojis: bool,
    pub sentence_fragment_delimiters: String,
    pub full_sentence_delimiters: String,
    /// Word count after which the first fragment is emitted without a delimiter
    pub force_first_fragment_after_words: usize,
    /// Drop non-alphanumeric characters before the first real character
    pub filter_first_non_alnum_characters: bool,
    /// Echo every dequeued fragment on the `streamsplit::characters` target
    pub log_characters: bool,
    pub tokenizer: TokenizerOptions,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            context_size: 12,
            context_size_look_overhead: 12,
            minimum_sentence_length: 10,
            minimum_first_fragment_length: 10,
            quick_yield_single_sentence_fragment: false,
            quick_yield_for_all_sentences: false,
            quick_yield_every_fragment: false,
            cleanup_text_links: false,
            cleanup_text_emojis: false,
            sentence_fragment_delimiters: DEFAULT_FRAGMENT_DELIMITERS.to_string(),
            full_sentence_delimiters: DEFAULT_FULL_SENTENCE_DELIMITERS.to_string(),
            force_first_fragment_after_words: 30,
            filter_first_non_alnum_characters: false,
            log_characters: false,
            tokenizer: TokenizerOptions::default(),
        }
    }
}

impl SplitterConfig {
    /// Load a JSON configuration; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SplitError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the splitter cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.full_sentence_delimiters.is_empty() {
            return Err(SplitError::Config(
                "full_sentence_delimiters must contain at least one character".to_string(),
            ));
        }
        if self.tokenizer.language.trim().is_empty() {
            return Err(SplitError::Config("tokenizer language must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply the quick-yield cascade: every fragment implies all sentences implies single fragment
    pub fn normalized(mut self) -> Self {
        if self.quick_yield_every_fragment {
            self.quick_yield_for_all_sentences = true;
        }
        if self.quick_yield_for_all_sentences {
            self.quick_yield_single_sentence_fragment = true;
        }
        self
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            remove_links: self.cleanup_text_links,
            remove_emojis: self.cleanup_text_emojis,
            trim: true,
        }
    }

    pub fn is_fragment_delimiter(&self, c: char) -> bool {
        self.sentence_fragment_delimiters.contains(c)
    }

    pub fn is_full_sentence_delimiter(&self, c: char) -> bool {
        self.full_sentence_delimiters.contains(c)
    }
}

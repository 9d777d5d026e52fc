// WHY: Incremental sentence-boundary state machine over an append-only fragment queue
// Balances latency (quick-yield, early commit) against correctness (context window, minimum length)

use std::collections::VecDeque;
use tracing::{debug, info, trace};

use crate::config::SplitterConfig;
use crate::error::Result;
use crate::sanitize::{clean, CleanOptions};
use crate::tokenizer::{init_tokenizer, init_tokenizer_blocking, Tokenizer};

/// Merge sentences shorter than `minimum_length` forward into the next one
///
/// A trailing short carry with nothing left to absorb it is kept as its own entry.
pub fn merge_short_sentences(sentences: Vec<String>, minimum_length: usize) -> Vec<String> {
    let mut combined = Vec::with_capacity(sentences.len());
    let mut carry = String::new();

    for sentence in sentences {
        if sentence.chars().count() < minimum_length {
            carry.push_str(&sentence);
            carry.push(' ');
        } else if carry.is_empty() {
            combined.push(sentence.trim().to_string());
        } else {
            carry.push_str(&sentence);
            combined.push(carry.trim().to_string());
            carry.clear();
        }
    }

    if !carry.is_empty() {
        combined.push(carry.trim().to_string());
    }
    combined
}

/// Single-stream sentence splitter
///
/// Fragments go in through [`ingest`](Self::ingest); [`drive`](Self::drive) yields
/// every sentence that can be committed so far and [`flush`](Self::flush) drains
/// the rest at end of stream.
#[derive(Debug)]
pub struct SentenceSplitter {
    config: SplitterConfig,
    clean_options: CleanOptions,
    tokenizer: Tokenizer,
    /// Pending fragments, FIFO
    fragments: VecDeque<String>,
    /// Fragment being consumed and the byte offset of its next character
    current: Option<(String, usize)>,
    /// Unconsumed, not-yet-emitted text; never starts with whitespace
    buffer: String,
    /// Length of `buffer` in characters
    buffer_chars: usize,
    word_count: usize,
    /// Character offset of the most recent full delimiter in `buffer`
    last_delimiter_position: Option<usize>,
    is_first_sentence: bool,
    /// Sentences decided but not yet handed to the caller
    ready: VecDeque<String>,
}

impl SentenceSplitter {
    /// Build a splitter around an already initialized tokenizer
    ///
    /// The tokenizer passed here wins over `config.tokenizer`, which only describes
    /// how to build a built-in one.
    pub fn new(config: SplitterConfig, tokenizer: Tokenizer) -> Result<Self> {
        config.validate()?;
        let config = config.normalized();
        debug!(
            tokenizer = %tokenizer.kind(),
            context_size = config.context_size,
            minimum_sentence_length = config.minimum_sentence_length,
            quick_yield = config.quick_yield_single_sentence_fragment,
            "Created sentence splitter"
        );
        Ok(Self {
            clean_options: config.clean_options(),
            config,
            tokenizer,
            fragments: VecDeque::new(),
            current: None,
            buffer: String::new(),
            buffer_chars: 0,
            word_count: 0,
            last_delimiter_position: None,
            is_first_sentence: true,
            ready: VecDeque::new(),
        })
    }

    /// Build a splitter and the built-in tokenizer `config.tokenizer` names
    ///
    /// See [`init_tokenizer_blocking`] for the runtime caveat.
    pub fn from_config(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = init_tokenizer_blocking(&config.tokenizer)?;
        Self::new(config, tokenizer)
    }

    /// Async variant of [`from_config`](Self::from_config), safe inside a runtime
    pub async fn from_config_async(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        let tokenizer = init_tokenizer(&config.tokenizer).await?;
        Self::new(config, tokenizer)
    }

    /// Queue a fragment; empty fragments are ignored
    pub fn ingest(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push_back(fragment);
        }
    }

    /// Process queued fragments, yielding every sentence committed along the way
    pub fn drive(&mut self) -> Sentences<'_> {
        Sentences {
            splitter: self,
            finishing: false,
        }
    }

    /// Process anything still queued, then drain the buffer completely
    pub fn flush(&mut self) -> Sentences<'_> {
        Sentences {
            splitter: self,
            finishing: true,
        }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Text received but not yet emitted
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// True while quick-yield may still emit an early fragment for the current sentence
    pub fn is_first_sentence(&self) -> bool {
        self.is_first_sentence
    }

    fn next_char(&mut self) -> Option<char> {
        loop {
            if let Some((fragment, offset)) = &mut self.current {
                if let Some(c) = fragment[*offset..].chars().next() {
                    *offset += c.len_utf8();
                    return Some(c);
                }
            }
            self.current = None;

            let fragment = self.fragments.pop_front()?;
            if self.config.log_characters {
                info!(target: "streamsplit::characters", "{}", fragment);
            }
            self.current = Some((fragment, 0));
        }
    }

    fn emit(&mut self, text: &str) {
        let sentence = clean(text, self.clean_options);
        if sentence.is_empty() {
            trace!("Dropped sentence that was empty after cleanup");
            return;
        }
        self.ready.push_back(sentence);
    }

    fn set_buffer(&mut self, text: String) {
        self.buffer_chars = text.chars().count();
        self.buffer = text;
    }

    fn process_char(&mut self, c: char) -> Result<()> {
        if self.buffer.is_empty() && self.config.filter_first_non_alnum_characters && !c.is_alphanumeric() {
            return Ok(());
        }

        // Leading whitespace never accumulates
        if !(self.buffer.is_empty() && c.is_whitespace()) {
            self.buffer.push(c);
            self.buffer_chars += 1;
        }

        if c.is_whitespace() || self.config.is_fragment_delimiter(c) {
            self.word_count += 1;
        }

        if self.try_quick_yield(c) {
            return Ok(());
        }

        if self.buffer_chars <= self.config.minimum_sentence_length.saturating_add(self.config.context_size) {
            return Ok(());
        }

        if self.config.is_full_sentence_delimiter(c) {
            self.last_delimiter_position = Some(self.buffer_chars - 1);
        }

        // buffer_chars > minimum + context here, so this cannot underflow
        let window_end = self.buffer_chars - self.config.context_size - 1;
        let window_start = window_end.saturating_sub(self.config.context_size_look_overhead);

        let sentences = self.tokenizer.tokenize(&self.buffer)?;
        let mut combined = merge_short_sentences(sentences, self.config.minimum_sentence_length);

        let delimiter_in_window = self
            .last_delimiter_position
            .is_some_and(|position| (window_start..=window_end).contains(&position));

        trace!(
            buffer_chars = self.buffer_chars,
            sentences = combined.len(),
            last_delimiter = ?self.last_delimiter_position,
            window_start,
            window_end,
            "Checked boundary"
        );

        if !(combined.len() > 2 || delimiter_in_window) || combined.len() < 2 {
            return Ok(());
        }

        let committed_chars: usize = combined[..combined.len() - 1]
            .iter()
            .map(|sentence| sentence.chars().count())
            .sum();
        if committed_chars < self.config.minimum_sentence_length {
            return Ok(());
        }

        let Some(remainder) = combined.pop() else {
            return Ok(());
        };
        debug!(
            sentences = combined.len(),
            committed_chars,
            by_window = delimiter_in_window,
            "Committed sentence boundary"
        );
        for sentence in &combined {
            self.emit(sentence);
            self.word_count = 0;
        }

        if self.config.quick_yield_for_all_sentences {
            self.is_first_sentence = true;
        }

        // Tokenizers right-trim; keep the separator the next fragment relies on
        let ends_with_space = self.buffer.ends_with(' ');
        let mut remainder = remainder;
        if ends_with_space {
            remainder.push(' ');
        }
        self.set_buffer(remainder);
        self.last_delimiter_position = None;
        Ok(())
    }

    /// Early emission of a partial sentence; returns true when the buffer was emitted
    fn try_quick_yield(&mut self, c: char) -> bool {
        if !(self.is_first_sentence
            && self.config.quick_yield_single_sentence_fragment
            && self.buffer_chars > self.config.minimum_first_fragment_length)
        {
            return false;
        }

        let ends_soft = self
            .buffer
            .chars()
            .next_back()
            .is_some_and(|last| self.config.is_fragment_delimiter(last));
        let forced = c.is_whitespace() && self.word_count >= self.config.force_first_fragment_after_words;
        if !(ends_soft || forced) {
            return false;
        }

        debug!(
            buffer_chars = self.buffer_chars,
            word_count = self.word_count,
            forced = !ends_soft,
            "Quick-yield fragment"
        );
        let fragment = std::mem::take(&mut self.buffer);
        self.buffer_chars = 0;
        self.emit(&fragment);
        self.word_count = 0;
        if !self.config.quick_yield_every_fragment {
            self.is_first_sentence = false;
        }
        true
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let mut sentences = self.tokenizer.tokenize(&self.buffer)?;
        if sentences.is_empty() {
            // A tokenizer that returns nothing must not swallow the tail
            sentences.push(self.buffer.clone());
        }
        debug!(sentences = sentences.len(), buffer_chars = self.buffer_chars, "Flushing buffer");

        let mut carry = String::new();
        for sentence in sentences {
            carry.push_str(&sentence);
            if carry.chars().count() < self.config.minimum_sentence_length {
                carry.push(' ');
                continue;
            }
            self.emit(&carry);
            carry.clear();
        }
        if !carry.is_empty() {
            self.emit(&carry);
        }

        self.buffer.clear();
        self.buffer_chars = 0;
        self.word_count = 0;
        self.last_delimiter_position = None;
        Ok(())
    }
}

/// Lazy sequence of sentences produced by [`SentenceSplitter::drive`] or [`SentenceSplitter::flush`]
///
/// Dropping it early is safe: unread sentences stay queued for the next call.
#[derive(Debug)]
pub struct Sentences<'a> {
    splitter: &'a mut SentenceSplitter,
    finishing: bool,
}

impl Iterator for Sentences<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(sentence) = self.splitter.ready.pop_front() {
                return Some(Ok(sentence));
            }

            if let Some(c) = self.splitter.next_char() {
                if let Err(e) = self.splitter.process_char(c) {
                    return Some(Err(e));
                }
                continue;
            }

            if self.finishing && !self.splitter.buffer.is_empty() {
                if let Err(e) = self.splitter.flush_buffer() {
                    self.finishing = false;
                    return Some(Err(e));
                }
                continue;
            }

            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(config: SplitterConfig) -> SentenceSplitter {
        SentenceSplitter::new(config, Tokenizer::rules("en").unwrap()).unwrap()
    }

    fn collect(sentences: Sentences<'_>) -> Vec<String> {
        sentences.collect::<Result<Vec<_>>>().unwrap()
    }

    /// Split at whitespace that follows one of `marks`
    fn split_after_marks(text: &str, marks: &[char]) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut previous = None;
        for c in text.chars() {
            if c.is_whitespace() && previous.is_some_and(|p| marks.contains(&p)) {
                sentences.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
            previous = Some(c);
        }
        sentences.push(current);
        sentences
            .into_iter()
            .map(|sentence| sentence.trim().to_string())
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    /// Tiny window so boundary timing is easy to follow:
    /// analysis starts past 5 chars, window is [n - 7, n - 5]
    fn narrow_window() -> SplitterConfig {
        SplitterConfig {
            context_size: 4,
            context_size_look_overhead: 2,
            minimum_sentence_length: 1,
            ..SplitterConfig::default()
        }
    }

    #[test]
    fn test_merge_short_sentences() {
        let sentences = vec!["Hi.".to_string(), "Yo.".to_string(), "This is long enough.".to_string()];
        assert_eq!(merge_short_sentences(sentences, 10), vec!["Hi. Yo. This is long enough."]);

        let sentences = vec!["A long first sentence.".to_string(), "Ok.".to_string()];
        assert_eq!(merge_short_sentences(sentences, 10), vec!["A long first sentence.", "Ok."]);

        assert!(merge_short_sentences(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_ingest_does_not_process() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("Hello there. How are you doing today? ");
        assert_eq!(splitter.buffer(), "");
    }

    #[test]
    fn test_empty_fragments_are_ignored() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("");
        splitter.ingest(String::new());
        assert!(collect(splitter.drive()).is_empty());
        assert!(collect(splitter.flush()).is_empty());
    }

    #[test]
    fn test_leading_whitespace_is_stripped() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("   \n  Hi");
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(splitter.buffer(), "Hi");
    }

    #[test]
    fn test_filter_first_non_alnum() {
        let mut splitter = splitter(SplitterConfig {
            filter_first_non_alnum_characters: true,
            ..SplitterConfig::default()
        });
        splitter.ingest("** - Hello *there*");
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(splitter.buffer(), "Hello *there*");
    }

    #[test]
    fn test_commit_on_aged_delimiter() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("The first sentence is here. And the second one keeps going on");
        let sentences = collect(splitter.drive());
        assert_eq!(sentences, vec!["The first sentence is here."]);
        assert!(splitter.buffer().starts_with("And the second"));

        let rest = collect(splitter.flush());
        assert_eq!(rest, vec!["And the second one keeps going on"]);
    }

    #[test]
    fn test_delimiter_near_tail_waits_for_context() {
        let tokenizer = Tokenizer::custom(|text| split_after_marks(text, &['.']));
        let mut splitter = SentenceSplitter::new(narrow_window(), tokenizer).unwrap();

        // Two sentences, but the '.' at offset 6 is still within context_size of the tail
        splitter.ingest("Abcdef. Gh");
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(splitter.buffer(), "Abcdef. Gh");

        // One more char moves the delimiter to the window's end
        splitter.ingest("i");
        assert_eq!(collect(splitter.drive()), vec!["Abcdef."]);
        assert_eq!(splitter.buffer(), "Ghi");
    }

    #[test]
    fn test_delimiter_past_window_start_does_not_commit() {
        // Refuses to split until the buffer holds 14 chars, by which time '.' has left the window
        let tokenizer = Tokenizer::custom(|text| {
            if text.chars().count() < 14 {
                vec![text.trim().to_string()]
            } else {
                split_after_marks(text, &['.'])
            }
        });
        let mut splitter = SentenceSplitter::new(narrow_window(), tokenizer).unwrap();

        splitter.ingest("Abcdef. Ghijklmnop");
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(splitter.buffer(), "Abcdef. Ghijklmnop");

        assert_eq!(collect(splitter.flush()), vec!["Abcdef.", "Ghijklmnop"]);
    }

    #[test]
    fn test_delimiter_position_resets_after_commit() {
        let tokenizer = Tokenizer::custom(|text| split_after_marks(text, &['.', ';']));
        let mut splitter = SentenceSplitter::new(narrow_window(), tokenizer).unwrap();

        // Three sentences commit the first two; the '.' at offset 10 was the last delimiter seen
        splitter.ingest("Abcdef. Gh. I");
        assert_eq!(collect(splitter.drive()), vec!["Abcdef.", "Gh."]);
        assert_eq!(splitter.buffer(), "I");

        // At 15 chars the window covers offset 10 again; only a stale position would commit here
        splitter.ingest("jk; lmnopqrstu");
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(splitter.buffer(), "Ijk; lmnopqrstu");
    }

    #[test]
    fn test_huge_context_size_never_analyzes() {
        let mut splitter = splitter(SplitterConfig {
            context_size: usize::MAX,
            ..SplitterConfig::default()
        });
        splitter.ingest("First sentence here. Second sentence here. Third sentence here. ");
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(
            collect(splitter.flush()),
            vec!["First sentence here.", "Second sentence here.", "Third sentence here."]
        );
    }

    #[test]
    fn test_remainder_keeps_trailing_space() {
        let mut splitter = splitter(SplitterConfig::default());
        // The commit happens on the final space, which must survive the tokenizer's trim
        splitter.ingest("The first sentence is here. And it was ");
        let sentences = collect(splitter.drive());
        assert_eq!(sentences, vec!["The first sentence is here."]);
        assert_eq!(splitter.buffer(), "And it was ");
    }

    #[test]
    fn test_partial_drive_keeps_ready_sentences() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("One sentence is here now. Two sentence is here now. Three sentence is here now. Four");
        let first = splitter.drive().next().unwrap().unwrap();
        assert_eq!(first, "One sentence is here now.");

        let mut all = vec![first];
        all.extend(collect(splitter.drive()));
        all.extend(collect(splitter.flush()));
        assert_eq!(
            all,
            vec![
                "One sentence is here now.",
                "Two sentence is here now.",
                "Three sentence is here now.",
                "Four",
            ]
        );
    }

    #[test]
    fn test_flush_drains_queued_fragments() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("Never driven. ");
        splitter.ingest("Still arrives at the end.");
        let sentences = collect(splitter.flush());
        assert_eq!(sentences, vec!["Never driven.", "Still arrives at the end."]);
        assert!(collect(splitter.drive()).is_empty());
        assert_eq!(splitter.buffer(), "");
    }

    #[test]
    fn test_flush_merges_short_tail() {
        let mut splitter = splitter(SplitterConfig::default());
        splitter.ingest("Ok. Fine. Sure.");
        let sentences = collect(splitter.flush());
        assert_eq!(sentences, vec!["Ok. Fine. Sure."]);
    }

    #[test]
    fn test_quick_yield_on_soft_delimiter() {
        let mut splitter = splitter(SplitterConfig {
            quick_yield_single_sentence_fragment: true,
            ..SplitterConfig::default()
        });
        splitter.ingest("Well, you know, I was thinking, that this is fine");
        let sentences = collect(splitter.drive());
        // Only the first fragment long enough is emitted early
        assert_eq!(sentences, vec!["Well, you know,"]);
        assert!(!splitter.is_first_sentence());
    }

    #[test]
    fn test_quick_yield_every_fragment_rearms() {
        let mut splitter = splitter(SplitterConfig {
            quick_yield_every_fragment: true,
            ..SplitterConfig::default()
        });
        splitter.ingest("Well, you know, I was thinking, that this is fine");
        let sentences = collect(splitter.drive());
        assert_eq!(sentences, vec!["Well, you know,", "I was thinking,"]);
        assert!(splitter.is_first_sentence());
    }

    #[test]
    fn test_quick_yield_for_all_sentences_rearms_after_commit() {
        let mut splitter = splitter(SplitterConfig {
            quick_yield_for_all_sentences: true,
            ..SplitterConfig::default()
        });
        splitter.ingest("Hello, this is the start. More text follows here. And then we keep talking");
        let sentences = collect(splitter.drive());
        assert_eq!(sentences, vec!["Hello, this is the start.", "More text follows here."]);
        assert!(splitter.is_first_sentence());
    }

    #[test]
    fn test_tokenizer_error_surfaces_and_keeps_text() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = crate::tokenizer::ModelStore::new(temp_dir.path(), None);
        let statistical = crate::tokenizer::StatisticalTokenizer::new("en", true, store).unwrap();
        let mut splitter = SentenceSplitter::new(SplitterConfig::default(), Tokenizer::Statistical(statistical)).unwrap();

        splitter.ingest("This text is long enough to reach the tokenizer.");
        let first = splitter.drive().next().unwrap();
        assert!(first.is_err());
        assert!(!splitter.buffer().is_empty());

        let mut flush = splitter.flush();
        let errors = flush.by_ref().filter(|item| item.is_err()).count();
        assert!(errors > 0);
        assert!(flush.next().is_none());
    }
}

// WHY: Shared candidate-boundary scan for the built-in tokenizers
// Uses a regex-automata meta regex for O(n) discovery; each tokenizer only decides which candidates to accept

use regex_automata::meta::Regex;

use crate::error::Result;

/// Terminator runs followed by optional closers and whitespace, ideographic terminators, or line breaks
const CANDIDATE_PATTERN: &str = concat!(
    r#"(?:[.!?\x{2026}]+["'\x{201D}\x{2019}\x{00BB})\]}]*\s+)"#,
    r#"|(?:[\x{3002}\x{FF01}\x{FF1F}]+["'\x{201D}\x{2019}\x{300D}\x{300F})\]]*\s*)"#,
    r"|(?:\n\s*)",
);

/// What ended the candidate sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// A single `.`; ambiguous with abbreviations and initials
    Period,
    /// `...` or `…`
    Ellipsis,
    /// A run containing `?` or `!`
    Terminal,
    /// `。`, `！`, `？`
    Ideographic,
    /// One or more line breaks
    LineBreak,
}

/// A possible sentence boundary inside a text blob
#[derive(Debug, Clone)]
pub struct Candidate<'t> {
    pub kind: CandidateKind,
    /// Text of the sentence the candidate would close, trimmed
    pub sentence: &'t str,
    /// Last word of that sentence including its terminator
    pub previous_word: &'t str,
    /// First word after the candidate, empty at end of text
    pub next_word: &'t str,
}

impl Candidate<'_> {
    /// Whether the following word starts with a lowercase letter
    pub fn next_starts_lowercase(&self) -> bool {
        self.next_word
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .chars()
            .next()
            .is_some_and(char::is_lowercase)
    }

    /// Whether the following word starts with a digit
    pub fn next_starts_digit(&self) -> bool {
        self.next_word
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// `J.` style single-letter initial
    pub fn previous_is_initial(&self) -> bool {
        let word = self.previous_word.trim_start_matches(|c: char| !c.is_alphanumeric());
        let mut chars = word.chars();
        matches!((chars.next(), chars.next(), chars.next()), (Some(c), Some('.'), None) if c.is_alphabetic())
    }

    /// `1.` opening a numbered list item
    pub fn is_enumerator(&self) -> bool {
        self.sentence == self.previous_word
            && self
                .previous_word
                .strip_suffix('.')
                .is_some_and(|stem| !stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()))
    }
}

fn classify(terminators: &str) -> CandidateKind {
    match terminators.chars().next() {
        None | Some('\n') => CandidateKind::LineBreak,
        Some('\u{3002}' | '\u{FF01}' | '\u{FF1F}') => CandidateKind::Ideographic,
        _ if terminators.contains(['?', '!']) => CandidateKind::Terminal,
        _ if terminators == "." => CandidateKind::Period,
        _ => CandidateKind::Ellipsis,
    }
}

fn is_closer(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '\u{201D}' | '\u{2019}' | '\u{00BB}' | ')' | ']' | '}' | '\u{300D}' | '\u{300F}'
    )
}

/// Compiled candidate scanner
#[derive(Debug, Clone)]
pub struct BoundaryScanner {
    regex: Regex,
}

impl BoundaryScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            regex: Regex::new(CANDIDATE_PATTERN)?,
        })
    }

    /// Split `text` at every candidate `accept` approves; sentences come back trimmed and non-empty
    pub fn split<F>(&self, text: &str, mut accept: F) -> Vec<String>
    where
        F: FnMut(&Candidate<'_>) -> bool,
    {
        let mut sentences = Vec::new();
        let mut start = 0;

        for found in self.regex.find_iter(text) {
            let matched = &text[found.start()..found.end()];
            let marker = matched.trim_end();
            let sentence_end = found.start() + marker.len();
            let sentence = text[start..sentence_end].trim();

            if sentence.is_empty() {
                start = found.end();
                continue;
            }

            let rest = &text[found.end()..];
            let candidate = Candidate {
                kind: classify(marker.trim_end_matches(is_closer)),
                sentence,
                previous_word: sentence.split_whitespace().last().unwrap_or(sentence),
                next_word: rest.split_whitespace().next().unwrap_or(""),
            };

            if accept(&candidate) {
                sentences.push(sentence.to_string());
                start = found.end();
            }
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
        sentences
    }
}

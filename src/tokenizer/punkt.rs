// WHY: Punkt-style statistical model: learned abbreviations and sentence starters
// Trained unsupervised from raw text, stored as JSON, consumed by the statistical tokenizer

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

use super::abbreviations::lookup_key;
use super::candidates::{Candidate, CandidateKind};
use crate::error::{Result, SplitError};

/// Learned parameters for one language
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PunktModel {
    pub language: String,
    /// Lowercase abbreviation stems without the final period (`"dr"`, `"e.g"`)
    pub abbreviations: BTreeSet<String>,
    /// Lowercase words that reliably open a sentence
    pub sentence_starters: BTreeSet<String>,
}

/// Lowercase a word with surrounding punctuation removed
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

impl PunktModel {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Check a period-final word such as `"Dr."`
    pub fn is_abbreviation(&self, word: &str) -> bool {
        lookup_key(word).is_some_and(|key| self.abbreviations.contains(&key))
    }

    pub fn is_sentence_starter(&self, word: &str) -> bool {
        let key = normalize_word(word);
        !key.is_empty() && self.sentence_starters.contains(&key)
    }

    /// Boundary decision for one candidate
    pub fn accepts(&self, candidate: &Candidate<'_>) -> bool {
        match candidate.kind {
            CandidateKind::Period => {
                if self.is_abbreviation(candidate.previous_word) || candidate.previous_is_initial() {
                    // an abbreviation still ends the sentence when a known starter follows
                    return self.is_sentence_starter(candidate.next_word);
                }
                !(candidate.is_enumerator() || candidate.next_starts_lowercase())
            }
            CandidateKind::Ellipsis => !candidate.next_starts_lowercase(),
            CandidateKind::Terminal | CandidateKind::Ideographic | CandidateKind::LineBreak => true,
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, path)
    }

    pub(crate) fn from_json(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| SplitError::InvalidModel {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SplitError::InvalidModel {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Per-type evidence gathered while training
#[derive(Debug, Default)]
struct TypeCounts {
    with_period: usize,
    without_period: usize,
    followed_by_lowercase: usize,
    after_boundary: usize,
    total: usize,
}

/// Unsupervised trainer for [`PunktModel`]
#[derive(Debug, Clone)]
pub struct PunktTrainer {
    /// Period-final occurrences needed before a type can be an abbreviation
    pub min_abbreviation_count: usize,
    /// Share of occurrences that must carry the period
    pub min_period_ratio: f64,
    /// Longest abbreviation stem, in letters
    pub max_abbreviation_length: usize,
    /// Sentence-initial occurrences needed before a type can be a starter
    pub min_starter_count: usize,
}

impl Default for PunktTrainer {
    fn default() -> Self {
        Self {
            min_abbreviation_count: 2,
            min_period_ratio: 0.6,
            max_abbreviation_length: 6,
            min_starter_count: 2,
        }
    }
}

impl PunktTrainer {
    /// Learn a model from raw text
    pub fn train(&self, language: &str, text: &str) -> PunktModel {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut counts: HashMap<String, TypeCounts> = HashMap::new();

        // Pass 1: period evidence per type
        for (position, token) in tokens.iter().enumerate() {
            match lookup_key(token) {
                Some(key) => {
                    let entry = counts.entry(key).or_default();
                    entry.with_period += 1;
                    let next_is_lower = tokens
                        .get(position + 1)
                        .and_then(|next| next.trim_start_matches(|c: char| !c.is_alphanumeric()).chars().next())
                        .is_some_and(|c| c.is_lowercase() || c.is_ascii_digit());
                    if next_is_lower {
                        entry.followed_by_lowercase += 1;
                    }
                }
                None => {
                    let key = normalize_word(token);
                    if !key.is_empty() {
                        counts.entry(key).or_default().without_period += 1;
                    }
                }
            }
        }

        let abbreviations: BTreeSet<String> = counts
            .iter()
            .filter(|(stem, evidence)| self.is_abbreviation_type(stem, evidence))
            .map(|(stem, _)| stem.clone())
            .collect();

        // Pass 2: words following sure boundaries
        let mut previous_ends_sentence = true;
        for token in &tokens {
            let key = normalize_word(token);
            if !key.is_empty() {
                let entry = counts.entry(key).or_default();
                entry.total += 1;
                let capitalized = token
                    .trim_start_matches(|c: char| !c.is_alphanumeric())
                    .chars()
                    .next()
                    .is_some_and(char::is_uppercase);
                if previous_ends_sentence && capitalized {
                    entry.after_boundary += 1;
                }
            }
            previous_ends_sentence = Self::ends_sentence(token, &abbreviations);
        }

        let sentence_starters: BTreeSet<String> = counts
            .iter()
            .filter(|(_, evidence)| {
                evidence.after_boundary >= self.min_starter_count
                    && evidence.after_boundary * 2 > evidence.total
            })
            .map(|(word, _)| word.clone())
            .collect();

        info!(
            language,
            tokens = tokens.len(),
            abbreviations = abbreviations.len(),
            sentence_starters = sentence_starters.len(),
            "Trained punkt model"
        );

        PunktModel {
            language: language.to_string(),
            abbreviations,
            sentence_starters,
        }
    }

    fn is_abbreviation_type(&self, stem: &str, evidence: &TypeCounts) -> bool {
        let letters = stem.chars().filter(|c| c.is_alphabetic()).count();
        if letters == 0 || letters > self.max_abbreviation_length {
            return false;
        }
        if evidence.with_period < self.min_abbreviation_count {
            return false;
        }
        let ratio = evidence.with_period as f64 / (evidence.with_period + evidence.without_period) as f64;
        if ratio < self.min_period_ratio {
            return false;
        }
        let internal_periods = stem.contains('.');
        internal_periods
            || evidence.followed_by_lowercase > 0
            || (evidence.without_period == 0 && letters <= 3)
    }

    fn ends_sentence(token: &str, abbreviations: &BTreeSet<String>) -> bool {
        let word = token.trim_end_matches(['"', '\'', ')', ']', '\u{201D}', '\u{2019}']);
        if word.ends_with(['?', '!', '\u{2026}']) {
            return true;
        }
        match lookup_key(word) {
            Some(stem) => {
                let initial = stem.chars().count() == 1;
                !initial && !abbreviations.contains(&stem)
            }
            None => false,
        }
    }
}

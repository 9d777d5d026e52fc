// WHY: Fast rule-based tokenizer, the default oracle
// Candidate scan plus abbreviation, initial and casing rules; no model data required

use tracing::debug;

use super::abbreviations::AbbreviationChecker;
use super::candidates::{BoundaryScanner, Candidate, CandidateKind};
use crate::error::Result;

/// Rule-based sentence tokenizer
#[derive(Debug, Clone)]
pub struct RuleTokenizer {
    scanner: BoundaryScanner,
    abbreviations: AbbreviationChecker,
}

impl RuleTokenizer {
    /// Create a tokenizer using the abbreviation list for `language`
    pub fn new(language: &str) -> Result<Self> {
        let abbreviations = AbbreviationChecker::for_language(language);
        debug!(language, abbreviations = abbreviations.len(), "Built rule tokenizer");
        Ok(Self {
            scanner: BoundaryScanner::new()?,
            abbreviations,
        })
    }

    fn accepts(&self, candidate: &Candidate<'_>) -> bool {
        match candidate.kind {
            CandidateKind::Period => {
                !(self.abbreviations.is_abbreviation(candidate.previous_word)
                    || (candidate.next_starts_digit()
                        && self.abbreviations.is_number_abbreviation(candidate.previous_word))
                    || candidate.previous_is_initial()
                    || candidate.is_enumerator()
                    || candidate.next_starts_lowercase())
            }
            CandidateKind::Ellipsis => !candidate.next_starts_lowercase(),
            CandidateKind::Terminal | CandidateKind::Ideographic | CandidateKind::LineBreak => true,
        }
    }

    /// Split `text` into trimmed sentences
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.scanner.split(text, |candidate| self.accepts(candidate))
    }
}

// WHY: Centralized abbreviation handling for the rule-based tokenizer
// A period after one of these words must not end a sentence

use std::collections::HashSet;

/// English abbreviations that routinely precede more text in the same sentence
pub const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.", "Mt.", "Gen.", "Capt.", "Lt.",
    "Col.", "Sgt.", "Rev.", "Gov.", "Sen.", "Rep.",
    "U.S.A.", "U.S.", "U.K.", "N.Y.C.", "L.A.", "D.C.", "E.U.",
    "ft.", "lbs.", "oz.", "mi.", "km.", "approx.", "dept.", "est.", "fig.", "vol.",
    "a.m.", "p.m.", "etc.", "vs.", "ea.", "deg.", "al.", "e.g.", "i.e.", "cf.",
    "Inc.", "Ltd.", "Co.", "Corp.",
    "Jan.", "Feb.", "Mar.", "Apr.", "Jun.", "Jul.", "Aug.", "Sep.", "Sept.", "Oct.", "Nov.", "Dec.",
];

/// English abbreviations that are also ordinary words; they only count before a number
pub const ENGLISH_NUMBER_ABBREVIATIONS: &[&str] = &["no.", "nos.", "in."];

/// German abbreviations
pub const GERMAN_ABBREVIATIONS: &[&str] = &[
    "Dr.", "Hr.", "Fr.", "Prof.", "bzw.", "ca.", "d.h.", "evtl.", "ggf.", "inkl.", "Nr.", "s.o.",
    "sog.", "u.a.", "usw.", "vgl.", "z.B.", "z.T.", "St.", "Str.",
];

/// Quotes and brackets that may wrap a word without changing it
fn is_wrapping(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '(' | '[' | '{' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '\u{00AB}' | '\u{00BB}'
    )
}

/// Normalize a period-final word for lookup: strip wrapping quotes and the final period, lowercase
pub fn lookup_key(word: &str) -> Option<String> {
    let word = word.trim_matches(is_wrapping);
    let stem = word.strip_suffix('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_lowercase())
}

/// Case-insensitive abbreviation lookup
#[derive(Debug, Clone, Default)]
pub struct AbbreviationChecker {
    abbreviations: HashSet<String>,
    /// Only abbreviations when a number follows, as in `No. 5` or `12 in. wide`
    before_number: HashSet<String>,
}

impl AbbreviationChecker {
    /// Build a checker from period-final words such as `"Dr."`
    pub fn from_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            abbreviations: words.into_iter().filter_map(lookup_key).collect(),
            before_number: HashSet::new(),
        }
    }

    /// Add words that are abbreviations only when a number follows
    pub fn with_number_abbreviations<'a, I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.before_number.extend(words.into_iter().filter_map(lookup_key));
        self
    }

    /// Default list for a language code; unknown languages get an empty list
    pub fn for_language(language: &str) -> Self {
        let primary = language.split(['-', '_']).next().unwrap_or(language);
        match primary.to_ascii_lowercase().as_str() {
            "en" => Self::from_words(ENGLISH_ABBREVIATIONS.iter().copied())
                .with_number_abbreviations(ENGLISH_NUMBER_ABBREVIATIONS.iter().copied()),
            "de" => Self::from_words(GERMAN_ABBREVIATIONS.iter().copied()),
            _ => Self::default(),
        }
    }

    /// Check a period-final word such as `"Dr."` or `"u.s.a."`
    pub fn is_abbreviation(&self, word: &str) -> bool {
        lookup_key(word).is_some_and(|key| self.abbreviations.contains(&key))
    }

    /// Check a word such as `"No."` that abbreviates only before a number
    pub fn is_number_abbreviation(&self, word: &str) -> bool {
        lookup_key(word).is_some_and(|key| self.before_number.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.abbreviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviations.is_empty()
    }
}

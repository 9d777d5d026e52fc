// WHY: stateless text filters applied to sentences at emission time, never at ingest
// Keeping them out of the buffer means boundary detection always sees the producer's raw text

use regex_automata::meta::Regex;
use std::sync::OnceLock;

/// URL-shaped substrings: scheme, then any run of URL-safe or percent-encoded characters
const LINK_PATTERN: &str = concat!(
    r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|",
    r"[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+",
);

/// Emoji sequences per the Unicode emoji properties: keycaps, flags,
/// pictographs with presentation selectors, skin tones, tags and ZWJ joins
const EMOJI_PATTERN: &str = concat!(
    r"[#*0-9]\x{FE0F}?\x{20E3}",
    r"|[\x{1F1E6}-\x{1F1FF}]{1,2}",
    r"|\p{Extended_Pictographic}[\x{FE0E}\x{FE0F}]?[\x{1F3FB}-\x{1F3FF}]?[\x{E0020}-\x{E007F}]*",
    r"(?:\x{200D}\p{Extended_Pictographic}[\x{FE0E}\x{FE0F}]?[\x{1F3FB}-\x{1F3FF}]?)*",
    r"|[\x{1F3FB}-\x{1F3FF}\x{FE0F}]",
);

fn link_regex() -> &'static Regex {
    static LINKS: OnceLock<Regex> = OnceLock::new();
    LINKS.get_or_init(|| Regex::new(LINK_PATTERN).expect("link pattern is a valid regex"))
}

fn emoji_regex() -> &'static Regex {
    static EMOJIS: OnceLock<Regex> = OnceLock::new();
    EMOJIS.get_or_init(|| Regex::new(EMOJI_PATTERN).expect("emoji pattern is a valid regex"))
}

/// Options for [`clean`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    pub remove_links: bool,
    pub remove_emojis: bool,
    pub trim: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            remove_links: false,
            remove_emojis: false,
            trim: true,
        }
    }
}

fn remove_matches(regex: &Regex, text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;
    for found in regex.find_iter(text) {
        result.push_str(&text[last_end..found.start()]);
        last_end = found.end();
    }
    result.push_str(&text[last_end..]);
    result
}

/// Strip URL-shaped substrings
pub fn remove_links(text: &str) -> String {
    remove_matches(link_regex(), text)
}

/// Strip emoji sequences
pub fn remove_emojis(text: &str) -> String {
    remove_matches(emoji_regex(), text)
}

/// Apply the selected filters, then optionally trim surrounding whitespace
///
/// Filters are re-applied until nothing changes: removing an emoji can join the
/// halves of a link (and vice versa), and `clean` must be idempotent.
pub fn clean(text: &str, options: CleanOptions) -> String {
    let mut current = text.to_string();

    if options.remove_links || options.remove_emojis {
        loop {
            let mut next = current.clone();
            if options.remove_links {
                next = remove_links(&next);
            }
            if options.remove_emojis {
                next = remove_emojis(&next);
            }
            if next == current {
                break;
            }
            current = next;
        }
    }

    if options.trim {
        let trimmed = current.trim();
        if trimmed.len() != current.len() {
            current = trimmed.to_string();
        }
    }
    current
}

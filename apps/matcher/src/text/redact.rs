use once_cell::sync::Lazy;
use regex::Regex;

/// Demographic and identity terms removed as whole words, case-insensitively.
const REDACT_TERMS: &[&str] = &[
    "male", "female", "man", "woman", "men", "women", "boy", "girl", "mr", "mrs", "ms",
    "he", "she", "him", "her", "his", "hers", "mother", "father", "husband", "wife",
    "married", "single", "divorced", "age", "aged", "years old", "birthday",
    "religion", "christian", "muslim", "hindu", "jewish", "buddhist", "sikh",
    "white", "black", "asian", "latino", "hispanic", "native", "indigenous",
    "citizenship", "nationality", "veteran", "disability", "disabled",
];

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+").unwrap());

// Seven or more digits after the first, optionally separated by spaces or dashes.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s\-]{7,}").unwrap());

static TERM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = REDACT_TERMS
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
});

/// Replaces emails, phone-like digit runs and identity terms with a space.
///
/// A removal can expose a new match (two digit groups separated only by a
/// redacted word become one phone run), so passes repeat until the text is
/// stable. Every match is at least two characters wide and becomes one space,
/// which bounds the loop.
pub fn redact_pii(text: &str) -> String {
    let mut current = redact_pass(text);
    loop {
        let next = redact_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn redact_pass(text: &str) -> String {
    let t = EMAIL_PATTERN.replace_all(text, " ");
    let t = PHONE_PATTERN.replace_all(&t, " ");
    TERM_PATTERN.replace_all(&t, " ").into_owned()
}

use super::redact::redact_pii;

/// Closed list of English function words dropped during normalisation.
pub const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "for", "to", "of", "in", "on",
    "at", "by", "with", "from", "as", "is", "are", "was", "were", "be", "been", "this", "that",
    "these", "those", "it", "its", "we", "our", "you", "your", "they", "their", "i", "me", "my",
    "he", "she", "him", "her", "them", "us", "can", "could", "should", "would", "will", "may",
    "might", "not", "no", "yes", "do", "does", "did",
];

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Lowercases, redacts, strips punctuation (keeping `+` and `#` so that
/// "c++" and "c#" survive), and drops stopwords. Token order is preserved.
pub fn normalize_text(text: &str) -> String {
    let lowered = redact_pii(text).to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || c == '+' || c == '#'
            {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}

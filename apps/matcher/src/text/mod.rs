//! PII redaction and lexical normalisation shared by both pipelines.

mod normalize;
mod redact;

pub use normalize::{is_stopword, normalize_text};
pub use redact::redact_pii;

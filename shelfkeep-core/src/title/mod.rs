//! Title sanitization
//!
//! [`tokenize`] splits a title into segments, [`classify`] judges each
//! bracketed annotation, and the sanitizer functions combine the two.

mod classifier;
mod sanitizer;
mod tokenizer;

pub use classifier::{classify, classify_segment, Decision, PreservationRule, Verdict};
pub use sanitizer::{clean_title_strict, clean_title_structural, sanitize_with, SanitizeMode};
pub use tokenizer::{tokenize, BracketPair, Segment, Tokenized};

//! Title sanitizer
//!
//! Two explicit modes. `Strict` is a single regex pass that removes any long
//! bracketed span lacking a volume or edition marker. `Structural` tokenizes
//! the title and keeps only the annotations the classifier allows.

use super::classifier::classify_segment;
use super::tokenizer::tokenize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Any-family bracketed span with at least four units of unmarked content.
/// `出版` counts as a single unit even though `版` alone is a marker.
static DECORATIVE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s?[(（【\[](?:[^)）】\](（【\[册卷套版辑]|出版){4,}[)）】\]]").unwrap()
});

/// Annotation slots after the base title that may survive
const MAX_KEPT_ANNOTATIONS: usize = 2;

/// Which cleaning strategy to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeMode {
    /// Regex-only removal of decorative spans
    Strict,
    /// Tokenize and classify each annotation
    #[default]
    Structural,
}

/// Clean a title with the given mode
pub fn sanitize_with(title: &str, mode: SanitizeMode) -> String {
    match mode {
        SanitizeMode::Strict => clean_title_strict(title),
        SanitizeMode::Structural => clean_title_structural(title),
    }
}

/// Delete every decorative bracketed span in one regex pass
pub fn clean_title_strict(title: &str) -> String {
    if !DECORATIVE_SPAN.is_match(title) {
        return title.to_string();
    }

    let stripped = DECORATIVE_SPAN.replace_all(title, "");
    finish(&stripped).unwrap_or_else(|| title.to_string())
}

/// Keep the base title plus whichever of the next two segments are
/// bracketed annotations the classifier allows.
pub fn clean_title_structural(title: &str) -> String {
    let tokens = tokenize(title);
    let mut segments = tokens.segments.iter();

    let mut out = match segments.next() {
        Some(base) => base.text().to_string(),
        None => return title.to_string(),
    };

    // Anything past the second annotation slot is dropped unconditionally
    for segment in segments.take(MAX_KEPT_ANNOTATIONS) {
        if classify_segment(segment).is_keep() {
            out.push_str(segment.text());
        }
    }

    finish(&out).unwrap_or_else(|| title.to_string())
}

/// Replace stray quotes and trim; `None` if nothing is left
fn finish(candidate: &str) -> Option<String> {
    let cleaned = candidate.replace('"', " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

//! Preservation classifier
//!
//! Decides whether the content of a bracketed span belongs in the title
//! (volume counts, edition numbers, year ranges) or is promotional copy.

use super::tokenizer::Segment;
use once_cell::sync::Lazy;
use regex::Regex;

/// Spans at or below this many characters are always kept
const SHORT_CONTENT_MAX: usize = 3;

/// Allowlisted spans must be shorter than this
const ALLOWLIST_LIMIT: usize = 20;

/// Spans ending in `版` must be shorter than this
const EDITION_SUFFIX_LIMIT: usize = 10;

/// Ordered allowlist of bibliographic bracket content
static PRESERVE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("part", r".{2,6}篇"),
        ("position", r"[上中下+]"),
        ("position-volume", r"[上中下、]+[册本卷部辑]"),
        ("boxed-set", r"套装.*?[册本卷部辑]"),
        ("complete-set", r"[全共].*?[册本卷部辑]"),
        ("numbered-volume", r"[0-9]+[册本卷部辑]"),
        ("ordinal", r"第.*?[版卷部辑]"),
        (
            "numeral-range",
            r"[0-9一二三四五六七八九十百千]+[-~—～][0-9一二三四五六七八九十百千]+",
        ),
        ("year-range", r"[0-9]{4}[-~—～][0-9]{4}"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

/// Keep or drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Drop,
}

/// The rule that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservationRule {
    /// Content too short to be a blurb
    ShortContent,
    /// Matched an allowlist pattern
    Allowlist { index: usize, name: &'static str },
    /// Short content ending in `版`
    EditionSuffix,
    /// Nothing matched
    NoMatch,
}

impl PreservationRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShortContent => "short-content",
            Self::Allowlist { name, .. } => *name,
            Self::EditionSuffix => "edition-suffix",
            Self::NoMatch => "no-match",
        }
    }
}

/// Classification of one bracketed span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    pub rule: PreservationRule,
}

impl Verdict {
    fn keep(rule: PreservationRule) -> Self {
        Self {
            decision: Decision::Keep,
            rule,
        }
    }

    pub fn is_keep(&self) -> bool {
        self.decision == Decision::Keep
    }
}

/// Classify the inner content of a bracketed span (delimiters already removed)
pub fn classify(inner: &str) -> Verdict {
    let content = inner.trim();
    let len = content.chars().count();

    if len <= SHORT_CONTENT_MAX {
        return Verdict::keep(PreservationRule::ShortContent);
    }

    if len < ALLOWLIST_LIMIT {
        let matched = PRESERVE_PATTERNS
            .iter()
            .enumerate()
            .find(|(_, (_, re))| re.is_match(content));
        if let Some((index, &(name, _))) = matched {
            return Verdict::keep(PreservationRule::Allowlist { index, name });
        }
    }

    if content.ends_with('版') && len < EDITION_SUFFIX_LIMIT {
        return Verdict::keep(PreservationRule::EditionSuffix);
    }

    Verdict {
        decision: Decision::Drop,
        rule: PreservationRule::NoMatch,
    }
}

/// Classify a segment; plain text is never an annotation worth keeping
pub fn classify_segment(segment: &Segment<'_>) -> Verdict {
    match segment {
        Segment::Bracketed { .. } => classify(segment.inner()),
        Segment::Plain(_) => Verdict {
            decision: Decision::Drop,
            rule: PreservationRule::NoMatch,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::title::tokenizer::BracketPair;

    #[test]
    fn test_short_content_kept() {
        let verdict = classify("双语版");
        assert!(verdict.is_keep());
        assert_eq!(verdict.rule, PreservationRule::ShortContent);
        assert!(classify(" 上 ").is_keep());
        assert!(classify("").is_keep());
    }

    #[test]
    fn test_boxed_set() {
        let verdict = classify("套装3本");
        assert!(verdict.is_keep());
        // "3本" also matches numbered-volume, but boxed-set comes first
        assert_eq!(verdict.rule.name(), "boxed-set");
    }

    #[test]
    fn test_allowlist_patterns() {
        let cases = [
            ("人物风云篇", "part"),
            ("套装共35册", "boxed-set"),
            ("全12册精装", "complete-set"),
            ("1-30册", "numbered-volume"),
            ("1-30", "numeral-range"),
            ("第3版修订", "ordinal"),
            ("1949～1976", "numeral-range"),
        ];
        for (content, rule) in cases {
            let verdict = classify(content);
            assert!(verdict.is_keep(), "{content} should be kept");
            assert_eq!(verdict.rule.name(), rule, "{content}");
        }
    }

    #[test]
    fn test_allowlist_index_reported() {
        let verdict = classify("全本共有十二册");
        assert_eq!(
            verdict.rule,
            PreservationRule::Allowlist {
                index: 4,
                name: "complete-set"
            }
        );
    }

    #[test]
    fn test_long_content_not_rescued_by_marker() {
        let blurb = "回顾一个绝代芳华的时代，怀念一种活色生香的生活，套装三本";
        let verdict = classify(blurb);
        assert_eq!(verdict.decision, Decision::Drop);
        assert_eq!(verdict.rule, PreservationRule::NoMatch);
    }

    #[test]
    fn test_edition_suffix() {
        let verdict = classify("精装典藏版");
        assert!(verdict.is_keep());
        assert_eq!(verdict.rule, PreservationRule::EditionSuffix);
        assert!(!classify("这是一个非常长的纪念珍藏版").is_keep());
    }

    #[test]
    fn test_decorative_dropped() {
        assert!(!classify("世界科幻大师丛书").is_keep());
    }

    #[test]
    fn test_classify_segment() {
        let plain = Segment::Plain("上");
        assert!(!classify_segment(&plain).is_keep());

        let bracketed = Segment::Bracketed {
            pair: BracketPair::Paren,
            text: "(上)",
        };
        assert!(classify_segment(&bracketed).is_keep());
    }
}

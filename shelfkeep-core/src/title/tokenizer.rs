//! Bracket tokenizer
//!
//! Splits a title into top-level segments. Bracketed segments keep their
//! enclosing delimiters so that concatenating every segment in order gives
//! back the original title byte for byte.

/// A recognized delimiter pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketPair {
    /// `（ ）`
    FullWidthParen,
    /// `【 】`
    Lenticular,
    /// `( )`
    Paren,
    /// `[ ]`
    Square,
}

impl BracketPair {
    pub const ALL: [BracketPair; 4] = [
        BracketPair::FullWidthParen,
        BracketPair::Lenticular,
        BracketPair::Paren,
        BracketPair::Square,
    ];

    pub fn open(self) -> char {
        match self {
            Self::FullWidthParen => '（',
            Self::Lenticular => '【',
            Self::Paren => '(',
            Self::Square => '[',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::FullWidthParen => '）',
            Self::Lenticular => '】',
            Self::Paren => ')',
            Self::Square => ']',
        }
    }

    /// Pair whose opening delimiter is `c`
    pub fn from_open(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|pair| pair.open() == c)
    }

    /// Pair whose closing delimiter is `c`
    pub fn from_close(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|pair| pair.close() == c)
    }

    /// True if `c` is any recognized opening or closing delimiter
    pub fn is_delimiter(c: char) -> bool {
        Self::from_open(c).is_some() || Self::from_close(c).is_some()
    }
}

/// A contiguous slice of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any balanced top-level bracket pair
    Plain(&'a str),
    /// A balanced top-level span, delimiters included
    Bracketed { pair: BracketPair, text: &'a str },
}

impl<'a> Segment<'a> {
    /// Full text of the segment as it appears in the title
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(text) => text,
            Segment::Bracketed { text, .. } => text,
        }
    }

    /// Content between the outer delimiters, or the whole text for plain segments
    pub fn inner(&self) -> &'a str {
        match self {
            Segment::Plain(text) => text,
            Segment::Bracketed { pair, text } => {
                let start = pair.open().len_utf8();
                let end = text.len() - pair.close().len_utf8();
                &text[start..end]
            }
        }
    }

    pub fn is_bracketed(&self) -> bool {
        matches!(self, Segment::Bracketed { .. })
    }
}

/// Result of tokenizing a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized<'a> {
    pub segments: Vec<Segment<'a>>,
    /// False if an opening delimiter was still pending at end of input
    pub balanced: bool,
}

impl<'a> Tokenized<'a> {
    pub fn bracketed_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_bracketed()).count()
    }

    /// Concatenate all segments back into a string
    pub fn reassemble(&self) -> String {
        self.segments.iter().map(|s| s.text()).collect()
    }
}

/// Tokenize a title into plain and bracketed segments.
///
/// A closing delimiter only resolves the pending bracket on top of the stack
/// when it is that bracket's exact partner; otherwise it is ordinary text.
pub fn tokenize(title: &str) -> Tokenized<'_> {
    let mut segments = Vec::new();
    let mut stack: Vec<BracketPair> = Vec::new();
    // Byte offset where the segment under construction starts
    let mut start = 0;
    // Pair that opened the current top-level bracket
    let mut outer: Option<BracketPair> = None;

    for (idx, c) in title.char_indices() {
        if let Some(pair) = BracketPair::from_open(c) {
            if stack.is_empty() {
                if idx > start {
                    segments.push(Segment::Plain(&title[start..idx]));
                    start = idx;
                }
                outer = Some(pair);
            }
            stack.push(pair);
        } else if let Some(pair) = BracketPair::from_close(c) {
            if stack.last() == Some(&pair) {
                stack.pop();
                if stack.is_empty() {
                    let end = idx + c.len_utf8();
                    let opened = outer.take().unwrap_or(pair);
                    segments.push(Segment::Bracketed {
                        pair: opened,
                        text: &title[start..end],
                    });
                    start = end;
                }
            }
        }
    }

    if start < title.len() {
        segments.push(Segment::Plain(&title[start..]));
    }

    Tokenized {
        segments,
        balanced: stack.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title() {
        let tokens = tokenize("");
        assert!(tokens.segments.is_empty());
        assert!(tokens.balanced);
    }

    #[test]
    fn test_no_brackets_is_single_plain() {
        let tokens = tokenize("版式设计法则");
        assert_eq!(tokens.segments, vec![Segment::Plain("版式设计法则")]);
        assert!(tokens.balanced);
    }

    #[test]
    fn test_plain_then_brackets() {
        let tokens = tokenize("课外英语(上)（双语版）");
        assert_eq!(
            tokens.segments,
            vec![
                Segment::Plain("课外英语"),
                Segment::Bracketed {
                    pair: BracketPair::Paren,
                    text: "(上)"
                },
                Segment::Bracketed {
                    pair: BracketPair::FullWidthParen,
                    text: "（双语版）"
                },
            ]
        );
        assert_eq!(tokens.segments[2].inner(), "双语版");
    }

    #[test]
    fn test_nested_same_type() {
        let tokens = tokenize("x【a【b】c】y");
        assert_eq!(tokens.segments.len(), 3);
        assert_eq!(tokens.segments[1].text(), "【a【b】c】");
        assert_eq!(tokens.segments[1].inner(), "a【b】c");
        assert_eq!(tokens.segments[2], Segment::Plain("y"));
        assert!(tokens.balanced);
    }

    #[test]
    fn test_mixed_close_is_plain_text() {
        // `（` never closes with `)`
        let tokens = tokenize("书名（第一部)续）");
        assert_eq!(tokens.segments.len(), 2);
        assert_eq!(tokens.segments[1].inner(), "第一部)续");
    }

    #[test]
    fn test_stray_closer_stays_in_plain() {
        let tokens = tokenize("a）b");
        assert_eq!(tokens.segments, vec![Segment::Plain("a）b")]);
        assert!(tokens.balanced);
    }

    #[test]
    fn test_unbalanced_tail() {
        let tokens = tokenize("书名（未完");
        assert_eq!(
            tokens.segments,
            vec![Segment::Plain("书名"), Segment::Plain("（未完")]
        );
        assert!(!tokens.balanced);
    }

    #[test]
    fn test_leading_bracket() {
        let tokens = tokenize("（第9版）公务员");
        assert!(tokens.segments[0].is_bracketed());
        assert_eq!(tokens.segments[1], Segment::Plain("公务员"));
    }

    #[test]
    fn test_reassemble_round_trip() {
        let title = "民国印记（套装3本） 民国风度（回顾） [x](y)z";
        let tokens = tokenize(title);
        assert_eq!(tokens.reassemble(), title);
        assert_eq!(tokens.bracketed_count(), 4);
    }

    #[test]
    fn test_pair_lookup() {
        assert_eq!(BracketPair::from_open('【'), Some(BracketPair::Lenticular));
        assert_eq!(BracketPair::from_close(']'), Some(BracketPair::Square));
        assert_eq!(BracketPair::from_open(')'), None);
        assert!(BracketPair::is_delimiter('）'));
        assert!(!BracketPair::is_delimiter('《'));
    }
}

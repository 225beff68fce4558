//! Line grouping
//!
//! Splits the collapsed token stream into physical lines and classifies
//! each one. The scanner is line driven: block transitions are decided by
//! the classification of the incoming line, inline content is scanned from
//! the line's tokens.

use std::ops::Range;

use crate::doku::event::ListKind;
use crate::doku::lexing::line_classification::classify_line;
use crate::doku::lexing::tokens::{StreamToken, Token};

/// The block-level classification of a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Empty or whitespace only.
    Blank,
    /// `== Title ==`, level already clamped to 1..=6.
    Heading { level: usize },
    /// Four or more dashes and nothing else.
    HorizontalRule,
    /// Indented `*` or `-` item; depth counted in two-space units.
    ListItem { depth: usize, kind: ListKind },
    /// Leading `>` run.
    Quote { depth: usize },
    /// Leading `|` or `^`.
    TableRow,
    /// Leading double space that is not a list item.
    Preformatted,
    /// Anything else: paragraph text.
    Text,
}

/// One physical line: its stream tokens (without the terminating newline)
/// and its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub items: Vec<(StreamToken, Range<usize>)>,
    pub kind: LineType,
}

/// Group a collapsed stream into classified lines.
pub fn group_lines(stream: Vec<(StreamToken, Range<usize>)>) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<(StreamToken, Range<usize>)> = Vec::new();

    for (token, span) in stream {
        if matches!(token, StreamToken::Raw(Token::Newline)) {
            let kind = classify_line(&current);
            lines.push(Line {
                items: std::mem::take(&mut current),
                kind,
            });
        } else {
            current.push((token, span));
        }
    }
    if !current.is_empty() {
        let kind = classify_line(&current);
        lines.push(Line {
            items: current,
            kind,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doku::lexing::base_tokenization::tokenize;
    use crate::doku::lexing::opaque_regions::collapse;

    fn lines_of(source: &str) -> Vec<Line> {
        group_lines(collapse(tokenize(source), source))
    }

    #[test]
    fn groups_on_newlines() {
        let lines = lines_of("one\ntwo\nthree");
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.kind == LineType::Text));
    }

    #[test]
    fn blank_line_between_paragraphs() {
        let lines = lines_of("one\n\ntwo");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].kind, LineType::Blank);
        assert!(lines[1].items.is_empty());
    }

    #[test]
    fn trailing_newline_produces_no_extra_line() {
        assert_eq!(lines_of("one\n").len(), 1);
        assert_eq!(lines_of("one").len(), 1);
    }

    #[test]
    fn a_block_opaque_region_keeps_its_own_line() {
        let lines = lines_of("before\n<code>\nx\n</code>\nafter");
        assert_eq!(lines.len(), 3);
        assert!(matches!(lines[1].items[0].0, StreamToken::Opaque(_)));
    }
}

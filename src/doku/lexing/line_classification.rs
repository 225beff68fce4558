//! Line classification
//!
//! Decides what kind of block construct a physical line starts, from its
//! leading tokens only. Inline content is not inspected here; a line that
//! starts no block construct is a paragraph line.

use std::ops::Range;

use crate::doku::event::ListKind;
use crate::doku::lexing::line_grouping::LineType;
use crate::doku::lexing::tokens::{StreamToken, Token};

/// Classify a grouped line from its tokens.
pub fn classify_line(items: &[(StreamToken, Range<usize>)]) -> LineType {
    if items.iter().all(|(token, _)| is_whitespace(token)) {
        return LineType::Blank;
    }

    // Leading indentation decides between lists and preformatted text.
    let (first, indent) = match &items[0].0 {
        StreamToken::Raw(Token::Whitespace(ws)) => (1, indent_width(ws)),
        _ => (0, 0),
    };
    if indent >= 2 {
        if let Some(kind) = list_marker(items.get(first)) {
            return LineType::ListItem {
                depth: (indent / 2).max(1),
                kind,
            };
        }
        return LineType::Preformatted;
    }

    match items.get(first).map(|(token, _)| token) {
        Some(StreamToken::Raw(Token::Quotes(depth))) => LineType::Quote { depth: *depth },
        Some(StreamToken::Raw(Token::Pipe)) | Some(StreamToken::Raw(Token::Caret)) => {
            LineType::TableRow
        }
        Some(StreamToken::Raw(Token::Equals(run))) => heading_type(items, first, *run),
        Some(StreamToken::Raw(Token::Dashes(run))) if *run >= 4 && only_trailing_ws(items, first) => {
            LineType::HorizontalRule
        }
        _ => LineType::Text,
    }
}

/// Heading lines need both a leading and a trailing marker run; a lone run
/// is ordinary paragraph text.
fn heading_type(items: &[(StreamToken, Range<usize>)], first: usize, run: usize) -> LineType {
    let last = items
        .iter()
        .rposition(|(token, _)| !is_whitespace(token))
        .unwrap_or(first);
    let closed = last > first
        && matches!(items[last].0, StreamToken::Raw(Token::Equals(_)));
    if !closed {
        return LineType::Text;
    }
    LineType::Heading {
        level: 7usize.saturating_sub(run).clamp(1, 6),
    }
}

fn list_marker(item: Option<&(StreamToken, Range<usize>)>) -> Option<ListKind> {
    match item.map(|(token, _)| token) {
        Some(StreamToken::Raw(Token::SpecialChar('*'))) => Some(ListKind::Bulleted),
        Some(StreamToken::Raw(Token::Dashes(1))) => Some(ListKind::Numbered),
        _ => None,
    }
}

fn only_trailing_ws(items: &[(StreamToken, Range<usize>)], first: usize) -> bool {
    items[first + 1..].iter().all(|(token, _)| is_whitespace(token))
}

fn is_whitespace(token: &StreamToken) -> bool {
    matches!(token, StreamToken::Raw(Token::Whitespace(_)))
}

/// Indentation width in columns: spaces count one, tabs two (one list
/// level), carriage returns nothing.
fn indent_width(ws: &str) -> usize {
    ws.chars()
        .map(|c| match c {
            ' ' => 1,
            '\t' => 2,
            _ => 0,
        })
        .sum()
}

//! Opaque-region collapse
//!
//! Token-stream transformation that carves verbatim constructs out of the
//! raw stream before line grouping ever sees them. On an opening marker the
//! transformation searches forward for the literal closing marker and
//! replaces the whole region with a single [StreamToken::Opaque]; the
//! content in between is sliced straight from the source and never
//! tokenized for markup again.
//!
//! A region whose closer is missing runs to end of input and is still
//! collapsed into exactly one region, best effort.

use std::ops::Range;

use crate::doku::lexing::tokens::{OpaqueKind, OpaqueRegion, StreamToken, Token};

/// Collapse opaque regions in a raw token stream.
pub fn collapse(
    tokens: Vec<(Token, Range<usize>)>,
    source: &str,
) -> Vec<(StreamToken, Range<usize>)> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let (token, span) = &tokens[i];
        let opener = match token {
            Token::CodeOpen(text) => Some((OpaqueKind::Code, parse_language(text, "<code"))),
            Token::FileOpen(text) => Some((OpaqueKind::File, parse_language(text, "<file"))),
            Token::HtmlOpen => Some((OpaqueKind::HtmlInline, None)),
            Token::HtmlBlockOpen => Some((OpaqueKind::HtmlBlock, None)),
            Token::PhpOpen => Some((OpaqueKind::PhpInline, None)),
            Token::PhpBlockOpen => Some((OpaqueKind::PhpBlock, None)),
            Token::NowikiOpen => Some((OpaqueKind::NoFormat, None)),
            Token::NoFormatToggle => Some((OpaqueKind::NoFormat, None)),
            _ => None,
        };

        let (kind, language) = match opener {
            Some(found) => found,
            None => {
                out.push((StreamToken::Raw(token.clone()), span.clone()));
                i += 1;
                continue;
            }
        };

        let closer = closer_for(token);
        let close_at = tokens[i + 1..]
            .iter()
            .position(|(candidate, _)| closer_matches(&closer, candidate))
            .map(|offset| i + 1 + offset);

        let (content_end, region_end, next) = match close_at {
            Some(j) => (tokens[j].1.start, tokens[j].1.end, j + 1),
            None => (source.len(), source.len(), tokens.len()),
        };
        let content = trim_one_line_break(&source[span.end..content_end]);

        out.push((
            StreamToken::Opaque(OpaqueRegion {
                kind,
                language,
                content: content.to_string(),
            }),
            span.start..region_end,
        ));
        i = next;
    }

    out
}

/// What closes a given opener token.
enum Closer {
    Code,
    File,
    Html,
    HtmlBlock,
    Php,
    PhpBlock,
    Nowiki,
    Percent,
}

fn closer_for(opener: &Token) -> Closer {
    match opener {
        Token::CodeOpen(_) => Closer::Code,
        Token::FileOpen(_) => Closer::File,
        Token::HtmlOpen => Closer::Html,
        Token::HtmlBlockOpen => Closer::HtmlBlock,
        Token::PhpOpen => Closer::Php,
        Token::PhpBlockOpen => Closer::PhpBlock,
        Token::NowikiOpen => Closer::Nowiki,
        _ => Closer::Percent,
    }
}

fn closer_matches(closer: &Closer, candidate: &Token) -> bool {
    matches!(
        (closer, candidate),
        (Closer::Code, Token::CodeClose)
            | (Closer::File, Token::FileClose)
            | (Closer::Html, Token::HtmlClose)
            | (Closer::HtmlBlock, Token::HtmlBlockClose)
            | (Closer::Php, Token::PhpClose)
            | (Closer::PhpBlock, Token::PhpBlockClose)
            | (Closer::Nowiki, Token::NowikiClose)
            | (Closer::Percent, Token::NoFormatToggle)
    )
}

/// Extract the language tag from a `<code ...>`/`<file ...>` opener. The tag
/// is the first whitespace-delimited attribute token, unless it is `-` or
/// starts with `[`, both of which mean "no language".
fn parse_language(opener: &str, prefix: &str) -> Option<String> {
    let attrs = opener
        .strip_prefix(prefix)?
        .strip_suffix('>')?
        .trim();
    let first = attrs.split_whitespace().next()?;
    if first == "-" || first.starts_with('[') {
        return None;
    }
    Some(first.to_string())
}

/// Remove exactly one leading and one trailing line break, if present.
fn trim_one_line_break(content: &str) -> &str {
    let content = content.strip_prefix('\n').unwrap_or(content);
    content.strip_suffix('\n').unwrap_or(content)
}

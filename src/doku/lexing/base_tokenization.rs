//! Base tokenization
//!
//! Raw tokenization using the logos lexer. This is the entry point where
//! source strings become token streams; every later stage operates on the
//! stream, not on the source (the source is still carried along for span
//! slicing by the opaque-region search and the construct parsers).

use logos::Logos;

use crate::doku::lexing::tokens::Token;

/// Tokenize source text, pairing each token with its byte range.
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|(token, _)| token).collect()
    }

    #[test]
    fn tokenizes_plain_text() {
        assert_eq!(
            kinds("hello world"),
            vec![
                Token::Text("hello".to_string()),
                Token::Whitespace(" ".to_string()),
                Token::Text("world".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn format_delimiters() {
        assert_eq!(
            kinds("**//__''"),
            vec![
                Token::BoldToggle,
                Token::ItalicToggle,
                Token::UnderlineToggle,
                Token::MonospaceToggle,
            ]
        );
    }

    #[test]
    fn single_markers_fall_back_to_special_chars() {
        assert_eq!(
            kinds("a * b / c"),
            vec![
                Token::Text("a".to_string()),
                Token::Whitespace(" ".to_string()),
                Token::SpecialChar('*'),
                Token::Whitespace(" ".to_string()),
                Token::Text("b".to_string()),
                Token::Whitespace(" ".to_string()),
                Token::SpecialChar('/'),
                Token::Whitespace(" ".to_string()),
                Token::Text("c".to_string()),
            ]
        );
    }

    #[test]
    fn marker_runs_carry_length() {
        assert_eq!(
            kinds("==== x ====\n----"),
            vec![
                Token::Equals(4),
                Token::Whitespace(" ".to_string()),
                Token::Text("x".to_string()),
                Token::Whitespace(" ".to_string()),
                Token::Equals(4),
                Token::Newline,
                Token::Dashes(4),
            ]
        );
    }

    #[test]
    fn code_opener_keeps_attribute_text() {
        assert_eq!(
            kinds("<code java>"),
            vec![Token::CodeOpen("<code java>".to_string())]
        );
        assert_eq!(kinds("<code>"), vec![Token::CodeOpen("<code>".to_string())]);
    }

    #[test]
    fn unrecognized_angle_text_stays_literal() {
        assert_eq!(
            kinds("<codex>"),
            vec![
                Token::SpecialChar('<'),
                Token::Text("codex".to_string()),
                Token::Quotes(1),
            ]
        );
    }

    #[test]
    fn absolute_url_is_one_token() {
        assert_eq!(
            kinds("see http://example.com/a now"),
            vec![
                Token::Text("see".to_string()),
                Token::Whitespace(" ".to_string()),
                Token::UrlText("http://example.com/a".to_string()),
                Token::Whitespace(" ".to_string()),
                Token::Text("now".to_string()),
            ]
        );
    }

    #[test]
    fn list_line_tokens() {
        assert_eq!(
            kinds("  * one"),
            vec![
                Token::Whitespace("  ".to_string()),
                Token::SpecialChar('*'),
                Token::Whitespace(" ".to_string()),
                Token::Text("one".to_string()),
            ]
        );
    }

    #[test]
    fn spans_cover_the_source() {
        let tokens = tokenize("ab **cd**");
        let mut end = 0;
        for (_, span) in &tokens {
            assert_eq!(span.start, end);
            end = span.end;
        }
        assert_eq!(end, "ab **cd**".len());
    }
}

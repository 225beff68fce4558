//! Raw token types for the wiki lexer
//!
//! [Token] is produced directly by the logos lexer over the source text.
//! Every character of the input is covered by some pattern, so tokenization
//! never drops input: markup that turns out not to apply (a stray `]]`, a
//! lone `^`) is pushed back into the text flow by the scanner.
//!
//! [StreamToken] is the stream element after the opaque-region
//! transformation: either a raw token or a collapsed [OpaqueRegion] whose
//! content was copied verbatim and must never be scanned for markup.

use logos::Logos;

/// All markup-significant tokens of the DokuWiki syntax.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[token("\n")]
    Newline,

    /// Horizontal whitespace run, payload preserved for indentation width
    /// and cell padding decisions.
    #[regex(r"[ \t\r]+", |lex| lex.slice().to_string())]
    Whitespace(String),

    // Toggled inline format delimiters
    #[token("**")]
    BoldToggle,
    #[token("//")]
    ItalicToggle,
    #[token("__")]
    UnderlineToggle,
    #[token("''")]
    MonospaceToggle,

    // Paired inline format tags
    #[token("<sub>")]
    SubscriptOpen,
    #[token("</sub>")]
    SubscriptClose,
    #[token("<sup>")]
    SuperscriptOpen,
    #[token("</sup>")]
    SuperscriptClose,
    #[token("<del>")]
    StrikeoutOpen,
    #[token("</del>")]
    StrikeoutClose,

    // Structured construct delimiters
    #[token("[[")]
    LinkOpen,
    #[token("]]")]
    LinkClose,
    #[token("{{")]
    BraceOpen,
    #[token("}}")]
    BraceClose,
    #[token("((")]
    FootnoteOpen,
    #[token("))")]
    FootnoteClose,

    // Marker character runs; meaning depends on line position
    #[regex(r"=+", |lex| lex.slice().len())]
    Equals(usize),
    #[regex(r"-+", |lex| lex.slice().len())]
    Dashes(usize),
    #[regex(r">+", |lex| lex.slice().len())]
    Quotes(usize),

    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,

    /// Forced line break marker, two backslashes. Only honored by the
    /// scanner when followed by whitespace or end of line.
    #[token("\\\\")]
    LineBreak,

    // Opaque region delimiters
    #[regex(r"<code( [^>\n]*)?>", |lex| lex.slice().to_string())]
    CodeOpen(String),
    #[token("</code>")]
    CodeClose,
    #[regex(r"<file( [^>\n]*)?>", |lex| lex.slice().to_string())]
    FileOpen(String),
    #[token("</file>")]
    FileClose,
    #[token("<html>")]
    HtmlOpen,
    #[token("</html>")]
    HtmlClose,
    #[token("<HTML>")]
    HtmlBlockOpen,
    #[token("</HTML>")]
    HtmlBlockClose,
    #[token("<php>")]
    PhpOpen,
    #[token("</php>")]
    PhpClose,
    #[token("<PHP>")]
    PhpBlockOpen,
    #[token("</PHP>")]
    PhpBlockClose,
    #[token("<nowiki>")]
    NowikiOpen,
    #[token("</nowiki>")]
    NowikiClose,
    #[token("%%")]
    NoFormatToggle,

    /// Absolute URL captured as one token so that `//` inside a scheme
    /// never reads as an italic toggle.
    #[regex(r"[a-zA-Z][a-zA-Z0-9+.-]*://[^ \t\r\n|\^\]}]+", |lex| lex.slice().to_string(), priority = 10)]
    UrlText(String),

    /// Plain text run, free of whitespace and marker characters.
    #[regex(r"[^ \t\r\n*/'_<>\[\]{}()%=|^\\-]+", |lex| lex.slice().to_string())]
    Text(String),

    /// Single marker character that did not form a longer token.
    #[regex(r"[*/'_<\[\]{}()%\\]", |lex| lex.slice().chars().next().unwrap_or(' '))]
    SpecialChar(char),
}

impl Token {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }
}

/// The kind of an opaque region after collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    Code,
    File,
    HtmlInline,
    HtmlBlock,
    PhpInline,
    PhpBlock,
    /// `<nowiki>...</nowiki>` or `%%...%%`.
    NoFormat,
}

impl OpaqueKind {
    /// Block regions close an open paragraph; inline regions flow with the
    /// surrounding text.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            OpaqueKind::Code | OpaqueKind::File | OpaqueKind::HtmlBlock | OpaqueKind::PhpBlock
        )
    }
}

/// A verbatim span carved out of the token stream. The content was copied
/// from the source by a literal end-marker search and is never tokenized.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueRegion {
    pub kind: OpaqueKind,
    /// Language tag parsed from a `<code ...>`/`<file ...>` opener.
    pub language: Option<String>,
    pub content: String,
}

/// Stream element after the opaque-region transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamToken {
    Raw(Token),
    Opaque(OpaqueRegion),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_block_classification() {
        assert!(OpaqueKind::Code.is_block());
        assert!(OpaqueKind::HtmlBlock.is_block());
        assert!(!OpaqueKind::HtmlInline.is_block());
        assert!(!OpaqueKind::NoFormat.is_block());
    }
}

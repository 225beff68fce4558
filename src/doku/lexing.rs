//! Lexing pipeline
//!
//! Tokenization runs as a sequence of stream stages, each taking the output
//! of the previous one:
//!
//!   1. Base tokenization with the logos lexer. Every character of the
//!      source is covered by some token; nothing is dropped.
//!   2. Opaque-region collapse. Verbatim constructs (code/file blocks, raw
//!      HTML, inline script, no-format spans) are replaced by single opaque
//!      tokens whose content was sliced from the source by a literal
//!      end-marker search, so later stages never scan it for markup.
//!   3. Line grouping and classification. Tokens are split on newlines into
//!      physical lines and each line is tagged with the block construct it
//!      starts.
//!
//! The scanner then drives the block state machine over the classified
//! lines.

pub mod base_tokenization;
pub mod line_classification;
pub mod line_grouping;
pub mod opaque_regions;
pub mod tokens;

pub use base_tokenization::tokenize;
pub use line_grouping::{group_lines, Line, LineType};
pub use tokens::{OpaqueKind, OpaqueRegion, StreamToken, Token};

/// Run the full lexing pipeline over a source document.
pub fn lex(source: &str) -> Vec<Line> {
    let tokens = base_tokenization::tokenize(source);
    let stream = opaque_regions::collapse(tokens, source);
    line_grouping::group_lines(stream)
}

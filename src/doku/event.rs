//! Semantic document events
//!
//! The scanner does not build a tree. It walks the markup once and reports
//! what it sees as an ordered stream of [Event] values, SAX-style. The stream
//! is always well nested: every `Begin*` has a matching `End*` in LIFO order,
//! and anything still open when the input runs out is closed synthetically
//! before `EndDocument`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::doku::reference::ResourceReference;

/// String-keyed parameters attached to macros, links and images.
///
/// Recognized keys are construct specific (`language`, `feed`, `count`,
/// `caption`, alignment and size keys for images). Unrecognized keys are
/// passed through unchanged, never dropped.
pub type Params = BTreeMap<String, String>;

/// The kind of an open list block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// Inline format spans. Bold/italic/underlined/monospace are toggled by a
/// repeated delimiter; subscript/superscript/strikeout use explicit
/// open/close tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    Bold,
    Italic,
    Underlined,
    Monospace,
    Subscript,
    Superscript,
    Strikeout,
}

/// Horizontal alignment of a table cell, derived from the padding around the
/// cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellAlignment {
    #[default]
    None,
    Center,
    Right,
}

/// Parameters of a single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellParams {
    pub alignment: CellAlignment,
    /// Number of columns this cell spans; grows when the cell is followed by
    /// fully-empty cells in the same row.
    pub colspan: usize,
}

impl Default for CellParams {
    fn default() -> Self {
        CellParams {
            alignment: CellAlignment::None,
            colspan: 1,
        }
    }
}

/// One semantic event in the document stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BeginDocument,
    EndDocument,

    BeginSection,
    EndSection,
    BeginHeading { level: usize, id: String },
    EndHeading,

    BeginParagraph,
    EndParagraph,

    BeginList(ListKind),
    EndList(ListKind),
    BeginListItem,
    EndListItem,

    BeginQuotation,
    EndQuotation,
    BeginQuotationLine,
    EndQuotationLine,

    BeginTable,
    EndTable,
    BeginTableRow,
    EndTableRow,
    BeginTableCell(CellParams),
    EndTableCell,
    BeginTableHeadCell(CellParams),
    EndTableHeadCell,

    BeginFormat(FormatKind),
    EndFormat(FormatKind),

    BeginLink {
        reference: ResourceReference,
        /// True when the link was synthesized from a bare URL or email with
        /// no explicit delimiters.
        freestanding: bool,
        params: Params,
    },
    EndLink,
    Image {
        reference: ResourceReference,
        params: Params,
    },

    Word(String),
    Space,
    SpecialSymbol(char),
    NewLine,
    HorizontalLine,

    Verbatim {
        text: String,
        inline: bool,
    },
    Macro {
        id: String,
        params: Params,
        content: String,
        inline: bool,
    },
}

impl Event {
    /// Compact one-line tag notation, used by the CLI's `tag` output and by
    /// debugging aids.
    pub fn tag(&self) -> String {
        match self {
            Event::BeginDocument => "begin-document".into(),
            Event::EndDocument => "end-document".into(),
            Event::BeginSection => "begin-section".into(),
            Event::EndSection => "end-section".into(),
            Event::BeginHeading { level, id } => {
                format!("begin-heading level={} id={:?}", level, id)
            }
            Event::EndHeading => "end-heading".into(),
            Event::BeginParagraph => "begin-paragraph".into(),
            Event::EndParagraph => "end-paragraph".into(),
            Event::BeginList(kind) => format!("begin-list {:?}", kind),
            Event::EndList(kind) => format!("end-list {:?}", kind),
            Event::BeginListItem => "begin-list-item".into(),
            Event::EndListItem => "end-list-item".into(),
            Event::BeginQuotation => "begin-quotation".into(),
            Event::EndQuotation => "end-quotation".into(),
            Event::BeginQuotationLine => "begin-quotation-line".into(),
            Event::EndQuotationLine => "end-quotation-line".into(),
            Event::BeginTable => "begin-table".into(),
            Event::EndTable => "end-table".into(),
            Event::BeginTableRow => "begin-table-row".into(),
            Event::EndTableRow => "end-table-row".into(),
            Event::BeginTableCell(params) => {
                format!("begin-table-cell {:?} colspan={}", params.alignment, params.colspan)
            }
            Event::EndTableCell => "end-table-cell".into(),
            Event::BeginTableHeadCell(params) => {
                format!(
                    "begin-table-head-cell {:?} colspan={}",
                    params.alignment, params.colspan
                )
            }
            Event::EndTableHeadCell => "end-table-head-cell".into(),
            Event::BeginFormat(kind) => format!("begin-format {:?}", kind),
            Event::EndFormat(kind) => format!("end-format {:?}", kind),
            Event::BeginLink {
                reference,
                freestanding,
                ..
            } => format!(
                "begin-link target={:?} freestanding={}",
                reference.target, freestanding
            ),
            Event::EndLink => "end-link".into(),
            Event::Image { reference, .. } => format!("image target={:?}", reference.target),
            Event::Word(text) => format!("word {:?}", text),
            Event::Space => "space".into(),
            Event::SpecialSymbol(symbol) => format!("special-symbol {:?}", symbol),
            Event::NewLine => "new-line".into(),
            Event::HorizontalLine => "horizontal-line".into(),
            Event::Verbatim { text, inline } => format!("verbatim inline={} {:?}", inline, text),
            Event::Macro {
                id,
                params,
                content,
                inline,
            } => format!(
                "macro id={:?} params={:?} content={:?} inline={}",
                id, params, content, inline
            ),
        }
    }
}

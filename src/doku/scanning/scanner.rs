//! Block state machine
//!
//! Drives the event stream line by line over the classified output of the
//! lexing pipeline. The scanner owns all nesting state for one parse call:
//! the current block kind, the open list levels, the quotation depth, the
//! inline format stack and the open section chain. Whatever is still open
//! when input runs out is closed synthetically, in reverse-open order,
//! before `EndDocument` — the stream is well nested for any input.

use std::ops::Range;

use crate::doku::event::{CellAlignment, CellParams, Event, FormatKind, ListKind, Params};
use crate::doku::lexing::line_grouping::{Line, LineType};
use crate::doku::lexing::tokens::{OpaqueKind, OpaqueRegion, StreamToken, Token};
use crate::doku::scanning::constructs::{parse_brace, parse_link, BraceConstruct, LinkLabel, LinkMode};
use crate::doku::scanning::format_stack::FormatStack;
use crate::doku::scanning::leaf_emitter::leaf_events;
use crate::doku::sink::EventSink;

/// Which block element is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    None,
    Paragraph,
    List,
    Table,
    Quotation,
}

/// Whether inline content is scanned at paragraph level (lazy paragraph
/// opening applies) or inside an already-open container such as a list
/// item, table cell, quotation line or heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineCtx {
    Block,
    Inner,
}

/// Cell padding counts as alignment intent from two spaces up; a single
/// space is separator cosmetics.
const ALIGN_PAD: usize = 2;

pub struct Scanner<'a, S: EventSink> {
    sink: &'a mut S,
    source: &'a str,
    block: BlockKind,
    /// Open list levels, innermost last; depths strictly increasing.
    list_stack: Vec<(usize, ListKind)>,
    quote_depth: usize,
    formats: FormatStack,
    /// Open sections form a consecutive chain 1..=section_level.
    section_level: usize,
    /// Pending plain text, flushed through the leaf emitter at delimiters.
    text: String,
    last_was_space: bool,
    /// A paragraph continuation line owes a soft-break space before its
    /// first inline event.
    pending_soft_break: bool,
    /// Buffered preformatted lines, merged into one verbatim block.
    pre_lines: Vec<String>,
}

impl<'a, S: EventSink> Scanner<'a, S> {
    pub fn new(source: &'a str, sink: &'a mut S) -> Self {
        Scanner {
            sink,
            source,
            block: BlockKind::None,
            list_stack: Vec::new(),
            quote_depth: 0,
            formats: FormatStack::new(),
            section_level: 0,
            text: String::new(),
            last_was_space: false,
            pending_soft_break: false,
            pre_lines: Vec::new(),
        }
    }

    pub fn run(&mut self, lines: &[Line]) {
        self.emit(Event::BeginDocument);
        for line in lines {
            if line.kind != LineType::Preformatted {
                self.flush_preformatted();
            }
            match line.kind {
                LineType::Blank => self.close_block(),
                LineType::HorizontalRule => {
                    self.close_block();
                    self.emit(Event::HorizontalLine);
                }
                LineType::Heading { level } => self.handle_heading(line, level),
                LineType::ListItem { depth, kind } => self.handle_list_item(line, depth, kind),
                LineType::Quote { depth } => self.handle_quote_line(line, depth),
                LineType::TableRow => self.handle_table_row(line),
                LineType::Preformatted => self.buffer_preformatted(line),
                LineType::Text => self.handle_text_line(line),
            }
        }
        self.flush_preformatted();
        self.close_block();
        while self.section_level > 0 {
            self.emit(Event::EndSection);
            self.section_level -= 1;
        }
        self.emit(Event::EndDocument);
    }

    // ---- event emission -------------------------------------------------

    /// All events funnel through here; adjacent duplicate `Space` events
    /// are suppressed.
    fn emit(&mut self, event: Event) {
        if matches!(event, Event::Space) {
            if self.last_was_space {
                return;
            }
            self.last_was_space = true;
        } else {
            self.last_was_space = false;
        }
        self.sink.event(event);
    }

    /// Emit an inline-level event, opening the paragraph lazily and paying
    /// off a pending soft break first.
    fn emit_inline(&mut self, event: Event, ctx: InlineCtx) {
        if ctx == InlineCtx::Block {
            if self.block == BlockKind::None {
                // A lone space never opens a paragraph.
                if matches!(event, Event::Space) {
                    return;
                }
                self.emit(Event::BeginParagraph);
                self.block = BlockKind::Paragraph;
            }
            if self.pending_soft_break {
                self.pending_soft_break = false;
                self.emit(Event::Space);
            }
        }
        self.emit(event);
    }

    // ---- block transitions ----------------------------------------------

    /// Close the open block, whatever it is, including any open inline
    /// formats within it.
    fn close_block(&mut self) {
        self.flush_text(InlineCtx::Inner);
        self.pending_soft_break = false;
        for event in self.formats.close_all() {
            self.emit(event);
        }
        match self.block {
            BlockKind::None => {}
            BlockKind::Paragraph => self.emit(Event::EndParagraph),
            BlockKind::List => {
                while let Some((_, kind)) = self.list_stack.pop() {
                    self.emit(Event::EndListItem);
                    self.emit(Event::EndList(kind));
                }
            }
            BlockKind::Quotation => {
                for _ in 0..self.quote_depth {
                    self.emit(Event::EndQuotation);
                }
                self.quote_depth = 0;
            }
            BlockKind::Table => self.emit(Event::EndTable),
        }
        self.block = BlockKind::None;
    }

    fn handle_text_line(&mut self, line: &Line) {
        match self.block {
            BlockKind::Paragraph => self.pending_soft_break = true,
            BlockKind::None => {}
            _ => self.close_block(),
        }
        let content = trim_ws(&line.items);
        self.scan_inline(content, InlineCtx::Block);
    }

    fn handle_heading(&mut self, line: &Line, level: usize) {
        let title = heading_title(&line.items);
        if title.is_empty() {
            // Nothing between the marker runs: silently skipped.
            return;
        }
        self.close_block();
        while self.section_level >= level {
            self.emit(Event::EndSection);
            self.section_level -= 1;
        }
        while self.section_level < level {
            self.emit(Event::BeginSection);
            self.section_level += 1;
        }
        let id = slug(self.title_source(title));
        self.emit(Event::BeginHeading { level, id });
        self.scan_inline(title, InlineCtx::Inner);
        for event in self.formats.close_all() {
            self.emit(event);
        }
        self.emit(Event::EndHeading);
    }

    fn handle_list_item(&mut self, line: &Line, depth: usize, kind: ListKind) {
        if self.block != BlockKind::List {
            self.close_block();
            self.block = BlockKind::List;
        }
        for event in self.formats.close_all() {
            self.emit(event);
        }

        match self.list_stack.last().copied() {
            None => {
                self.list_stack.push((depth, kind));
                self.emit(Event::BeginList(kind));
                self.emit(Event::BeginListItem);
            }
            Some((top_depth, _)) if depth > top_depth => {
                self.list_stack.push((depth, kind));
                self.emit(Event::BeginList(kind));
                self.emit(Event::BeginListItem);
            }
            Some(_) => {
                // Dedent: pop levels deeper than the new depth, but never
                // below the outermost level. The line is then clamped to
                // the nearest enclosing level.
                while self.list_stack.len() > 1
                    && self.list_stack.last().map_or(false, |&(d, _)| d > depth)
                {
                    if let Some((_, inner_kind)) = self.list_stack.pop() {
                        self.emit(Event::EndListItem);
                        self.emit(Event::EndList(inner_kind));
                    }
                }
                if let Some(&(top_depth, top_kind)) = self.list_stack.last() {
                    if top_kind != kind {
                        // Same level, different kind: close and reopen.
                        self.emit(Event::EndListItem);
                        self.emit(Event::EndList(top_kind));
                        self.list_stack.pop();
                        self.list_stack.push((top_depth, kind));
                        self.emit(Event::BeginList(kind));
                        self.emit(Event::BeginListItem);
                    } else {
                        self.emit(Event::EndListItem);
                        self.emit(Event::BeginListItem);
                    }
                }
            }
        }

        // Skip indentation and the marker itself.
        let content = trim_ws(line.items.get(2..).unwrap_or(&[]));
        self.scan_inline(content, InlineCtx::Inner);
    }

    fn handle_quote_line(&mut self, line: &Line, depth: usize) {
        if self.block != BlockKind::Quotation {
            self.close_block();
            self.block = BlockKind::Quotation;
            for _ in 0..depth {
                self.emit(Event::BeginQuotation);
            }
            self.quote_depth = depth;
        } else if depth > self.quote_depth {
            for _ in 0..depth - self.quote_depth {
                self.emit(Event::BeginQuotation);
            }
            self.quote_depth = depth;
        } else {
            for _ in 0..self.quote_depth - depth {
                self.emit(Event::EndQuotation);
            }
            self.quote_depth = depth;
        }

        self.emit(Event::BeginQuotationLine);
        // The marker may sit behind a single space of indentation.
        let marker = line
            .items
            .iter()
            .position(|(token, _)| matches!(token, StreamToken::Raw(Token::Quotes(_))))
            .map_or(line.items.len(), |p| p + 1);
        let content = trim_ws(&line.items[marker.min(line.items.len())..]);
        self.scan_inline(content, InlineCtx::Inner);
        for event in self.formats.close_all() {
            self.emit(event);
        }
        self.emit(Event::EndQuotationLine);
    }

    fn buffer_preformatted(&mut self, line: &Line) {
        if self.block != BlockKind::None {
            self.close_block();
        }
        let text = self.preformatted_text(line);
        self.pre_lines.push(text);
    }

    fn flush_preformatted(&mut self) {
        if self.pre_lines.is_empty() {
            return;
        }
        let text = self.pre_lines.join("\n");
        self.pre_lines.clear();
        self.emit(Event::Verbatim {
            text,
            inline: false,
        });
    }

    /// Rebuild a preformatted line from the source with one indentation
    /// level (two spaces or a tab) stripped.
    fn preformatted_text(&self, line: &Line) -> String {
        let mut out = String::new();
        if let Some((StreamToken::Raw(Token::Whitespace(ws)), _)) = line.items.first() {
            let stripped = ws
                .strip_prefix("  ")
                .or_else(|| ws.strip_prefix('\t'))
                .or_else(|| ws.strip_prefix(' '))
                .unwrap_or(ws);
            out.push_str(stripped);
        }
        if line.items.len() > 1 {
            let start = line.items[1].1.start;
            let end = line.items.last().map(|(_, span)| span.end).unwrap_or(start);
            out.push_str(&self.source[start..end]);
        }
        out
    }

    // ---- tables ----------------------------------------------------------

    fn handle_table_row(&mut self, line: &Line) {
        if self.block != BlockKind::Table {
            self.close_block();
            self.block = BlockKind::Table;
            self.emit(Event::BeginTable);
        }
        self.emit(Event::BeginTableRow);

        let cells = split_cells(&line.items);
        let mut drafts: Vec<(bool, CellParams, &[(StreamToken, Range<usize>)])> = Vec::new();
        for (head, slice) in cells {
            if slice.is_empty() {
                // A fully-empty cell widens the previous one; leading
                // empties are skipped entirely.
                if let Some(last) = drafts.last_mut() {
                    last.1.colspan += 1;
                }
                continue;
            }
            let leading = pad_width(slice.first());
            let trailing = if slice.len() > 1 {
                pad_width(slice.last())
            } else {
                0
            };
            let content = trim_ws(slice);
            let alignment = if content.is_empty() {
                CellAlignment::None
            } else if leading >= ALIGN_PAD && trailing >= ALIGN_PAD {
                CellAlignment::Center
            } else if leading >= ALIGN_PAD {
                CellAlignment::Right
            } else {
                CellAlignment::None
            };
            drafts.push((
                head,
                CellParams {
                    alignment,
                    colspan: 1,
                },
                content,
            ));
        }

        for (head, params, content) in drafts {
            let begin = if head {
                Event::BeginTableHeadCell(params)
            } else {
                Event::BeginTableCell(params)
            };
            self.emit(begin);
            self.scan_inline(content, InlineCtx::Inner);
            for event in self.formats.close_all() {
                self.emit(event);
            }
            self.emit(if head {
                Event::EndTableHeadCell
            } else {
                Event::EndTableCell
            });
        }
        self.emit(Event::EndTableRow);
    }

    // ---- inline scanning -------------------------------------------------

    fn scan_inline(&mut self, items: &[(StreamToken, Range<usize>)], ctx: InlineCtx) {
        let mut i = 0;
        while i < items.len() {
            match &items[i].0 {
                StreamToken::Opaque(region) => {
                    // Whitespace right before a block construct would
                    // otherwise strand a Space at the paragraph's end.
                    if region.kind.is_block() {
                        self.trim_pending_text();
                    }
                    self.flush_text(ctx);
                    let region = region.clone();
                    self.emit_opaque(&region, ctx);
                }
                StreamToken::Raw(token) => match token.clone() {
                    Token::Text(text) | Token::UrlText(text) => self.text.push_str(&text),
                    Token::Whitespace(ws) => self.text.push_str(&ws),
                    Token::BoldToggle => self.toggle_format(FormatKind::Bold, ctx),
                    Token::ItalicToggle => self.toggle_format(FormatKind::Italic, ctx),
                    Token::UnderlineToggle => self.toggle_format(FormatKind::Underlined, ctx),
                    Token::MonospaceToggle => self.toggle_format(FormatKind::Monospace, ctx),
                    Token::SubscriptOpen => self.open_format(FormatKind::Subscript, "<sub>", ctx),
                    Token::SubscriptClose => {
                        self.close_format(FormatKind::Subscript, "</sub>", ctx)
                    }
                    Token::SuperscriptOpen => {
                        self.open_format(FormatKind::Superscript, "<sup>", ctx)
                    }
                    Token::SuperscriptClose => {
                        self.close_format(FormatKind::Superscript, "</sup>", ctx)
                    }
                    Token::StrikeoutOpen => self.open_format(FormatKind::Strikeout, "<del>", ctx),
                    Token::StrikeoutClose => {
                        self.close_format(FormatKind::Strikeout, "</del>", ctx)
                    }
                    Token::LinkOpen => {
                        if let Some(j) = find_raw(items, i + 1, |t| matches!(t, Token::LinkClose)) {
                            let inner = self.slice_between(&items[i].1, &items[j].1);
                            self.flush_text(ctx);
                            self.emit_link(&inner, ctx);
                            i = j + 1;
                            continue;
                        }
                        self.text.push_str("[[");
                    }
                    Token::BraceOpen => {
                        if let Some(j) = find_raw(items, i + 1, |t| matches!(t, Token::BraceClose))
                        {
                            let inner = self.slice_between(&items[i].1, &items[j].1);
                            let construct = parse_brace(&inner);
                            if matches!(construct, BraceConstruct::Macro { .. }) {
                                self.trim_pending_text();
                            }
                            self.flush_text(ctx);
                            self.emit_brace(construct, ctx);
                            i = j + 1;
                            continue;
                        }
                        self.text.push_str("{{");
                    }
                    Token::FootnoteOpen => {
                        if let Some(j) =
                            find_raw(items, i + 1, |t| matches!(t, Token::FootnoteClose))
                        {
                            let inner = self.slice_between(&items[i].1, &items[j].1);
                            self.flush_text(ctx);
                            self.emit_inline(
                                Event::Macro {
                                    id: "footnote".to_string(),
                                    params: Params::new(),
                                    content: inner.trim().to_string(),
                                    inline: true,
                                },
                                ctx,
                            );
                            i = j + 1;
                            continue;
                        }
                        self.text.push_str("((");
                    }
                    Token::LineBreak => {
                        let honored = match items.get(i + 1) {
                            None => true,
                            Some((StreamToken::Raw(Token::Whitespace(_)), _)) => true,
                            _ => false,
                        };
                        if honored {
                            self.flush_text(ctx);
                            self.emit_inline(Event::NewLine, ctx);
                            // The break swallows the whitespace after it.
                            if matches!(
                                items.get(i + 1),
                                Some((StreamToken::Raw(Token::Whitespace(_)), _))
                            ) {
                                i += 2;
                                continue;
                            }
                        } else {
                            self.text.push_str("\\\\");
                        }
                    }
                    // Markers with no inline meaning degrade to literal text.
                    Token::LinkClose => self.text.push_str("]]"),
                    Token::BraceClose => self.text.push_str("}}"),
                    Token::FootnoteClose => self.text.push_str("))"),
                    Token::Equals(n) => self.push_repeated('=', n),
                    Token::Dashes(n) => self.push_repeated('-', n),
                    Token::Quotes(n) => self.push_repeated('>', n),
                    Token::Pipe => self.text.push('|'),
                    Token::Caret => self.text.push('^'),
                    Token::SpecialChar(c) => self.text.push(c),
                    // Line grouping consumes every newline before inline
                    // scanning runs; kept only for match exhaustiveness.
                    Token::Newline => self.text.push(' '),
                    Token::CodeClose => self.text.push_str("</code>"),
                    Token::FileClose => self.text.push_str("</file>"),
                    Token::HtmlClose => self.text.push_str("</html>"),
                    Token::HtmlBlockClose => self.text.push_str("</HTML>"),
                    Token::PhpClose => self.text.push_str("</php>"),
                    Token::PhpBlockClose => self.text.push_str("</PHP>"),
                    // Openers are consumed by the opaque-region collapse and
                    // cannot reach the scanner; keep them literal anyway.
                    Token::CodeOpen(text) | Token::FileOpen(text) => self.text.push_str(&text),
                    Token::HtmlOpen => self.text.push_str("<html>"),
                    Token::HtmlBlockOpen => self.text.push_str("<HTML>"),
                    Token::PhpOpen => self.text.push_str("<php>"),
                    Token::PhpBlockOpen => self.text.push_str("<PHP>"),
                    Token::NowikiOpen => self.text.push_str("<nowiki>"),
                    Token::NowikiClose => self.text.push_str("</nowiki>"),
                    Token::NoFormatToggle => self.text.push_str("%%"),
                },
            }
            i += 1;
        }
        self.flush_text(ctx);
    }

    fn push_repeated(&mut self, c: char, n: usize) {
        for _ in 0..n {
            self.text.push(c);
        }
    }

    fn flush_text(&mut self, ctx: InlineCtx) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        for event in leaf_events(&text, true) {
            self.emit_inline(event, ctx);
        }
    }

    fn toggle_format(&mut self, kind: FormatKind, ctx: InlineCtx) {
        self.flush_text(ctx);
        for event in self.formats.toggle(kind) {
            self.emit_inline(event, ctx);
        }
    }

    fn open_format(&mut self, kind: FormatKind, literal: &str, ctx: InlineCtx) {
        // A redundant open carries no meaning and stays literal text, so
        // it must not split the surrounding word at a flush boundary.
        if self.formats.is_open(kind) {
            self.text.push_str(literal);
            return;
        }
        self.flush_text(ctx);
        if let Some(event) = self.formats.begin_if_absent(kind) {
            self.emit_inline(event, ctx);
        }
    }

    fn close_format(&mut self, kind: FormatKind, literal: &str, ctx: InlineCtx) {
        if !self.formats.is_open(kind) {
            self.text.push_str(literal);
            return;
        }
        self.flush_text(ctx);
        for event in self.formats.end_if_present(kind) {
            self.emit_inline(event, ctx);
        }
    }

    fn emit_opaque(&mut self, region: &OpaqueRegion, ctx: InlineCtx) {
        match region.kind {
            OpaqueKind::Code | OpaqueKind::File => {
                self.leave_paragraph(ctx);
                let mut params = Params::new();
                if let Some(language) = &region.language {
                    params.insert("language".to_string(), language.clone());
                }
                let id = if region.kind == OpaqueKind::Code {
                    "code"
                } else {
                    "file"
                };
                self.emit(Event::Macro {
                    id: id.to_string(),
                    params,
                    content: region.content.clone(),
                    inline: false,
                });
            }
            OpaqueKind::HtmlBlock | OpaqueKind::PhpBlock => {
                self.leave_paragraph(ctx);
                let id = if region.kind == OpaqueKind::HtmlBlock {
                    "html"
                } else {
                    "php"
                };
                self.emit(Event::Macro {
                    id: id.to_string(),
                    params: Params::new(),
                    content: region.content.clone(),
                    inline: false,
                });
            }
            OpaqueKind::HtmlInline | OpaqueKind::PhpInline => {
                let id = if region.kind == OpaqueKind::HtmlInline {
                    "html"
                } else {
                    "php"
                };
                self.emit_inline(
                    Event::Macro {
                        id: id.to_string(),
                        params: Params::new(),
                        content: region.content.clone(),
                        inline: true,
                    },
                    ctx,
                );
            }
            OpaqueKind::NoFormat => {
                self.emit_inline(
                    Event::Verbatim {
                        text: region.content.clone(),
                        inline: true,
                    },
                    ctx,
                );
            }
        }
    }

    /// Block-level constructs appearing in paragraph flow close the
    /// paragraph first; inside containers they are emitted in place.
    fn leave_paragraph(&mut self, ctx: InlineCtx) {
        if ctx == InlineCtx::Block && self.block == BlockKind::Paragraph {
            self.close_block();
        }
        self.pending_soft_break = false;
    }

    fn emit_link(&mut self, inner: &str, ctx: InlineCtx) {
        let spec = parse_link(inner);
        self.emit_inline(
            Event::BeginLink {
                reference: spec.reference,
                freestanding: false,
                params: Params::new(),
            },
            ctx,
        );
        match spec.label {
            LinkLabel::None => {}
            LinkLabel::Text(text) => {
                for event in leaf_events(&text, false) {
                    self.emit(event);
                }
            }
            LinkLabel::Image(image_inner) => match parse_brace(&image_inner) {
                BraceConstruct::Image(image) => self.emit(Event::Image {
                    reference: image.reference,
                    params: image.params,
                }),
                BraceConstruct::Macro { id, params } => self.emit(Event::Macro {
                    id,
                    params,
                    content: String::new(),
                    inline: true,
                }),
            },
        }
        self.emit(Event::EndLink);
    }

    fn trim_pending_text(&mut self) {
        let trimmed = self.text.trim_end().len();
        self.text.truncate(trimmed);
    }

    fn emit_brace(&mut self, construct: BraceConstruct, ctx: InlineCtx) {
        match construct {
            BraceConstruct::Macro { id, params } => {
                self.leave_paragraph(ctx);
                self.emit(Event::Macro {
                    id,
                    params,
                    content: String::new(),
                    inline: false,
                });
            }
            BraceConstruct::Image(image) => match image.link {
                LinkMode::None => self.emit_inline(
                    Event::Image {
                        reference: image.reference,
                        params: image.params,
                    },
                    ctx,
                ),
                LinkMode::Direct => {
                    self.emit_inline(
                        Event::BeginLink {
                            reference: image.reference.clone(),
                            freestanding: false,
                            params: Params::new(),
                        },
                        ctx,
                    );
                    self.emit(Event::Image {
                        reference: image.reference,
                        params: image.params,
                    });
                    self.emit(Event::EndLink);
                }
                LinkMode::LinkOnly => {
                    self.emit_inline(
                        Event::BeginLink {
                            reference: image.reference,
                            freestanding: false,
                            params: image.params,
                        },
                        ctx,
                    );
                    if let Some(caption) = image.caption {
                        for event in leaf_events(&caption, false) {
                            self.emit(event);
                        }
                    }
                    self.emit(Event::EndLink);
                }
            },
        }
    }

    fn slice_between(&self, open: &Range<usize>, close: &Range<usize>) -> String {
        if open.end <= close.start && close.start <= self.source.len() {
            self.source[open.end..close.start].to_string()
        } else {
            String::new()
        }
    }

    fn title_source(&self, title: &[(StreamToken, Range<usize>)]) -> &str {
        let start = title.first().map(|(_, span)| span.start);
        let end = title.last().map(|(_, span)| span.end);
        match (start, end) {
            (Some(start), Some(end)) if start <= end && end <= self.source.len() => {
                &self.source[start..end]
            }
            _ => "",
        }
    }
}

// ---- line helpers --------------------------------------------------------

fn is_ws(token: &StreamToken) -> bool {
    matches!(token, StreamToken::Raw(Token::Whitespace(_)))
}

/// Strip leading and trailing whitespace tokens off a slice.
fn trim_ws(items: &[(StreamToken, Range<usize>)]) -> &[(StreamToken, Range<usize>)] {
    let start = items
        .iter()
        .position(|(token, _)| !is_ws(token))
        .unwrap_or(items.len());
    let end = items
        .iter()
        .rposition(|(token, _)| !is_ws(token))
        .map_or(start, |p| p + 1);
    &items[start.min(end)..end]
}

fn find_raw(
    items: &[(StreamToken, Range<usize>)],
    from: usize,
    predicate: impl Fn(&Token) -> bool,
) -> Option<usize> {
    items[from.min(items.len())..]
        .iter()
        .position(|(token, _)| match token {
            StreamToken::Raw(raw) => predicate(raw),
            StreamToken::Opaque(_) => false,
        })
        .map(|offset| from + offset)
}

/// Title tokens of a heading line: everything strictly between the leading
/// and the trailing marker run.
fn heading_title(items: &[(StreamToken, Range<usize>)]) -> &[(StreamToken, Range<usize>)] {
    let first = match items
        .iter()
        .position(|(token, _)| matches!(token, StreamToken::Raw(Token::Equals(_))))
    {
        Some(index) => index,
        None => return &[],
    };
    let last = items
        .iter()
        .rposition(|(token, _)| !is_ws(token))
        .unwrap_or(first);
    if last <= first || !matches!(items[last].0, StreamToken::Raw(Token::Equals(_))) {
        return &[];
    }
    trim_ws(&items[first + 1..last])
}

/// Split a table-row line into `(is_head_cell, tokens)` segments. Cell
/// separators inside links, media and footnotes are skipped; a trailing
/// separator terminates the row without opening a cell.
fn split_cells(
    items: &[(StreamToken, Range<usize>)],
) -> Vec<(bool, &[(StreamToken, Range<usize>)])> {
    let mut cells = Vec::new();
    let first_sep = match items.iter().position(|(token, _)| {
        matches!(token, StreamToken::Raw(Token::Pipe) | StreamToken::Raw(Token::Caret))
    }) {
        Some(index) => index,
        None => return cells,
    };
    let mut head = matches!(items[first_sep].0, StreamToken::Raw(Token::Caret));
    let mut start = first_sep + 1;
    let mut j = start;
    while j < items.len() {
        match &items[j].0 {
            StreamToken::Raw(Token::Pipe) | StreamToken::Raw(Token::Caret) => {
                cells.push((head, &items[start..j]));
                head = matches!(items[j].0, StreamToken::Raw(Token::Caret));
                start = j + 1;
            }
            StreamToken::Raw(Token::LinkOpen) => {
                if let Some(close) = find_raw(items, j + 1, |t| matches!(t, Token::LinkClose)) {
                    j = close;
                }
            }
            StreamToken::Raw(Token::BraceOpen) => {
                if let Some(close) = find_raw(items, j + 1, |t| matches!(t, Token::BraceClose)) {
                    j = close;
                }
            }
            StreamToken::Raw(Token::FootnoteOpen) => {
                if let Some(close) = find_raw(items, j + 1, |t| matches!(t, Token::FootnoteClose)) {
                    j = close;
                }
            }
            _ => {}
        }
        j += 1;
    }
    // Content after the last separator is a best-effort cell on rows that
    // were never terminated.
    let tail = &items[start.min(items.len())..];
    if tail.iter().any(|(token, _)| !is_ws(token)) {
        cells.push((head, tail));
    }
    cells
}

/// Width of a whitespace padding token, zero for anything else.
fn pad_width(item: Option<&(StreamToken, Range<usize>)>) -> usize {
    match item {
        Some((StreamToken::Raw(Token::Whitespace(ws)), _)) => {
            ws.chars().filter(|&c| c == ' ' || c == '\t').count()
        }
        _ => 0,
    }
}

/// Heading id: lowercased title with non-alphanumeric runs collapsed to a
/// single underscore.
fn slug(title: &str) -> String {
    let mut id = String::with_capacity(title.len());
    let mut last_was_sep = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                id.push(lower);
            }
            last_was_sep = false;
        } else if !last_was_sep {
            id.push('_');
            last_was_sep = true;
        }
    }
    while id.ends_with('_') {
        id.pop();
    }
    id
}

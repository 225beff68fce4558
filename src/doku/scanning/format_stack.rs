//! Inline formatting stack
//!
//! Tracks the currently open inline format spans and produces the event
//! sequences for opening and closing them. Closing a format that is not on
//! top first closes everything above it and reopens it afterwards, so the
//! emitted stream stays well nested even when the writer's markup overlaps
//! (bold opened, italic opened, bold closed first).

use crate::doku::event::{Event, FormatKind};

#[derive(Debug, Default)]
pub struct FormatStack {
    open: Vec<FormatKind>,
}

impl FormatStack {
    pub fn new() -> Self {
        FormatStack::default()
    }

    pub fn is_open(&self, kind: FormatKind) -> bool {
        self.open.contains(&kind)
    }

    /// Toggle a toggled-delimiter format: open it if absent, close it if
    /// present. The returned events must be emitted in order.
    pub fn toggle(&mut self, kind: FormatKind) -> Vec<Event> {
        if self.is_open(kind) {
            self.close(kind)
        } else {
            self.open.push(kind);
            vec![Event::BeginFormat(kind)]
        }
    }

    /// Open a paired-tag format unless it is already open. `None` means the
    /// marker does not apply and should fall through as literal text.
    pub fn begin_if_absent(&mut self, kind: FormatKind) -> Option<Event> {
        if self.is_open(kind) {
            return None;
        }
        self.open.push(kind);
        Some(Event::BeginFormat(kind))
    }

    /// Close a paired-tag format if it is open. An empty result means the
    /// marker does not apply and should fall through as literal text.
    pub fn end_if_present(&mut self, kind: FormatKind) -> Vec<Event> {
        if !self.is_open(kind) {
            return Vec::new();
        }
        self.close(kind)
    }

    /// Close every open format, top of stack first, with no reopening.
    /// Used when the enclosing block closes.
    pub fn close_all(&mut self) -> Vec<Event> {
        self.open
            .drain(..)
            .rev()
            .map(Event::EndFormat)
            .collect()
    }

    /// Close `kind`, temporarily closing and reopening anything opened
    /// after it.
    fn close(&mut self, kind: FormatKind) -> Vec<Event> {
        let position = match self.open.iter().position(|&open| open == kind) {
            Some(position) => position,
            None => return Vec::new(),
        };
        let above: Vec<FormatKind> = self.open.split_off(position + 1);
        self.open.pop();

        let mut events = Vec::with_capacity(above.len() * 2 + 1);
        for &inner in above.iter().rev() {
            events.push(Event::EndFormat(inner));
        }
        events.push(Event::EndFormat(kind));
        for &inner in &above {
            events.push(Event::BeginFormat(inner));
            self.open.push(inner);
        }
        events
    }
}

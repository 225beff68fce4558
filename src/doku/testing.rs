//! Testing utilities for event-stream assertions
//!
//! Scanner tests assert on exact event sequences: generalities like event
//! counts tell you nothing when nesting goes wrong. Two helpers keep those
//! assertions short:
//!
//! - [body] scans a source and strips the `BeginDocument`/`EndDocument`
//!   wrapper, so tests only spell out the interesting middle,
//! - [tags] renders events in the compact one-line tag notation, which
//!   makes failure diffs readable for long sequences.
//!
//! [assert_well_nested] checks the structural invariant every stream must
//! satisfy regardless of input; the property tests lean on it.

use crate::doku::event::Event;
use crate::doku::scanning::scan_to_events;

/// Scan `source` and return the events strictly between `BeginDocument`
/// and `EndDocument`.
///
/// Panics when the document wrapper itself is missing, which would be a
/// scanner bug worth failing loudly on.
pub fn body(source: &str) -> Vec<Event> {
    let mut events = scan_to_events(source);
    assert_eq!(events.first(), Some(&Event::BeginDocument), "missing BeginDocument");
    assert_eq!(events.last(), Some(&Event::EndDocument), "missing EndDocument");
    events.pop();
    events.remove(0);
    events
}

/// Compact tag rendition of an event sequence, one tag per element.
pub fn tags(events: &[Event]) -> Vec<String> {
    events.iter().map(|event| event.tag()).collect()
}

/// Assert that every `Begin*` event is closed by the matching `End*` event
/// in LIFO order and that nothing stays open at the end.
pub fn assert_well_nested(events: &[Event]) {
    let mut stack: Vec<&'static str> = Vec::new();
    for event in events {
        let tag = event.tag();
        if let Some(name) = opener(event) {
            stack.push(name);
        } else if let Some(name) = closer(event) {
            match stack.pop() {
                Some(open) if open == name => {}
                Some(open) => panic!("{tag} closes {name} but {open} is open"),
                None => panic!("{tag} with nothing open"),
            }
        }
    }
    assert!(stack.is_empty(), "unclosed at end of stream: {stack:?}");
}

fn opener(event: &Event) -> Option<&'static str> {
    Some(match event {
        Event::BeginDocument => "document",
        Event::BeginSection => "section",
        Event::BeginHeading { .. } => "heading",
        Event::BeginParagraph => "paragraph",
        Event::BeginList(_) => "list",
        Event::BeginListItem => "item",
        Event::BeginQuotation => "quotation",
        Event::BeginQuotationLine => "quotation-line",
        Event::BeginTable => "table",
        Event::BeginTableRow => "row",
        Event::BeginTableCell(_) => "cell",
        Event::BeginTableHeadCell(_) => "head-cell",
        Event::BeginFormat(_) => "format",
        Event::BeginLink { .. } => "link",
        _ => return None,
    })
}

fn closer(event: &Event) -> Option<&'static str> {
    Some(match event {
        Event::EndDocument => "document",
        Event::EndSection => "section",
        Event::EndHeading => "heading",
        Event::EndParagraph => "paragraph",
        Event::EndList(_) => "list",
        Event::EndListItem => "item",
        Event::EndQuotation => "quotation",
        Event::EndQuotationLine => "quotation-line",
        Event::EndTable => "table",
        Event::EndTableRow => "row",
        Event::EndTableCell => "cell",
        Event::EndTableHeadCell => "head-cell",
        Event::EndFormat(_) => "format",
        Event::EndLink => "link",
        _ => return None,
    })
}

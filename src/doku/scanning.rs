//! Semantic scanning
//!
//! Turns classified lines into the semantic event stream. The submodules
//! split the work the same way the stream splits it:
//!
//! - [scanner] owns the block state machine and drives the whole parse,
//! - [format_stack] tracks open inline formats and repairs overlap,
//! - [leaf_emitter] breaks plain text into word, space and symbol events
//!   and recognizes freestanding links,
//! - [constructs] parses the interior of `[[...]]` and `{{...}}`.
//!
//! The entry points never fail: any input string produces a well-nested
//! stream between `BeginDocument` and `EndDocument`.

pub mod constructs;
pub mod format_stack;
pub mod leaf_emitter;
pub mod scanner;

use crate::doku::event::Event;
use crate::doku::lexing::lex;
use crate::doku::sink::{EventCollector, EventSink};

pub use scanner::Scanner;

/// Scan wiki source and push every event into `sink`.
pub fn scan<S: EventSink>(source: &str, sink: &mut S) {
    let lines = lex(source);
    Scanner::new(source, sink).run(&lines);
}

/// Scan wiki source and collect the events into a vector.
pub fn scan_to_events(source: &str) -> Vec<Event> {
    let mut collector = EventCollector::new();
    scan(source, &mut collector);
    collector.into_events()
}

//! DokuWiki markup scanner
//!
//! Event-based scanning of DokuWiki markup, SAX style: the scanner walks
//! the source once and reports structure as a flat stream of [Event]
//! values instead of building a tree. The pipeline runs in two stages:
//!
//! 1. [lexing] — tokenize with logos, collapse opaque regions, group into
//!    lines and classify each line by its block role,
//! 2. [scanning] — the block state machine that turns classified lines
//!    into the well-nested event stream.
//!
//! [event] defines the stream vocabulary, [reference] the link-target
//! model, [sink] the consumer trait, and [testing] the assertion helpers
//! the test suite is built on.

pub mod event;
pub mod lexing;
pub mod reference;
pub mod scanning;
pub mod sink;
pub mod testing;

pub use event::Event;
pub use reference::{ReferenceKind, ResourceReference};
pub use scanning::{scan, scan_to_events};
pub use sink::{EventCollector, EventSink};

//! # dokuscan
//!
//! An event-based scanner for DokuWiki markup.
//!
//! ## Testing
//!
//! Scanner tests assert exact event sequences; see the
//! [testing module](doku::testing) for the helpers the suite is built on.

pub mod doku;

pub use doku::{scan, scan_to_events, Event, EventCollector, EventSink};

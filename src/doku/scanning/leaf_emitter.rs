//! Leaf emitter
//!
//! Splits accumulated plain text into word, space and special-symbol leaf
//! events. Words are split on whitespace only; punctuation stays inside a
//! word unless the word is exactly one character from the special-symbol
//! set. A word with URL or email shape is promoted to a freestanding link:
//! a `BeginLink`/`EndLink` pair with no inner events, the raw word serving
//! as both target and label for consumers.

use crate::doku::event::{Event, Params};
use crate::doku::reference::{looks_like_email, looks_like_url, ResourceReference};

/// Single-character tokens reported as `SpecialSymbol` instead of `Word`.
const SPECIAL_SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_{|}~";

/// Split a text run into leaf events. `autolink` disables URL promotion,
/// used inside explicit link labels.
pub fn leaf_events(text: &str, autolink: bool) -> Vec<Event> {
    let mut events = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            flush_word(&mut word, autolink, &mut events);
            // Whitespace runs collapse; the scanner additionally suppresses
            // adjacent Space events across flush boundaries.
            if !matches!(events.last(), Some(Event::Space)) {
                events.push(Event::Space);
            }
        } else {
            word.push(c);
        }
    }
    flush_word(&mut word, autolink, &mut events);

    events
}

fn flush_word(word: &mut String, autolink: bool, events: &mut Vec<Event>) {
    if word.is_empty() {
        return;
    }
    let text = std::mem::take(word);

    // A one-character special symbol wins over URL detection.
    let mut chars = text.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if SPECIAL_SYMBOLS.contains(c) {
            events.push(Event::SpecialSymbol(c));
            return;
        }
    }

    if autolink && (looks_like_url(&text) || looks_like_email(&text)) {
        events.push(Event::BeginLink {
            reference: ResourceReference::freestanding(&text),
            freestanding: true,
            params: Params::new(),
        });
        events.push(Event::EndLink);
        return;
    }

    events.push(Event::Word(text));
}

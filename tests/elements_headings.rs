//! Tests for headings and the implied section tree
//!
//! Marker-run length maps inversely to heading level; sections open and
//! close around headings so that the stream always nests level N inside
//! level N-1.

use dokuscan::doku::event::{Event, FormatKind};
use dokuscan::doku::testing::body;

fn word(text: &str) -> Event {
    Event::Word(text.to_string())
}

fn begin_heading(level: usize, id: &str) -> Event {
    Event::BeginHeading {
        level,
        id: id.to_string(),
    }
}

#[test]
fn top_level_heading_with_paragraph() {
    assert_eq!(
        body("====== Top ======\ntext"),
        vec![
            Event::BeginSection,
            begin_heading(1, "top"),
            word("Top"),
            Event::EndHeading,
            Event::BeginParagraph,
            word("text"),
            Event::EndParagraph,
            Event::EndSection,
        ]
    );
}

#[test]
fn marker_run_length_maps_inversely_to_level() {
    for (source, level) in [
        ("====== T ======", 1),
        ("===== T =====", 2),
        ("==== T ====", 3),
        ("=== T ===", 4),
        ("== T ==", 5),
        ("= T =", 6),
    ] {
        let events = body(source);
        assert!(
            events.contains(&begin_heading(level, "t")),
            "source {source:?} should produce a level {level} heading, got {events:?}"
        );
    }
}

#[test]
fn overlong_marker_run_clamps_to_level_one() {
    let events = body("======== T ========");
    assert!(events.contains(&begin_heading(1, "t")), "got {events:?}");
}

#[test]
fn deep_first_heading_fabricates_enclosing_sections() {
    assert_eq!(
        body("== Deep =="),
        vec![
            Event::BeginSection,
            Event::BeginSection,
            Event::BeginSection,
            Event::BeginSection,
            Event::BeginSection,
            begin_heading(5, "deep"),
            word("Deep"),
            Event::EndHeading,
            Event::EndSection,
            Event::EndSection,
            Event::EndSection,
            Event::EndSection,
            Event::EndSection,
        ]
    );
}

#[test]
fn sibling_heading_closes_and_reopens_its_section() {
    assert_eq!(
        body("====== A ======\n====== B ======"),
        vec![
            Event::BeginSection,
            begin_heading(1, "a"),
            word("A"),
            Event::EndHeading,
            Event::EndSection,
            Event::BeginSection,
            begin_heading(1, "b"),
            word("B"),
            Event::EndHeading,
            Event::EndSection,
        ]
    );
}

#[test]
fn returning_to_a_higher_level_closes_nested_sections() {
    assert_eq!(
        body("====== A ======\n===== B =====\n====== C ======"),
        vec![
            Event::BeginSection,
            begin_heading(1, "a"),
            word("A"),
            Event::EndHeading,
            Event::BeginSection,
            begin_heading(2, "b"),
            word("B"),
            Event::EndHeading,
            Event::EndSection,
            Event::EndSection,
            Event::BeginSection,
            begin_heading(1, "c"),
            word("C"),
            Event::EndHeading,
            Event::EndSection,
        ]
    );
}

#[test]
fn empty_heading_is_skipped() {
    assert_eq!(body("====  ===="), vec![]);
}

#[test]
fn heading_closes_an_open_paragraph() {
    assert_eq!(
        body("text\n====== H ======"),
        vec![
            Event::BeginParagraph,
            word("text"),
            Event::EndParagraph,
            Event::BeginSection,
            begin_heading(1, "h"),
            word("H"),
            Event::EndHeading,
            Event::EndSection,
        ]
    );
}

#[test]
fn heading_title_is_scanned_for_inline_markup() {
    assert_eq!(
        body("====== **Bold** Title ======"),
        vec![
            Event::BeginSection,
            begin_heading(1, "bold_title"),
            Event::BeginFormat(FormatKind::Bold),
            word("Bold"),
            Event::EndFormat(FormatKind::Bold),
            Event::Space,
            word("Title"),
            Event::EndHeading,
            Event::EndSection,
        ]
    );
}

#[test]
fn unterminated_format_in_title_closes_before_end_heading() {
    assert_eq!(
        body("====== **A ======"),
        vec![
            Event::BeginSection,
            begin_heading(1, "a"),
            Event::BeginFormat(FormatKind::Bold),
            word("A"),
            Event::EndFormat(FormatKind::Bold),
            Event::EndHeading,
            Event::EndSection,
        ]
    );
}

#[test]
fn horizontal_rule_between_paragraphs() {
    assert_eq!(
        body("a\n----\nb"),
        vec![
            Event::BeginParagraph,
            word("a"),
            Event::EndParagraph,
            Event::HorizontalLine,
            Event::BeginParagraph,
            word("b"),
            Event::EndParagraph,
        ]
    );
}

#[test]
fn short_dash_run_is_paragraph_text() {
    assert_eq!(
        body("---"),
        vec![
            Event::BeginParagraph,
            word("---"),
            Event::EndParagraph,
        ]
    );
}

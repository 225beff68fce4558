//! Tests for bulleted and numbered lists
//!
//! List structure is driven entirely by indentation depth and the marker
//! character; redents clamp to the nearest enclosing level instead of
//! fabricating intermediate ones.

use dokuscan::doku::event::{Event, ListKind};
use dokuscan::doku::testing::body;

fn word(text: &str) -> Event {
    Event::Word(text.to_string())
}

#[test]
fn single_bulleted_item() {
    assert_eq!(
        body("  * one"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("one"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

#[test]
fn single_numbered_item() {
    assert_eq!(
        body("  - one"),
        vec![
            Event::BeginList(ListKind::Numbered),
            Event::BeginListItem,
            word("one"),
            Event::EndListItem,
            Event::EndList(ListKind::Numbered),
        ]
    );
}

#[test]
fn sibling_items_share_one_list() {
    assert_eq!(
        body("  * one\n  * two"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("one"),
            Event::EndListItem,
            Event::BeginListItem,
            word("two"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

#[test]
fn nested_list_opens_inside_the_outer_item() {
    assert_eq!(
        body("  * one\n    * nested\n  * two"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("one"),
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("nested"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
            Event::EndListItem,
            Event::BeginListItem,
            word("two"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

#[test]
fn kind_change_at_the_same_depth_reopens_the_list() {
    assert_eq!(
        body("  * one\n  - two"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("one"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
            Event::BeginList(ListKind::Numbered),
            Event::BeginListItem,
            word("two"),
            Event::EndListItem,
            Event::EndList(ListKind::Numbered),
        ]
    );
}

#[test]
fn dedent_to_an_unknown_depth_clamps_to_the_enclosing_level() {
    // The document never opened a depth-2 level; the dedent from depth 3
    // lands on the depth-1 list.
    assert_eq!(
        body("  * a\n      * deep\n    * mid"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("a"),
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("deep"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
            Event::EndListItem,
            Event::BeginListItem,
            word("mid"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

#[test]
fn first_item_deeper_than_one_still_opens_a_single_list() {
    assert_eq!(
        body("      * deep"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("deep"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

#[test]
fn blank_line_terminates_the_list() {
    assert_eq!(
        body("  * one\n\ntext"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("one"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
            Event::BeginParagraph,
            word("text"),
            Event::EndParagraph,
        ]
    );
}

#[test]
fn unterminated_nesting_closes_innermost_first() {
    assert_eq!(
        body("  * a\n    * b"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("a"),
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            word("b"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

#[test]
fn item_content_is_scanned_inline() {
    use dokuscan::doku::event::FormatKind;
    assert_eq!(
        body("  * **bold** word"),
        vec![
            Event::BeginList(ListKind::Bulleted),
            Event::BeginListItem,
            Event::BeginFormat(FormatKind::Bold),
            word("bold"),
            Event::EndFormat(FormatKind::Bold),
            Event::Space,
            word("word"),
            Event::EndListItem,
            Event::EndList(ListKind::Bulleted),
        ]
    );
}

//! Structured-construct parsers
//!
//! Bounded sub-grammars inside delimited constructs: links `[[...]]`, media
//! `{{...}}` (images and the RSS-style macro). Each parser receives the raw
//! text between the delimiters and returns a description the scanner turns
//! into events; none of them consult scanner state.

use crate::doku::event::Params;
use crate::doku::reference::ResourceReference;

/// Number of feed items an RSS macro shows when no count is given.
pub const DEFAULT_FEED_ITEMS: usize = 8;

/// The label part of an explicit link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkLabel {
    /// No label: the consumer derives one from the reference.
    None,
    /// Plain text, scanned by the leaf emitter.
    Text(String),
    /// An image used as the label; carries the text between `{{` and `}}`.
    Image(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    pub reference: ResourceReference,
    pub label: LinkLabel,
}

/// Parse the text between `[[` and `]]`.
pub fn parse_link(inner: &str) -> LinkSpec {
    let (target, label) = match split_unescaped(inner, '|') {
        Some((target, label)) => (target, Some(label)),
        None => (inner, None),
    };
    let reference = ResourceReference::parse(target);
    let label = match label {
        None => LinkLabel::None,
        Some(text) => {
            let trimmed = text.trim();
            match trimmed
                .strip_prefix("{{")
                .and_then(|rest| rest.strip_suffix("}}"))
            {
                Some(image) => LinkLabel::Image(image.to_string()),
                None if trimmed.is_empty() => LinkLabel::None,
                None => LinkLabel::Text(text.to_string()),
            }
        }
    };
    LinkSpec { reference, label }
}

/// How an image interacts with link generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Image only, no link.
    None,
    /// Link to the media target, image as content.
    Direct,
    /// Link only; the image itself is suppressed.
    LinkOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    pub reference: ResourceReference,
    pub params: Params,
    pub link: LinkMode,
    pub caption: Option<String>,
}

/// What a `{{...}}` construct turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum BraceConstruct {
    Image(ImageSpec),
    /// RSS-style macro: id "rss", feed and flags in the params.
    Macro { id: String, params: Params },
}

/// Parse the text between `{{` and `}}`.
pub fn parse_brace(inner: &str) -> BraceConstruct {
    if let Some(rest) = inner.trim().strip_prefix("rss>") {
        return BraceConstruct::Macro {
            id: "rss".to_string(),
            params: rss_params(rest),
        };
    }
    BraceConstruct::Image(image_spec(inner))
}

/// `rss>feed flag flag ...`: the first token is the feed, the rest are
/// flags. A numeric flag overrides the item count; unrecognized flags pass
/// through unchanged.
fn rss_params(rest: &str) -> Params {
    let mut params = Params::new();
    params.insert("count".to_string(), DEFAULT_FEED_ITEMS.to_string());

    let mut words = rest.split_whitespace();
    if let Some(feed) = words.next() {
        params.insert("feed".to_string(), feed.to_string());
    }
    for flag in words {
        if flag.chars().all(|c| c.is_ascii_digit()) {
            params.insert("count".to_string(), flag.to_string());
        } else if flag == "description" {
            params.insert("description".to_string(), "true".to_string());
        } else if let Some((key, value)) = flag.split_once('=') {
            params.insert(key.to_string(), value.to_string());
        } else {
            params.insert(flag.to_string(), String::new());
        }
    }
    params
}

fn image_spec(inner: &str) -> ImageSpec {
    let (name_part, caption) = match split_unescaped(inner, '|') {
        Some((name, caption)) => (name, Some(caption.trim().to_string())),
        None => (inner, None),
    };
    let caption = caption.filter(|text| !text.is_empty());

    let mut params = Params::new();
    // Padding around the media name encodes the alignment.
    let leading = name_part.starts_with(' ');
    let trailing = name_part.ends_with(' ') && name_part.trim() != name_part.trim_start();
    match (leading, trailing) {
        (true, true) => {
            params.insert("alignment".to_string(), "center".to_string());
        }
        (true, false) => {
            params.insert("alignment".to_string(), "left".to_string());
        }
        (false, true) => {
            params.insert("alignment".to_string(), "right".to_string());
        }
        (false, false) => {}
    }

    let name_part = name_part.trim();
    let (name, modifiers) = match name_part.split_once('?') {
        Some((name, modifiers)) => (name, Some(modifiers)),
        None => (name_part, None),
    };

    let mut link = LinkMode::None;
    let mut anchor = None;
    if let Some(modifiers) = modifiers {
        // An anchor rides on the tail of the modifier list, after the size:
        // `name?50#top`. It belongs to the reference, not the modifiers.
        let modifiers = match modifiers.split_once('#') {
            Some((rest, fragment)) => {
                if !fragment.is_empty() {
                    anchor = Some(fragment.to_string());
                }
                rest
            }
            None => modifiers,
        };
        for modifier in modifiers.split('&') {
            apply_modifier(modifier, &mut params, &mut link);
        }
    }

    if let Some(text) = &caption {
        params.insert("caption".to_string(), text.clone());
    }

    let mut reference = ResourceReference::parse(name);
    if reference.anchor.is_none() {
        reference.anchor = anchor;
    }

    ImageSpec {
        reference,
        params,
        link,
        caption,
    }
}

fn apply_modifier(modifier: &str, params: &mut Params, link: &mut LinkMode) {
    let modifier = modifier.trim();
    if modifier.is_empty() {
        return;
    }
    if let Some((width, height)) = modifier.split_once('x') {
        if is_numeric(width) && is_numeric(height) {
            params.insert("width".to_string(), width.to_string());
            params.insert("height".to_string(), height.to_string());
            return;
        }
    }
    if is_numeric(modifier) {
        params.insert("width".to_string(), modifier.to_string());
        return;
    }
    match modifier {
        "direct" => *link = LinkMode::Direct,
        "linkonly" => *link = LinkMode::LinkOnly,
        "nolink" => *link = LinkMode::None,
        other => {
            // Unrecognized modifiers pass through, never dropped.
            if let Some((key, value)) = other.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                params.insert(other.to_string(), String::new());
            }
        }
    }
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Split on the first occurrence of `separator` not preceded by a
/// backslash.
fn split_unescaped(text: &str, separator: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == separator {
            return Some((&text[..index], &text[index + c.len_utf8()..]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doku::reference::ReferenceKind;

    #[test]
    fn link_without_label() {
        let link = parse_link("syntax");
        assert_eq!(link.reference.target, "syntax");
        assert!(!link.reference.typed);
        assert_eq!(link.label, LinkLabel::None);
    }

    #[test]
    fn link_with_text_label() {
        let link = parse_link("syntax|the manual");
        assert_eq!(link.label, LinkLabel::Text("the manual".into()));
    }

    #[test]
    fn link_with_image_label() {
        let link = parse_link("syntax|{{button.png}}");
        assert_eq!(link.label, LinkLabel::Image("button.png".into()));
    }

    #[test]
    fn link_with_escaped_pipe_in_target() {
        let link = parse_link("a\\|b|label");
        assert_eq!(link.reference.target, "a\\|b");
        assert_eq!(link.label, LinkLabel::Text("label".into()));
    }

    #[test]
    fn interwiki_link() {
        let link = parse_link("wp>Wiki|article");
        assert_eq!(link.reference.kind, ReferenceKind::InterWiki("wp".into()));
    }

    #[test]
    fn plain_image() {
        let spec = match parse_brace("image.png") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.reference.target, "image.png");
        assert_eq!(spec.link, LinkMode::None);
        assert!(spec.params.is_empty());
    }

    #[test]
    fn image_alignment_from_padding() {
        let aligned = |inner: &str| match parse_brace(inner) {
            BraceConstruct::Image(spec) => spec.params.get("alignment").cloned(),
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(aligned(" image.png"), Some("left".into()));
        assert_eq!(aligned("image.png "), Some("right".into()));
        assert_eq!(aligned(" image.png "), Some("center".into()));
        assert_eq!(aligned("image.png"), None);
    }

    #[test]
    fn image_size_modifiers() {
        let spec = match parse_brace("image.png?200x100") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.params.get("width").map(String::as_str), Some("200"));
        assert_eq!(spec.params.get("height").map(String::as_str), Some("100"));

        let spec = match parse_brace("image.png?50") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.params.get("width").map(String::as_str), Some("50"));
        assert_eq!(spec.params.get("height"), None);
    }

    #[test]
    fn image_size_with_anchor() {
        let spec = match parse_brace("image.png?50#top") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.reference.target, "image.png");
        assert_eq!(spec.reference.anchor.as_deref(), Some("top"));
        assert_eq!(spec.params.get("width").map(String::as_str), Some("50"));
        assert_eq!(spec.params.get("50#top"), None);

        // Anchor on the name itself still comes from the reference parse.
        let spec = match parse_brace("image.png#top") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.reference.anchor.as_deref(), Some("top"));
    }

    #[test]
    fn image_link_modifiers() {
        let mode = |inner: &str| match parse_brace(inner) {
            BraceConstruct::Image(spec) => spec.link,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(mode("a.png?direct"), LinkMode::Direct);
        assert_eq!(mode("a.png?linkonly"), LinkMode::LinkOnly);
        assert_eq!(mode("a.png?nolink"), LinkMode::None);
        assert_eq!(mode("a.png?200&direct"), LinkMode::Direct);
    }

    #[test]
    fn image_caption() {
        let spec = match parse_brace("image.png|A caption") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.caption.as_deref(), Some("A caption"));
        assert_eq!(
            spec.params.get("caption").map(String::as_str),
            Some("A caption")
        );
    }

    #[test]
    fn unrecognized_modifier_passes_through() {
        let spec = match parse_brace("image.png?cache=no&unknown") {
            BraceConstruct::Image(spec) => spec,
            other => panic!("expected image, got {:?}", other),
        };
        assert_eq!(spec.params.get("cache").map(String::as_str), Some("no"));
        assert_eq!(spec.params.get("unknown").map(String::as_str), Some(""));
    }

    #[test]
    fn rss_macro_defaults() {
        let (id, params) = match parse_brace("rss>http://example.com/feed") {
            BraceConstruct::Macro { id, params } => (id, params),
            other => panic!("expected macro, got {:?}", other),
        };
        assert_eq!(id, "rss");
        assert_eq!(
            params.get("feed").map(String::as_str),
            Some("http://example.com/feed")
        );
        assert_eq!(params.get("count").map(String::as_str), Some("8"));
    }

    #[test]
    fn rss_macro_flags() {
        let params = match parse_brace("rss>http://e.com/f 5 description") {
            BraceConstruct::Macro { params, .. } => params,
            other => panic!("expected macro, got {:?}", other),
        };
        assert_eq!(params.get("count").map(String::as_str), Some("5"));
        assert_eq!(params.get("description").map(String::as_str), Some("true"));
    }
}

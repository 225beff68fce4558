//! Resource references
//!
//! Link and image targets are carried through the event stream as
//! [ResourceReference] values. The scanner only classifies the raw target
//! text; resolving an untyped reference into a concrete page, attachment or
//! interwiki address is the job of an external collaborator, never of the
//! scanner itself.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How a reference target should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// An absolute URL, or an untyped target left for external resolution.
    Url,
    /// An email address.
    Mailto,
    /// An interwiki shorthand, `alias>rest`.
    InterWiki(String),
    /// A resolved internal page. Never produced by the scanner; exists for
    /// consumers that rewrite untyped references.
    Internal,
}

/// A link or image target as written in the markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    pub target: String,
    pub kind: ReferenceKind,
    pub anchor: Option<String>,
    pub query: Option<String>,
    /// True when the markup names the kind explicitly (scheme prefix or
    /// interwiki alias). Untyped references are resolved externally.
    pub typed: bool,
}

static SCHEME_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").unwrap());

static WORD_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^(?:
            [a-zA-Z][a-zA-Z0-9+.-]*://\S+
          | (?:www|ftp)\.[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+(?:/\S*)?
          | [A-Za-z0-9][A-Za-z0-9-]*(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}(?:/\S*)?
        )$",
    )
    .unwrap()
});

static WORD_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap());

static INTERWIKI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z0-9._-]+)>(.*)$").unwrap());

/// True if a bare word has URL shape: `scheme://...`, a `www.`/`ftp.` host,
/// or `host.tld` with an optional path.
pub fn looks_like_url(word: &str) -> bool {
    WORD_URL.is_match(word)
}

/// True if a bare word has email shape.
pub fn looks_like_email(word: &str) -> bool {
    WORD_EMAIL.is_match(word)
}

impl ResourceReference {
    /// Classify an explicit link target, the text between `[[` and the
    /// label separator.
    pub fn parse(raw: &str) -> ResourceReference {
        let raw = raw.trim();
        if let Some(captures) = INTERWIKI.captures(raw) {
            let alias = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let rest = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            return ResourceReference {
                target: rest.to_string(),
                kind: ReferenceKind::InterWiki(alias.to_string()),
                anchor: None,
                query: None,
                typed: true,
            };
        }
        if let Some(address) = raw.strip_prefix("mailto:") {
            return ResourceReference {
                target: address.to_string(),
                kind: ReferenceKind::Mailto,
                anchor: None,
                query: None,
                typed: true,
            };
        }
        if SCHEME_URL.is_match(raw) {
            return ResourceReference {
                target: raw.to_string(),
                kind: ReferenceKind::Url,
                anchor: None,
                query: None,
                typed: true,
            };
        }
        // Untyped target: strip anchor and query so the external resolver
        // receives the bare page name.
        let (rest, anchor) = match raw.split_once('#') {
            Some((page, anchor)) if !anchor.is_empty() => (page, Some(anchor.to_string())),
            Some((page, _)) => (page, None),
            None => (raw, None),
        };
        let (target, query) = match rest.split_once('?') {
            Some((page, query)) if !query.is_empty() => (page, Some(query.to_string())),
            Some((page, _)) => (page, None),
            None => (rest, None),
        };
        ResourceReference {
            target: target.to_string(),
            kind: ReferenceKind::Url,
            anchor,
            query,
            typed: false,
        }
    }

    /// Build the reference for a freestanding autolink promoted from a bare
    /// word by the leaf emitter.
    pub fn freestanding(word: &str) -> ResourceReference {
        let kind = if looks_like_email(word) {
            ReferenceKind::Mailto
        } else {
            ReferenceKind::Url
        };
        ResourceReference {
            target: word.to_string(),
            kind,
            anchor: None,
            query: None,
            typed: true,
        }
    }
}

//! Built-in replacement functions for rules whose output cannot be
//! expressed as a capture-group template.
//!
//! A rule names a builtin via its `replace_fn` field; the compiler resolves
//! the name once, so the engine never branches on "is this a template or a
//! function" per match.
//!
//! License: MIT OR Apache-2.0

use regex::Captures;

use crate::errors::ScrubError;

/// Fallback link text when a bookmark URL yields no usable path segment.
const BOOKMARK_FALLBACK_TITLE: &str = "Read more";

/// A named, pure replacement function dispatched by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinReplacer {
    /// Rewrites a bookmark-card match as a plain link, deriving the link
    /// text from the last path segment of the captured URL.
    BookmarkTitle,
}

impl BuiltinReplacer {
    /// Resolves a `replace_fn` name from a rule table.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bookmark_title" => Some(Self::BookmarkTitle),
            _ => None,
        }
    }

    /// The name this builtin is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BookmarkTitle => "bookmark_title",
        }
    }

    /// Produces the replacement text for one match.
    ///
    /// Builtins must handle every input their rule's pattern can match;
    /// a returned error aborts processing of the current document only.
    pub fn apply(&self, rule_name: &str, caps: &Captures) -> Result<String, ScrubError> {
        match self {
            Self::BookmarkTitle => {
                let url = caps
                    .get(1)
                    .ok_or_else(|| ScrubError::RuleApplication {
                        rule: rule_name.to_string(),
                        message: "pattern has no capture group for the URL".to_string(),
                    })?
                    .as_str();
                Ok(format!("[{}]({})", bookmark_title(url), url))
            }
        }
    }
}

/// Derives human-readable link text from a URL.
///
/// Takes the final path segment (ignoring a trailing slash), replaces
/// hyphens with spaces and title-cases each word. A URL with no path
/// segments falls back to a generic label.
fn bookmark_title(url: &str) -> String {
    let without_scheme = url.splitn(2, "://").nth(1).unwrap_or(url);
    let segments: Vec<&str> = without_scheme.split('/').filter(|s| !s.is_empty()).collect();

    // First segment is the host; a lone host has no slug to title-case.
    if segments.len() < 2 {
        return BOOKMARK_FALLBACK_TITLE.to_string();
    }

    let slug = segments[segments.len() - 1];
    let title = slug
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        BOOKMARK_FALLBACK_TITLE.to_string()
    } else {
        title
    }
}

//! HTML sanitizer for user-authored post and comment bodies.
//!
//! The allowlist covers what the Markdown editor produces: text formatting,
//! lists, headings, links, images and tables. URL attributes must be
//! `http(s)`, `mailto`, `tel`, or a `/`, `./`, `#` reference. `script` and
//! `style` elements are removed together with their contents.

use ammonia::{Builder, UrlRelative};
use lol_html::{element, rewrite_str, RewriteStrSettings};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{borrow::Cow, collections::HashSet};
use tracing::warn;

const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "hr",
    "blockquote",
    "pre",
    "code",
    "span",
    "strong",
    "b",
    "em",
    "i",
    "u",
    "del",
    "s",
    "ul",
    "ol",
    "li",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "a",
    "img",
    "table",
    "thead",
    "tbody",
    "tr",
    "th",
    "td",
];

const ALLOWED_ATTRIBUTES: &[&str] = &[
    "href", "title", "target", "rel", "src", "alt", "width", "height", "loading", "class",
    "align",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];

const SPOILER_CLASS: &str = "spoiler";
const LANGUAGE_CLASS_PREFIX: &str = "language-";
const BLANK_TARGET_REL: [&str; 2] = ["noopener", "noreferrer"];

static ALLOWED_URI: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^(?:(?:https?|mailto|tel):|/|\./|#)").ok());

static CLEANER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::empty();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect::<HashSet<_>>())
        .url_schemes(["http", "https", "mailto", "tel"].into_iter().collect())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None)
        .clean_content_tags(["script", "style"].into_iter().collect())
        .attribute_filter(filter_attribute);
    builder
});

/// Sanitize untrusted HTML for display. Safe to run on its own output.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let cleaned = CLEANER.clean(html).to_string();
    match harden_blank_targets(&cleaned) {
        Ok(hardened) => hardened,
        Err(err) => {
            warn!("failed to post-process sanitized html: {err}");
            cleaned
        }
    }
}

fn filter_attribute<'a>(element: &str, attribute: &str, value: &'a str) -> Option<Cow<'a, str>> {
    if URL_ATTRIBUTES.contains(&attribute) {
        return is_allowed_uri(value).then_some(Cow::Borrowed(value));
    }

    match (element, attribute) {
        ("span", "class") => keep_classes(value, |class| class == SPOILER_CLASS),
        ("code", "class") => keep_classes(value, |class| class.starts_with(LANGUAGE_CLASS_PREFIX)),
        _ => Some(Cow::Borrowed(value)),
    }
}

fn is_allowed_uri(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    ALLOWED_URI
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&compact))
}

fn keep_classes<'a>(value: &'a str, keep: impl Fn(&str) -> bool) -> Option<Cow<'a, str>> {
    let kept: Vec<&str> = value.split_whitespace().filter(|class| keep(class)).collect();
    if kept.is_empty() {
        None
    } else {
        Some(Cow::Owned(kept.join(" ")))
    }
}

/// Merge `noopener noreferrer` into `rel` for links opening a new tab.
fn harden_blank_targets(html: &str) -> Result<String, lol_html::errors::RewritingError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a[target]", |el| {
                if el.get_attribute("target").as_deref() != Some("_blank") {
                    return Ok(());
                }
                let current = el.get_attribute("rel").unwrap_or_default();
                let merged = merge_rel(&current);
                if merged != current {
                    el.set_attribute("rel", &merged)?;
                }
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
}

fn merge_rel(current: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for token in current.split_whitespace().chain(BLANK_TARGET_REL) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens.join(" ")
}

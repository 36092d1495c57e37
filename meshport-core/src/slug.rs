//! Slug generation and normalization.

use regex::Regex;
use std::sync::OnceLock;

/// Organizational prefixes stripped from note names before slugging
/// (`"Guide - Setup"` becomes `"Setup"`).
pub const ORGANIZATIONAL_PREFIXES: &[&str] = &[
    "Guide",
    "Guides",
    "Reference",
    "Concept",
    "Tutorial",
    "Tutorials",
];

static PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
static NON_ALNUM_REGEX: OnceLock<Regex> = OnceLock::new();

fn prefix_regex() -> &'static Regex {
    PREFIX_REGEX.get_or_init(|| {
        let alternatives = ORGANIZATIONAL_PREFIXES.join("|");
        Regex::new(&format!(r"(?i)^\s*(?:{alternatives})\s+-\s+")).unwrap()
    })
}

fn non_alnum_regex() -> &'static Regex {
    NON_ALNUM_REGEX.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Collapse every run of characters outside `[a-z0-9]` into one hyphen
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use meshport_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("Node.js Tips"), "node-js-tips");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();
    let collapsed = non_alnum_regex().replace_all(&lowercased, "-");
    collapsed.trim_matches('-').to_string()
}

/// Remove a leading organizational prefix such as `"Guide - "`.
pub fn strip_organizational_prefix(name: &str) -> &str {
    match prefix_regex().find(name) {
        Some(m) => &name[m.end()..],
        None => name,
    }
}

/// Derive the slug for a note name: prefix stripping followed by [`slugify`].
///
/// This is the rule used both for page slugs and for the fallback URL of a
/// wiki-link whose target is not part of the manifest.
///
/// ```
/// use meshport_core::slug::derive_slug;
///
/// assert_eq!(derive_slug("Guide - Getting Started"), "getting-started");
/// assert_eq!(derive_slug("Totally Unknown Page"), "totally-unknown-page");
/// ```
pub fn derive_slug(name: &str) -> String {
    slugify(strip_organizational_prefix(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Rust Programming"), "rust-programming");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("C++ Programming"), "c-programming");
        assert_eq!(slugify("What's new?"), "what-s-new");
    }

    #[test]
    fn test_multiple_spaces() {
        assert_eq!(slugify("Hello    World"), "hello-world");
        assert_eq!(slugify("Multiple   Spaces   Here"), "multiple-spaces-here");
    }

    #[test]
    fn test_leading_trailing_hyphens() {
        assert_eq!(slugify("  Hello World  "), "hello-world");
        assert_eq!(slugify("-Leading Hyphen"), "leading-hyphen");
        assert_eq!(slugify("Trailing Hyphen-"), "trailing-hyphen");
    }

    #[test]
    fn test_underscores() {
        assert_eq!(slugify("hello_world"), "hello-world");
    }

    #[test]
    fn test_mixed_case() {
        assert_eq!(slugify("CamelCase"), "camelcase");
        assert_eq!(slugify("UPPERCASE"), "uppercase");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_prefix_stripping_is_case_insensitive() {
        assert_eq!(derive_slug("Guide - Setup"), "setup");
        assert_eq!(derive_slug("guide - Setup"), "setup");
        assert_eq!(derive_slug("REFERENCE - CLI Flags"), "cli-flags");
        assert_eq!(derive_slug("Concept -  Mesh"), "mesh");
    }

    #[test]
    fn test_unknown_prefix_is_kept() {
        assert_eq!(derive_slug("Notes - Setup"), "notes-setup");
        assert_eq!(derive_slug("Guide-Setup"), "guide-setup");
    }

    #[test]
    fn test_prefix_only_strips_once() {
        assert_eq!(derive_slug("Guide - Guide - Setup"), "guide-setup");
    }
}

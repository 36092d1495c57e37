//! Wikilink rewriting for [[target]] and [[target|text]] syntax.
//!
//! Matching rule: `!?\[\[([^\[\]\n]+)\]\]`, applied line by line outside
//! fenced code blocks. Links never span lines or nest. An embed marker (`!`)
//! is dropped and the embed is ported as a plain link.

use super::fences::{FenceTracker, LineKind};
use crate::links::LinkMap;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static WIKILINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn wikilink_regex() -> &'static Regex {
    WIKILINK_REGEX.get_or_init(|| Regex::new(r"!?\[\[([^\[\]\n]+)\]\]").unwrap())
}

/// Split the inside of a wikilink into (target, display text).
///
/// ```
/// use meshport_core::markdown::wikilinks::split_wikilink;
///
/// assert_eq!(split_wikilink("Setup"), ("Setup", "Setup"));
/// assert_eq!(split_wikilink(" Setup | Getting Started "), ("Setup", "Getting Started"));
/// assert_eq!(split_wikilink(r"Setup\|Alias"), ("Setup", "Alias"));
/// ```
pub fn split_wikilink(inner: &str) -> (&str, &str) {
    match inner.split_once('|') {
        Some((target, display)) => {
            // `\|` escapes the pipe inside tables
            let target = target.strip_suffix('\\').unwrap_or(target).trim();
            let display = display.trim();
            if display.is_empty() {
                (target, target)
            } else {
                (target, display)
            }
        }
        None => (inner.trim(), inner.trim()),
    }
}

/// Replace every wikilink with its display text (used for plain-text excerpts).
pub fn strip_wikilinks(text: &str) -> String {
    wikilink_regex()
        .replace_all(text, |caps: &Captures| split_wikilink(&caps[1]).1.to_string())
        .into_owned()
}

/// Transformer converting wikilinks to standard markdown links
pub struct WikilinkTransformer<'a> {
    links: &'a LinkMap,
}

impl<'a> WikilinkTransformer<'a> {
    pub fn new(links: &'a LinkMap) -> Self {
        Self { links }
    }

    /// Rewrite all wikilinks outside fenced code blocks.
    pub fn transform(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len());
        let mut tracker = FenceTracker::new();

        for line in body.split_inclusive('\n') {
            if tracker.classify(line) == LineKind::Text && line.contains("[[") {
                out.push_str(&self.rewrite_line(line));
            } else {
                out.push_str(line);
            }
        }

        out
    }

    fn rewrite_line(&self, line: &str) -> String {
        wikilink_regex()
            .replace_all(line, |caps: &Captures| self.create_link(&caps[1]))
            .into_owned()
    }

    fn create_link(&self, inner: &str) -> String {
        let (target, display) = split_wikilink(inner);
        let href = self.links.resolve(target);
        tracing::trace!("Wikilink [[{}]] -> {}", target, href);
        format!("[{display}]({href})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> LinkMap {
        LinkMap::from_entries(
            "/",
            [
                ("Intro".to_string(), "/".to_string()),
                ("Setup".to_string(), "/guide/setup".to_string()),
            ],
        )
    }

    #[test]
    fn test_simple_wikilink() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(
            transformer.transform("Check out [[Setup]]\n"),
            "Check out [Setup](/guide/setup)\n"
        );
    }

    #[test]
    fn test_wikilink_with_display_text() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(
            transformer.transform("See [[Setup|Getting Started]]"),
            "See [Getting Started](/guide/setup)"
        );
    }

    #[test]
    fn test_multiple_wikilinks() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(
            transformer.transform("[[Intro]] and [[ Setup ]]"),
            "[Intro](/) and [Setup](/guide/setup)"
        );
    }

    #[test]
    fn test_unresolved_wikilink_falls_back() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(
            transformer.transform("[[Totally Unknown Page]]"),
            "[Totally Unknown Page](/totally-unknown-page)"
        );
    }

    #[test]
    fn test_escaped_pipe_in_table() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(
            transformer.transform("| [[Setup\\|Install]] | step |\n"),
            "| [Install](/guide/setup) | step |\n"
        );
    }

    #[test]
    fn test_embed_becomes_link() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(transformer.transform("![[Setup]]"), "[Setup](/guide/setup)");
    }

    #[test]
    fn test_code_fences_are_untouched() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        let body = "```md\n[[Setup]]\n```\n[[Setup]]\n";
        assert_eq!(
            transformer.transform(body),
            "```md\n[[Setup]]\n```\n[Setup](/guide/setup)\n"
        );
    }

    #[test]
    fn test_unclosed_wikilink_is_literal() {
        let links = links();
        let transformer = WikilinkTransformer::new(&links);
        assert_eq!(transformer.transform("[[Setup\n]]"), "[[Setup\n]]");
    }

    #[test]
    fn test_strip_wikilinks() {
        assert_eq!(
            strip_wikilinks("See [[Setup]] or [[Advanced|the deep end]]."),
            "See Setup or the deep end."
        );
    }

    #[test]
    fn test_empty_alias_uses_target() {
        assert_eq!(split_wikilink("Setup|"), ("Setup", "Setup"));
    }
}

//! Title heading lookup/removal and description extraction.

use super::fences::{FenceTracker, LineKind};
use super::wikilinks::strip_wikilinks;
use pulldown_cmark::{Event, Parser};
use regex::Regex;
use std::sync::OnceLock;

/// Maximum description length in characters, ellipsis included
pub const DESCRIPTION_MAX_CHARS: usize = 160;

const ELLIPSIS: &str = "...";

static H1_REGEX: OnceLock<Regex> = OnceLock::new();
static BLOCK_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();

fn h1_regex() -> &'static Regex {
    H1_REGEX.get_or_init(|| Regex::new(r"^ {0,3}#[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").unwrap())
}

fn block_marker_regex() -> &'static Regex {
    // headings, list items, table rows, block quotes, code fences
    BLOCK_MARKER_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(?:#{1,6}(?:\s|$)|[-*+](?:\s|$)|\d+[.)](?:\s|$)|\||>|```|~~~)").unwrap()
    })
}

/// Location of the first level-1 heading outside fenced code
struct TitleLine<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn find_title_line(body: &str) -> Option<TitleLine<'_>> {
    let mut tracker = FenceTracker::new();
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if tracker.classify(line) != LineKind::Text {
            continue;
        }
        let content = line.trim_end_matches(['\n', '\r']);
        if let Some(caps) = h1_regex().captures(content) {
            let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if !text.is_empty() {
                return Some(TitleLine {
                    start,
                    end: offset,
                    text,
                });
            }
        }
    }

    None
}

/// Text of the first level-1 heading, ignoring fenced code.
pub fn find_title(body: &str) -> Option<&str> {
    find_title_line(body).map(|line| line.text)
}

/// Remove the first level-1 heading line and one blank line directly after it.
pub fn strip_title_heading(body: &str) -> String {
    let Some(title) = find_title_line(body) else {
        return body.to_string();
    };

    let rest = &body[title.end..];
    let rest = match rest.split_inclusive('\n').next() {
        Some(next) if next.trim().is_empty() => &rest[next.len()..],
        _ => rest,
    };

    format!("{}{}", &body[..title.start], rest)
}

/// First paragraph line after the title heading, with inline markup removed.
///
/// Scanning stops (no description) at the first heading, list item, table
/// row, block quote or code fence. The result is truncated to
/// [`DESCRIPTION_MAX_CHARS`].
pub fn extract_description(body: &str) -> Option<String> {
    let after_title = match find_title_line(body) {
        Some(title) => &body[title.end..],
        None => body,
    };

    for line in after_title.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if block_marker_regex().is_match(line) {
            return None;
        }
        // Thematic breaks and raw HTML lines carry no text
        let plain = plain_text(line);
        if plain.is_empty() {
            continue;
        }
        return Some(truncate(&plain, DESCRIPTION_MAX_CHARS));
    }

    None
}

/// Render a single line of markdown to plain text.
fn plain_text(line: &str) -> String {
    let without_links = strip_wikilinks(line);
    let mut text = String::new();

    for event in Parser::new(&without_links) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let head: String = text.chars().take(keep).collect();
    format!("{}{}", head.trim_end(), ELLIPSIS)
}

//! Fenced code block tracking and language tag normalization.

/// Source-specific fence languages and the generic tag they are ported to.
/// Tags not listed here pass through unchanged.
pub const FENCE_LANGUAGE_MAP: &[(&str, &str)] = &[
    ("dataview", "text"),
    ("dataviewjs", "js"),
    ("tasks", "text"),
    ("query", "text"),
    ("excalidraw", "text"),
    ("base", "yaml"),
    ("flint", "text"),
];

/// How a line relates to fenced code blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Text,
    FenceOpen,
    FenceBody,
    FenceClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence<'a> {
    marker: char,
    len: usize,
    /// Byte offset where the info string starts
    info_start: usize,
    info: &'a str,
}

/// Parse a fence line: up to three spaces, then three or more backticks or tildes.
fn parse_fence(line: &str) -> Option<Fence<'_>> {
    let line = line.trim_end_matches(['\n', '\r']);
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }

    let rest = &line[indent..];
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = rest.len() - rest.trim_start_matches(marker).len();
    if len < 3 {
        return None;
    }

    let info_start = indent + len;
    let info = &line[info_start..];
    if marker == '`' && info.contains('`') {
        return None;
    }

    Some(Fence {
        marker,
        len,
        info_start,
        info,
    })
}

/// Line-by-line tracker of fenced code blocks.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Classify the next line, updating the open/closed state.
    pub fn classify(&mut self, line: &str) -> LineKind {
        match (self.open, parse_fence(line)) {
            (None, Some(fence)) => {
                self.open = Some((fence.marker, fence.len));
                LineKind::FenceOpen
            }
            (None, None) => LineKind::Text,
            (Some((marker, len)), Some(fence))
                if fence.marker == marker && fence.len >= len && fence.info.trim().is_empty() =>
            {
                self.open = None;
                LineKind::FenceClose
            }
            (Some(_), _) => LineKind::FenceBody,
        }
    }
}

/// Map a fence language through [`FENCE_LANGUAGE_MAP`].
pub fn normalize_language(lang: &str) -> &str {
    FENCE_LANGUAGE_MAP
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(lang))
        .map(|(_, to)| *to)
        .unwrap_or(lang)
}

/// Transformer rewriting the language tag of opening code fences
pub struct FenceTransformer;

impl FenceTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, body: &str) -> String {
        let mut out = String::with_capacity(body.len());
        let mut tracker = FenceTracker::new();

        for line in body.split_inclusive('\n') {
            if tracker.classify(line) == LineKind::FenceOpen {
                out.push_str(&rewrite_opening(line));
            } else {
                out.push_str(line);
            }
        }

        out
    }
}

impl Default for FenceTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn rewrite_opening(line: &str) -> String {
    let Some(fence) = parse_fence(line) else {
        return line.to_string();
    };

    let info = fence.info.trim_start();
    let lang_start = fence.info_start + (fence.info.len() - info.len());
    let lang_len = info
        .find(|c: char| c.is_whitespace() || c == '{')
        .unwrap_or(info.len());
    if lang_len == 0 {
        return line.to_string();
    }

    let lang = &line[lang_start..lang_start + lang_len];
    let mapped = normalize_language(lang);
    if mapped == lang {
        return line.to_string();
    }

    format!(
        "{}{}{}",
        &line[..lang_start],
        mapped,
        &line[lang_start + lang_len..]
    )
}

//! Frontmatter stripping and metadata block synthesis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Document has no metadata block")]
    Missing,
}

/// Markers accepted at the start of a document; the block closes on the same marker.
const MARKERS: &[&str] = &["---", "+++"];

/// Metadata emitted at the top of every ported document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Remove a leading frontmatter block.
///
/// The block must open on the very first line with `---` or `+++` (trailing
/// spaces allowed) and close on the next line holding the same marker. When
/// there is no closing marker the content is returned unchanged.
///
/// ```
/// use meshport_core::frontmatter::strip_frontmatter;
///
/// let body = strip_frontmatter("---\ntags: [guide]\n---\n# Hello\n");
/// assert_eq!(body, "# Hello\n");
/// ```
pub fn strip_frontmatter(content: &str) -> &str {
    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return content;
    };
    let Some(marker) = MARKERS
        .iter()
        .find(|marker| first.trim_end() == **marker)
    else {
        return content;
    };

    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if line.trim_end() == *marker {
            return &content[offset..];
        }
    }

    content
}

/// Escape a string for a double-quoted YAML scalar
pub fn escape_yaml_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the metadata block, including its closing marker and newline.
pub fn render_metadata(title: &str, description: Option<&str>) -> String {
    let mut block = String::from("---\n");
    block.push_str(&format!("title: \"{}\"\n", escape_yaml_string(title)));
    if let Some(description) = description {
        block.push_str(&format!(
            "description: \"{}\"\n",
            escape_yaml_string(description)
        ));
    }
    block.push_str("---\n");
    block
}

/// Read back the metadata block of a ported document.
pub fn parse_metadata(document: &str) -> Result<DocMetadata, FrontmatterError> {
    let rest = document
        .strip_prefix("---\n")
        .ok_or(FrontmatterError::Missing)?;
    let end = rest.find("\n---\n").ok_or(FrontmatterError::Missing)?;
    Ok(serde_yaml::from_str(&rest[..end])?)
}

//! Content model structs for the manifest, resolved pages, and navigation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Canonical site manifest, produced by [`crate::config::RawManifest::migrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Site identifier, used verbatim as the output directory name
    pub site_id: String,

    /// Display title (root navigation descriptor)
    pub title: String,

    /// Normalized base path: `/` or `/docs` (never a trailing slash)
    pub base_path: String,

    /// Landing page
    pub index: PageRef,

    /// Sections in declaration order
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Directory-safe identifier
    pub id: String,
    pub title: String,
    pub pages: Vec<PageRef>,
}

/// A reference to a corpus document as declared in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRef {
    /// Logical identifier, exactly the text inside a wiki-link (alias removed)
    pub identifier: String,

    pub title: Option<String>,

    pub description: Option<String>,

    pub slug: Option<String>,
}

impl PageRef {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Identifier reduced to its file stem (`"Docs/Setup.md"` -> `"Setup"`)
    pub fn file_name(&self) -> String {
        file_name_of(&self.identifier)
    }
}

/// Reduce an identifier to its file stem: directory components and a trailing
/// `.md` extension are dropped.
pub fn file_name_of(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let last = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let stem = last
        .strip_suffix(".md")
        .or_else(|| last.strip_suffix(".MD"))
        .unwrap_or(last);
    stem.trim().to_string()
}

/// A page whose source file was found and whose metadata has been derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    /// Absolute or corpus-relative path of the source note
    pub source_path: PathBuf,

    /// Identifier reduced to its file stem, unique across the manifest
    pub file_name: String,

    /// Identifier as written in the manifest
    pub identifier: String,

    pub title: String,

    /// Output slug, unique within the owning section
    pub slug: String,

    pub description: Option<String>,

    /// Raw source text, read once during resolution
    pub content: String,
}

/// Pages of one section that resolved successfully, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSection {
    pub id: String,
    pub title: String,
    pub pages: Vec<ResolvedPage>,
}

/// The whole manifest after page resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSite {
    pub site_id: String,
    pub title: String,
    pub base_path: String,
    pub index: ResolvedPage,
    pub sections: Vec<ResolvedSection>,

    /// Section page references that were skipped because their source was missing
    pub skipped: Vec<SkippedPage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPage {
    pub section_id: String,
    pub identifier: String,
    pub expected_path: PathBuf,
}

/// Per-directory navigation descriptor (`meta.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavDescriptor {
    pub title: String,
    pub pages: Vec<String>,
}

/// Outcome of a completed port run.
#[derive(Debug, Clone)]
pub struct PortSummary {
    pub output_dir: PathBuf,
    pub pages_written: usize,
    pub sections_written: usize,
    pub skipped: Vec<SkippedPage>,
}

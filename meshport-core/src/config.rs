//! Manifest loading and normalization.
//!
//! The docs manifest has been written in several shapes over time: the index
//! as a bare name or as an object, pages as filenames, wiki-links, or objects
//! with per-page overrides. [`RawManifest`] accepts all of them and
//! [`RawManifest::migrate`] turns them into the canonical [`Manifest`], so
//! nothing past this module needs to know which shape the author used.

use crate::models::{Manifest, PageRef, Section};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Default name of the corpus subdirectory holding notes and the manifest
pub const DEFAULT_MESH_DIR: &str = "Mesh";

/// Manifest file names, searched in order inside the mesh directory
pub const CONFIG_CANDIDATES: &[&str] = &["docs.json", "docs.yml", "docs.yaml", "Docs.md"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Corpus root does not exist: {0}")]
    CorpusNotFound(PathBuf),

    #[error("Mesh directory does not exist: {0}")]
    MeshNotFound(PathBuf),

    #[error("No docs manifest found in {dir} (looked for docs.json, docs.yml, docs.yaml, Docs.md)")]
    ConfigNotFound { dir: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("No json or yaml block found in {0}")]
    MissingBlock(PathBuf),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Manifest as written by the corpus author, in any accepted shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawManifest {
    #[serde(alias = "siteId", alias = "id")]
    pub site: String,

    pub title: String,

    #[serde(default, alias = "base_path")]
    pub base_path: Option<String>,

    pub index: RawPageRef,

    pub sections: Vec<RawSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub pages: Vec<RawPageRef>,
}

/// A page entry: `"Setup"`, `"Setup.md"`, `"[[Setup|Getting Started]]"`, or
/// an object with overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPageRef {
    Bare(String),
    Detailed(RawPageDetail),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPageDetail {
    #[serde(alias = "file", alias = "name")]
    pub page: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,
}

impl RawManifest {
    /// Parse manifest text. JSON is accepted through the YAML parser.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a manifest file; `.md` notes contribute their first json/yaml block.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let is_note = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if is_note {
            let block = extract_manifest_block(&contents)
                .ok_or_else(|| ConfigError::MissingBlock(path.to_path_buf()))?;
            Self::parse(block, path)
        } else {
            Self::parse(&contents, path)
        }
    }

    /// Convert to the canonical manifest, enforcing its invariants.
    pub fn migrate(self) -> Result<Manifest, ConfigError> {
        let site_id = self.site.trim().to_string();
        if !is_directory_safe(&site_id) {
            return Err(ConfigError::Invalid(format!(
                "site identifier {:?} is not a usable directory name",
                self.site
            )));
        }

        let index = self.index.migrate();
        if index.identifier.is_empty() {
            return Err(ConfigError::Invalid("index page is empty".into()));
        }

        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        for raw in self.sections {
            let id = raw.id.trim().to_string();
            if !is_directory_safe(&id) {
                return Err(ConfigError::Invalid(format!(
                    "section identifier {:?} is not a usable directory name",
                    raw.id
                )));
            }
            if !seen.insert(id.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate section identifier {id:?}"
                )));
            }

            let mut pages = Vec::with_capacity(raw.pages.len());
            for page in raw.pages {
                let page = page.migrate();
                if page.identifier.is_empty() {
                    tracing::warn!("Ignoring empty page entry in section {}", id);
                    continue;
                }
                pages.push(page);
            }

            sections.push(Section {
                id,
                title: raw.title,
                pages,
            });
        }

        Ok(Manifest {
            site_id,
            title: self.title,
            base_path: normalize_base_path(self.base_path.as_deref().unwrap_or("/")),
            index,
            sections,
        })
    }
}

impl RawPageRef {
    pub fn migrate(self) -> PageRef {
        match self {
            RawPageRef::Bare(raw) => PageRef::new(parse_identifier(&raw)),
            RawPageRef::Detailed(detail) => PageRef {
                identifier: parse_identifier(&detail.page),
                title: non_empty(detail.title),
                description: non_empty(detail.description),
                slug: non_empty(detail.slug),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Extract the identifier from a manifest entry.
///
/// `[[Name|Alias]]` yields `Name`; a trailing `.md` is dropped so bare
/// filenames and wiki-links name the same note.
pub fn parse_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
        .unwrap_or(trimmed);
    let target = inner.split('|').next().unwrap_or(inner).trim();
    target
        .strip_suffix(".md")
        .unwrap_or(target)
        .trim()
        .to_string()
}

fn is_directory_safe(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

static MANIFEST_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();

fn manifest_block_regex() -> &'static Regex {
    MANIFEST_BLOCK_REGEX.get_or_init(|| {
        Regex::new(r"(?ms)^ {0,3}(?:```|~~~)[ \t]*(?:json|yaml|yml)[ \t]*\r?\n(.*?)^ {0,3}(?:```|~~~)[ \t]*\r?$")
            .unwrap()
    })
}

/// First fenced json/yaml block of a manifest note
fn extract_manifest_block(note: &str) -> Option<&str> {
    manifest_block_regex()
        .captures(note)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Locate the manifest file inside a mesh directory
pub fn locate_config(mesh_root: &Path) -> Result<PathBuf, ConfigError> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| mesh_root.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| ConfigError::ConfigNotFound {
            dir: mesh_root.to_path_buf(),
        })
}

/// Load and normalize the manifest of the corpus at `source_root`.
pub fn load_manifest(source_root: &Path, mesh_dir: &str) -> Result<Manifest, ConfigError> {
    if !source_root.is_dir() {
        return Err(ConfigError::CorpusNotFound(source_root.to_path_buf()));
    }

    let mesh_root = source_root.join(mesh_dir);
    if !mesh_root.is_dir() {
        return Err(ConfigError::MeshNotFound(mesh_root));
    }

    let config_path = locate_config(&mesh_root)?;
    tracing::info!("Loading manifest from {:?}", config_path);

    RawManifest::from_file(&config_path)?.migrate()
}

/// Normalize a base path to `/` or `/segment[/segment...]` without a trailing slash
pub fn normalize_base_path(raw: &str) -> String {
    let segments: Vec<&str> = raw
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(text: &str) -> Result<Manifest, ConfigError> {
        RawManifest::parse(text, Path::new("docs.json"))?.migrate()
    }

    #[test]
    fn test_bare_shapes() {
        let manifest = parse(
            r#"{
              "site": "flint",
              "title": "Flint Docs",
              "index": "Intro",
              "sections": [
                { "id": "guide", "title": "Guide", "pages": ["Guide - Setup.md", "[[Advanced|More]]"] }
              ]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.site_id, "flint");
        assert_eq!(manifest.base_path, "/");
        assert_eq!(manifest.index, PageRef::new("Intro"));
        let pages: Vec<_> = manifest.sections[0]
            .pages
            .iter()
            .map(|p| p.identifier.as_str())
            .collect();
        assert_eq!(pages, vec!["Guide - Setup", "Advanced"]);
    }

    #[test]
    fn test_object_shapes_with_overrides() {
        let manifest = parse(
            r#"
site: vessel
title: Vessel
basePath: /docs/
index:
  page: "[[Welcome]]"
  title: Home
sections:
  - id: api
    title: API
    pages:
      - file: Client.md
        slug: client-api
        description: The client
"#,
        )
        .unwrap();

        assert_eq!(manifest.base_path, "/docs");
        assert_eq!(manifest.index.identifier, "Welcome");
        assert_eq!(manifest.index.title.as_deref(), Some("Home"));
        let page = &manifest.sections[0].pages[0];
        assert_eq!(page.identifier, "Client");
        assert_eq!(page.slug.as_deref(), Some("client-api"));
        assert_eq!(page.description.as_deref(), Some("The client"));
        assert_eq!(page.title, None);
    }

    #[test]
    fn test_site_id_aliases() {
        let manifest =
            parse(r#"{"siteId": "flint", "title": "T", "index": "I", "sections": []}"#).unwrap();
        assert_eq!(manifest.site_id, "flint");
        let manifest =
            parse(r#"{"id": "flint", "title": "T", "index": "I", "sections": []}"#).unwrap();
        assert_eq!(manifest.site_id, "flint");
    }

    #[test]
    fn test_missing_required_field() {
        let err = parse(r#"{"site": "flint", "title": "T", "sections": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("index"));
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let err = parse(
            r#"{"site": "s", "title": "T", "index": "I", "sections": [
                {"id": "a", "title": "A", "pages": []},
                {"id": "a", "title": "Again", "pages": []}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unsafe_site_id_rejected() {
        let err = parse(r#"{"site": "../up", "title": "T", "index": "I", "sections": []}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err =
            parse(r#"{"site": "  ", "title": "T", "index": "I", "sections": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(parse_identifier("Setup"), "Setup");
        assert_eq!(parse_identifier("[[Setup]]"), "Setup");
        assert_eq!(parse_identifier("[[Setup|Getting Started]]"), "Setup");
        assert_eq!(parse_identifier(" Guide - Setup.md "), "Guide - Setup");
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "/");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path("docs"), "/docs");
        assert_eq!(normalize_base_path("/docs/"), "/docs");
        assert_eq!(normalize_base_path("//docs//v2/"), "/docs/v2");
    }

    #[test]
    fn test_manifest_block_in_note() {
        let dir = tempdir().unwrap();
        let mesh = dir.path().join(DEFAULT_MESH_DIR);
        std::fs::create_dir_all(&mesh).unwrap();
        std::fs::write(
            mesh.join("Docs.md"),
            "# Docs\n\nSite layout:\n\n```yaml\nsite: flint\ntitle: Flint\nindex: Intro\nsections: []\n```\n",
        )
        .unwrap();

        let manifest = load_manifest(dir.path(), DEFAULT_MESH_DIR).unwrap();
        assert_eq!(manifest.site_id, "flint");
        assert_eq!(manifest.title, "Flint");
    }

    #[test]
    fn test_note_without_block() {
        let dir = tempdir().unwrap();
        let mesh = dir.path().join(DEFAULT_MESH_DIR);
        std::fs::create_dir_all(&mesh).unwrap();
        std::fs::write(mesh.join("Docs.md"), "# Docs\n\nNothing here.\n").unwrap();

        let err = load_manifest(dir.path(), DEFAULT_MESH_DIR).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBlock(_)));
    }

    #[test]
    fn test_json_preferred_over_note() {
        let dir = tempdir().unwrap();
        let mesh = dir.path().join(DEFAULT_MESH_DIR);
        std::fs::create_dir_all(&mesh).unwrap();
        std::fs::write(
            mesh.join("docs.json"),
            r#"{"site": "from-json", "title": "T", "index": "I", "sections": []}"#,
        )
        .unwrap();
        std::fs::write(
            mesh.join("Docs.md"),
            "```json\n{\"site\": \"from-note\", \"title\": \"T\", \"index\": \"I\", \"sections\": []}\n```\n",
        )
        .unwrap();

        let manifest = load_manifest(dir.path(), DEFAULT_MESH_DIR).unwrap();
        assert_eq!(manifest.site_id, "from-json");
    }

    #[test]
    fn test_missing_corpus_and_config() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_manifest(&missing, DEFAULT_MESH_DIR),
            Err(ConfigError::CorpusNotFound(_))
        ));

        assert!(matches!(
            load_manifest(dir.path(), DEFAULT_MESH_DIR),
            Err(ConfigError::MeshNotFound(_))
        ));

        std::fs::create_dir_all(dir.path().join(DEFAULT_MESH_DIR)).unwrap();
        assert!(matches!(
            load_manifest(dir.path(), DEFAULT_MESH_DIR),
            Err(ConfigError::ConfigNotFound { .. })
        ));
    }
}

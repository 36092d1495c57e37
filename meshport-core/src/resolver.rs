//! Page resolution: manifest references -> source notes with derived metadata.

use crate::frontmatter::strip_frontmatter;
use crate::markdown::{extract_description, find_title};
use crate::models::*;
use crate::slug::derive_slug;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Index page {identifier:?} not found (expected {path})")]
    IndexNotFound { identifier: String, path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Duplicate file name {file_name:?}: referenced as {first:?} and {second:?}")]
    DuplicateFileName {
        file_name: String,
        first: String,
        second: String,
    },

    #[error("Duplicate slug {slug:?} in section {section:?}: {first:?} and {second:?}")]
    DuplicateSlug {
        section: String,
        slug: String,
        first: String,
        second: String,
    },

    #[error("Page {0:?} produces an empty slug")]
    EmptySlug(String),

    #[error("Page {identifier:?} declares invalid slug {slug:?} (must be non-empty, without path separators)")]
    InvalidSlug { identifier: String, slug: String },
}

/// Slug recorded for the index page, which is always written as `index`.
pub const INDEX_SLUG: &str = "index";

/// Resolves page references against the notes of one mesh directory.
pub struct PageResolver {
    mesh_root: PathBuf,
    /// File stem -> first matching note, in path order
    notes_by_stem: HashMap<String, PathBuf>,
}

impl PageResolver {
    pub fn new(mesh_root: impl Into<PathBuf>) -> Self {
        let mesh_root = mesh_root.into();
        let notes_by_stem = index_notes(&mesh_root);
        tracing::debug!("Indexed {} notes under {:?}", notes_by_stem.len(), mesh_root);
        Self {
            mesh_root,
            notes_by_stem,
        }
    }

    /// Path a reference is expected at (`<mesh>/<identifier>.md`)
    pub fn expected_path(&self, page: &PageRef) -> PathBuf {
        self.mesh_root.join(format!("{}.md", page.identifier))
    }

    /// Find the source note for a reference: the expected path first, then any
    /// note in the mesh with the same file stem.
    pub fn locate(&self, page: &PageRef) -> Option<PathBuf> {
        let expected = self.expected_path(page);
        if expected.is_file() {
            return Some(expected);
        }
        self.notes_by_stem.get(&page.file_name()).cloned()
    }

    /// Resolve one section page whose source has been located.
    ///
    /// An explicit slug is used as written; otherwise it is derived from the
    /// file name and must not come out empty.
    pub fn resolve_page(
        &self,
        page: &PageRef,
        source_path: PathBuf,
    ) -> Result<ResolvedPage, ResolveError> {
        let slug = match page.slug.as_deref() {
            Some(declared) => {
                let slug = declared.trim();
                if slug.is_empty() || slug.contains(['/', '\\']) {
                    return Err(ResolveError::InvalidSlug {
                        identifier: page.identifier.clone(),
                        slug: declared.to_string(),
                    });
                }
                slug.to_string()
            }
            None => derive_slug(&page.file_name()),
        };
        if slug.is_empty() {
            return Err(ResolveError::EmptySlug(page.identifier.clone()));
        }

        self.read_page(page, source_path, slug)
    }

    /// Resolve the index page. It always maps to the base path, so no slug is
    /// derived for it.
    pub fn resolve_index(
        &self,
        page: &PageRef,
        source_path: PathBuf,
    ) -> Result<ResolvedPage, ResolveError> {
        self.read_page(page, source_path, INDEX_SLUG.to_string())
    }

    fn read_page(
        &self,
        page: &PageRef,
        source_path: PathBuf,
        slug: String,
    ) -> Result<ResolvedPage, ResolveError> {
        let content = fs::read_to_string(&source_path).map_err(|source| ResolveError::Read {
            path: source_path.clone(),
            source,
        })?;
        let body = strip_frontmatter(&content);

        let title = page
            .title
            .clone()
            .or_else(|| find_title(body).map(str::to_string))
            .unwrap_or_else(|| page.identifier.clone());

        let description = page
            .description
            .clone()
            .or_else(|| extract_description(body));

        tracing::debug!("Resolved {:?} -> {} ({:?})", page.identifier, slug, source_path);

        Ok(ResolvedPage {
            source_path,
            file_name: page.file_name(),
            identifier: page.identifier.clone(),
            title,
            slug,
            description,
            content,
        })
    }

    /// Resolve every page of the manifest.
    ///
    /// A missing index note is fatal; a missing section page is logged and
    /// skipped. File names must be unique across the manifest and slugs unique
    /// within each section.
    pub fn resolve_site(&self, manifest: &Manifest) -> Result<ResolvedSite, ResolveError> {
        let mut file_names: HashMap<String, String> = HashMap::new();

        let index_path = self
            .locate(&manifest.index)
            .ok_or_else(|| ResolveError::IndexNotFound {
                identifier: manifest.index.identifier.clone(),
                path: self.expected_path(&manifest.index),
            })?;
        let index = self.resolve_index(&manifest.index, index_path)?;
        claim_file_name(&mut file_names, &index)?;

        let mut sections = Vec::with_capacity(manifest.sections.len());
        let mut skipped = Vec::new();

        for section in &manifest.sections {
            let mut slugs: HashMap<String, String> = HashMap::new();
            let mut pages = Vec::with_capacity(section.pages.len());

            for page_ref in &section.pages {
                let Some(source_path) = self.locate(page_ref) else {
                    let expected_path = self.expected_path(page_ref);
                    tracing::warn!(
                        "Skipping {:?} in section {}: source not found at {:?}",
                        page_ref.identifier,
                        section.id,
                        expected_path
                    );
                    skipped.push(SkippedPage {
                        section_id: section.id.clone(),
                        identifier: page_ref.identifier.clone(),
                        expected_path,
                    });
                    continue;
                };

                let page = self.resolve_page(page_ref, source_path)?;
                claim_file_name(&mut file_names, &page)?;
                if let Some(first) = slugs.insert(page.slug.clone(), page.identifier.clone()) {
                    return Err(ResolveError::DuplicateSlug {
                        section: section.id.clone(),
                        slug: page.slug.clone(),
                        first,
                        second: page.identifier.clone(),
                    });
                }
                pages.push(page);
            }

            sections.push(ResolvedSection {
                id: section.id.clone(),
                title: section.title.clone(),
                pages,
            });
        }

        Ok(ResolvedSite {
            site_id: manifest.site_id.clone(),
            title: manifest.title.clone(),
            base_path: manifest.base_path.clone(),
            index,
            sections,
            skipped,
        })
    }
}

fn claim_file_name(
    file_names: &mut HashMap<String, String>,
    page: &ResolvedPage,
) -> Result<(), ResolveError> {
    match file_names.insert(page.file_name.clone(), page.identifier.clone()) {
        Some(first) => Err(ResolveError::DuplicateFileName {
            file_name: page.file_name.clone(),
            first,
            second: page.identifier.clone(),
        }),
        None => Ok(()),
    }
}

/// Map every `.md` file stem under the mesh to its path; the first path in
/// sorted walk order wins.
fn index_notes(mesh_root: &Path) -> HashMap<String, PathBuf> {
    let mut notes = HashMap::new();

    for entry in WalkDir::new(mesh_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let is_markdown = path.extension().is_some_and(|ext| ext == "md");
        if !is_markdown {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            notes
                .entry(stem.to_string())
                .or_insert_with(|| path.to_path_buf());
        }
    }

    notes
}

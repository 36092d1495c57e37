//! Port orchestration: resolve everything, then transform and write.

use crate::config::{load_manifest, ConfigError, DEFAULT_MESH_DIR};
use crate::links::LinkMap;
use crate::markdown::DocumentTransformer;
use crate::models::*;
use crate::resolver::{PageResolver, ResolveError};
use crate::writer::{OutputFile, OutputWriter, WriteError, DOC_EXTENSION};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Where to read the corpus from and where to write the site.
#[derive(Debug, Clone)]
pub struct PortOptions {
    /// Corpus root
    pub source: PathBuf,

    /// Mesh subdirectory of the corpus holding notes and the manifest
    pub mesh_dir: String,

    /// Site directory; defaults to `sites/<site id>`
    pub target: Option<PathBuf>,
}

impl PortOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            mesh_dir: DEFAULT_MESH_DIR.to_string(),
            target: None,
        }
    }

    pub fn mesh_root(&self) -> PathBuf {
        self.source.join(&self.mesh_dir)
    }

    /// `<target>/content/docs`
    pub fn output_dir(&self, site_id: &str) -> PathBuf {
        let site_dir = self
            .target
            .clone()
            .unwrap_or_else(|| PathBuf::from("sites").join(site_id));
        site_dir.join("content").join("docs")
    }
}

/// Runs the two-phase port.
///
/// Phase one resolves every page of the manifest and builds the [`LinkMap`].
/// Only then does phase two transform pages, so link rewriting never depends
/// on declaration order.
pub struct Porter {
    options: PortOptions,
}

impl Porter {
    pub fn new(options: PortOptions) -> Self {
        Self { options }
    }

    /// Load the manifest from the corpus and port it.
    pub fn run(&self) -> Result<PortSummary, PortError> {
        let manifest = load_manifest(&self.options.source, &self.options.mesh_dir)?;
        self.port(&manifest)
    }

    /// Port an already loaded manifest.
    pub fn port(&self, manifest: &Manifest) -> Result<PortSummary, PortError> {
        tracing::info!("Porting site: {}", manifest.title);

        let resolver = PageResolver::new(self.options.mesh_root());
        let site = resolver.resolve_site(manifest)?;
        let links = LinkMap::build(&site);

        tracing::info!(
            "Resolved {} pages into {} link targets",
            1 + site.sections.iter().map(|s| s.pages.len()).sum::<usize>(),
            links.len()
        );

        let files = render_site(&site, &links)?;

        let output_dir = self.options.output_dir(&site.site_id);
        let writer = OutputWriter::new(&output_dir);
        writer.write_all(&files)?;

        let pages_written = files
            .iter()
            .filter(|f| f.path.extension().is_some_and(|ext| ext == DOC_EXTENSION))
            .count();

        tracing::info!("Wrote {} documents to {:?}", pages_written, output_dir);

        Ok(PortSummary {
            output_dir,
            pages_written,
            sections_written: site.sections.len(),
            skipped: site.skipped,
        })
    }
}

/// Transform every page of a resolved site into output files, in manifest order.
pub fn render_site(site: &ResolvedSite, links: &LinkMap) -> Result<Vec<OutputFile>, WriteError> {
    let transformer = DocumentTransformer::new(links);
    let mut files = Vec::new();

    files.push(OutputFile::document(
        None,
        "index",
        transformer.transform_page(&site.index),
    ));

    for section in &site.sections {
        for page in &section.pages {
            files.push(OutputFile::document(
                Some(section.id.as_str()),
                &page.slug,
                transformer.transform_page(page),
            ));
        }

        let nav = NavDescriptor {
            title: section.title.clone(),
            pages: section.pages.iter().map(|p| p.slug.clone()).collect(),
        };
        files.push(OutputFile::navigation(Some(section.id.as_str()), &nav)?);
    }

    let root_nav = NavDescriptor {
        title: site.title.clone(),
        pages: std::iter::once("index".to_string())
            .chain(site.sections.iter().map(|s| s.id.clone()))
            .collect(),
    };
    files.push(OutputFile::navigation(None, &root_nav)?);

    Ok(files)
}

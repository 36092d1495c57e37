//! Document rewriting pipeline.
//!
//! Each step is a narrow textual rewrite rather than a full markdown parse:
//!
//! 1. strip leading frontmatter
//! 2. strip the first level-1 heading (the title moves into metadata)
//! 3. rewrite wikilinks against the [`LinkMap`]
//! 4. normalize code fence languages
//! 5. prepend the synthesized metadata block

pub mod fences;
pub mod headings;
pub mod wikilinks;

use crate::frontmatter::{render_metadata, strip_frontmatter};
use crate::links::LinkMap;
use crate::models::ResolvedPage;

pub use fences::FenceTransformer;
pub use headings::{extract_description, find_title, strip_title_heading};
pub use wikilinks::WikilinkTransformer;

/// Rewrites source notes into ported documents. Pure: output depends only on
/// the inputs and the (immutable) link map.
pub struct DocumentTransformer<'a> {
    links: &'a LinkMap,
}

impl<'a> DocumentTransformer<'a> {
    pub fn new(links: &'a LinkMap) -> Self {
        Self { links }
    }

    /// Transform a resolved page using its derived title and description.
    pub fn transform_page(&self, page: &ResolvedPage) -> String {
        self.transform(&page.content, &page.title, page.description.as_deref())
    }

    /// Transform raw note text into a ported document.
    pub fn transform(&self, raw: &str, title: &str, description: Option<&str>) -> String {
        let body = strip_frontmatter(raw);
        let body = strip_title_heading(body);
        let body = WikilinkTransformer::new(self.links).transform(&body);
        let body = FenceTransformer::new().transform(&body);
        let body = body.trim_start_matches(['\n', '\r']).trim_end();

        let mut document = render_metadata(title, description);
        if !body.is_empty() {
            document.push('\n');
            document.push_str(body);
            document.push('\n');
        }
        document
    }
}

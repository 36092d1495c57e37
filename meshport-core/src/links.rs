//! Global identifier -> URL table, built once before any document is rewritten.

use crate::models::{file_name_of, ResolvedPage, ResolvedSite};
use crate::slug::{derive_slug, slugify};
use std::collections::HashMap;

/// Immutable map from note names to canonical URLs.
///
/// Built from the whole resolved manifest, so a page may link to any other
/// page regardless of declaration order. Lookups never fail: unknown targets
/// fall back to a slugified URL under the base path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    base_path: String,
    targets: HashMap<String, String>,
}

impl LinkMap {
    /// Build the map for a resolved site: the index maps to the base path and
    /// every section page to `{base}/{section}/{slug}`.
    pub fn build(site: &ResolvedSite) -> Self {
        let base_path = site.base_path.clone();
        let mut targets = HashMap::new();

        let mut insert = |page: &ResolvedPage, url: String| {
            if page.identifier != page.file_name {
                targets
                    .entry(page.identifier.clone())
                    .or_insert_with(|| url.clone());
            }
            targets.entry(page.file_name.clone()).or_insert(url);
        };

        insert(&site.index, base_path.clone());
        for section in &site.sections {
            for page in &section.pages {
                let url = join_url(&base_path, &format!("{}/{}", section.id, page.slug));
                insert(page, url);
            }
        }

        tracing::debug!("Link map holds {} targets", targets.len());
        Self { base_path, targets }
    }

    /// Build a map from explicit entries (`base_path` must already be normalized).
    pub fn from_entries(
        base_path: &str,
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            base_path: base_path.to_string(),
            targets: entries.into_iter().collect(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Resolve a wikilink target to a URL.
    ///
    /// A `#fragment` suffix is carried over as a slugified anchor. Targets not
    /// in the map fall back to `{base}/{derive_slug(target)}`.
    pub fn resolve(&self, target: &str) -> String {
        let target = target.trim();
        let (name, fragment) = match target.split_once('#') {
            Some((name, fragment)) => (name.trim(), Some(fragment.trim())),
            None => (target, None),
        };
        let anchor = fragment
            .map(slugify)
            .filter(|anchor| !anchor.is_empty())
            .map(|anchor| format!("#{anchor}"))
            .unwrap_or_default();

        if name.is_empty() {
            // Same-page anchor: [[#Section]]
            return if anchor.is_empty() {
                self.base_path.clone()
            } else {
                anchor
            };
        }

        let url = self
            .targets
            .get(name)
            .or_else(|| self.targets.get(&file_name_of(name)))
            .cloned()
            .unwrap_or_else(|| self.fallback(name));

        format!("{url}{anchor}")
    }

    fn fallback(&self, name: &str) -> String {
        let url = join_url(&self.base_path, &derive_slug(name));
        tracing::debug!("Unresolved link target {:?}, using {}", name, url);
        url
    }
}

/// Join a normalized base path and a relative path.
pub fn join_url(base_path: &str, rest: &str) -> String {
    let rest = rest.trim_matches('/');
    if rest.is_empty() {
        base_path.to_string()
    } else if base_path == "/" {
        format!("/{rest}")
    } else {
        format!("{base_path}/{rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResolvedSection;
    use std::path::PathBuf;

    fn page(identifier: &str, slug: &str) -> ResolvedPage {
        ResolvedPage {
            source_path: PathBuf::from(format!("{identifier}.md")),
            file_name: file_name_of(identifier),
            identifier: identifier.to_string(),
            title: identifier.to_string(),
            slug: slug.to_string(),
            description: None,
            content: String::new(),
        }
    }

    fn site(base_path: &str) -> ResolvedSite {
        ResolvedSite {
            site_id: "flint".into(),
            title: "Flint".into(),
            base_path: base_path.into(),
            index: page("Intro", "intro"),
            sections: vec![ResolvedSection {
                id: "guide".into(),
                title: "Guide".into(),
                pages: vec![
                    page("Setup", "setup"),
                    page("Guides/Guide - Advanced", "advanced"),
                ],
            }],
            skipped: vec![],
        }
    }

    #[test]
    fn test_build_root_base() {
        let links = LinkMap::build(&site("/"));
        assert_eq!(links.len(), 4);
        assert!(LinkMap::default().is_empty());
        assert_eq!(links.resolve("Intro"), "/");
        assert_eq!(links.resolve("Setup"), "/guide/setup");
        assert_eq!(links.resolve("Guide - Advanced"), "/guide/advanced");
        assert_eq!(links.resolve("Guides/Guide - Advanced"), "/guide/advanced");
    }

    #[test]
    fn test_build_nested_base() {
        let links = LinkMap::build(&site("/docs"));
        assert_eq!(links.resolve("Intro"), "/docs");
        assert_eq!(links.resolve("Setup"), "/docs/guide/setup");
        assert_eq!(links.resolve("Nowhere"), "/docs/nowhere");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let links = LinkMap::build(&site("/"));
        assert_eq!(
            links.resolve("Totally Unknown Page"),
            "/totally-unknown-page"
        );
        assert_eq!(
            links.resolve("Totally Unknown Page"),
            links.resolve("Totally Unknown Page")
        );
        assert_eq!(links.resolve("Guide - Missing"), "/missing");
        assert_eq!(links.resolve("!!!"), "/");
    }

    #[test]
    fn test_file_name_forms_resolve() {
        let links = LinkMap::build(&site("/"));
        assert_eq!(links.resolve("Setup.md"), "/guide/setup");
        assert_eq!(links.resolve("Other/Setup"), "/guide/setup");
    }

    #[test]
    fn test_fragments() {
        let links = LinkMap::build(&site("/"));
        assert_eq!(links.resolve("Setup#Install Steps"), "/guide/setup#install-steps");
        assert_eq!(links.resolve("#Local Heading"), "#local-heading");
        assert_eq!(links.resolve("Setup#"), "/guide/setup");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/", "guide/setup"), "/guide/setup");
        assert_eq!(join_url("/docs", "guide/setup"), "/docs/guide/setup");
        assert_eq!(join_url("/docs", ""), "/docs");
    }
}

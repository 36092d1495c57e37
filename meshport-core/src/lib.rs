//! # meshport-core
//!
//! Core library for porting a wiki-linked note mesh into a documentation
//! content tree.
//!
//! The port runs in two phases. First the manifest is loaded, every page is
//! resolved to its source note and the global [`LinkMap`] is built. Then each
//! page is rewritten against that finished map and the output tree is
//! regenerated from scratch.

pub mod config;
pub mod frontmatter;
pub mod links;
pub mod markdown;
pub mod models;
pub mod porter;
pub mod resolver;
pub mod slug;
pub mod writer;

pub use config::{load_manifest, ConfigError, RawManifest};
pub use links::LinkMap;
pub use markdown::DocumentTransformer;
pub use models::{
    Manifest, NavDescriptor, PageRef, PortSummary, ResolvedPage, ResolvedSection, ResolvedSite,
    Section, SkippedPage,
};
pub use porter::{PortError, PortOptions, Porter};
pub use resolver::{PageResolver, ResolveError};
pub use slug::slugify;

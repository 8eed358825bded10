//! # sitemeta-core
//!
//! Core library for the sitemeta content metadata pipeline.
//!
//! One pass over a markdown content tree produces three derived models:
//! the internal backlink graph, the glossary dictionary, and the blog
//! relatedness ranking. Each is written as a static JSON artifact that
//! the rendering layer consumes read-only at page-view time.

pub mod artifacts;
pub mod builder;
pub mod config;
pub mod definitions;
pub mod frontmatter;
pub mod linkgraph;
pub mod loader;
pub mod models;
pub mod plaintext;
pub mod related;
pub mod urls;

pub use artifacts::ArtifactWriter;
pub use builder::{BuildError, MetadataBuilder};
pub use config::Config;
pub use models::{
    BlogPost, Definition, Document, Frontmatter, LinkGraph, ReadMoreLink, RelatedEntry,
    RelatedSet, SiteMetadata, Warning,
};

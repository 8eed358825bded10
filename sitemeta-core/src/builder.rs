//! Pipeline orchestration - one load pass fanned out to the three
//! independent metadata producers.

use crate::config::Config;
use crate::definitions::extract_definitions;
use crate::linkgraph::build_link_graph;
use crate::loader::{load_documents, LoadError};
use crate::models::SiteMetadata;
use crate::related::{build_blog_posts, build_related};
use chrono::Utc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Runs the full metadata pipeline over a content tree.
///
/// Every run recomputes all models from the current filesystem state;
/// nothing persists between invocations. Producers are independent of
/// each other and all consume the same loaded corpus.
pub struct MetadataBuilder {
    config: Config,
}

impl MetadataBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the corpus once and derive every metadata model from it.
    /// Advisory warnings are collected in the returned bundle, never
    /// raised as errors.
    pub fn build(&self) -> Result<SiteMetadata, BuildError> {
        let mut warnings = Vec::new();

        let documents = load_documents(&self.config, &mut warnings)?;

        let link_graph = build_link_graph(&documents);
        tracing::info!(
            "Link graph: {} pages, {} with backlinks",
            link_graph.titles.len(),
            link_graph.backlinks.len()
        );

        let definitions = extract_definitions(&documents, &self.config.glossary, &mut warnings);
        tracing::info!("Extracted {} definitions", definitions.len());

        // Missing post dates default to one shared per-run timestamp
        let now = Utc::now();
        let blog_related = build_related(&documents, &self.config.blog, now);
        let blog_posts = build_blog_posts(&documents, &self.config.blog, now);
        tracing::info!("Ranked related posts for {} blog posts", blog_posts.len());

        Ok(SiteMetadata {
            documents,
            link_graph,
            definitions,
            blog_related,
            blog_posts,
            warnings,
        })
    }
}

//! Build command implementation.

use anyhow::Result;
use sitemeta_core::{ArtifactWriter, MetadataBuilder};
use std::path::Path;

/// Run the pipeline and write all artifacts to the output directory.
pub fn run(config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path)?;
    let output_dir = config.output_dir();

    let metadata = MetadataBuilder::new(config).build()?;

    let writer = ArtifactWriter::new(&output_dir)?;
    let written = writer.write_all(&metadata);

    tracing::info!(
        "✓ {} documents, {} backlink targets, {} definitions, {} blog posts",
        metadata.documents.len(),
        metadata.link_graph.backlinks.len(),
        metadata.definitions.len(),
        metadata.blog_posts.len(),
    );
    tracing::info!("✓ Wrote {} artifacts to {:?}", written, output_dir);

    if !metadata.warnings.is_empty() {
        tracing::warn!(
            "{} warning(s); run `sitemeta check` for details",
            metadata.warnings.len()
        );
    }

    Ok(())
}

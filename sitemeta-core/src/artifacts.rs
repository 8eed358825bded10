//! Artifact serialization to the output directory.

use crate::models::SiteMetadata;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const LINK_GRAPH_FILE: &str = "link-graph.json";
pub const DEFINITIONS_FILE: &str = "definitions.json";
pub const BLOG_RELATED_FILE: &str = "blog-related.json";
pub const BLOG_POSTS_FILE: &str = "blog-posts.json";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create output directory {0:?}: {1}")]
    CreateDir(PathBuf, std::io::Error),
}

/// Writes pipeline artifacts as pretty-printed JSON under fixed names.
///
/// Writes are independent of each other: one failed artifact is logged
/// and the rest are still attempted. There is no cross-artifact
/// atomicity; a crash mid-run leaves a partial output set that the next
/// run regenerates.
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create the writer, creating the output directory if absent.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .map_err(|err| WriteError::CreateDir(output_dir.clone(), err))?;

        Ok(Self { output_dir })
    }

    /// Write all four artifacts, returning how many succeeded.
    pub fn write_all(&self, metadata: &SiteMetadata) -> usize {
        let mut written = 0;

        if self.write(LINK_GRAPH_FILE, &metadata.link_graph) {
            written += 1;
        }
        if self.write(DEFINITIONS_FILE, &metadata.definitions) {
            written += 1;
        }
        if self.write(BLOG_RELATED_FILE, &metadata.blog_related) {
            written += 1;
        }
        if self.write(BLOG_POSTS_FILE, &metadata.blog_posts) {
            written += 1;
        }

        written
    }

    /// Write a single artifact; returns false on failure.
    pub fn write<T: Serialize>(&self, filename: &str, value: &T) -> bool {
        let path = self.output_dir.join(filename);

        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!("Failed to serialize {}: {}", filename, err);
                return false;
            }
        };

        match fs::write(&path, json) {
            Ok(()) => {
                tracing::info!("Generated {}", filename);
                true
            }
            Err(err) => {
                tracing::error!("Failed to write {:?}: {}", path, err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DefinitionMap, LinkGraph, RelatedMap};

    fn empty_metadata() -> SiteMetadata {
        SiteMetadata {
            documents: Vec::new(),
            link_graph: LinkGraph::new(),
            definitions: DefinitionMap::new(),
            blog_related: RelatedMap::new(),
            blog_posts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_creates_output_dir_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/nested/public");

        let writer = ArtifactWriter::new(&nested).unwrap();
        assert!(nested.is_dir());

        let written = writer.write_all(&empty_metadata());
        assert_eq!(written, 4);
        assert!(nested.join(LINK_GRAPH_FILE).is_file());
        assert!(nested.join(DEFINITIONS_FILE).is_file());
        assert!(nested.join(BLOG_RELATED_FILE).is_file());
        assert!(nested.join(BLOG_POSTS_FILE).is_file());
    }

    #[test]
    fn test_output_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path()).unwrap();

        let mut graph = LinkGraph::new();
        graph.titles.insert("/a".to_string(), "A".to_string());
        graph.add_link("/b", "/a");
        assert!(writer.write(LINK_GRAPH_FILE, &graph));

        let raw = std::fs::read_to_string(dir.path().join(LINK_GRAPH_FILE)).unwrap();
        assert!(raw.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["titles"]["/a"], "A");
        assert_eq!(parsed["backlinks"]["/a"][0], "/b");
    }

    #[test]
    fn test_empty_models_serialize_to_empty_containers() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path()).unwrap();
        writer.write_all(&empty_metadata());

        let definitions =
            std::fs::read_to_string(dir.path().join(DEFINITIONS_FILE)).unwrap();
        assert_eq!(definitions.trim(), "{}");

        let posts = std::fs::read_to_string(dir.path().join(BLOG_POSTS_FILE)).unwrap();
        assert_eq!(posts.trim(), "[]");
    }
}

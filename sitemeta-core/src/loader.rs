//! Document discovery and loading.

use crate::config::Config;
use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use crate::models::{Document, Warning};
use crate::plaintext::extract_plain_text;
use crate::urls::{file_name_title, file_path_to_url, url_slug};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Content root does not exist: {0:?}")]
    MissingContentRoot(PathBuf),
}

#[derive(Error, Debug)]
enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Load every markdown document under the content root.
///
/// Files that fail to read or parse are skipped with a warning and never
/// partially loaded; unreadable directories degrade the same way. A file
/// whose canonical url is already taken is skipped too, keeping the
/// first-seen document. Files are visited in sorted order so first-wins
/// rules are deterministic. The walk only aborts when the content root
/// itself is missing.
pub fn load_documents(
    config: &Config,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Document>, LoadError> {
    let content_dir = config.content_dir();
    if !content_dir.is_dir() {
        return Err(LoadError::MissingContentRoot(content_dir));
    }

    let mut documents = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for entry in WalkDir::new(&content_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::error!("Failed to read directory entry: {}", err);
                warnings.push(Warning::with_context(
                    "directory.unreadable",
                    format!("Failed to read directory entry: {err}"),
                    err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                ));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let is_markdown = entry.path().extension().map(|ext| ext == "md").unwrap_or(false);
        if !is_markdown {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(&content_dir)
            .unwrap_or(entry.path())
            .to_path_buf();

        match load_document(entry.path(), &rel_path) {
            Ok(document) => {
                if !seen_urls.insert(document.url.clone()) {
                    tracing::warn!(
                        "Duplicate canonical url {} from {:?}; keeping the first document",
                        document.url,
                        rel_path
                    );
                    warnings.push(Warning::with_context(
                        "document.duplicate-url",
                        format!("Duplicate canonical url {}", document.url),
                        rel_path.display().to_string(),
                    ));
                    continue;
                }
                documents.push(document);
            }
            Err(err) => {
                tracing::warn!("Failed to parse {:?}: {}", rel_path, err);
                warnings.push(Warning::with_context(
                    "document.unreadable",
                    format!("Failed to parse: {err}"),
                    rel_path.display().to_string(),
                ));
            }
        }
    }

    tracing::info!("Loaded {} markdown documents", documents.len());

    Ok(documents)
}

/// Parse a single markdown file into a Document
fn load_document(path: &Path, rel_path: &Path) -> Result<Document, DocumentError> {
    let raw = fs::read_to_string(path)?;
    let (frontmatter, body) = parse_frontmatter(&raw)?;

    let url = file_path_to_url(rel_path);
    let slug = url_slug(&url);

    let title = frontmatter
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| file_name_title(rel_path));

    let plain_text = extract_plain_text(&body);

    Ok(Document {
        path: rel_path.to_path_buf(),
        url,
        slug,
        title,
        frontmatter,
        raw_body: body,
        plain_text,
    })
}

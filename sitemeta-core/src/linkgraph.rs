//! Internal hyperlink extraction and backlink inversion.

use crate::models::{Document, LinkGraph};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap())
}

fn scheme_regex() -> &'static Regex {
    SCHEME_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap())
}

/// Build the backlink graph and titles map from the loaded corpus.
///
/// Titles cover every document whether or not it participates in any
/// edge. Backlink lists keep first-seen source order; a document nobody
/// links to gets no key at all.
pub fn build_link_graph(documents: &[Document]) -> LinkGraph {
    let mut graph = LinkGraph::new();

    for document in documents {
        graph
            .titles
            .insert(document.url.clone(), document.title.clone());
    }

    // Corpus path index: link targets resolve against loaded documents,
    // so resolution stays a pure function of the corpus.
    let path_index: HashMap<&Path, &str> = documents
        .iter()
        .map(|d| (d.path.as_path(), d.url.as_str()))
        .collect();

    for document in documents {
        for target in extract_links(document, &path_index) {
            graph.add_link(&document.url, &target);
        }
    }

    graph
}

/// Resolve the internal link targets of one document's body,
/// deduplicated in first-seen order.
///
/// Targets starting with a URI scheme, a bare fragment, or a
/// protocol-relative prefix are excluded. Remaining targets resolve
/// relative to the source file's directory; dangling links and links
/// escaping the content root are silently dropped, as are self-links.
fn extract_links(document: &Document, path_index: &HashMap<&Path, &str>) -> Vec<String> {
    let mut targets = Vec::new();
    let source_dir = document.path.parent().unwrap_or(Path::new(""));

    for caps in link_regex().captures_iter(&document.raw_body) {
        let raw_target = &caps[2];

        if is_external(raw_target) {
            continue;
        }

        // Strip any trailing fragment before resolving
        let without_fragment = raw_target.split('#').next().unwrap_or("");
        if without_fragment.is_empty() {
            continue;
        }

        let Some(resolved) = normalize_path(&source_dir.join(without_fragment)) else {
            continue;
        };

        let Some(url) = resolve_target(&resolved, path_index) else {
            continue;
        };

        if url == document.url {
            continue;
        }

        if !targets.iter().any(|t| t == &url) {
            targets.push(url);
        }
    }

    targets
}

fn is_external(target: &str) -> bool {
    target.starts_with('#') || target.starts_with("//") || scheme_regex().is_match(target)
}

/// Lexically normalize a content-root-relative path. Returns None when
/// the path escapes the root or is absolute.
fn normalize_path(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::Normal(part) => normalized.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(normalized)
}

/// Map a resolved path to a canonical url: an exact markdown path, the
/// path with `.md` appended, or the path as a directory with `index.md`.
fn resolve_target(path: &Path, path_index: &HashMap<&Path, &str>) -> Option<String> {
    if path.extension().map(|ext| ext == "md").unwrap_or(false) {
        return path_index.get(path).map(|url| url.to_string());
    }

    let mut with_md = path.as_os_str().to_os_string();
    with_md.push(".md");
    let with_md = PathBuf::from(with_md);
    if let Some(url) = path_index.get(with_md.as_path()) {
        return Some(url.to_string());
    }

    let as_index = path.join("index.md");
    path_index.get(as_index.as_path()).map(|url| url.to_string())
}

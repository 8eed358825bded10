//! Canonical url, slug, and title derivation from content paths.

use std::path::Path;

/// Convert a content-root-relative file path to its canonical site url.
///
/// Rules:
/// - Strip the markdown extension
/// - Convert path separators to `/`
/// - Collapse an `index` leaf into its parent
/// - Ensure a single leading slash
/// - The document root itself maps to `/`
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sitemeta_core::urls::file_path_to_url;
///
/// assert_eq!(file_path_to_url(Path::new("docs/guide.md")), "/docs/guide");
/// assert_eq!(file_path_to_url(Path::new("docs/index.md")), "/docs");
/// assert_eq!(file_path_to_url(Path::new("index.md")), "/");
/// ```
pub fn file_path_to_url(rel_path: &Path) -> String {
    let mut parts: Vec<String> = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = parts.last_mut() {
        if let Some(stem) = last.strip_suffix(".md") {
            *last = stem.to_string();
        }
    }

    let mut url = parts.join("/");

    if let Some(stripped) = url.strip_suffix("/index") {
        url = stripped.to_string();
    }

    if url.is_empty() || url == "index" {
        return "/".to_string();
    }

    format!("/{}", url)
}

/// Final segment of a canonical url (empty for the root document)
pub fn url_slug(url: &str) -> String {
    url.rsplit('/').next().unwrap_or("").to_string()
}

/// Derive a display title from a file path when frontmatter has none.
/// `index` files take their parent directory's name.
pub fn file_name_title(rel_path: &Path) -> String {
    let stem = rel_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    if stem == "index" {
        let dir = rel_path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("Home");
        format_title(dir)
    } else {
        format_title(stem)
    }
}

/// Convert kebab-case, snake_case, or space-separated names to Title Case
pub fn format_title(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

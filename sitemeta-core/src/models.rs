//! Content model structs for documents, the link graph, glossary
//! definitions, and blog posts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Frontmatter metadata from markdown files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub cover: Option<String>,

    /// Relatedness opt-out: `blog: false` removes a post from the
    /// blog listing and ranking.
    #[serde(default)]
    pub blog: Option<bool>,

    /// Any remaining frontmatter keys, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A single markdown document loaded from the content tree
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the content root
    pub path: PathBuf,

    /// Canonical site-relative url ("/", "/docs/guide", ...)
    pub url: String,

    /// Final url segment (empty for the root document)
    pub slug: String,

    /// Display title
    pub title: String,

    /// Parsed frontmatter
    pub frontmatter: Frontmatter,

    /// Markdown body with frontmatter removed
    pub raw_body: String,

    /// Plain-text projection of the body
    pub plain_text: String,
}

/// Inverted hyperlink graph with resolved page titles
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LinkGraph {
    /// Map from target url to the urls linking to it, first-seen order
    pub backlinks: BTreeMap<String, Vec<String>>,

    /// Map from url to display title for every loaded document
    pub titles: BTreeMap<String, String>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a forward edge from source to target. The source is
    /// appended to the target's backlinks unless already present.
    pub fn add_link(&mut self, source: &str, target: &str) {
        let entry = self.backlinks.entry(target.to_string()).or_default();
        if !entry.iter().any(|s| s == source) {
            entry.push(source.to_string());
        }
    }

    /// Get backlinks for a given url (empty slice when none)
    pub fn backlinks_of(&self, url: &str) -> &[String] {
        self.backlinks.get(url).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A glossary "read more" link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadMoreLink {
    pub text: String,
    pub url: String,
}

/// A single glossary entry, stored under its canonical term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub aliases: Vec<String>,

    /// Rendered HTML, truncated to the configured maximum
    pub content: String,

    #[serde(rename = "readMoreLink", skip_serializing_if = "Option::is_none")]
    pub read_more_link: Option<ReadMoreLink>,
}

/// Glossary dictionary keyed by canonical term
pub type DefinitionMap = BTreeMap<String, Definition>;

/// A blog post row for the date-sorted listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub url: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub cover: Option<String>,
    pub excerpt: String,
    pub tags: Vec<String>,
}

/// One entry of a post's related list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub url: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub cover: Option<String>,
    pub excerpt: String,
}

/// Ranked related posts for a single post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedSet {
    pub related: Vec<RelatedEntry>,
}

/// Related sets keyed by post slug
pub type RelatedMap = BTreeMap<String, RelatedSet>;

/// An advisory diagnostic collected during a pipeline run.
///
/// Warnings never abort the run; fatal and skip conditions are handled
/// at the loader boundary instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Stable machine-readable code, e.g. "definition.duplicate-term"
    pub code: String,

    pub message: String,

    /// The term, alias, or path the warning refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Warning {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(code: &str, message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            context: Some(context.into()),
        }
    }
}

/// Complete metadata bundle produced by one pipeline run
#[derive(Debug, Clone)]
pub struct SiteMetadata {
    pub documents: Vec<Document>,
    pub link_graph: LinkGraph,
    pub definitions: DefinitionMap,
    pub blog_related: RelatedMap,
    pub blog_posts: Vec<BlogPost>,
    pub warnings: Vec<Warning>,
}

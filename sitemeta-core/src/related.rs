//! Blog post relatedness ranking and the date-sorted listing.

use crate::config::BlogConfig;
use crate::models::{BlogPost, Document, RelatedEntry, RelatedMap, RelatedSet};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::collections::{HashMap, HashSet};

/// A blog-post view over a loaded document, with dates resolved.
struct PostView<'a> {
    doc: &'a Document,
    /// Date used for scoring; missing or unparseable dates fall back to
    /// the per-run current date.
    date: NaiveDate,
    /// Date string emitted in artifacts (frontmatter value verbatim, or
    /// the per-run timestamp when absent).
    date_label: String,
}

/// Documents that participate in the blog ranking: strictly inside the
/// blog subtree (which excludes the subtree's own index document) and
/// not opted out via `blog: false`.
fn blog_documents<'a>(documents: &'a [Document], config: &BlogConfig) -> Vec<&'a Document> {
    let prefix = format!("/{}/", config.dir);

    documents
        .iter()
        .filter(|d| d.url.starts_with(&prefix))
        .filter(|d| d.slug != "index")
        .filter(|d| d.frontmatter.blog != Some(false))
        .collect()
}

fn post_views<'a>(
    documents: Vec<&'a Document>,
    now: NaiveDate,
    now_label: &str,
) -> Vec<PostView<'a>> {
    documents
        .into_iter()
        .map(|doc| {
            let parsed = doc.frontmatter.date.as_deref().and_then(parse_date);
            let date_label = doc
                .frontmatter
                .date
                .clone()
                .unwrap_or_else(|| now_label.to_string());

            PostView {
                doc,
                date: parsed.unwrap_or(now),
                date_label,
            }
        })
        .collect()
}

/// Parse an ISO date, accepting bare dates and RFC 3339 timestamps.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectors over one synthetic document per post: the title
/// repeated three times (up-weighting title terms), the plain-text body,
/// and the space-joined tag list.
fn tfidf_vectors(posts: &[PostView]) -> Vec<HashMap<String, f64>> {
    let token_lists: Vec<Vec<String>> = posts
        .iter()
        .map(|post| {
            let synthetic = format!(
                "{title} {title} {title} {body} {tags}",
                title = post.doc.title,
                body = post.doc.plain_text,
                tags = post.doc.frontmatter.tags.join(" "),
            );
            tokenize(&synthetic)
        })
        .collect();

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for tokens in &token_lists {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for token in unique {
            *document_frequency.entry(token).or_insert(0) += 1;
        }
    }

    let doc_count = token_lists.len() as f64;

    token_lists
        .iter()
        .map(|tokens| {
            let mut vector: HashMap<String, f64> = HashMap::new();
            for token in tokens {
                *vector.entry(token.clone()).or_insert(0.0) += 1.0;
            }
            for (token, weight) in vector.iter_mut() {
                let df = document_frequency
                    .get(token.as_str())
                    .copied()
                    .unwrap_or(0) as f64;
                // Smoothed idf keeps corpus-wide terms at a small
                // positive weight instead of zeroing them out.
                *weight *= ((1.0 + doc_count) / (1.0 + df)).ln() + 1.0;
            }
            vector
        })
        .collect()
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(token, wa)| b.get(token).map(|wb| wa * wb))
        .sum();

    if dot == 0.0 {
        return 0.0;
    }

    let norm = |v: &HashMap<String, f64>| v.values().map(|w| w * w).sum::<f64>().sqrt();
    dot / (norm(a) * norm(b))
}

/// Composite score of candidate `other` for `post`: weighted text
/// similarity, shared-tag count, and recency decay over the window.
fn composite_score(
    post: &PostView,
    other: &PostView,
    text_similarity: f64,
    config: &BlogConfig,
) -> f64 {
    let shared_tags = post
        .doc
        .frontmatter
        .tags
        .iter()
        .filter(|tag| other.doc.frontmatter.tags.contains(tag))
        .count() as f64;

    let days_apart = post.date.signed_duration_since(other.date).num_days().abs() as f64;
    let window = config.recency_window_days as f64;
    let recency = ((window - days_apart) / window).max(0.0);

    config.weights.tfidf * text_similarity
        + config.weights.tags * shared_tags
        + config.weights.recency * recency
}

/// Rank the top related posts for every blog post.
///
/// Candidates are sorted descending by composite score with a stable
/// sort, so equal scores keep corpus scan order.
pub fn build_related(
    documents: &[Document],
    config: &BlogConfig,
    now: DateTime<Utc>,
) -> RelatedMap {
    let posts = blog_documents(documents, config);
    if posts.is_empty() {
        return RelatedMap::new();
    }

    let now_label = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let views = post_views(posts, now.date_naive(), &now_label);
    let vectors = tfidf_vectors(&views);

    let mut related_map = RelatedMap::new();

    for (index, post) in views.iter().enumerate() {
        let mut scored: Vec<(usize, f64)> = Vec::new();

        for (other_index, other) in views.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let text = cosine_similarity(&vectors[index], &vectors[other_index]);
            scored.push((other_index, composite_score(post, other, text, config)));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let related = scored
            .into_iter()
            .take(config.related_count)
            .map(|(other_index, _)| summary(&views[other_index], config))
            .collect();

        related_map.insert(post.doc.slug.clone(), RelatedSet { related });
    }

    tracing::debug!("Ranked related posts for {} posts", related_map.len());

    related_map
}

/// The date-descending blog listing.
pub fn build_blog_posts(
    documents: &[Document],
    config: &BlogConfig,
    now: DateTime<Utc>,
) -> Vec<BlogPost> {
    let posts = blog_documents(documents, config);
    let now_label = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut views = post_views(posts, now.date_naive(), &now_label);

    views.sort_by(|a, b| b.date.cmp(&a.date));

    views
        .iter()
        .map(|view| BlogPost {
            url: view.doc.url.clone(),
            title: view.doc.title.clone(),
            author: author_of(view, config),
            date: view.date_label.clone(),
            cover: view.doc.frontmatter.cover.clone(),
            excerpt: view.doc.frontmatter.description.clone().unwrap_or_default(),
            tags: view.doc.frontmatter.tags.clone(),
        })
        .collect()
}

fn summary(view: &PostView, config: &BlogConfig) -> RelatedEntry {
    RelatedEntry {
        url: view.doc.url.clone(),
        title: view.doc.title.clone(),
        author: author_of(view, config),
        date: view.date_label.clone(),
        cover: view.doc.frontmatter.cover.clone(),
        excerpt: view.doc.frontmatter.description.clone().unwrap_or_default(),
    }
}

fn author_of(view: &PostView, config: &BlogConfig) -> String {
    view.doc
        .frontmatter
        .author
        .clone()
        .filter(|author| !author.trim().is_empty())
        .unwrap_or_else(|| config.default_author.clone())
}

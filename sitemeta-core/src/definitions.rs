//! Glossary definition extraction from heading-delimited blocks.

use crate::config::GlossaryConfig;
use crate::models::{Definition, DefinitionMap, Document, ReadMoreLink, Warning};
use pulldown_cmark::{html, Event, Parser};
use regex::Regex;
use std::sync::OnceLock;

static READ_MORE_REGEX: OnceLock<Regex> = OnceLock::new();
static ALIAS_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static HR_LINE_REGEX: OnceLock<Regex> = OnceLock::new();

fn read_more_regex() -> &'static Regex {
    READ_MORE_REGEX
        .get_or_init(|| Regex::new(r"(?i)^read more:\s*\[([^\]]+)\]\(([^)]+)\)\s*$").unwrap())
}

fn alias_regex() -> &'static Regex {
    ALIAS_REGEX.get_or_init(|| Regex::new(r"\(([^)]+)\)\s*$").unwrap())
}

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"</?([a-zA-Z0-9-]+)(?:\s+[^>]*)?>").unwrap())
}

fn hr_line_regex() -> &'static Regex {
    HR_LINE_REGEX.get_or_init(|| Regex::new(r"(?m)^---\s*$").unwrap())
}

/// Extract the glossary dictionary from all definition-prefixed files.
///
/// A canonical term seen more than once keeps its first definition;
/// every later occurrence is dropped with a warning. After all files are
/// processed, aliases are cross-checked against canonical terms.
pub fn extract_definitions(
    documents: &[Document],
    config: &GlossaryConfig,
    warnings: &mut Vec<Warning>,
) -> DefinitionMap {
    let mut definitions = DefinitionMap::new();
    let mut insertion_order: Vec<String> = Vec::new();

    for document in documents.iter().filter(|d| is_definition_file(d, config)) {
        extract_from_document(document, config, &mut definitions, &mut insertion_order, warnings);
    }

    check_alias_conflicts(&definitions, &insertion_order, warnings);

    definitions
}

/// Glossary sources are selected by filename prefix, case-insensitive.
fn is_definition_file(document: &Document, config: &GlossaryConfig) -> bool {
    let stem = document
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    config.prefixes.iter().any(|prefix| stem.starts_with(prefix.as_str()))
}

/// A term block: the level-6 heading line and the body below it.
struct Block {
    heading: String,
    body_lines: Vec<String>,
}

/// Split a body into heading-delimited blocks with a two-state line
/// scanner: lines before the first heading are ignored, lines after a
/// heading accumulate until the next heading or end of input.
fn split_blocks(body: &str) -> Vec<Block> {
    let normalized = body.replace("\r\n", "\n");
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;

    for line in normalized.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            current = Some(Block {
                heading: heading.to_string(),
                body_lines: Vec::new(),
            });
        } else if let Some(block) = current.as_mut() {
            block.body_lines.push(line.to_string());
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }

    blocks
}

/// Heading predicate: exactly six '#' characters, then whitespace, then
/// text. A seventh '#' disqualifies the line.
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("######")?;
    if rest.starts_with('#') {
        return None;
    }
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }

    Some(text)
}

fn extract_from_document(
    document: &Document,
    config: &GlossaryConfig,
    definitions: &mut DefinitionMap,
    insertion_order: &mut Vec<String>,
    warnings: &mut Vec<Warning>,
) {
    for block in split_blocks(&document.raw_body) {
        let body = block.body_lines.join("\n").trim().to_string();
        if body.is_empty() {
            continue;
        }

        // Remove any stray horizontal rules
        let body = hr_line_regex().replace_all(&body, "").trim().to_string();
        if body.is_empty() {
            continue;
        }

        let (term, aliases) = parse_heading(&block.heading);
        if term.is_empty() {
            continue;
        }

        if definitions.contains_key(&term) {
            tracing::warn!("Duplicate definition for \"{}\"; keeping the first", term);
            warnings.push(Warning::with_context(
                "definition.duplicate-term",
                format!("Duplicate canonical term \"{}\"", term),
                term,
            ));
            continue;
        }

        let (cleaned_body, read_more_link) = extract_read_more(&body, &term, warnings);
        let rendered = render_markdown(&cleaned_body);

        if let Some(tag) = first_unsupported_tag(&rendered, config) {
            warnings.push(Warning::with_context(
                "definition.unsupported-tag",
                format!("Definition \"{}\" renders unsupported tag <{}>", term, tag),
                term.clone(),
            ));
        }

        let content = if rendered.chars().count() > config.max_content_length {
            warnings.push(Warning::with_context(
                "definition.truncated",
                format!(
                    "Definition \"{}\" exceeds {} characters; truncated",
                    term, config.max_content_length
                ),
                term.clone(),
            ));
            truncate_html(&rendered, config.max_content_length)
        } else {
            rendered
        };

        insertion_order.push(term.clone());
        definitions.insert(
            term,
            Definition {
                aliases,
                content,
                read_more_link,
            },
        );
    }
}

/// Split "Term (Alias, Other)" into the canonical term and its aliases.
/// Only a trailing parenthetical group counts as an alias list.
fn parse_heading(heading: &str) -> (String, Vec<String>) {
    let heading = heading.trim();

    let Some(caps) = alias_regex().captures(heading) else {
        return (heading.to_string(), Vec::new());
    };

    let aliases = caps[1]
        .split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect();

    let term = alias_regex().replace(heading, "").trim().to_string();

    (term, aliases)
}

/// Find and remove the "Read more: [text](url)" line.
///
/// The last matching line wins; the body keeps only the lines preceding
/// it, so an earlier pattern-looking line higher up stays embedded. A
/// rejected url still removes the line but attaches no link.
fn extract_read_more(
    body: &str,
    term: &str,
    warnings: &mut Vec<Warning>,
) -> (String, Option<ReadMoreLink>) {
    let lines: Vec<&str> = body.split('\n').collect();
    let matches: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| read_more_regex().is_match(line))
        .map(|(index, _)| index)
        .collect();

    let Some(&last) = matches.last() else {
        return (body.to_string(), None);
    };

    if matches.len() > 1 {
        warnings.push(Warning::with_context(
            "definition.multiple-read-more",
            format!(
                "Definition \"{}\" has multiple read-more lines; using the last",
                term
            ),
            term,
        ));
    }

    let truncated = lines[..last].join("\n").trim().to_string();

    let Some(caps) = read_more_regex().captures(lines[last]) else {
        return (body.to_string(), None);
    };
    let text = caps[1].trim().to_string();
    let url = caps[2].trim().to_string();

    if !is_valid_read_more_url(&url) {
        tracing::warn!("Invalid read-more url \"{}\" for \"{}\"", url, term);
        warnings.push(Warning::with_context(
            "definition.invalid-read-more-url",
            format!("Definition \"{}\" has invalid read-more url \"{}\"", term, url),
            term,
        ));
        return (truncated, None);
    }

    (truncated, Some(ReadMoreLink { text, url }))
}

/// Accepted read-more schemes: root-relative, explicitly relative, and
/// http(s). Everything else (javascript:, data:, ...) is rejected.
fn is_valid_read_more_url(url: &str) -> bool {
    url.starts_with('/')
        || url.starts_with("./")
        || url.starts_with("../")
        || url.starts_with("http://")
        || url.starts_with("https://")
}

/// Render a definition body to HTML. Raw HTML in the source is escaped
/// rather than passed through.
fn render_markdown(markdown: &str) -> String {
    let events = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut output = String::new();
    html::push_html(&mut output, events);
    output.trim_end().to_string()
}

/// First rendered tag outside the allow-list, if any.
fn first_unsupported_tag(html: &str, config: &GlossaryConfig) -> Option<String> {
    for caps in tag_regex().captures_iter(html) {
        let tag = caps[1].to_lowercase();
        if !config.allowed_tags.iter().any(|allowed| *allowed == tag) {
            return Some(tag);
        }
    }
    None
}

/// Cut rendered HTML at `max_length` characters, never inside a tag,
/// and append an ellipsis.
fn truncate_html(html: &str, max_length: usize) -> String {
    let mut truncated: String = html.chars().take(max_length).collect();

    // A '<' with no '>' after it means the cut landed inside a tag;
    // back up to before the tag start.
    if let Some(open) = truncated.rfind('<') {
        if truncated[open..].rfind('>').is_none() {
            truncated.truncate(open);
        }
    }

    format!("{}...", truncated.trim())
}

/// An alias equal to a different entry's canonical term is advisory:
/// both entries are kept, the collision is reported.
fn check_alias_conflicts(
    definitions: &DefinitionMap,
    insertion_order: &[String],
    warnings: &mut Vec<Warning>,
) {
    for term in insertion_order {
        let Some(definition) = definitions.get(term) else {
            continue;
        };
        for alias in &definition.aliases {
            if alias != term && definitions.contains_key(alias) {
                warnings.push(Warning::with_context(
                    "definition.alias-conflict",
                    format!(
                        "Alias \"{}\" on \"{}\" collides with another canonical term",
                        alias, term
                    ),
                    alias.clone(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frontmatter;
    use std::path::PathBuf;

    fn glossary_document(rel_path: &str, body: &str) -> Document {
        let path = PathBuf::from(rel_path);
        let url = crate::urls::file_path_to_url(&path);
        Document {
            slug: crate::urls::url_slug(&url),
            title: crate::urls::file_name_title(&path),
            url,
            path,
            frontmatter: Frontmatter::default(),
            plain_text: String::new(),
            raw_body: body.to_string(),
        }
    }

    fn extract(body: &str) -> (DefinitionMap, Vec<Warning>) {
        let documents = vec![glossary_document("definitions.md", body)];
        let mut warnings = Vec::new();
        let map = extract_definitions(&documents, &GlossaryConfig::default(), &mut warnings);
        (map, warnings)
    }

    #[test]
    fn test_basic_extraction() {
        let (map, warnings) = extract(
            "###### Cache (Caching)\n\nStores computed results for reuse.\n\n\
             ###### Token\n\nA unit of text.\n",
        );

        assert_eq!(map.len(), 2);
        assert!(warnings.is_empty());

        let cache = map.get("Cache").unwrap();
        assert_eq!(cache.aliases, vec!["Caching"]);
        assert!(cache.content.contains("<p>Stores computed results for reuse.</p>"));

        let token = map.get("Token").unwrap();
        assert!(token.aliases.is_empty());
    }

    #[test]
    fn test_non_glossary_files_ignored() {
        let documents = vec![glossary_document("notes.md", "###### Cache\n\nBody.\n")];
        let mut warnings = Vec::new();
        let map = extract_definitions(&documents, &GlossaryConfig::default(), &mut warnings);
        assert!(map.is_empty());
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let documents = vec![glossary_document("Glossary-Core.md", "###### Cache\n\nBody.\n")];
        let mut warnings = Vec::new();
        let map = extract_definitions(&documents, &GlossaryConfig::default(), &mut warnings);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_seven_hashes_is_not_a_heading() {
        let (map, _) = extract("####### Not A Term\n\nBody.\n");
        assert!(map.is_empty());
    }

    #[test]
    fn test_heading_requires_whitespace_after_hashes() {
        let (map, _) = extract("######Tight\n\nBody.\n");
        assert!(map.is_empty());
    }

    #[test]
    fn test_empty_body_discards_block() {
        let (map, _) = extract("###### Empty\n\n###### Kept\n\nHas a body.\n");
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("Kept"));
    }

    #[test]
    fn test_horizontal_rules_removed_from_body() {
        let (map, _) = extract("###### Term\n\nFirst part.\n\n---\n\nSecond part.\n");
        let content = &map.get("Term").unwrap().content;
        assert!(!content.contains("<hr"));
        assert!(content.contains("First part."));
        assert!(content.contains("Second part."));
    }

    #[test]
    fn test_body_of_only_rules_discards_block() {
        let (map, _) = extract("###### Term\n\n---\n");
        assert!(map.is_empty());
    }

    #[test]
    fn test_alias_list_parsing() {
        let (map, _) = extract("###### Cache (Caching, Cached Value, )\n\nBody.\n");
        let cache = map.get("Cache").unwrap();
        assert_eq!(cache.aliases, vec!["Caching", "Cached Value"]);
    }

    #[test]
    fn test_only_trailing_parenthetical_is_alias_list() {
        let (map, _) = extract("###### TTL (Time To Live) rules\n\nBody.\n");
        assert!(map.contains_key("TTL (Time To Live) rules"));
        assert!(map.get("TTL (Time To Live) rules").unwrap().aliases.is_empty());
    }

    #[test]
    fn test_duplicate_term_keeps_first_and_warns_each_time() {
        let (map, warnings) = extract(
            "###### Cache\n\nOriginal body.\n\n\
             ###### Cache\n\nSecond body.\n\n\
             ###### Cache\n\nThird body.\n",
        );

        assert_eq!(map.len(), 1);
        assert!(map.get("Cache").unwrap().content.contains("Original body."));

        let duplicates: Vec<_> = warnings
            .iter()
            .filter(|w| w.code == "definition.duplicate-term")
            .collect();
        assert_eq!(duplicates.len(), 2);
    }

    #[test]
    fn test_duplicate_across_files_warns_once() {
        let documents = vec![
            glossary_document("definitions-a.md", "###### Cache (Caching)\n\nFirst.\n"),
            glossary_document("definitions-b.md", "###### Cache (Caching)\n\nSecond.\n"),
        ];
        let mut warnings = Vec::new();
        let map = extract_definitions(&documents, &GlossaryConfig::default(), &mut warnings);

        assert!(map.get("Cache").unwrap().content.contains("First."));
        let duplicates: Vec<_> = warnings
            .iter()
            .filter(|w| w.code == "definition.duplicate-term")
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].context.as_deref(), Some("Cache"));
    }

    #[test]
    fn test_read_more_extracted_and_removed() {
        let (map, warnings) =
            extract("###### Term\n\nThe body.\n\nRead more: [Full guide](/docs/term)\n");

        let term = map.get("Term").unwrap();
        assert_eq!(
            term.read_more_link,
            Some(ReadMoreLink {
                text: "Full guide".to_string(),
                url: "/docs/term".to_string(),
            })
        );
        assert!(!term.content.contains("Read more"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_read_more_is_case_insensitive() {
        let (map, _) = extract("###### Term\n\nBody.\n\nREAD MORE: [Guide](./guide.md)\n");
        assert!(map.get("Term").unwrap().read_more_link.is_some());
    }

    #[test]
    fn test_last_read_more_wins_with_warning() {
        let (map, warnings) = extract(
            "###### Term\n\nIntro.\n\nRead more: [First](/first)\n\nMiddle.\n\n\
             Read more: [Second](/second)\n",
        );

        let term = map.get("Term").unwrap();
        assert_eq!(term.read_more_link.as_ref().unwrap().url, "/second");
        // Only the segment from the last match onward is removed
        assert!(term.content.contains("Intro."));
        assert!(term.content.contains("Read more:"));
        assert!(term.content.contains("Middle."));
        assert!(warnings.iter().any(|w| w.code == "definition.multiple-read-more"));
    }

    #[test]
    fn test_invalid_read_more_url_rejected() {
        let (map, warnings) =
            extract("###### Term\n\nBody.\n\nRead more: [Click](javascript:alert(1))\n");

        let term = map.get("Term").unwrap();
        assert!(term.read_more_link.is_none());
        assert!(!term.content.contains("Read more"));
        assert!(warnings.iter().any(|w| w.code == "definition.invalid-read-more-url"));
    }

    #[test]
    fn test_read_more_url_schemes() {
        assert!(is_valid_read_more_url("/docs/x"));
        assert!(is_valid_read_more_url("./x"));
        assert!(is_valid_read_more_url("../x"));
        assert!(is_valid_read_more_url("https://x.com"));
        assert!(is_valid_read_more_url("http://x.com"));
        assert!(!is_valid_read_more_url("javascript:alert(1)"));
        assert!(!is_valid_read_more_url("data:text/html,x"));
        assert!(!is_valid_read_more_url("ftp://x.com"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let (map, warnings) = extract("###### Term\n\nBody with <script>alert(1)</script> inline.\n");
        let content = &map.get("Term").unwrap().content;
        assert!(!content.contains("<script>"));
        assert!(content.contains("&lt;script&gt;"));
        // Escaped markup renders as text, so no unsupported-tag warning
        assert!(!warnings.iter().any(|w| w.code == "definition.unsupported-tag"));
    }

    #[test]
    fn test_unsupported_tag_warning_is_advisory() {
        let (map, warnings) = extract("###### Term\n\n> A quoted body.\n");
        let content = &map.get("Term").unwrap().content;
        assert!(content.contains("<blockquote>"));
        assert!(warnings.iter().any(|w| w.code == "definition.unsupported-tag"));
    }

    #[test]
    fn test_allowed_tags_do_not_warn() {
        let (_, warnings) = extract("###### Term\n\nSome **bold** and *em* and `code`.\n\n- a\n- b\n");
        assert!(!warnings.iter().any(|w| w.code == "definition.unsupported-tag"));
    }

    #[test]
    fn test_truncation_never_cuts_a_tag() {
        let config = GlossaryConfig {
            max_content_length: 40,
            ..GlossaryConfig::default()
        };
        let body = "###### Term\n\nSome leading words then **a bold run that crosses the cut**.\n";
        let documents = vec![glossary_document("definitions.md", body)];
        let mut warnings = Vec::new();
        let map = extract_definitions(&documents, &config, &mut warnings);

        let content = &map.get("Term").unwrap().content;
        assert!(content.ends_with("..."));
        let trimmed = content.trim_end_matches("...");
        assert!(trimmed.chars().count() <= 40);
        // No cut tag: every '<' is followed by a '>'
        if let Some(open) = trimmed.rfind('<') {
            assert!(trimmed[open..].contains('>'));
        }
        assert!(warnings.iter().any(|w| w.code == "definition.truncated"));
    }

    #[test]
    fn test_truncate_html_cut_inside_closing_tag() {
        // Cut lands inside "</strong>"
        let html = "<p><strong>abcd</strong></p>";
        let truncated = truncate_html(html, 17);
        assert_eq!(truncated, "<p><strong>abcd...");
    }

    #[test]
    fn test_truncate_html_cut_between_tags() {
        let html = "<p>hello world</p>";
        let truncated = truncate_html(html, 8);
        assert_eq!(truncated, "<p>hello...");
    }

    #[test]
    fn test_alias_conflict_detected() {
        let (map, warnings) = extract(
            "###### Cache (Memo)\n\nFirst.\n\n###### Memo\n\nSecond.\n",
        );

        assert_eq!(map.len(), 2);
        let conflicts: Vec<_> = warnings
            .iter()
            .filter(|w| w.code == "definition.alias-conflict")
            .collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].context.as_deref(), Some("Memo"));
    }

    #[test]
    fn test_alias_equal_to_own_term_is_no_conflict() {
        let (_, warnings) = extract("###### Cache (Cache)\n\nBody.\n");
        assert!(!warnings.iter().any(|w| w.code == "definition.alias-conflict"));
    }
}

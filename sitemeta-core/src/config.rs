//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the sitemeta.yml schema.
///
/// Every field has a default, so a missing or empty config file yields a
/// working pipeline. Thresholds live here rather than as constants so
/// tests can inject alternates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub glossary: GlossaryConfig,
    pub blog: BlogConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Content root. The only fatal error in the pipeline is this
    /// directory not existing at build time.
    pub content: PathBuf,

    /// Artifact output directory. Defaults to `<content>/public`.
    pub output: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    /// Lowercase filename prefixes that mark a file as a glossary source.
    pub prefixes: Vec<String>,

    /// HTML tags permitted in rendered definition content; anything else
    /// triggers an advisory warning.
    pub allowed_tags: Vec<String>,

    /// Maximum rendered definition length before truncation.
    pub max_content_length: usize,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![
                "definitions".to_string(),
                "glossary".to_string(),
                "terms".to_string(),
                "concepts".to_string(),
            ],
            allowed_tags: vec![
                "p".to_string(),
                "strong".to_string(),
                "em".to_string(),
                "code".to_string(),
                "ul".to_string(),
                "li".to_string(),
                "br".to_string(),
                "hr".to_string(),
            ],
            max_content_length: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Name of the blog subtree directly under the content root.
    pub dir: String,

    /// Author attributed to posts whose frontmatter names none.
    pub default_author: String,

    /// Number of related posts kept per post.
    pub related_count: usize,

    /// Days over which the recency boost decays to zero.
    pub recency_window_days: i64,

    pub weights: ScoreWeights,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            dir: "blog".to_string(),
            default_author: "Anonymous".to_string(),
            related_count: 3,
            recency_window_days: 90,
            weights: ScoreWeights::default(),
        }
    }
}

/// Relative weights of the composite relatedness score components.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub tfidf: f64,
    pub tags: f64,
    pub recency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            tfidf: 0.55,
            tags: 0.35,
            recency: 0.10,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let mut config: Config = if contents.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&contents)?
        };

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Get the content root, resolved relative to the config file
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    /// Get the output directory, resolved relative to the config file
    pub fn output_dir(&self) -> PathBuf {
        match &self.paths.output {
            Some(output) => self.resolve_path(output),
            None => self.content_dir().join("public"),
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

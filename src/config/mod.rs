//! Blog configuration (_config.yml + environment)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of posts requested per CMS page. Deliberately 1 so that the
/// load-more flow is exercised after the very first post.
pub const PAGE_SIZE: usize = 1;

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // CMS
    /// CMS repository identifier (e.g. "myblog" for myblog.cdn.prismic.io)
    pub repository: String,
    /// Public access token, embedded into the generated index page for the
    /// browser-side load-more fetch
    pub access_token: Option<String>,
    /// Document type to query
    pub content_type: String,

    // Directory
    pub public_dir: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),

            repository: String::new(),
            access_token: None,
            content_type: "posts".to_string(),

            public_dir: "public".to_string(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Override CMS settings from environment variables.
    ///
    /// `PRISMIC_REPOSITORY` and `PRISMIC_ACCESS_TOKEN` take precedence over
    /// values from `_config.yml` so deployments never need to commit them.
    pub fn apply_env(&mut self) {
        if let Ok(repo) = std::env::var("PRISMIC_REPOSITORY") {
            if !repo.is_empty() {
                self.repository = repo;
            }
        }
        if let Ok(token) = std::env::var("PRISMIC_ACCESS_TOKEN") {
            if !token.is_empty() {
                self.access_token = Some(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.content_type, "posts");
        assert_eq!(config.public_dir, "public");
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
repository: myblog
content_type: articles
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.repository, "myblog");
        assert_eq!(config.content_type, "articles");
        // untouched fields keep their defaults
        assert_eq!(config.public_dir, "public");
    }
}

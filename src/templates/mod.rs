//! Embedded Tera templates for the blog pages
//!
//! All templates are compiled into the binary; there is no theme directory
//! to resolve at runtime.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::date::format_pt_br;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("loading.html", include_str!("blog/loading.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
        ])?;

        tera.register_filter("date_br", date_br_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format an ISO datetime as "d MMM yyy" in pt-BR
fn date_br_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let formatted = match value.as_str() {
        Some(s) => format_pt_br(Some(s)),
        None => String::new(),
    };
    Ok(tera::Value::String(formatted))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
}

/// One post entry on the index page
#[derive(Debug, Clone, Serialize)]
pub struct PostItemData {
    pub uid: String,
    pub first_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// Full post page context
#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    pub first_publication_date: Option<String>,
    pub author: String,
    pub banner_url: String,
    pub banner_alt: String,
    pub reading_time: u64,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub body: Vec<String>,
}

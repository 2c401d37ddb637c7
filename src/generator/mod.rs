//! Generator module - builds the static pages from CMS content
//!
//! The build phase is one-shot and sequential: one query for the first page
//! of the list, one query per known post. Any CMS failure propagates and
//! aborts the build of that page; there is no retry.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;

use crate::cms::CmsQuery;
use crate::config::{BlogConfig, PAGE_SIZE};
use crate::content::{reading_time, PostDetail, PostPagination};
use crate::templates::{PostItemData, PostPageData, SectionData, SiteData, TemplateRenderer};

/// Route parameters of a pre-rendered post page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    pub slug: String,
}

/// Static page generator over a CMS client.
///
/// The client is injected so tests can substitute an in-memory fake for the
/// hosted repository.
pub struct Generator<'a, C: CmsQuery> {
    client: &'a C,
    config: BlogConfig,
    public_dir: PathBuf,
    renderer: TemplateRenderer,
}

impl<'a, C: CmsQuery> Generator<'a, C> {
    pub fn new(client: &'a C, config: BlogConfig, public_dir: PathBuf) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            client,
            config,
            public_dir,
            renderer,
        })
    }

    /// Fetch the first page of posts and shape it into the list page state.
    ///
    /// `next_page` and `page` are copied verbatim from the envelope; each
    /// record is reduced to its summary fields.
    pub async fn build_post_list(&self) -> Result<PostPagination> {
        let envelope = self
            .client
            .query_type(&self.config.content_type, PAGE_SIZE)
            .await?;
        Ok(PostPagination::from_envelope(&envelope))
    }

    /// Enumerate the post paths known at build time.
    ///
    /// Runs the same page-size-1 query as the list page; slugs that only
    /// appear on later pages are handled by the server's fallback rendering
    /// instead of being enumerated here.
    pub async fn post_paths(&self) -> Result<Vec<PathParams>> {
        let envelope = self
            .client
            .query_type(&self.config.content_type, PAGE_SIZE)
            .await?;
        Ok(envelope
            .results
            .iter()
            .filter_map(|doc| doc.uid.clone())
            .map(|slug| PathParams { slug })
            .collect())
    }

    /// Fetch one post in full and render its page.
    ///
    /// The record is fetched by uid without field stripping; an unknown
    /// slug surfaces the CMS error.
    pub async fn build_post_page(&self, slug: &str) -> Result<String> {
        let document = self
            .client
            .query_by_uid(&self.config.content_type, slug)
            .await?;
        let detail = PostDetail::from_document(&document);
        self.render_post(&detail)
    }

    /// Build the whole site into the public directory
    pub async fn generate(&self) -> Result<()> {
        fs::create_dir_all(&self.public_dir)?;

        let pagination = self.build_post_list().await?;
        let index_html = self.render_index(&pagination)?;
        fs::write(self.public_dir.join("index.html"), index_html)?;
        tracing::info!("Generated index with {} post(s)", pagination.results.len());

        let paths = self.post_paths().await?;
        for params in &paths {
            let html = self.build_post_page(&params.slug).await?;
            self.write_post_page(&params.slug, &html)?;
            tracing::info!("Generated post/{}", params.slug);
        }

        Ok(())
    }

    /// Render and persist a single post page, creating `post/{slug}/`
    pub fn write_post_page(&self, slug: &str, html: &str) -> Result<()> {
        let dir = self.public_dir.join("post").join(slug);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("index.html"), html)?;
        Ok(())
    }

    /// Path of a generated post page, used by the server to probe for it
    pub fn post_page_path(&self, slug: &str) -> PathBuf {
        self.public_dir.join("post").join(slug).join("index.html")
    }

    /// Render the index page with the embedded load-more state
    pub fn render_index(&self, pagination: &PostPagination) -> Result<String> {
        let posts: Vec<PostItemData> = pagination
            .results
            .iter()
            .map(|post| PostItemData {
                uid: post.uid.clone().unwrap_or_default(),
                first_publication_date: post.first_publication_date.clone(),
                title: post.title.clone(),
                subtitle: post.subtitle.clone(),
                author: post.author.clone(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("posts", &posts);
        context.insert("next_page", &pagination.next_page);
        context.insert("page", &pagination.page);
        context.insert("access_token", &self.config.access_token);
        self.renderer.render("index.html", &context)
    }

    /// Render a post detail page
    pub fn render_post(&self, detail: &PostDetail) -> Result<String> {
        let data = PostPageData {
            title: detail.title.clone(),
            first_publication_date: detail.first_publication_date.clone(),
            author: detail.author.clone(),
            banner_url: detail.banner.url.clone(),
            banner_alt: detail.banner.alt.clone(),
            reading_time: reading_time::estimate_minutes(&detail.content),
            sections: detail
                .content
                .iter()
                .map(|section| SectionData {
                    heading: section.heading.clone(),
                    body: section.body.iter().map(|b| b.text.clone()).collect(),
                })
                .collect(),
        };

        let mut context = Context::new();
        context.insert("site", &self.site_data());
        context.insert("post", &data);
        self.renderer.render("post.html", &context)
    }

    /// Render the fallback placeholder served while a page generates
    pub fn render_loading(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        self.renderer.render("loading.html", &context)
    }

    /// Render the terminal page for a slug the CMS does not have
    pub fn render_not_found(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", &self.site_data());
        self.renderer.render("not_found.html", &context)
    }

    fn site_data(&self) -> SiteData {
        SiteData {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            language: self.config.language.clone(),
        }
    }
}

/// Recursively delete the public directory
pub fn clean_public_dir(public_dir: &Path) -> Result<()> {
    if public_dir.exists() {
        fs::remove_dir_all(public_dir)?;
        tracing::info!("Deleted: {:?}", public_dir);
    }
    Ok(())
}

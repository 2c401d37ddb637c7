//! Preview server with on-demand fallback rendering
//!
//! Serves the generated public directory. A request for a post page that
//! was not known at build time gets a loading placeholder while the page
//! is generated from the CMS in the background; the next request serves
//! the written file. A slug the CMS has never heard of is remembered and
//! answered with a terminal 404 page, so a single open tab cannot keep
//! re-querying the CMS.

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower_http::services::ServeDir;

use crate::cms::{CmsError, CmsQuery, PrismicClient};
use crate::config::BlogConfig;
use crate::generator::Generator;
use crate::Prismo;

/// Server state, generic over the CMS client so tests can drive the
/// fallback path with an in-memory fake
struct ServerState<C: CmsQuery> {
    config: BlogConfig,
    public_dir: PathBuf,
    client: C,
    /// Slugs with a generation task outstanding
    generating: Mutex<HashSet<String>>,
    /// Slugs the CMS reported as nonexistent; served as 404 from then on
    missing: Mutex<HashSet<String>>,
}

impl<C: CmsQuery> ServerState<C> {
    fn new(config: BlogConfig, public_dir: PathBuf, client: C) -> Self {
        Self {
            config,
            public_dir,
            client,
            generating: Mutex::new(HashSet::new()),
            missing: Mutex::new(HashSet::new()),
        }
    }

    fn generator(&self) -> Result<Generator<'_, C>> {
        Generator::new(&self.client, self.config.clone(), self.public_dir.clone())
    }
}

/// Start the preview server
pub async fn start(prismo: &Prismo, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::new(
        prismo.config.clone(),
        prismo.public_dir.clone(),
        prismo.client()?,
    ));

    let app = Router::new()
        .fallback(fallback_handler::<PrismicClient>)
        .with_state(state);

    // "localhost" is not a bindable address
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serves files from the public directory; unknown post slugs fall back to
/// on-demand generation
async fn fallback_handler<C>(
    State(state): State<Arc<ServerState<C>>>,
    request: Request<Body>,
) -> Response
where
    C: CmsQuery + Send + Sync + 'static,
{
    let path = request.uri().path().to_string();

    if let Some(slug) = post_slug(&path) {
        if state.missing.lock().unwrap().contains(&slug) {
            return not_found_response(&state);
        }
        let file = state
            .public_dir
            .join("post")
            .join(&slug)
            .join("index.html");
        if !file.exists() {
            return serve_fallback(state, slug).await;
        }
    }

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Respond with the loading placeholder and kick off generation of the page
async fn serve_fallback<C>(state: Arc<ServerState<C>>, slug: String) -> Response
where
    C: CmsQuery + Send + Sync + 'static,
{
    let already_running = {
        let mut generating = state.generating.lock().unwrap();
        !generating.insert(slug.clone())
    };

    if !already_running {
        let task_state = state.clone();
        let task_slug = slug.clone();
        tokio::spawn(async move {
            if let Err(e) = generate_post_page(&task_state, &task_slug).await {
                if is_not_found(&e) {
                    tracing::warn!("post/{} does not exist in the CMS", task_slug);
                    task_state.missing.lock().unwrap().insert(task_slug.clone());
                } else {
                    tracing::error!("On-demand generation of post/{} failed: {}", task_slug, e);
                }
            }
            task_state.generating.lock().unwrap().remove(&task_slug);
        });
        tracing::info!("Generating post/{} on demand", slug);
    }

    loading_response(&state)
}

async fn generate_post_page<C>(state: &ServerState<C>, slug: &str) -> Result<()>
where
    C: CmsQuery + Send + Sync,
{
    let generator = state.generator()?;
    let html = generator.build_post_page(slug).await?;
    generator.write_post_page(slug, &html)?;
    tracing::info!("Generated post/{} on demand", slug);
    Ok(())
}

/// A genuine CMS miss is terminal; anything else may be transient
fn is_not_found(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<CmsError>(),
        Some(CmsError::NotFound { .. })
    )
}

fn loading_response<C: CmsQuery>(state: &ServerState<C>) -> Response {
    match state.generator().and_then(|g| g.render_loading()) {
        Ok(html) => Html(html).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn not_found_response<C: CmsQuery>(state: &ServerState<C>) -> Response {
    match state.generator().and_then(|g| g.render_not_found()) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Extract the slug from a `/post/{slug}` or `/post/{slug}/` request path.
/// Nested paths and traversal segments are not slugs.
fn post_slug(path: &str) -> Option<String> {
    let rest = path.strip_prefix("/post/")?;
    let slug = rest.strip_suffix('/').unwrap_or(rest);
    if slug.is_empty() || slug.contains('/') || slug.contains("..") || slug.contains('\\') {
        return None;
    }
    Some(slug.to_string())
}

//! CMS client - query interface trait plus the reqwest implementation

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::sync::OnceCell;

use super::types::{Document, QueryEnvelope, RepositoryInfo};

/// Characters escaped inside query string values
const QUERY_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'+');

/// Errors surfaced by the CMS client
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("CMS repository identifier is not configured")]
    MissingRepository,

    #[error("repository has no master ref")]
    NoMasterRef,

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no {type_name} document with uid {uid:?}")]
    NotFound { type_name: String, uid: String },
}

/// The query contract both page builders and the load-more flow consume.
///
/// Implemented by [`PrismicClient`] for the hosted API and by in-memory
/// fakes in tests, so builders take the client as an explicit parameter
/// instead of reaching for a process-wide instance.
pub trait CmsQuery {
    /// Fetch one page of documents of the given type
    fn query_type(
        &self,
        type_name: &str,
        page_size: usize,
    ) -> impl std::future::Future<Output = Result<QueryEnvelope, CmsError>> + Send;

    /// Fetch the single document of the given type with the given uid
    fn query_by_uid(
        &self,
        type_name: &str,
        uid: &str,
    ) -> impl std::future::Future<Output = Result<Document, CmsError>> + Send;

    /// Fetch a literal `next_page` URL, appending the access token
    fn query_page(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<QueryEnvelope, CmsError>> + Send;
}

/// Client for a Prismic-style hosted repository.
///
/// The master ref is resolved lazily from the repository root endpoint and
/// cached for the lifetime of the client; every document query runs against
/// it.
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    /// Create a client for `https://{repository}.cdn.prismic.io/api/v2`
    pub fn new(repository: &str, access_token: Option<&str>) -> Result<Self, CmsError> {
        if repository.is_empty() {
            return Err(CmsError::MissingRepository);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: format!("https://{}.cdn.prismic.io/api/v2", repository),
            access_token: access_token.map(str::to_string),
            master_ref: OnceCell::new(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CmsError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CmsError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json().await.map_err(|source| CmsError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn master_ref(&self) -> Result<&str, CmsError> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let mut url = self.endpoint.clone();
                if let Some(token) = &self.access_token {
                    url.push_str("?access_token=");
                    url.extend(utf8_percent_encode(token, QUERY_SET));
                }
                let info: RepositoryInfo = self.get_json(&url).await?;
                info.master_ref()
                    .map(str::to_string)
                    .ok_or(CmsError::NoMasterRef)
            })
            .await?;
        Ok(reference)
    }

    /// Build a documents/search URL for the given predicate
    async fn search_url(&self, predicate: &str, page_size: usize) -> Result<String, CmsError> {
        let reference = self.master_ref().await?;
        let mut url = format!(
            "{}/documents/search?ref={}&q={}&pageSize={}",
            self.endpoint,
            utf8_percent_encode(reference, QUERY_SET),
            utf8_percent_encode(predicate, QUERY_SET),
            page_size
        );
        if let Some(token) = &self.access_token {
            url.push_str("&access_token=");
            url.extend(utf8_percent_encode(token, QUERY_SET));
        }
        Ok(url)
    }
}

impl CmsQuery for PrismicClient {
    async fn query_type(
        &self,
        type_name: &str,
        page_size: usize,
    ) -> Result<QueryEnvelope, CmsError> {
        let predicate = format!("[[at(document.type,\"{}\")]]", type_name);
        let url = self.search_url(&predicate, page_size).await?;
        self.get_json(&url).await
    }

    async fn query_by_uid(&self, type_name: &str, uid: &str) -> Result<Document, CmsError> {
        let predicate = format!("[[at(my.{}.uid,\"{}\")]]", type_name, uid);
        let url = self.search_url(&predicate, 1).await?;
        let envelope: QueryEnvelope = self.get_json(&url).await?;
        envelope
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound {
                type_name: type_name.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn query_page(&self, url: &str) -> Result<QueryEnvelope, CmsError> {
        let url = match &self.access_token {
            Some(token) => format!(
                "{}&access_token={}",
                url,
                utf8_percent_encode(token, QUERY_SET)
            ),
            None => url.to_string(),
        };
        self.get_json(&url).await
    }
}

//! Wire types for the CMS query interface
//!
//! The API returns paginated envelopes of documents. Fields the blog does
//! not consume are ignored on deserialize; the schema is trusted as-is.

use serde::{Deserialize, Serialize};

/// Paginated response wrapper returned by every query endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryEnvelope {
    /// Current page number, informational only
    #[serde(default)]
    pub page: u32,

    /// URL of the next page of results, absent when exhausted
    #[serde(default)]
    pub next_page: Option<String>,

    /// Documents on this page, in CMS return order
    #[serde(default)]
    pub results: Vec<Document>,
}

/// A single CMS document record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// URL-friendly unique identifier
    #[serde(default)]
    pub uid: Option<String>,

    /// ISO-8601 publication datetime, null for unpublished previews
    #[serde(default)]
    pub first_publication_date: Option<String>,

    /// Type-specific payload, kept untyped so detail pages receive the
    /// record unmodified
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Repository metadata returned by the API root endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub refs: Vec<RepositoryRef>,
}

/// A content ref (release) of the repository
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

impl RepositoryInfo {
    /// The ref queries should run against
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_deserialize() {
        let body = json!({
            "page": 1,
            "results_per_page": 1,
            "results_size": 1,
            "total_results_size": 3,
            "total_pages": 3,
            "next_page": "https://myblog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [{
                "id": "YBmv6xAAACMAsVpt",
                "uid": "first-post",
                "type": "posts",
                "first_publication_date": "2021-04-19T20:10:45+0000",
                "data": { "title": "Hello", "subtitle": "World", "author": "Ada" }
            }]
        });

        let envelope: QueryEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.page, 1);
        assert!(envelope.next_page.as_deref().unwrap().contains("page=2"));
        assert_eq!(envelope.results.len(), 1);
        assert_eq!(envelope.results[0].uid.as_deref(), Some("first-post"));
        assert_eq!(envelope.results[0].data["author"], "Ada");
    }

    #[test]
    fn test_envelope_missing_fields_default() {
        let envelope: QueryEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.page, 0);
        assert!(envelope.next_page.is_none());
        assert!(envelope.results.is_empty());
    }

    #[test]
    fn test_master_ref() {
        let info: RepositoryInfo = serde_json::from_value(json!({
            "refs": [
                { "id": "release", "ref": "aaa", "isMasterRef": false },
                { "id": "master", "ref": "bbb", "isMasterRef": true }
            ]
        }))
        .unwrap();
        assert_eq!(info.master_ref(), Some("bbb"));
    }
}

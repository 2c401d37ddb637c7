//! Post models
//!
//! Two views of the same CMS record: the summary carried by the post list
//! and the full detail used by post pages. Neither validates the payload;
//! absent fields come through as `None` or empty strings.

use serde::{Deserialize, Serialize};

use crate::cms::{Document, QueryEnvelope};

/// Reduced representation of a post, as shown on the list page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostSummary {
    /// URL-friendly identifier, doubles as the post's slug
    pub uid: Option<String>,

    /// ISO-8601 publication datetime
    pub first_publication_date: Option<String>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Extract the summary fields from a full document, dropping everything
    /// else the CMS returned
    pub fn from_document(doc: &Document) -> Self {
        Self {
            uid: doc.uid.clone(),
            first_publication_date: doc.first_publication_date.clone(),
            title: string_field(&doc.data, "title"),
            subtitle: string_field(&doc.data, "subtitle"),
            author: string_field(&doc.data, "author"),
        }
    }
}

/// Banner image of a post
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PostBanner {
    pub url: String,
    pub alt: String,
}

/// One body paragraph inside a content section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyText {
    pub text: String,
}

/// One titled section of a post, order-significant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentSection {
    pub heading: String,
    pub body: Vec<BodyText>,
}

/// Full-fidelity representation of a post, as shown on the detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDetail {
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: PostBanner,
    /// Ordered sections, preserved exactly as returned by the CMS
    pub content: Vec<ContentSection>,
}

impl PostDetail {
    /// Parse the detail view out of a full document.
    ///
    /// Unlike [`PostSummary::from_document`] this keeps the record's whole
    /// payload; fields missing from the payload default rather than error.
    pub fn from_document(doc: &Document) -> Self {
        let banner = doc
            .data
            .get("banner")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let content = doc
            .data
            .get("content")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        Self {
            uid: doc.uid.clone(),
            first_publication_date: doc.first_publication_date.clone(),
            title: string_field(&doc.data, "title"),
            subtitle: string_field(&doc.data, "subtitle"),
            author: string_field(&doc.data, "author"),
            banner,
            content,
        }
    }
}

/// In-memory pagination state of the post list.
///
/// Created once from the build-time fetch, then grown append-only as more
/// pages load. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostPagination {
    /// URL of the next page, `None` when exhausted
    pub next_page: Option<String>,

    /// Page number reported by the CMS, informational only
    pub page: u32,

    /// Posts loaded so far, in CMS return order
    pub results: Vec<PostSummary>,
}

impl PostPagination {
    /// Build the initial state from a query envelope
    pub fn from_envelope(envelope: &QueryEnvelope) -> Self {
        Self {
            next_page: envelope.next_page.clone(),
            page: envelope.page,
            results: envelope
                .results
                .iter()
                .map(PostSummary::from_document)
                .collect(),
        }
    }

    /// Merge one more page of results into the state.
    ///
    /// Replaces `next_page` and `page` with the new envelope's values and
    /// appends the normalized results, keeping prior entries and their
    /// order. Entries whose uid is already present are skipped, so a raced
    /// duplicate fetch cannot double posts.
    pub fn append_envelope(&mut self, envelope: &QueryEnvelope) {
        self.next_page = envelope.next_page.clone();
        self.page = envelope.page;
        for doc in &envelope.results {
            let summary = PostSummary::from_document(doc);
            let duplicate = summary
                .uid
                .as_ref()
                .is_some_and(|uid| self.results.iter().any(|p| p.uid.as_deref() == Some(uid)));
            if !duplicate {
                self.results.push(summary);
            }
        }
    }

    /// Whether more pages can be loaded
    pub fn has_next_page(&self) -> bool {
        self.next_page.as_deref().is_some_and(|url| !url.is_empty())
    }
}

fn string_field(data: &serde_json::Value, key: &str) -> String {
    data.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

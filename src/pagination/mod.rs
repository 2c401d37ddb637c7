//! Load-more flow over the post list pagination state
//!
//! The generated index page ships the browser half of this flow as an
//! embedded script; this controller is the native half, used by the `list`
//! command to walk a repository to exhaustion and by anything else that
//! needs to grow a [`PostPagination`] incrementally.

use crate::cms::{CmsError, CmsQuery};
use crate::content::PostPagination;

/// Drives incremental loading of the post list.
///
/// Owns the pagination state and appends one page per call. A second call
/// while a request is outstanding is a no-op rather than a race: the
/// in-flight flag is set before the fetch and cleared after the state is
/// merged (or the error returned).
pub struct LoadMoreController<'a, C: CmsQuery> {
    client: &'a C,
    state: PostPagination,
    in_flight: bool,
}

impl<'a, C: CmsQuery> LoadMoreController<'a, C> {
    pub fn new(client: &'a C, state: PostPagination) -> Self {
        Self {
            client,
            state,
            in_flight: false,
        }
    }

    /// Current pagination state
    pub fn state(&self) -> &PostPagination {
        &self.state
    }

    /// Consume the controller, yielding the accumulated state
    pub fn into_state(self) -> PostPagination {
        self.state
    }

    /// Fetch the next page and append it to the state.
    ///
    /// Returns `Ok(false)` without touching the state when there is no next
    /// page or a request is already in flight. A failed fetch leaves the
    /// state exactly as it was; the caller decides whether to surface or
    /// swallow the error.
    pub async fn load_more(&mut self) -> Result<bool, CmsError> {
        if self.in_flight || !self.state.has_next_page() {
            return Ok(false);
        }

        // has_next_page() just checked presence
        let url = self.state.next_page.clone().unwrap_or_default();

        self.in_flight = true;
        let result = self.client.query_page(&url).await;
        self.in_flight = false;

        let envelope = result?;
        self.state.append_envelope(&envelope);
        Ok(true)
    }

    /// Keep loading until the CMS reports no further page.
    ///
    /// Page size 1 makes this one request per remaining post.
    pub async fn load_all(&mut self) -> Result<(), CmsError> {
        while self.load_more().await? {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{Document, QueryEnvelope};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fake CMS serving a fixed sequence of one-post pages
    struct FakeCms {
        pages: Vec<QueryEnvelope>,
        calls: AtomicUsize,
    }

    impl FakeCms {
        fn paged(uids: &[&str]) -> Self {
            let pages = uids
                .iter()
                .enumerate()
                .map(|(i, uid)| QueryEnvelope {
                    page: i as u32 + 1,
                    next_page: if i + 1 < uids.len() {
                        Some(format!("https://cms/page/{}", i + 2))
                    } else {
                        None
                    },
                    results: vec![Document {
                        uid: Some(uid.to_string()),
                        first_publication_date: None,
                        data: json!({ "title": uid, "subtitle": "", "author": "" }),
                    }],
                })
                .collect();
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CmsQuery for FakeCms {
        async fn query_type(
            &self,
            _type_name: &str,
            _page_size: usize,
        ) -> Result<QueryEnvelope, CmsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages[0].clone())
        }

        async fn query_by_uid(&self, type_name: &str, uid: &str) -> Result<Document, CmsError> {
            self.pages
                .iter()
                .flat_map(|p| p.results.iter())
                .find(|d| d.uid.as_deref() == Some(uid))
                .cloned()
                .ok_or_else(|| CmsError::NotFound {
                    type_name: type_name.to_string(),
                    uid: uid.to_string(),
                })
        }

        async fn query_page(&self, url: &str) -> Result<QueryEnvelope, CmsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index: usize = url.rsplit('/').next().unwrap().parse().unwrap();
            Ok(self.pages[index - 1].clone())
        }
    }

    #[tokio::test]
    async fn test_load_more_appends_in_order() {
        let cms = FakeCms::paged(&["a", "b", "c"]);
        let initial = PostPagination::from_envelope(&cms.pages[0]);
        let mut controller = LoadMoreController::new(&cms, initial);

        assert!(controller.load_more().await.unwrap());
        assert!(controller.load_more().await.unwrap());

        let uids: Vec<_> = controller
            .state()
            .results
            .iter()
            .map(|p| p.uid.as_deref().unwrap())
            .collect();
        assert_eq!(uids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_exhausted_state_is_a_noop() {
        let cms = FakeCms::paged(&["only"]);
        let initial = PostPagination::from_envelope(&cms.pages[0]);
        let mut controller = LoadMoreController::new(&cms, initial);

        assert!(!controller.load_more().await.unwrap());
        assert_eq!(cms.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.state().results.len(), 1);
    }

    #[tokio::test]
    async fn test_load_all_walks_to_exhaustion() {
        let cms = FakeCms::paged(&["a", "b", "c", "d"]);
        let initial = PostPagination::from_envelope(&cms.pages[0]);
        let mut controller = LoadMoreController::new(&cms, initial);

        controller.load_all().await.unwrap();

        assert_eq!(controller.state().results.len(), 4);
        assert!(!controller.state().has_next_page());
        // one fetch per page after the first
        assert_eq!(cms.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_in_flight_guard_blocks_reentry() {
        let cms = FakeCms::paged(&["a", "b"]);
        let initial = PostPagination::from_envelope(&cms.pages[0]);
        let mut controller = LoadMoreController::new(&cms, initial);
        controller.in_flight = true;

        assert!(!controller.load_more().await.unwrap());
        assert_eq!(controller.state().results.len(), 1);
    }
}

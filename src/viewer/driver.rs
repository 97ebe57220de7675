//! Cooperative fetch driver
//!
//! [`Viewer`] pairs a [`PageController`] with a [`RecordSource`] and runs the
//! fetches the controller asks for. Fetches are futures in a
//! `FuturesUnordered` set polled on the caller's task: nothing is spawned,
//! no fetch is cancelled or coalesced, and results are fed back to the
//! controller one at a time as they settle.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use crate::error::Result;
use crate::source::{Iteration, RecordSource};
use crate::viewer::controller::{LoadRequest, Navigation, PageController, Settlement, ViewerState};

type PendingLoad = BoxFuture<'static, (LoadRequest, Result<Iteration>)>;

/// Paginated record viewer bound to a record source
pub struct Viewer<S: RecordSource + 'static> {
    source: Arc<S>,
    controller: PageController,
    in_flight: FuturesUnordered<PendingLoad>,
    start_page: u32,
}

impl<S: RecordSource + 'static> Viewer<S> {
    /// Create a viewer that starts on page 1
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            controller: PageController::new(),
            in_flight: FuturesUnordered::new(),
            start_page: 1,
        }
    }

    /// Open on `page` instead of page 1
    ///
    /// The page is clamped once the collection size is known.
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = page;
        self
    }

    /// Current display state
    pub fn state(&self) -> &ViewerState {
        self.controller.state()
    }

    /// Number of record fetches that have not settled yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Fetch metadata, select the start page, and issue its record fetch
    ///
    /// A metadata failure is logged and leaves `total_pages` as it was; the
    /// record fetch is issued either way.
    pub async fn initialize(&mut self) {
        let meta = self.source.fetch_meta().await;
        self.controller.apply_meta(meta);

        let page = self.controller.seek(self.start_page);
        if page != self.start_page {
            tracing::info!(
                requested = self.start_page,
                page,
                "Start page out of range, clamped"
            );
        }

        let request = self.controller.load_page(page);
        self.issue(request);
    }

    /// Apply a navigation intent, issuing a fetch if the page changed
    ///
    /// Returns whether a fetch was issued.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::PageOutOfRange` for an invalid jump
    pub fn dispatch(&mut self, navigation: Navigation) -> Result<bool> {
        match self.controller.navigate(navigation)? {
            Some(request) => {
                self.issue(request);
                Ok(true)
            }
            None => {
                tracing::debug!(?navigation, "Navigation disabled at current page");
                Ok(false)
            }
        }
    }

    /// Wait for the next in-flight fetch to settle and apply it
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        let (request, result) = self.in_flight.next().await?;
        Some(self.controller.settle(request, result))
    }

    /// Settle every in-flight fetch, in completion order
    pub async fn settle_all(&mut self) -> Vec<Settlement> {
        let mut settlements = Vec::with_capacity(self.in_flight.len());
        while let Some(settlement) = self.next_settlement().await {
            settlements.push(settlement);
        }
        settlements
    }

    fn issue(&mut self, request: LoadRequest) {
        let source = Arc::clone(&self.source);
        self.in_flight.push(
            async move {
                let result = source.fetch_iteration(request.page).await;
                (request, result)
            }
            .boxed(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::FakeRecordSource;

    async fn initialized(fake: &Arc<FakeRecordSource>) -> Viewer<FakeRecordSource> {
        let mut viewer = Viewer::new(Arc::clone(fake));
        viewer.initialize().await;
        viewer.settle_all().await;
        viewer
    }

    #[tokio::test]
    async fn test_initialize_loads_meta_then_first_page() {
        let fake = Arc::new(FakeRecordSource::with_pages(3));
        let viewer = initialized(&fake).await;

        assert_eq!(fake.meta_calls(), 1);
        assert_eq!(fake.requested_pages(), vec![1]);
        let state = viewer.state();
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.current, Some(FakeRecordSource::sample(1)));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_initialize_is_loading_until_settled() {
        let fake = Arc::new(FakeRecordSource::with_pages(3));
        let mut viewer = Viewer::new(Arc::clone(&fake));
        viewer.initialize().await;
        assert!(viewer.state().loading);
        assert_eq!(viewer.in_flight(), 1);

        viewer.settle_all().await;
        assert!(!viewer.state().loading);
        assert_eq!(viewer.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_start_page_is_clamped() {
        let fake = Arc::new(FakeRecordSource::with_pages(4));
        let mut viewer = Viewer::new(Arc::clone(&fake)).with_start_page(10);
        viewer.initialize().await;
        viewer.settle_all().await;

        assert_eq!(viewer.state().page, 4);
        assert_eq!(fake.requested_pages(), vec![4]);
    }

    #[tokio::test]
    async fn test_next_twice_issues_two_fetches() {
        let fake = Arc::new(FakeRecordSource::with_pages(3));
        let mut viewer = initialized(&fake).await;

        assert!(viewer.dispatch(Navigation::Next).unwrap());
        viewer.settle_all().await;
        assert!(viewer.dispatch(Navigation::Next).unwrap());
        viewer.settle_all().await;
        assert!(!viewer.dispatch(Navigation::Next).unwrap());

        assert_eq!(viewer.state().page, 3);
        assert_eq!(fake.requested_pages(), vec![1, 2, 3]);
        assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(3)));
    }

    #[tokio::test]
    async fn test_meta_failure_still_requests_page_one() {
        let fake = Arc::new(FakeRecordSource::with_pages(0).failing_meta());
        let viewer = initialized(&fake).await;

        let state = viewer.state();
        assert_eq!(state.total_pages, 0);
        assert_eq!(state.page, 1);
        assert!(state.current.is_none());
        assert!(!state.loading);
        assert_eq!(fake.requested_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_record_failure_keeps_previous_record() {
        let fake = Arc::new(FakeRecordSource::with_pages(3).failing_page(2));
        let mut viewer = initialized(&fake).await;

        viewer.dispatch(Navigation::Next).unwrap();
        let settlements = viewer.settle_all().await;

        assert_eq!(settlements, vec![Settlement::Failed { page: 2 }]);
        assert_eq!(viewer.state().page, 2);
        assert_eq!(viewer.state().total_pages, 3);
        assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(1)));
    }

    #[tokio::test]
    async fn test_rapid_navigation_is_not_coalesced() {
        let fake = Arc::new(FakeRecordSource::with_pages(5));
        let mut viewer = initialized(&fake).await;

        viewer.dispatch(Navigation::Next).unwrap();
        viewer.dispatch(Navigation::Next).unwrap();
        viewer.dispatch(Navigation::Jump(5)).unwrap();
        assert_eq!(viewer.in_flight(), 3);

        viewer.settle_all().await;
        assert_eq!(fake.requested_pages(), vec![1, 2, 3, 5]);
        assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(5)));
    }

    #[tokio::test]
    async fn test_out_of_order_settlement_keeps_selected_page() {
        let fake = Arc::new(FakeRecordSource::with_pages(3).gated());
        let mut viewer = Viewer::new(Arc::clone(&fake));
        fake.release(1);
        viewer.initialize().await;
        viewer.settle_all().await;

        viewer.dispatch(Navigation::Next).unwrap();
        viewer.dispatch(Navigation::Next).unwrap();

        // The newer fetch (page 3) settles first, then the older one.
        fake.release(3);
        assert_eq!(
            viewer.next_settlement().await,
            Some(Settlement::Applied { page: 3 })
        );
        assert!(!viewer.state().loading);

        fake.release(2);
        assert_eq!(
            viewer.next_settlement().await,
            Some(Settlement::Stale { page: 2 })
        );

        assert_eq!(viewer.state().page, 3);
        assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(3)));
    }

    #[tokio::test]
    async fn test_older_fetch_settling_first_keeps_loading() {
        let fake = Arc::new(FakeRecordSource::with_pages(3).gated());
        let mut viewer = Viewer::new(Arc::clone(&fake));
        fake.release(1);
        viewer.initialize().await;
        viewer.settle_all().await;

        viewer.dispatch(Navigation::Next).unwrap();
        viewer.dispatch(Navigation::Next).unwrap();

        fake.release(2);
        assert_eq!(
            viewer.next_settlement().await,
            Some(Settlement::Stale { page: 2 })
        );
        assert!(viewer.state().loading);
        assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(1)));

        fake.release(3);
        viewer.settle_all().await;
        assert!(!viewer.state().loading);
        assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(3)));
    }

    #[tokio::test]
    async fn test_next_settlement_with_nothing_in_flight() {
        let fake = Arc::new(FakeRecordSource::with_pages(1));
        let mut viewer = Viewer::new(fake);
        assert_eq!(viewer.next_settlement().await, None);
    }

    #[tokio::test]
    async fn test_invalid_jump_is_error_and_issues_nothing() {
        let fake = Arc::new(FakeRecordSource::with_pages(2));
        let mut viewer = initialized(&fake).await;
        assert!(viewer.dispatch(Navigation::Jump(3)).is_err());
        assert_eq!(viewer.in_flight(), 0);
        assert_eq!(fake.requested_pages(), vec![1]);
    }
}

//! In-memory record source for unit and integration tests
//!
//! [`FakeRecordSource`] serves a scripted collection, records every fetch it
//! receives, and can inject failures for the metadata call or for individual
//! pages.
//!
//! # Gated mode
//!
//! In gated mode a record fetch does not settle until the test calls
//! [`FakeRecordSource::release`] for that page. A release issued before the
//! fetch starts is remembered, so tests can decide the settlement order of
//! overlapping fetches up front:
//!
//! ```
//! use std::sync::Arc;
//! use iterview::source::fake::FakeRecordSource;
//! use iterview::viewer::{Navigation, Settlement, Viewer};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let fake = Arc::new(FakeRecordSource::with_pages(3).gated());
//! let mut viewer = Viewer::new(Arc::clone(&fake));
//!
//! fake.release(1);
//! viewer.initialize().await;
//! viewer.settle_all().await;
//!
//! viewer.dispatch(Navigation::Next).unwrap();
//! viewer.dispatch(Navigation::Next).unwrap();
//!
//! // Let page 3 settle while page 2 is still in flight.
//! fake.release(3);
//! assert_eq!(viewer.next_settlement().await, Some(Settlement::Applied { page: 3 }));
//! assert_eq!(viewer.state().current, Some(FakeRecordSource::sample(3)));
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{Result, ViewerError};
use crate::source::{Iteration, IterationId, IterationMeta, RecordSource, TokenCounts};

/// In-memory [`RecordSource`] with failure injection and call recording
#[derive(Debug, Default)]
pub struct FakeRecordSource {
    total_pages: u32,
    meta_failure: Option<String>,
    failing_pages: HashSet<u32>,
    gated: bool,
    gates: Mutex<HashMap<u32, Arc<Notify>>>,
    requested: Mutex<Vec<u32>>,
    meta_calls: AtomicUsize,
}

impl FakeRecordSource {
    /// A collection of `total_pages` records generated by [`Self::sample`]
    pub fn with_pages(total_pages: u32) -> Self {
        Self {
            total_pages,
            ..Self::default()
        }
    }

    /// Make every metadata fetch fail
    pub fn failing_meta(mut self) -> Self {
        self.meta_failure = Some("metadata endpoint unavailable".to_string());
        self
    }

    /// Make every fetch of `page` fail
    pub fn failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Hold each record fetch until [`Self::release`] is called for its page
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    /// Allow one pending (or future) fetch of `page` to settle
    pub fn release(&self, page: u32) {
        self.gate(page).notify_one();
    }

    /// Pages requested so far, in issuance order
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    /// Number of metadata fetches received
    pub fn meta_calls(&self) -> usize {
        self.meta_calls.load(Ordering::SeqCst)
    }

    /// The record this source serves for `page`
    pub fn sample(page: u32) -> Iteration {
        Iteration {
            id: IterationId::Number(i64::from(page)),
            prompt: format!("Prompt for iteration {}", page),
            tokens: TokenCounts {
                input: 100 * u64::from(page),
                output: 10 * u64::from(page),
            },
            text: format!("Generated text of iteration {}", page),
            cost: Some(0.0001 * f64::from(page)),
            total_runtime_seconds: Some(1.5 * f64::from(page)),
        }
    }

    fn gate(&self, page: u32) -> Arc<Notify> {
        let mut gates = self.gates.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(gates.entry(page).or_default())
    }
}

#[async_trait]
impl RecordSource for FakeRecordSource {
    async fn fetch_meta(&self) -> Result<IterationMeta> {
        self.meta_calls.fetch_add(1, Ordering::SeqCst);
        match &self.meta_failure {
            Some(message) => Err(ViewerError::MetaFetch(message.clone()).into()),
            None => Ok(IterationMeta {
                total_pages: self.total_pages,
            }),
        }
    }

    async fn fetch_iteration(&self, page: u32) -> Result<Iteration> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(page);
        }

        if self.gated {
            self.gate(page).notified().await;
        }

        if self.failing_pages.contains(&page) {
            return Err(ViewerError::RecordFetch {
                page,
                message: "injected failure".to_string(),
            }
            .into());
        }

        if page == 0 || page > self.total_pages {
            return Err(ViewerError::RecordFetch {
                page,
                message: "server returned 400 Bad Request: Invalid iteration ID".to_string(),
            }
            .into());
        }

        Ok(Self::sample(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_meta_and_records() {
        let fake = FakeRecordSource::with_pages(2);
        assert_eq!(fake.fetch_meta().await.unwrap().total_pages, 2);
        assert_eq!(fake.fetch_iteration(2).await.unwrap(), FakeRecordSource::sample(2));
        assert_eq!(fake.meta_calls(), 1);
        assert_eq!(fake.requested_pages(), vec![2]);
    }

    #[tokio::test]
    async fn test_out_of_range_page_fails() {
        let fake = FakeRecordSource::with_pages(2);
        assert!(fake.fetch_iteration(3).await.is_err());
        assert!(fake.fetch_iteration(0).await.is_err());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let fake = FakeRecordSource::with_pages(2).failing_meta().failing_page(1);
        let meta_err = fake.fetch_meta().await.unwrap_err();
        assert!(matches!(
            meta_err.downcast_ref::<ViewerError>(),
            Some(ViewerError::MetaFetch(_))
        ));
        let record_err = fake.fetch_iteration(1).await.unwrap_err();
        assert!(matches!(
            record_err.downcast_ref::<ViewerError>(),
            Some(ViewerError::RecordFetch { page: 1, .. })
        ));
        assert!(fake.fetch_iteration(2).await.is_ok());
    }

    #[tokio::test]
    async fn test_release_before_fetch_is_remembered() {
        let fake = FakeRecordSource::with_pages(1).gated();
        fake.release(1);
        let record = tokio::time::timeout(std::time::Duration::from_secs(1), fake.fetch_iteration(1))
            .await
            .expect("released fetch should not block");
        assert!(record.is_ok());
    }

    #[tokio::test]
    async fn test_gated_fetch_blocks_until_released() {
        let fake = FakeRecordSource::with_pages(1).gated();
        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(50), fake.fetch_iteration(1)).await;
        assert!(pending.is_err(), "unreleased fetch should still be pending");
    }
}

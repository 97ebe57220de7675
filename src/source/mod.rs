//! Remote record source abstraction
//!
//! The viewer reads from a service exposing two read-only endpoints:
//!
//! - `GET /iterations/meta` returns the collection size
//! - `GET /iteration/{idx}` returns one record by 1-based index
//!
//! [`RecordSource`] is the seam between the page controller and that
//! service. [`HttpRecordSource`] talks to the real thing;
//! [`fake::FakeRecordSource`] is an in-memory double for tests.

use crate::error::Result;
use async_trait::async_trait;

pub mod fake;
pub mod http;
pub mod types;

pub use http::HttpRecordSource;
pub use types::{Iteration, IterationId, IterationMeta, TokenCounts};

/// Read-only access to the iteration collection
///
/// # Examples
///
/// ```no_run
/// use iterview::source::{Iteration, IterationMeta, RecordSource};
/// use iterview::error::Result;
/// use async_trait::async_trait;
///
/// struct Empty;
///
/// #[async_trait]
/// impl RecordSource for Empty {
///     async fn fetch_meta(&self) -> Result<IterationMeta> {
///         Ok(IterationMeta { total_pages: 0 })
///     }
///
///     async fn fetch_iteration(&self, page: u32) -> Result<Iteration> {
///         anyhow::bail!("no iteration {}", page)
///     }
/// }
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the collection metadata
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::MetaFetch` on transport or decoding failure
    async fn fetch_meta(&self) -> Result<IterationMeta>;

    /// Fetch the record shown on `page` (1-based)
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::RecordFetch` on transport or decoding failure
    async fn fetch_iteration(&self, page: u32) -> Result<Iteration>;
}

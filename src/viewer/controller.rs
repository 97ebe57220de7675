//! Page state controller
//!
//! [`PageController`] owns the display state of the pager and is the only
//! thing that mutates it. It performs no I/O: navigation returns the
//! [`LoadRequest`] that should be issued, and the caller hands the outcome
//! back through [`PageController::settle`].
//!
//! Every load carries a [`LoadToken`]. Only the most recently issued token can
//! change `current` or clear `loading`; anything older settles as
//! [`Settlement::Stale`] and is dropped, so rapid navigation never leaves the
//! display on a page other than the selected one.

use crate::error::{Result, ViewerError};
use crate::source::{Iteration, IterationMeta};

/// Monotonically increasing identity of an issued record fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Raw sequence number
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A record fetch the controller wants issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Identity used to detect superseded results
    pub token: LoadToken,
    /// 1-based page to fetch
    pub page: u32,
}

/// User navigation intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Go to page 1
    First,
    /// Go back one page
    Prev,
    /// Go forward one page
    Next,
    /// Go to a specific 1-based page
    Jump(u32),
}

/// Outcome of handing a fetch result to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The fetched record replaced `current`
    Applied {
        /// Page the record belongs to
        page: u32,
    },
    /// The fetch failed; `current` was left as it was
    Failed {
        /// Page whose fetch failed
        page: u32,
    },
    /// A newer fetch was issued after this one; the result was discarded
    Stale {
        /// Page the discarded fetch targeted
        page: u32,
    },
}

/// Everything the renderer needs to draw a frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    /// Selected page, always within `1..=max(total_pages, 1)`
    pub page: u32,
    /// Collection size; 0 until metadata arrives
    pub total_pages: u32,
    /// Last successfully loaded record
    pub current: Option<Iteration>,
    /// True while the latest record fetch is unsettled
    pub loading: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 0,
            current: None,
            loading: false,
        }
    }
}

impl ViewerState {
    /// Upper bound for `page`
    pub fn max_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// Whether the First and Prev controls are enabled
    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    /// Whether the Next control is enabled
    pub fn can_go_forward(&self) -> bool {
        self.page < self.max_page()
    }
}

/// Bounds-checked page navigation with load tracking
///
/// # Examples
///
/// ```
/// use iterview::source::IterationMeta;
/// use iterview::viewer::PageController;
///
/// let mut controller = PageController::new();
/// controller.apply_meta(Ok(IterationMeta { total_pages: 3 }));
///
/// let request = controller.go_next().expect("page 2 should load");
/// assert_eq!(request.page, 2);
/// assert!(controller.state().loading);
/// ```
#[derive(Debug, Default)]
pub struct PageController {
    state: ViewerState,
    next_token: u64,
    latest: Option<LoadToken>,
}

impl PageController {
    /// Create a controller on page 1 with an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Current display state
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Token of the most recently issued fetch, if any
    pub fn latest_token(&self) -> Option<LoadToken> {
        self.latest
    }

    /// Apply the result of a metadata fetch
    ///
    /// On success `total_pages` is replaced and `page` is re-clamped to the
    /// new bound. On failure nothing changes and the error is logged.
    /// Returns whether the metadata was applied.
    pub fn apply_meta(&mut self, result: Result<IterationMeta>) -> bool {
        match result {
            Ok(meta) => {
                tracing::debug!(total_pages = meta.total_pages, "Applied iteration metadata");
                self.state.total_pages = meta.total_pages;
                self.state.page = self.clamp(self.state.page);
                true
            }
            Err(e) => {
                tracing::warn!(
                    total_pages = self.state.total_pages,
                    "Failed to fetch iteration metadata: {:#}",
                    e
                );
                false
            }
        }
    }

    /// Move to `page`, clamped into range, without issuing a fetch
    ///
    /// Returns the page actually selected.
    pub fn seek(&mut self, page: u32) -> u32 {
        self.state.page = self.clamp(page);
        self.state.page
    }

    /// Issue a fetch for `page`
    ///
    /// Sets `loading` and makes the new token the only one whose result will
    /// be applied.
    pub fn load_page(&mut self, page: u32) -> LoadRequest {
        self.next_token += 1;
        let token = LoadToken(self.next_token);
        self.latest = Some(token);
        self.state.loading = true;
        tracing::debug!(page, token = token.value(), "Issuing record fetch");
        LoadRequest { token, page }
    }

    /// Apply the outcome of a record fetch
    pub fn settle(&mut self, request: LoadRequest, result: Result<Iteration>) -> Settlement {
        let page = request.page;

        if self.latest != Some(request.token) {
            tracing::debug!(
                page,
                token = request.token.value(),
                selected = self.state.page,
                "Discarding superseded record fetch"
            );
            return Settlement::Stale { page };
        }

        self.state.loading = false;
        match result {
            Ok(record) => {
                self.state.current = Some(record);
                Settlement::Applied { page }
            }
            Err(e) => {
                tracing::warn!(page, "Failed to fetch iteration: {:#}", e);
                Settlement::Failed { page }
            }
        }
    }

    /// Apply a navigation intent
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::PageOutOfRange` for a jump outside
    /// `1..=total_pages`
    pub fn navigate(&mut self, navigation: Navigation) -> Result<Option<LoadRequest>> {
        match navigation {
            Navigation::First => Ok(self.go_first()),
            Navigation::Prev => Ok(self.go_prev()),
            Navigation::Next => Ok(self.go_next()),
            Navigation::Jump(page) => self.go_to(page),
        }
    }

    /// Go to page 1; disabled when already there
    pub fn go_first(&mut self) -> Option<LoadRequest> {
        if !self.state.can_go_back() {
            return None;
        }
        self.state.page = 1;
        Some(self.load_page(1))
    }

    /// Go back one page; disabled on page 1
    pub fn go_prev(&mut self) -> Option<LoadRequest> {
        if !self.state.can_go_back() {
            return None;
        }
        self.state.page = self.clamp(self.state.page - 1);
        Some(self.load_page(self.state.page))
    }

    /// Go forward one page; disabled on the last page
    pub fn go_next(&mut self) -> Option<LoadRequest> {
        if !self.state.can_go_forward() {
            return None;
        }
        self.state.page = self.clamp(self.state.page + 1);
        Some(self.load_page(self.state.page))
    }

    /// Jump to `page`
    ///
    /// Jumping to the page already selected is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::PageOutOfRange` unless `1 <= page <= total_pages`
    pub fn go_to(&mut self, page: u32) -> Result<Option<LoadRequest>> {
        if page == 0 || page > self.state.total_pages {
            return Err(ViewerError::PageOutOfRange {
                requested: page,
                total_pages: self.state.total_pages,
            }
            .into());
        }
        if page == self.state.page {
            return Ok(None);
        }
        self.state.page = page;
        Ok(Some(self.load_page(page)))
    }

    fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.state.max_page())
    }
}

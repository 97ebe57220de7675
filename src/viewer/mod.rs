//! Paginated record viewer
//!
//! - [`controller`]: the page state machine (bounds, loading flag, stale
//!   result rejection)
//! - [`driver`]: runs the controller's fetches against a record source

pub mod controller;
pub mod driver;

pub use controller::{LoadRequest, LoadToken, Navigation, PageController, Settlement, ViewerState};
pub use driver::Viewer;

//! IterView - terminal pager for LLM iteration records
//!
//! This library provides the pieces behind the `iterview` binary: a record
//! source abstraction over the iteration HTTP service, the page state
//! controller, terminal rendering, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `source`: Record source trait, HTTP implementation, and test double
//! - `viewer`: Page state controller and the fetch driver around it
//! - `render`: Pure rendering of viewer state for the terminal
//! - `commands`: CLI command handlers and pager input parsing
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use iterview::{Config, HttpRecordSource, Navigation, Viewer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let source = Arc::new(HttpRecordSource::new(&config.api)?);
//!     let mut viewer = Viewer::new(source);
//!     viewer.initialize().await;
//!     viewer.dispatch(Navigation::Next)?;
//!     viewer.settle_all().await;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod source;
pub mod viewer;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ViewerError};
pub use render::Renderer;
pub use source::{HttpRecordSource, Iteration, IterationMeta, RecordSource};
pub use viewer::{Navigation, PageController, Settlement, Viewer, ViewerState};

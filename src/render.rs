//! Terminal rendering of the viewer state
//!
//! Rendering is a pure function of [`ViewerState`]: the same state always
//! produces the same text. Nothing here touches the controller.

use colored::{ColoredString, Colorize};
use prettytable::{format, row, Table};
use serde::Serialize;

use crate::error::{Result, ViewerError};
use crate::source::{Iteration, IterationMeta};
use crate::viewer::ViewerState;

/// Text shown while a fetch is in flight or before any record has loaded
pub const LOADING_TEXT: &str = "⏳ Loading…";

/// Renders viewer frames for the terminal
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    colors: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Renderer {
    /// Create a renderer; `colors` toggles ANSI styling
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Render a full frame
    ///
    /// # Examples
    ///
    /// ```
    /// use iterview::render::{Renderer, LOADING_TEXT};
    /// use iterview::viewer::ViewerState;
    ///
    /// let frame = Renderer::new(false).render(&ViewerState::default());
    /// assert!(frame.contains(LOADING_TEXT));
    /// ```
    pub fn render(&self, state: &ViewerState) -> String {
        let iteration = match &state.current {
            Some(iteration) if !state.loading => iteration,
            _ => return self.paint(LOADING_TEXT, |s| s.dimmed()).to_string(),
        };

        let mut out = String::new();
        out.push_str(&self.metadata_bar(iteration));
        out.push_str("\n\n");
        out.push_str(iteration.text.trim_end());
        out.push_str("\n\n");
        out.push_str(&self.sidebar(state, iteration));
        out.push_str(&self.controls(state));
        out
    }

    /// Render a single record without pager chrome, for `show`
    pub fn render_iteration(&self, iteration: &Iteration) -> String {
        format!(
            "{}\n\n{}\n\nCost: {}  Runtime: {}",
            self.metadata_bar(iteration),
            iteration.text.trim_end(),
            format_cost(iteration.cost),
            format_runtime(iteration.total_runtime_seconds)
        )
    }

    /// Render collection metadata, for `meta`
    pub fn render_meta(&self, meta: &IterationMeta) -> String {
        format!(
            "{} {}",
            self.paint("Total iterations:", |s| s.bold()),
            meta.total_pages
        )
    }

    /// Style an informational one-liner
    pub fn notice(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed()).to_string()
    }

    /// Style an error one-liner
    pub fn error(&self, text: &str) -> String {
        self.paint(text, |s| s.red()).to_string()
    }

    fn metadata_bar(&self, iteration: &Iteration) -> String {
        format!(
            "{} {} | {} {} | {} {}/{}",
            self.paint("Iteration:", |s| s.bold().cyan()),
            iteration.id,
            self.paint("Prompt:", |s| s.bold().cyan()),
            iteration.prompt,
            self.paint("Tokens:", |s| s.bold().cyan()),
            iteration.tokens.output,
            iteration.tokens.input
        )
    }

    fn sidebar(&self, state: &ViewerState, iteration: &Iteration) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(row!["Total iterations", state.total_pages]);
        table.add_row(row![
            "Current page",
            format!("{}/{}", state.page, state.total_pages)
        ]);
        table.add_row(row!["Cost", format_cost(iteration.cost)]);
        table.add_row(row![
            "Runtime",
            format_runtime(iteration.total_runtime_seconds)
        ]);
        table.to_string()
    }

    fn controls(&self, state: &ViewerState) -> String {
        let mut enabled = Vec::new();
        if state.can_go_back() {
            enabled.push("[f]irst".to_string());
            enabled.push("[p]rev".to_string());
        }
        if state.can_go_forward() {
            enabled.push("[n]ext".to_string());
        }
        if state.total_pages > 0 {
            enabled.push(format!("[j]ump 1-{}", state.total_pages));
        }
        enabled.push("[h]elp".to_string());
        enabled.push("[q]uit".to_string());

        format!("{}\n", self.paint(&enabled.join("  "), |s| s.dimmed()))
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> ColoredString {
        if self.colors {
            style(text)
        } else {
            text.normal()
        }
    }
}

/// Dollar cost with four decimals, or `N/A`
pub fn format_cost(cost: Option<f64>) -> String {
    cost.map(|c| format!("${:.4}", c))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Runtime in seconds with two decimals, or `N/A`
pub fn format_runtime(seconds: Option<f64>) -> String {
    seconds
        .map(|s| format!("{:.2}s", s))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Pretty-printed JSON for `--json` output
///
/// # Errors
///
/// Returns error if the value cannot be serialized
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(ViewerError::Serialization)?)
}

/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `browse` - Interactive pager
- `show`   - Print a single iteration
- `meta`   - Print the collection size

`browse` drives a [`Viewer`] over the HTTP record source; `show` and `meta`
call the source directly and report failures through the exit status.
*/

use crate::config::Config;
use crate::error::{Result, ViewerError};
use crate::render::{self, Renderer};
use crate::source::{HttpRecordSource, RecordSource};
use crate::viewer::{Navigation, Settlement, Viewer};
use colored::Colorize;
use std::sync::Arc;

// Pager input parser
pub mod navigation_commands;

use navigation_commands::{parse_pager_command, PagerCommand};

/// Whether the pager loop keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input
    Continue,
    /// Leave the pager
    Exit,
}

/// Apply one pager command and return the text to display
///
/// Navigation that issues a fetch shows the loading frame; the record itself
/// is displayed when the fetch settles (see [`describe_settlement`]).
pub fn apply_command<S: RecordSource + 'static>(
    viewer: &mut Viewer<S>,
    renderer: &Renderer,
    command: PagerCommand,
) -> (Flow, Option<String>) {
    match command {
        PagerCommand::Navigate(navigation) => match viewer.dispatch(navigation) {
            Ok(true) => (Flow::Continue, Some(renderer.render(viewer.state()))),
            Ok(false) => (
                Flow::Continue,
                Some(renderer.notice(&disabled_message(navigation))),
            ),
            Err(e) => (Flow::Continue, Some(renderer.error(&e.to_string()))),
        },
        PagerCommand::Status => (Flow::Continue, Some(renderer.render(viewer.state()))),
        PagerCommand::Help => {
            navigation_commands::print_help();
            (Flow::Continue, None)
        }
        PagerCommand::Exit => (Flow::Exit, None),
    }
}

/// Text to display once a record fetch settles
///
/// An applied record is shown, and a failed fetch redraws the last record
/// that loaded successfully. Superseded results are dropped silently.
pub fn describe_settlement<S: RecordSource + 'static>(
    viewer: &Viewer<S>,
    renderer: &Renderer,
    settlement: Settlement,
) -> Option<String> {
    match settlement {
        Settlement::Applied { .. } | Settlement::Failed { .. } => {
            Some(renderer.render(viewer.state()))
        }
        Settlement::Stale { .. } => None,
    }
}

fn disabled_message(navigation: Navigation) -> String {
    match navigation {
        Navigation::First | Navigation::Prev => "Already on the first page".to_string(),
        Navigation::Next => "Already on the last page".to_string(),
        Navigation::Jump(page) => format!("Already on page {}", page),
    }
}

// Interactive pager
pub mod browse {
    //! Interactive pager handler.
    //!
    //! Line input is read by rustyline on a dedicated thread and forwarded
    //! over a channel, so the pager task can keep settling record fetches
    //! while the user types.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use tokio::sync::mpsc;

    /// Events produced by the input thread
    #[derive(Debug)]
    enum InputEvent {
        Line(String),
        Closed,
    }

    /// Start the interactive pager
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `page` - Optional start page overriding `viewer.start_page`
    pub async fn run_browse(config: Config, page: Option<u32>) -> Result<()> {
        let start_page = page.unwrap_or(config.viewer.start_page);
        tracing::info!(
            base_url = %config.api.base_url,
            start_page,
            "Starting interactive pager"
        );

        let source = Arc::new(HttpRecordSource::new(&config.api)?);
        let renderer = Renderer::new(config.viewer.colors);
        let mut viewer = Viewer::new(source).with_start_page(start_page);

        print_welcome_banner(&config.api.base_url);
        viewer.initialize().await;
        println!("{}", renderer.render(viewer.state()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        // Detached; exits on the next line read after the receiver is dropped.
        std::thread::spawn(move || read_input(tx));

        loop {
            tokio::select! {
                Some(settlement) = viewer.next_settlement(), if viewer.in_flight() > 0 => {
                    if let Some(frame) = describe_settlement(&viewer, &renderer, settlement) {
                        println!("\n{}", frame);
                    }
                }
                event = rx.recv() => {
                    let line = match event {
                        Some(InputEvent::Line(line)) => line,
                        Some(InputEvent::Closed) | None => break,
                    };

                    let command = match parse_pager_command(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", renderer.error(&e.to_string()));
                            continue;
                        }
                    };

                    let (flow, output) = apply_command(&mut viewer, &renderer, command);
                    if let Some(text) = output {
                        println!("{}", text);
                    }
                    if flow == Flow::Exit {
                        break;
                    }
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn read_input(tx: mpsc::UnboundedSender<InputEvent>) {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize line editor: {}", e);
                let _ = tx.send(InputEvent::Closed);
                return;
            }
        };

        loop {
            match rl.readline("iterview> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Err(e) = rl.add_history_entry(trimmed) {
                        tracing::debug!("Failed to record history entry: {}", e);
                    }
                    if tx.send(InputEvent::Line(trimmed.to_string())).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    let _ = tx.send(InputEvent::Closed);
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    let _ = tx.send(InputEvent::Closed);
                    break;
                }
            }
        }
    }

    fn print_welcome_banner(base_url: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 IterView - Iteration Pager                   ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Source: {}", base_url.cyan());
        println!("Type 'help' for available commands, 'quit' to exit\n");
    }
}

// Single record lookup
pub mod show {
    //! One-shot iteration lookup.

    use super::*;

    /// Fetch and print the iteration on `page`
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::RecordFetch` if the record cannot be fetched
    pub async fn run_show(config: &Config, page: u32, json: bool) -> Result<()> {
        if page == 0 {
            return Err(ViewerError::PageOutOfRange {
                requested: page,
                total_pages: 0,
            }
            .into());
        }

        let source = HttpRecordSource::new(&config.api)?;
        let iteration = source.fetch_iteration(page).await?;

        if json {
            println!("{}", render::to_json(&iteration)?);
        } else {
            let renderer = Renderer::new(config.viewer.colors);
            println!("{}", renderer.render_iteration(&iteration));
        }
        Ok(())
    }
}

// Collection metadata
pub mod meta {
    //! One-shot metadata lookup.

    use super::*;

    /// Fetch and print the collection size
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::MetaFetch` if metadata cannot be fetched
    pub async fn run_meta(config: &Config, json: bool) -> Result<()> {
        let source = HttpRecordSource::new(&config.api)?;
        let meta = source.fetch_meta().await?;

        if json {
            println!("{}", render::to_json(&meta)?);
        } else {
            let renderer = Renderer::new(config.viewer.colors);
            println!("{}", renderer.render_meta(&meta));
        }
        Ok(())
    }
}

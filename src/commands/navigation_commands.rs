//! Navigation command parser for the interactive pager
//!
//! Parses a line typed at the pager prompt into a [`PagerCommand`].
//! Commands are case-insensitive, may be written with or without a leading
//! `/`, and have single-letter aliases. A bare number jumps to that page.

use crate::viewer::Navigation;
use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing pager input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType 'help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType 'help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Commands accepted at the pager prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerCommand {
    /// Move between pages
    Navigate(Navigation),
    /// Redraw the current frame
    Status,
    /// Display help information
    Help,
    /// Leave the pager
    Exit,
}

/// Parse a line of pager input
///
/// # Errors
///
/// Returns `CommandError` for unknown commands, missing jump targets, and
/// jump targets that are not positive integers
///
/// # Examples
///
/// ```
/// use iterview::commands::navigation_commands::{parse_pager_command, PagerCommand};
/// use iterview::viewer::Navigation;
///
/// assert_eq!(parse_pager_command("n").unwrap(), PagerCommand::Navigate(Navigation::Next));
/// assert_eq!(parse_pager_command("/goto 4").unwrap(), PagerCommand::Navigate(Navigation::Jump(4)));
/// assert_eq!(parse_pager_command("7").unwrap(), PagerCommand::Navigate(Navigation::Jump(7)));
/// assert!(parse_pager_command("/foo").is_err());
/// ```
pub fn parse_pager_command(input: &str) -> Result<PagerCommand, CommandError> {
    let lower = input.trim().to_lowercase();
    let line = lower.strip_prefix('/').unwrap_or(&lower);

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();

    if let Some(extra) = parts.next() {
        return Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: extra.to_string(),
        });
    }

    match (command, arg) {
        ("first" | "f" | "home", None) => Ok(PagerCommand::Navigate(Navigation::First)),
        ("prev" | "p" | "previous" | "back", None) => Ok(PagerCommand::Navigate(Navigation::Prev)),
        ("next" | "n" | "forward", None) => Ok(PagerCommand::Navigate(Navigation::Next)),
        ("jump" | "j" | "goto" | "go", Some(target)) => {
            parse_page(command, target).map(|page| PagerCommand::Navigate(Navigation::Jump(page)))
        }
        ("jump" | "j" | "goto" | "go", None) => Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: format!("{} <page>", command),
        }),
        ("status" | "s" | "show", None) => Ok(PagerCommand::Status),
        ("help" | "h" | "?", None) => Ok(PagerCommand::Help),
        ("exit" | "quit" | "q", None) => Ok(PagerCommand::Exit),
        (number, None) if number.chars().all(|c| c.is_ascii_digit()) && !number.is_empty() => {
            parse_page("jump", number).map(|page| PagerCommand::Navigate(Navigation::Jump(page)))
        }
        (
            "first" | "f" | "home" | "prev" | "p" | "previous" | "back" | "next" | "n" | "forward"
            | "status" | "s" | "show" | "help" | "h" | "?" | "exit" | "quit" | "q",
            Some(arg),
        ) => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
        _ => Err(CommandError::UnknownCommand(input.trim().to_string())),
    }
}

fn parse_page(command: &str, target: &str) -> Result<u32, CommandError> {
    match target.parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: target.to_string(),
        }),
    }
}

/// Print pager help
pub fn print_help() {
    println!("\n{}", "Pager commands".bold());
    println!("  {}        go to the first page", "first, f".cyan());
    println!("  {}         go to the previous page", "prev, p".cyan());
    println!("  {}         go to the next page", "next, n".cyan());
    println!("  {}  jump to page N (or just type N)", "jump N, j N".cyan());
    println!("  {}       redraw the current page", "status, s".cyan());
    println!("  {}         show this help", "help, h".cyan());
    println!("  {}         leave the pager", "quit, q".cyan());
    println!();
}

//! Help listing rendered from the command registry
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Paginate listings that exceed the message limit
//! - 1.0.0: Initial single-message help page

use std::fmt::Write;

use super::registry::CommandRegistry;
use crate::core::response::paginate_code_block;

pub const HELP_DISCLAIMER: &str =
    "Please note that this bot is still in development. Please report any bugs to @TweetMeepsi on twitter.";

const DIVIDER: &str = "------------------------------------------------";

/// Names that open the help page; handled by the dispatcher, never registered
pub const HELP_ALIASES: [&str; 2] = ["help", "he"];

pub struct HelpFormatter;

impl HelpFormatter {
    /// Full help page as a single message
    pub fn render(registry: &CommandRegistry) -> String {
        format!("{}```\n{}```", Self::lead(), Self::body(registry))
    }

    /// Help page split into messages of at most `limit` bytes
    ///
    /// Returns exactly `[render(registry)]` when it fits.
    pub fn render_pages(registry: &CommandRegistry, limit: usize) -> Vec<String> {
        paginate_code_block(&Self::lead(), &Self::body(registry), limit)
    }

    fn lead() -> String {
        format!("{HELP_DISCLAIMER}\nCommands: ")
    }

    fn body(registry: &CommandRegistry) -> String {
        let mut out = String::new();

        // help is a dispatcher built-in, so its entry is written by hand
        let _ = writeln!(out, "{}: Print this help page.", HELP_ALIASES[0]);
        let _ = writeln!(out, "Aliases: ");
        for alias in &HELP_ALIASES[1..] {
            let _ = writeln!(out, "\t{alias}");
        }
        let _ = writeln!(out, "{DIVIDER}\n");

        let mut entries = registry.entries().peekable();
        while let Some((name, info)) = entries.next() {
            let _ = writeln!(out, "{name}: {}", info.description);

            let extra = info.extra_aliases();
            if !extra.is_empty() {
                let _ = writeln!(out, "Aliases:");
                for alias in extra {
                    let _ = writeln!(out, "\t{alias}");
                }
            }

            if !info.options.is_empty() {
                let _ = writeln!(out, "Options: ");
                for option in &info.options {
                    let _ = writeln!(out, "\t{option}");
                }
            }

            if entries.peek().is_some() {
                let _ = writeln!(out, "\n{DIVIDER}\n");
            }
        }

        out
    }
}

//! Command registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Alias table and insertion-ordered entries for prefix commands
//! - 1.0.0: Initial name to command map

use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

use super::command::{Command, CommandInfo};

/// Registry of prefix commands keyed by canonical name
///
/// Built once at startup, then shared read-only with the dispatcher.
/// Registering a canonical name that already exists replaces the earlier
/// command in place (last registration wins, original help position kept).
///
/// # Example
///
/// ```ignore
/// let mut registry = CommandRegistry::new();
/// registry.register(Arc::new(PingCommand::new(platform.clone())));
///
/// if let Some(name) = registry.resolve("p") {
///     let command = registry.lookup(name);
/// }
/// ```
#[derive(Clone, Default)]
pub struct CommandRegistry {
    /// Commands in registration order
    commands: Vec<(String, Arc<dyn Command>)>,
    /// canonical name -> index into `commands`
    names: HashMap<String, usize>,
    /// alias (canonical names included) -> canonical name
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under every alias its descriptor declares
    ///
    /// Aliases are lowercased to match the parser's case folding.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let aliases: Vec<String> = command
            .info()
            .aliases
            .iter()
            .map(|a| a.to_ascii_lowercase())
            .collect();

        let Some(name) = aliases.first().cloned() else {
            warn!(
                "Ignoring command without aliases: {}",
                command.info().description
            );
            return;
        };

        match self.names.get(&name).copied() {
            Some(index) => {
                warn!("Command '{name}' registered twice, replacing the earlier one");
                self.aliases
                    .retain(|alias, target| *target != name || aliases.contains(alias));
                self.commands[index].1 = command;
            }
            None => {
                self.names.insert(name.clone(), self.commands.len());
                self.commands.push((name.clone(), command));
            }
        }

        for alias in aliases {
            self.aliases.insert(alias, name.clone());
        }
    }

    /// Canonical name for an alias
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.aliases.get(token).map(String::as_str)
    }

    /// Command registered under a canonical name
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.names
            .get(name)
            .map(|&index| Arc::clone(&self.commands[index].1))
    }

    /// Check if a canonical name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// `(canonical name, descriptor)` pairs in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CommandInfo)> {
        self.commands
            .iter()
            .map(|(name, command)| (name.as_str(), command.info()))
    }

    /// Number of registered commands (aliases not counted)
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

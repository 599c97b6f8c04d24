//! Name-keyed command registry.
//!
//! Registration happens during the load phase and rejects duplicate names;
//! after that the registry is shared behind an `Arc` and only read, so
//! concurrent lookups from dispatch workers need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::Command;
use crate::error::CommandError;

/// Registry of executable commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name.
    ///
    /// A duplicate name is rejected with `COMMAND_REGISTRATION_FAILED`
    /// rather than shadowing the prior command.
    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<(), CommandError> {
        let name = command.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(CommandError::registration_failed(&name));
        }
        info!(command = %name, "Registered command");
        self.commands.insert(name, command);
        Ok(())
    }

    /// Look up a command by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names, sorted for stable listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

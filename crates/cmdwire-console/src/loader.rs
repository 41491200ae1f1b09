//! Command loaders

use std::collections::HashMap;
use std::sync::Arc;

use crate::command::SharedCommand;
use crate::error::{ConsoleError, ConsoleResult};

/// Resolves commands by name on demand
pub trait CommandLoader: Send + Sync {
    /// Check whether a command name is known, without constructing it
    fn has(&self, name: &str) -> bool;

    /// Construct the command registered under `name`
    fn get(&self, name: &str) -> ConsoleResult<SharedCommand>;

    /// All known names, without constructing anything
    fn names(&self) -> Vec<String>;
}

type Factory = Arc<dyn Fn() -> ConsoleResult<SharedCommand> + Send + Sync>;

/// Loader backed by plain closures
#[derive(Default)]
pub struct FactoryCommandLoader {
    order: Vec<String>,
    factories: HashMap<String, Factory>,
}

impl FactoryCommandLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing one already registered under `name`
    pub fn add<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> ConsoleResult<SharedCommand> + Send + Sync + 'static,
    {
        let name = name.into();
        if !self.factories.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.factories.insert(name, Arc::new(factory));
        self
    }
}

impl CommandLoader for FactoryCommandLoader {
    fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn get(&self, name: &str) -> ConsoleResult<SharedCommand> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConsoleError::CommandNotFound {
                name: name.to_string(),
            })?;
        factory()
    }

    fn names(&self) -> Vec<String> {
        self.order.clone()
    }
}

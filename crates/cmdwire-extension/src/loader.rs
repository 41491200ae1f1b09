//! Name to service lookup for lazily constructed commands

use std::collections::HashMap;
use std::sync::Arc;

use cmdwire_console::{CommandLoader, ConsoleError, ConsoleResult, SharedCommand};
use cmdwire_di::ServiceLocator;
use tracing::{debug, warn};

use crate::error::{ExtensionError, Result};
use crate::service::{as_command, COMMAND_CAPABILITY};

/// Collects command name to service id entries while wiring
#[derive(Debug, Clone, Default)]
pub struct LazyCommandLoaderBuilder {
    entries: Vec<(String, String)>,
}

impl LazyCommandLoaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to `service_id`
    ///
    /// A repeated name replaces the previous service id but keeps its
    /// position. Returns the replaced id.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        service_id: impl Into<String>,
    ) -> Option<String> {
        let name = name.into();
        let service_id = service_id.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            warn!(
                "Command name '{}' is registered by both '{}' and '{}', using '{}'",
                name, existing, service_id, service_id
            );
            return Some(std::mem::replace(existing, service_id));
        }

        debug!("Mapped command '{}' to service '{}'", name, service_id);
        self.entries.push((name, service_id));
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, service_id)| (name.as_str(), service_id.as_str()))
    }

    /// Freeze the table, resolving services through `locator`
    pub fn seal(self, locator: Arc<dyn ServiceLocator>) -> LazyCommandLoader {
        let index = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, (name, _))| (name.clone(), position))
            .collect();

        LazyCommandLoader {
            entries: self.entries,
            index,
            locator,
        }
    }
}

/// Read-only command table backed by the container
///
/// Looking up a name never constructs anything; [`get`](Self::get) resolves
/// the service on every call and leaves caching to the container.
pub struct LazyCommandLoader {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    locator: Arc<dyn ServiceLocator>,
}

impl LazyCommandLoader {
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Service id registered under `name`
    pub fn service_id(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|position| self.entries[*position].1.as_str())
    }

    pub fn get(&self, name: &str) -> Result<SharedCommand> {
        let service_id = self
            .service_id(name)
            .ok_or_else(|| ExtensionError::CommandNotFound {
                name: name.to_string(),
            })?;

        resolve_command(self.locator.as_ref(), service_id)
    }

    /// Names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }
}

impl CommandLoader for LazyCommandLoader {
    fn has(&self, name: &str) -> bool {
        LazyCommandLoader::has(self, name)
    }

    fn get(&self, name: &str) -> ConsoleResult<SharedCommand> {
        LazyCommandLoader::get(self, name).map_err(|error| into_console_error(name, error))
    }

    fn names(&self) -> Vec<String> {
        LazyCommandLoader::names(self)
    }
}

impl std::fmt::Debug for LazyCommandLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyCommandLoader")
            .field("entries", &self.entries)
            .finish()
    }
}

/// Resolve a service and check that it is a command
pub(crate) fn resolve_command(
    locator: &dyn ServiceLocator,
    service_id: &str,
) -> Result<SharedCommand> {
    let instance = locator.get_service(service_id)?;
    as_command(&instance).ok_or_else(|| ExtensionError::InvalidServiceType {
        service_id: service_id.to_string(),
        expected: COMMAND_CAPABILITY.to_string(),
        actual: instance.type_name().to_string(),
    })
}

pub(crate) fn into_console_error(name: &str, error: ExtensionError) -> ConsoleError {
    match error {
        ExtensionError::CommandNotFound { name } => ConsoleError::CommandNotFound { name },
        other => ConsoleError::Loader {
            name: name.to_string(),
            source: Box::new(other),
        },
    }
}

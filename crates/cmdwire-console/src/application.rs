//! The console application

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::{SharedCommand, FAILURE, SUCCESS};
use crate::error::{ConsoleError, ConsoleResult};
use crate::io::{Input, Output};
use crate::loader::CommandLoader;
use crate::table::{Cell, Table};

/// Name and version used when none is configured
pub const UNKNOWN: &str = "UNKNOWN";

/// Name of the built-in command list
pub const LIST_COMMAND: &str = "list";

/// Dispatches invocations to eagerly added commands or to a command loader
///
/// Commands are looked up on every request; nothing resolved through the
/// loader is kept by the application.
pub struct Application {
    name: String,
    version: String,
    catch_exceptions: bool,
    commands: Vec<SharedCommand>,
    index: HashMap<String, usize>,
    loader: Option<Arc<dyn CommandLoader>>,
}

impl Application {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            catch_exceptions: false,
            commands: Vec::new(),
            index: HashMap::new(),
            loader: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Render command errors instead of returning them from `run`
    pub fn set_catch_exceptions(&mut self, catch: bool) -> &mut Self {
        self.catch_exceptions = catch;
        self
    }

    pub fn catches_exceptions(&self) -> bool {
        self.catch_exceptions
    }

    pub fn set_command_loader(&mut self, loader: Arc<dyn CommandLoader>) -> &mut Self {
        self.loader = Some(loader);
        self
    }

    pub fn command_loader(&self) -> Option<&Arc<dyn CommandLoader>> {
        self.loader.as_ref()
    }

    /// Add a command under its name and aliases
    pub fn add(&mut self, command: SharedCommand) -> ConsoleResult<()> {
        let metadata = command.metadata();
        let name = metadata
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ConsoleError::InvalidCommand(
                    "command cannot have an empty name".to_string(),
                )
            })?;

        let position = self.commands.len();
        self.commands.push(command);
        for key in std::iter::once(name).chain(metadata.aliases) {
            if let Some(previous) = self.index.insert(key.clone(), position) {
                warn!("Command name '{}' replaced (was command #{})", key, previous);
            }
        }

        Ok(())
    }

    /// Get a command by exact name or alias of an added command, or by
    /// loader name
    pub fn get(&self, name: &str) -> ConsoleResult<SharedCommand> {
        if let Some(position) = self.index.get(name) {
            return Ok(self.commands[*position].clone());
        }

        match &self.loader {
            Some(loader) if loader.has(name) => loader.get(name),
            _ => Err(ConsoleError::CommandNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Check whether `name` is known, without constructing loader commands
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
            || self.loader.as_ref().is_some_and(|loader| loader.has(name))
    }

    /// Get a command by name, falling back to aliases of loader commands
    ///
    /// Loader entries that fail to load are skipped while searching aliases.
    pub fn find(&self, name: &str) -> ConsoleResult<SharedCommand> {
        if self.has(name) {
            return self.get(name);
        }

        if let Some(loader) = &self.loader {
            for candidate in loader.names() {
                if self.index.contains_key(&candidate) {
                    continue;
                }
                match loader.get(&candidate) {
                    Ok(command) if command.metadata().answers_to(name) => return Ok(command),
                    Ok(_) => {}
                    Err(error) => {
                        debug!(
                            "Skipping command '{}' while resolving '{}': {}",
                            candidate, name, error
                        );
                    }
                }
            }
        }

        Err(ConsoleError::CommandNotFound {
            name: name.to_string(),
        })
    }

    /// All commands keyed by name: added commands first, then loader names
    /// not shadowed by them
    pub fn all(&self) -> ConsoleResult<Vec<(String, SharedCommand)>> {
        let mut all = Vec::new();
        for command in &self.commands {
            if let Some(name) = command.metadata().name {
                all.push((name, command.clone()));
            }
        }

        if let Some(loader) = &self.loader {
            for name in loader.names() {
                if self.index.contains_key(&name) {
                    continue;
                }
                let command = loader.get(&name)?;
                all.push((name, command));
            }
        }

        Ok(all)
    }

    /// Run the command named by the first token
    pub fn run<I, S>(&self, args: I, output: &mut dyn Output) -> ConsoleResult<i32>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let input = Input::from_args(args);
        match self.do_run(&input, output) {
            Err(ConsoleError::CommandNotFound { name }) => {
                let style = output.style();
                output.writeln(&style.error(&format!("Command \"{}\" is not defined.", name)))?;
                Ok(FAILURE)
            }
            Err(error) if self.catch_exceptions => {
                debug!("Command failed: {}", error);
                let style = output.style();
                output.writeln(&style.error(&error.to_string()))?;
                Ok(FAILURE)
            }
            result => result,
        }
    }

    fn do_run(&self, input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        let name = input.command_name().unwrap_or(LIST_COMMAND);
        if name == LIST_COMMAND && !self.has(LIST_COMMAND) {
            return self.render_list(output);
        }

        let command = self.find(name)?;
        debug!("Running command '{}'", name);
        command.execute(input, output)
    }

    fn render_list(&self, output: &mut dyn Output) -> ConsoleResult<i32> {
        let style = output.style();
        output.writeln(&format!(
            "{} {}",
            self.name,
            style.info(&self.version)
        ))?;
        output.writeln("")?;
        output.writeln(&style.comment("Available commands:"))?;

        let mut table = Table::new().with_indent(2);
        for (name, command) in self.all()? {
            let metadata = command.metadata();
            if metadata.hidden {
                continue;
            }
            table.add_row(vec![
                Cell::colored(name, colored::Color::Green),
                Cell::plain(metadata.description),
            ]);
        }

        for line in table.render(style) {
            output.writeln(&line)?;
        }
        Ok(SUCCESS)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("catch_exceptions", &self.catch_exceptions)
            .field("commands", &self.commands.len())
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

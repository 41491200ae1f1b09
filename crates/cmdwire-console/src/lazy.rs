//! Commands whose construction is deferred

use std::fmt;
use std::sync::Arc;

use crate::command::{Command, CommandMetadata, SharedCommand};
use crate::error::ConsoleResult;
use crate::io::{Input, Output};

type CommandFactory = Arc<dyn Fn() -> ConsoleResult<SharedCommand> + Send + Sync>;

/// A command known by its metadata until it has to run
///
/// Listing a `LazyCommand` never constructs the wrapped command. The factory
/// is invoked on every [`command`](LazyCommand::command) call; caching, if
/// any, belongs to whatever the factory resolves from.
#[derive(Clone)]
pub struct LazyCommand {
    metadata: CommandMetadata,
    factory: CommandFactory,
}

impl LazyCommand {
    pub fn new<F>(metadata: CommandMetadata, factory: F) -> Self
    where
        F: Fn() -> ConsoleResult<SharedCommand> + Send + Sync + 'static,
    {
        Self {
            metadata,
            factory: Arc::new(factory),
        }
    }

    /// Construct the wrapped command
    pub fn command(&self) -> ConsoleResult<SharedCommand> {
        (self.factory)()
    }
}

impl Command for LazyCommand {
    fn metadata(&self) -> CommandMetadata {
        self.metadata.clone()
    }

    fn execute(&self, input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        self.command()?.execute(input, output)
    }
}

impl fmt::Debug for LazyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCommand")
            .field("metadata", &self.metadata)
            .finish()
    }
}

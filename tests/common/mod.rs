//! Commands shared by the workspace integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use cmdwire_console::{Command, CommandMetadata, ConsoleResult, Input, Output, SUCCESS};

/// Number of `GreetCommand` instances constructed so far
pub static GREETERS_CREATED: AtomicUsize = AtomicUsize::new(0);

/// Greets its first argument
pub struct GreetCommand;

impl GreetCommand {
    pub fn new() -> Self {
        GREETERS_CREATED.fetch_add(1, Ordering::SeqCst);
        Self
    }
}

impl Default for GreetCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for GreetCommand {
    fn default_name() -> Option<&'static str> {
        Some("greet|hello")
    }

    fn default_description() -> Option<&'static str> {
        Some("Greet someone")
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::from_defaults::<Self>()
    }

    fn execute(&self, input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        let name = input.argument(0).unwrap_or("world");
        output.writeln(&format!("Hello, {}!", name))?;
        Ok(SUCCESS)
    }
}

/// Command that only knows its name once constructed
pub struct StatusCommand;

impl Command for StatusCommand {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::new("status").with_description("Show status")
    }

    fn execute(&self, _input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        output.writeln("ok")?;
        Ok(SUCCESS)
    }
}

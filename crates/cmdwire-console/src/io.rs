//! Command input and output

use std::io::Write;

use crate::error::ConsoleResult;
use crate::style::Style;

/// Positional input of a single invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    command: Option<String>,
    arguments: Vec<String>,
}

impl Input {
    /// Split raw tokens into the command name and its arguments
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = args.into_iter().map(Into::into);
        let command = tokens.next();
        Self {
            command,
            arguments: tokens.collect(),
        }
    }

    pub fn command_name(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }
}

/// Destination of command output
pub trait Output {
    fn write(&mut self, text: &str) -> ConsoleResult<()>;

    fn writeln(&mut self, text: &str) -> ConsoleResult<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Whether colours and other decorations should be emitted
    fn is_decorated(&self) -> bool;

    fn style(&self) -> Style {
        Style::new(self.is_decorated())
    }
}

/// Output to stdout, decorated when stdout is a terminal
pub struct ConsoleOutput {
    decorated: bool,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self {
            decorated: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_decorated(decorated: bool) -> Self {
        Self { decorated }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for ConsoleOutput {
    fn write(&mut self, text: &str) -> ConsoleResult<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn is_decorated(&self) -> bool {
        self.decorated
    }
}

/// In-memory output, mostly for tests
#[derive(Debug, Default)]
pub struct BufferedOutput {
    buffer: String,
    decorated: bool,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decorated() -> Self {
        Self {
            buffer: String::new(),
            decorated: true,
        }
    }

    /// Take everything written so far, emptying the buffer
    pub fn fetch(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl Output for BufferedOutput {
    fn write(&mut self, text: &str) -> ConsoleResult<()> {
        self.buffer.push_str(text);
        Ok(())
    }

    fn is_decorated(&self) -> bool {
        self.decorated
    }
}

//! The command abstraction

use std::any::type_name;
use std::sync::Arc;

use crate::error::ConsoleResult;
use crate::io::{Input, Output};

/// Exit code of a successful command
pub const SUCCESS: i32 = 0;
/// Exit code of a failed command
pub const FAILURE: i32 = 1;

/// A console command
///
/// Implementations declare static defaults through
/// [`default_name`](Command::default_name) and
/// [`default_description`](Command::default_description) so that integrations
/// can learn them from the type alone, without constructing the command.
pub trait Command: Send + Sync {
    /// Name the command type is registered under unless configured otherwise
    fn default_name() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    fn default_description() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    /// Effective metadata of this instance
    fn metadata(&self) -> CommandMetadata;

    /// Run the command, returning its exit code
    fn execute(&self, input: &Input, output: &mut dyn Output) -> ConsoleResult<i32>;
}

/// Shared, type-erased command
pub type SharedCommand = Arc<dyn Command>;

/// Name, description, aliases and visibility of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMetadata {
    pub name: Option<String>,
    pub description: String,
    pub aliases: Vec<String>,
    pub hidden: bool,
}

impl CommandMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Metadata built from the static defaults of `C`
    pub fn from_defaults<C: Command>() -> Self {
        Self {
            name: C::default_name().map(str::to_string),
            description: C::default_description().unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Check whether `name` is the name or one of the aliases
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name) || self.aliases.iter().any(|alias| alias == name)
    }
}

/// Static facts about a command type
///
/// Attached to service types so the defaults are readable before any
/// instance exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandType {
    pub type_name: &'static str,
    pub default_name: Option<&'static str>,
    pub default_description: Option<&'static str>,
}

impl CommandType {
    pub fn of<C: Command>() -> Self {
        Self {
            type_name: type_name::<C>(),
            default_name: C::default_name(),
            default_description: C::default_description(),
        }
    }
}

/// A command with metadata overrides applied over an inner command
pub struct ConfiguredCommand {
    inner: SharedCommand,
    name: Option<String>,
    description: Option<String>,
    aliases: Option<Vec<String>>,
    hidden: Option<bool>,
}

impl ConfiguredCommand {
    pub fn new(inner: SharedCommand) -> Self {
        Self {
            inner,
            name: None,
            description: None,
            aliases: None,
            hidden: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// The decorated command
    pub fn inner(&self) -> &SharedCommand {
        &self.inner
    }
}

impl Command for ConfiguredCommand {
    fn metadata(&self) -> CommandMetadata {
        let mut metadata = self.inner.metadata();
        if let Some(name) = &self.name {
            metadata.name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            metadata.description = description.clone();
        }
        if let Some(aliases) = &self.aliases {
            metadata.aliases = aliases.clone();
        }
        if let Some(hidden) = self.hidden {
            metadata.hidden = hidden;
        }
        metadata
    }

    fn execute(&self, input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        self.inner.execute(input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufferedOutput;

    struct Greet;

    impl Command for Greet {
        fn default_name() -> Option<&'static str> {
            Some("greet")
        }

        fn metadata(&self) -> CommandMetadata {
            CommandMetadata::from_defaults::<Self>()
        }

        fn execute(&self, _input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
            output.writeln("hello")?;
            Ok(SUCCESS)
        }
    }

    #[test]
    fn test_command_type_defaults() {
        let ty = CommandType::of::<Greet>();
        assert_eq!(ty.default_name, Some("greet"));
        assert_eq!(ty.default_description, None);
        assert!(ty.type_name.ends_with("Greet"));
    }

    #[test]
    fn test_configured_command_overrides() {
        let configured = ConfiguredCommand::new(Arc::new(Greet))
            .with_name("hi")
            .with_aliases(vec!["hey".to_string()])
            .with_hidden(true);

        let metadata = configured.metadata();
        assert_eq!(metadata.name.as_deref(), Some("hi"));
        assert_eq!(metadata.description, "");
        assert!(metadata.hidden);
        assert!(metadata.answers_to("hey"));
        assert!(!metadata.answers_to("greet"));
    }

    #[test]
    fn test_configured_command_delegates_execution() {
        let configured = ConfiguredCommand::new(Arc::new(Greet)).with_description("Says hello");
        let mut output = BufferedOutput::new();

        let code = configured.execute(&Input::default(), &mut output).unwrap();
        assert_eq!(code, SUCCESS);
        assert_eq!(output.fetch(), "hello\n");
    }
}

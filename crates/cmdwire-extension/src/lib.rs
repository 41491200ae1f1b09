//! Console integration for the cmdwire container
//!
//! [`ConsoleExtension`] discovers command services, works out each command's
//! name, aliases, description and visibility from type defaults and tags, and
//! registers them with an [`Application`](cmdwire_console::Application)
//! through a [`LazyCommandLoader`], so that commands are only constructed when
//! they are run.
//!
//! ```rust
//! use cmdwire_console::{Application, BufferedOutput};
//! use cmdwire_di::Compiler;
//! use cmdwire_extension::{ConsoleConfig, ConsoleExtension};
//!
//! let mut compiler = Compiler::new();
//! compiler
//!     .add_extension(ConsoleExtension::new(ConsoleConfig::default()))
//!     .unwrap();
//! let container = compiler.compile().unwrap();
//!
//! let application = container.get_by_type::<Application>().unwrap();
//! let mut output = BufferedOutput::new();
//! assert_eq!(application.run(["commands-debug"], &mut output).unwrap(), 0);
//! assert_eq!(output.fetch(), "All commands are lazy-loaded.\n");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod extension;
pub mod loader;
pub mod metadata;
pub mod service;
pub mod sorter;

pub use commands::{CommandsDebugCommand, DiParametersCommand, NotLazyCommand};
pub use config::{ConsoleConfig, DEFAULT_COMMAND_TAG};
pub use error::{ExtensionError, Message, Result};
pub use extension::ConsoleExtension;
pub use loader::{LazyCommandLoader, LazyCommandLoaderBuilder};
pub use metadata::{
    resolve, split_name, CommandDescriptor, CommandKind, CommandTag, ResolvedMetadata, SplitName,
};
pub use service::{as_command, command_instance, command_type, shared_command_instance};
pub use sorter::{sort_by_type, SortedParameters, SortedValue};

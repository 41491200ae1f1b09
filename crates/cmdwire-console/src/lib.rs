//! Console application framework for cmdwire
//!
//! Provides the [`Command`] trait, an [`Application`] that dispatches to
//! eagerly added commands or to a [`CommandLoader`], and [`LazyCommand`], a
//! wrapper that exposes a command's metadata without constructing it.
//!
//! ```rust
//! use std::sync::Arc;
//! use cmdwire_console::*;
//!
//! struct Hello;
//!
//! impl Command for Hello {
//!     fn default_name() -> Option<&'static str> {
//!         Some("hello")
//!     }
//!
//!     fn metadata(&self) -> CommandMetadata {
//!         CommandMetadata::from_defaults::<Self>()
//!     }
//!
//!     fn execute(&self, _input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
//!         output.writeln("Hello!")?;
//!         Ok(SUCCESS)
//!     }
//! }
//!
//! let mut app = Application::default();
//! app.add(Arc::new(Hello)).unwrap();
//!
//! let mut output = BufferedOutput::new();
//! assert_eq!(app.run(["hello"], &mut output).unwrap(), SUCCESS);
//! assert_eq!(output.fetch(), "Hello!\n");
//! ```

pub mod application;
pub mod command;
pub mod error;
pub mod io;
pub mod lazy;
pub mod loader;
pub mod style;
pub mod table;

pub use application::{Application, LIST_COMMAND, UNKNOWN};
pub use command::{
    Command, CommandMetadata, CommandType, ConfiguredCommand, SharedCommand, FAILURE, SUCCESS,
};
pub use error::{ConsoleError, ConsoleResult};
pub use io::{BufferedOutput, ConsoleOutput, Input, Output};
pub use lazy::LazyCommand;
pub use loader::{CommandLoader, FactoryCommandLoader};
pub use style::Style;
pub use table::{Cell, Table};

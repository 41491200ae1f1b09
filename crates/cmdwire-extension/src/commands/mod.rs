//! Built-in commands

pub mod debug;
pub mod parameters;

pub use debug::{CommandsDebugCommand, NotLazyCommand};
pub use parameters::DiParametersCommand;

//! Storing commands in the container
//!
//! Commands live in the container as a [`SharedCommand`] so that any
//! implementation can be recovered without knowing its concrete type. The
//! instance keeps the concrete type name for diagnostics.

use std::any::type_name;
use std::sync::Arc;

use cmdwire_console::{Command, CommandType, SharedCommand};
use cmdwire_di::{Instance, ServiceType};

/// Capability name reported when a service is not a command
pub const COMMAND_CAPABILITY: &str = "cmdwire_console::Command";

/// Wrap a command as a container instance
pub fn command_instance<C: Command + 'static>(command: C) -> Instance {
    shared_command_instance(Arc::new(command), type_name::<C>())
}

/// Wrap an already shared command, reporting `type_name` as its type
pub fn shared_command_instance(command: SharedCommand, type_name: &'static str) -> Instance {
    Instance::erased(Arc::new(command), type_name)
}

/// Recover a command from a container instance
pub fn as_command(instance: &Instance) -> Option<SharedCommand> {
    instance.downcast_ref::<SharedCommand>().cloned()
}

/// Service type of a command, carrying its static defaults
pub fn command_type<C: Command + 'static>() -> ServiceType {
    ServiceType::of::<C>().with(CommandType::of::<C>())
}

//! Auto-discovery of service definitions using the inventory crate
//!
//! Crates linked into a binary can contribute definitions without the binary
//! naming them:
//!
//! ```rust,ignore
//! use cmdwire_di::{Instance, ServiceRegistration};
//!
//! inventory::submit! {
//!     ServiceRegistration::new("clock", |builder| {
//!         builder
//!             .add_definition("clock")?
//!             .set_factory(|_| Ok(Instance::new(SystemClock)));
//!         Ok(())
//!     })
//! }
//! ```
//!
//! [`register_all_discovered_services`] (or
//! [`Compiler::with_discovered_services`](crate::Compiler::with_discovered_services))
//! then applies every submitted registration to a builder.

use tracing::{debug, info};

use crate::{ContainerBuilder, DIResult};

/// A registration descriptor collected via inventory
pub struct ServiceRegistration {
    /// Name of the service group
    pub name: &'static str,

    /// Adds the group's definitions to the builder
    pub register_fn: fn(&mut ContainerBuilder) -> DIResult<()>,

    /// Registration order, lower runs first (default 100)
    pub priority: u32,
}

impl ServiceRegistration {
    pub const fn new(
        name: &'static str,
        register_fn: fn(&mut ContainerBuilder) -> DIResult<()>,
    ) -> Self {
        Self::with_priority(name, register_fn, 100)
    }

    pub const fn with_priority(
        name: &'static str,
        register_fn: fn(&mut ContainerBuilder) -> DIResult<()>,
        priority: u32,
    ) -> Self {
        Self {
            name,
            register_fn,
            priority,
        }
    }
}

inventory::collect!(ServiceRegistration);

/// Apply all discovered registrations to the builder in priority order
pub fn register_all_discovered_services(builder: &mut ContainerBuilder) -> DIResult<()> {
    let mut registrations: Vec<&ServiceRegistration> =
        inventory::iter::<ServiceRegistration>().collect();
    // Stable sort keeps link order for equal priorities
    registrations.sort_by_key(|registration| registration.priority);

    info!(
        "Discovered {} service registrations via inventory",
        registrations.len()
    );

    for registration in registrations {
        debug!(
            "Registering services for '{}' (priority: {})",
            registration.name, registration.priority
        );
        (registration.register_fn)(builder)?;
    }

    Ok(())
}

pub fn discovered_registration_count() -> usize {
    inventory::iter::<ServiceRegistration>().count()
}

/// Names of all discovered registrations
pub fn list_discovered_registrations() -> Vec<&'static str> {
    inventory::iter::<ServiceRegistration>()
        .map(|registration| registration.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Instance;

    inventory::submit! {
        ServiceRegistration::with_priority("registration_test", |builder| {
            builder
                .add_definition("registration_test.marker")?
                .set_factory(|_| Ok(Instance::new("discovered")));
            Ok(())
        }, 5)
    }

    #[test]
    fn test_discovered_registrations_include_test() {
        let names = list_discovered_registrations();
        assert!(names.contains(&"registration_test"));
        assert!(discovered_registration_count() >= 1);
    }

    #[test]
    fn test_register_all_discovered() {
        let mut builder = ContainerBuilder::new();
        register_all_discovered_services(&mut builder).unwrap();

        assert!(builder.has_definition("registration_test.marker"));
        let container = builder.build().unwrap();
        let marker = container.get::<&str>("registration_test.marker").unwrap();
        assert_eq!(*marker, "discovered");
    }
}

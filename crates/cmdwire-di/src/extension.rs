//! Compiler extensions
//!
//! Extensions contribute definitions to a [`ContainerBuilder`] in two passes.
//! Every extension's [`load_configuration`](CompilerExtension::load_configuration)
//! runs first, so that each one can register its own services. Then every
//! [`before_compile`](CompilerExtension::before_compile) runs, when the full
//! set of definitions is known and can be searched by tag or type.

use std::any::{Any, TypeId};
use std::sync::Arc;

use tracing::{debug, info};

use crate::parameters::Parameters;
use crate::registration::register_all_discovered_services;
use crate::{Container, ContainerBuilder, DIError, DIResult};

/// A participant in container compilation
///
/// ```rust,ignore
/// struct ClockExtension;
///
/// impl CompilerExtension for ClockExtension {
///     fn name(&self) -> &str { "clock" }
///
///     fn load_configuration(&mut self, builder: &mut ContainerBuilder) -> DIResult<()> {
///         builder
///             .add_definition("clock.system")?
///             .set_factory(|_| Ok(Instance::new(SystemClock)));
///         Ok(())
///     }
/// }
/// ```
pub trait CompilerExtension: Any + Send {
    /// Unique name of this extension instance, used as a service id prefix
    fn name(&self) -> &str;

    /// Register the extension's own definitions
    #[allow(unused_variables)]
    fn load_configuration(&mut self, builder: &mut ContainerBuilder) -> DIResult<()> {
        Ok(())
    }

    /// Inspect and rewrite definitions once all extensions are loaded
    #[allow(unused_variables)]
    fn before_compile(&mut self, builder: &mut ContainerBuilder) -> DIResult<()> {
        Ok(())
    }
}

/// Identity of a registered extension, visible to other extensions
#[derive(Debug, Clone)]
pub struct ExtensionInfo {
    pub name: String,
    pub type_id: TypeId,
}

/// Runs extensions against a builder and seals the result
pub struct Compiler {
    builder: ContainerBuilder,
    extensions: Vec<Box<dyn CompilerExtension>>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            builder: ContainerBuilder::new(),
            extensions: Vec::new(),
        }
    }

    /// Builder for definitions registered outside of extensions
    pub fn builder_mut(&mut self) -> &mut ContainerBuilder {
        &mut self.builder
    }

    pub fn set_parameters(&mut self, parameters: Parameters) -> &mut Self {
        self.builder.set_parameters(parameters);
        self
    }

    /// Control whether parameters are exported into the compiled container
    pub fn export_parameters(&mut self, export: bool) -> &mut Self {
        self.builder.set_export_parameters(export);
        self
    }

    /// Apply registrations discovered via inventory
    pub fn with_discovered_services(&mut self) -> DIResult<&mut Self> {
        register_all_discovered_services(&mut self.builder)?;
        Ok(self)
    }

    /// Add an extension; names must be unique
    pub fn add_extension<E: CompilerExtension>(&mut self, extension: E) -> DIResult<&mut Self> {
        let name = extension.name().to_string();
        if self.extensions.iter().any(|existing| existing.name() == name) {
            return Err(DIError::ExtensionAlreadyRegistered { name });
        }

        debug!("Added compiler extension '{}'", name);
        self.builder.register_extension(ExtensionInfo {
            name,
            type_id: TypeId::of::<E>(),
        });
        self.extensions.push(Box::new(extension));
        Ok(self)
    }

    /// Names of added extensions in order
    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|extension| extension.name()).collect()
    }

    /// Run both extension passes and seal the container
    pub fn compile(mut self) -> DIResult<Arc<Container>> {
        info!("Compiling container with {} extensions", self.extensions.len());

        for extension in &mut self.extensions {
            debug!("Loading configuration of '{}'", extension.name());
            extension.load_configuration(&mut self.builder)?;
        }

        for extension in &mut self.extensions {
            debug!("Running before_compile of '{}'", extension.name());
            extension.before_compile(&mut self.builder)?;
        }

        self.builder.build()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

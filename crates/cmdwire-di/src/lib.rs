//! Service container for cmdwire
//!
//! Services are described at build time by [`ServiceDefinition`]s collected in a
//! [`ContainerBuilder`]. Compiler extensions inspect and rewrite those
//! definitions before the builder is sealed into an immutable [`Container`],
//! which constructs services on first request and caches singletons.
//!
//! ## Quick Start
//!
//! ```rust
//! use cmdwire_di::{ContainerBuilder, Instance};
//!
//! let mut builder = ContainerBuilder::new();
//! builder
//!     .add_definition("greeting")
//!     .unwrap()
//!     .set_factory(|_| Ok(Instance::new(String::from("hello"))));
//!
//! let container = builder.build().unwrap();
//! let greeting = container.get::<String>("greeting").unwrap();
//! assert_eq!(greeting.as_str(), "hello");
//! ```

pub mod builder;
pub mod definition;
pub mod extension;
pub mod parameters;
pub mod registration;

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};
use std::thread::ThreadId;

use parking_lot::Mutex;
use tracing::{debug, trace};

pub use builder::ContainerBuilder;
pub use definition::{Factory, Instance, ServiceDefinition, ServiceType, Setup, TagValue};
pub use extension::{Compiler, CompilerExtension, ExtensionInfo};
pub use parameters::{ParameterValue, Parameters};
pub use registration::{
    discovered_registration_count, list_discovered_registrations,
    register_all_discovered_services, ServiceRegistration,
};

/// Errors that can occur during dependency injection operations
#[derive(Debug, thiserror::Error)]
pub enum DIError {
    #[error("Service not registered: {service_id}")]
    ServiceNotRegistered { service_id: String },

    #[error("Service already registered: {service_id}")]
    ServiceAlreadyRegistered { service_id: String },

    #[error("Service '{service_id}' has no factory")]
    MissingFactory { service_id: String },

    #[error("Service '{service_id}' returns instance of {actual}, expected {expected}")]
    InvalidServiceType {
        service_id: String,
        expected: String,
        actual: String,
    },

    #[error("Circular reference detected while resolving service '{service_id}'")]
    CircularDependency { service_id: String },

    #[error("Container was released before service '{service_id}' could be resolved")]
    ContainerReleased { service_id: String },

    #[error("Extension already registered: {name}")]
    ExtensionAlreadyRegistered { name: String },

    #[error("Dependency resolution failed: {message}")]
    DependencyResolutionFailed { message: String },

    #[error("Extension '{extension}' failed: {source}")]
    Extension {
        extension: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type DIResult<T> = Result<T, DIError>;

/// Service lifetime management
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceLifetime {
    /// Service is created once and reused for the entire container lifetime
    #[default]
    Singleton,
    /// Service is created each time it's requested
    Transient,
}

/// Runtime view of a container used by code that resolves services by id.
///
/// [`Container`] implements it directly; `Weak<Container>` implements it for
/// holders that must not keep the container alive.
pub trait ServiceLocator: Send + Sync {
    /// Resolve a service instance by id
    fn get_service(&self, service_id: &str) -> DIResult<Instance>;

    /// Check if a service id is known
    fn has_service(&self, service_id: &str) -> bool;

    /// Check if a singleton service was already constructed
    fn is_created(&self, service_id: &str) -> bool;
}

/// Sealed registration of a single service
struct ServiceEntry {
    service_type: Option<ServiceType>,
    autowired: bool,
    lifetime: ServiceLifetime,
    factory: Factory,
    setups: Vec<Setup>,
    instance: OnceLock<Instance>,
}

/// The dependency injection container
///
/// Always handed out as `Arc<Container>` so that services can capture a weak
/// handle back to it.
pub struct Container {
    services: HashMap<String, ServiceEntry>,
    order: Vec<String>,
    parameters: Parameters,
    resolving: Mutex<HashSet<(ThreadId, String)>>,
    this: Weak<Container>,
}

impl Container {
    pub(crate) fn from_definitions(
        definitions: Vec<ServiceDefinition>,
        parameters: Parameters,
    ) -> DIResult<Arc<Self>> {
        let mut services = HashMap::with_capacity(definitions.len());
        let mut order = Vec::with_capacity(definitions.len());

        for definition in definitions {
            let parts = definition.into_parts();
            let factory = parts.factory.ok_or_else(|| DIError::MissingFactory {
                service_id: parts.id.clone(),
            })?;

            order.push(parts.id.clone());
            services.insert(
                parts.id,
                ServiceEntry {
                    service_type: parts.service_type,
                    autowired: parts.autowired,
                    lifetime: parts.lifetime,
                    factory,
                    setups: parts.setups,
                    instance: OnceLock::new(),
                },
            );
        }

        debug!("Sealed container with {} services", order.len());

        Ok(Arc::new_cyclic(|this| Self {
            services,
            order,
            parameters,
            resolving: Mutex::new(HashSet::new()),
            this: this.clone(),
        }))
    }

    /// Resolve a service instance by id
    pub fn get_service(&self, service_id: &str) -> DIResult<Instance> {
        let entry = self
            .services
            .get(service_id)
            .ok_or_else(|| DIError::ServiceNotRegistered {
                service_id: service_id.to_string(),
            })?;

        if entry.lifetime == ServiceLifetime::Singleton {
            if let Some(instance) = entry.instance.get() {
                return Ok(instance.clone());
            }
        }

        let instance = {
            let _guard = ResolutionGuard::enter(self, service_id)?;
            self.create(service_id, entry)?
        };

        match entry.lifetime {
            ServiceLifetime::Singleton => Ok(entry.instance.get_or_init(|| instance).clone()),
            ServiceLifetime::Transient => Ok(instance),
        }
    }

    fn create(&self, service_id: &str, entry: &ServiceEntry) -> DIResult<Instance> {
        let mut instance = (entry.factory)(self)?;
        for setup in &entry.setups {
            instance = setup(self, instance)?;
        }

        debug!(
            "Created service '{}' of type {}",
            service_id,
            instance.type_name()
        );
        Ok(instance)
    }

    /// Resolve a service by id and downcast it to `T`
    pub fn get<T>(&self, service_id: &str) -> DIResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let instance = self.get_service(service_id)?;
        instance
            .downcast::<T>()
            .ok_or_else(|| DIError::InvalidServiceType {
                service_id: service_id.to_string(),
                expected: type_name::<T>().to_string(),
                actual: instance.type_name().to_string(),
            })
    }

    /// Resolve the first autowired service declared with type `T`
    pub fn get_by_type<T>(&self) -> DIResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let type_id = TypeId::of::<T>();
        let service_id = self
            .order
            .iter()
            .find(|id| {
                self.services.get(*id).is_some_and(|entry| {
                    entry.autowired
                        && entry
                            .service_type
                            .as_ref()
                            .is_some_and(|ty| ty.type_id() == type_id)
                })
            })
            .ok_or_else(|| DIError::ServiceNotRegistered {
                service_id: type_name::<T>().to_string(),
            })?;

        self.get::<T>(service_id)
    }

    /// Check if a service is registered
    pub fn has_service(&self, service_id: &str) -> bool {
        self.services.contains_key(service_id)
    }

    /// Check if a singleton service was already constructed
    pub fn is_created(&self, service_id: &str) -> bool {
        self.services
            .get(service_id)
            .is_some_and(|entry| entry.instance.get().is_some())
    }

    /// Service ids in registration order
    pub fn service_ids(&self) -> &[String] {
        &self.order
    }

    /// Get the number of registered services
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Parameters exported into the container
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Weak handle to this container, for services that resolve lazily
    pub fn downgrade(&self) -> Weak<Container> {
        self.this.clone()
    }
}

impl ServiceLocator for Container {
    fn get_service(&self, service_id: &str) -> DIResult<Instance> {
        Container::get_service(self, service_id)
    }

    fn has_service(&self, service_id: &str) -> bool {
        Container::has_service(self, service_id)
    }

    fn is_created(&self, service_id: &str) -> bool {
        Container::is_created(self, service_id)
    }
}

impl ServiceLocator for Weak<Container> {
    fn get_service(&self, service_id: &str) -> DIResult<Instance> {
        let container = self.upgrade().ok_or_else(|| DIError::ContainerReleased {
            service_id: service_id.to_string(),
        })?;
        container.get_service(service_id)
    }

    fn has_service(&self, service_id: &str) -> bool {
        self.upgrade()
            .is_some_and(|container| container.has_service(service_id))
    }

    fn is_created(&self, service_id: &str) -> bool {
        self.upgrade()
            .is_some_and(|container| container.is_created(service_id))
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.order)
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

/// Marks a service as being resolved on the current thread
struct ResolutionGuard<'a> {
    container: &'a Container,
    key: (ThreadId, String),
}

impl<'a> ResolutionGuard<'a> {
    fn enter(container: &'a Container, service_id: &str) -> DIResult<Self> {
        let key = (std::thread::current().id(), service_id.to_string());
        if !container.resolving.lock().insert(key.clone()) {
            return Err(DIError::CircularDependency {
                service_id: service_id.to_string(),
            });
        }

        trace!("Resolving service '{}'", service_id);
        Ok(Self { container, key })
    }
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.container.resolving.lock().remove(&self.key);
    }
}

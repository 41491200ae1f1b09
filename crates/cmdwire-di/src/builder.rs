//! Mutable, build-time view of the container

use std::any::{Any, TypeId};
use std::sync::Arc;

use tracing::{debug, info};

use crate::definition::{ServiceDefinition, ServiceType, TagValue};
use crate::extension::ExtensionInfo;
use crate::parameters::Parameters;
use crate::{Container, DIError, DIResult};

/// Collects service definitions and parameters before the container is sealed
pub struct ContainerBuilder {
    definitions: Vec<ServiceDefinition>,
    parameters: Parameters,
    export_parameters: bool,
    extensions: Vec<ExtensionInfo>,
}

impl ContainerBuilder {
    /// Create an empty builder that exports parameters into the container
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            parameters: Parameters::new(),
            export_parameters: true,
            extensions: Vec::new(),
        }
    }

    /// Add a new definition and return it for configuration
    pub fn add_definition(&mut self, id: impl Into<String>) -> DIResult<&mut ServiceDefinition> {
        let id = id.into();
        if self.has_definition(&id) {
            return Err(DIError::ServiceAlreadyRegistered { service_id: id });
        }

        debug!("Added definition '{}'", id);
        self.definitions.push(ServiceDefinition::new(id));
        let last = self.definitions.len() - 1;
        Ok(&mut self.definitions[last])
    }

    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.iter().any(|definition| definition.id() == id)
    }

    pub fn definition(&self, id: &str) -> Option<&ServiceDefinition> {
        self.definitions.iter().find(|definition| definition.id() == id)
    }

    pub fn definition_mut(&mut self, id: &str) -> Option<&mut ServiceDefinition> {
        self.definitions
            .iter_mut()
            .find(|definition| definition.id() == id)
    }

    /// Remove a definition, returning it
    pub fn remove_definition(&mut self, id: &str) -> Option<ServiceDefinition> {
        let position = self
            .definitions
            .iter()
            .position(|definition| definition.id() == id)?;
        Some(self.definitions.remove(position))
    }

    /// All definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.definitions.iter()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Ids and values of definitions carrying `tag`, in registration order
    pub fn find_by_tag(&self, tag: &str) -> Vec<(&str, &TagValue)> {
        self.definitions
            .iter()
            .filter_map(|definition| definition.tag(tag).map(|value| (definition.id(), value)))
            .collect()
    }

    /// Ids of definitions whose declared or factory type is `T`
    pub fn find_by_type<T: Any>(&self) -> Vec<&str> {
        let type_id = TypeId::of::<T>();
        self.find_by(|ty| ty.type_id() == type_id)
    }

    /// Ids of definitions whose declared or factory type carries extension `E`
    pub fn find_by_type_extension<E: Any>(&self) -> Vec<&str> {
        self.find_by(ServiceType::has_extension::<E>)
    }

    fn find_by(&self, predicate: impl Fn(&ServiceType) -> bool) -> Vec<&str> {
        self.definitions
            .iter()
            .filter(|definition| {
                definition.service_type().is_some_and(&predicate)
                    || definition.factory_type().is_some_and(&predicate)
            })
            .map(ServiceDefinition::id)
            .collect()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    pub fn set_parameters(&mut self, parameters: Parameters) -> &mut Self {
        self.parameters = parameters;
        self
    }

    /// Control whether parameters are exported into the sealed container
    pub fn set_export_parameters(&mut self, export: bool) -> &mut Self {
        self.export_parameters = export;
        self
    }

    pub fn exports_parameters(&self) -> bool {
        self.export_parameters
    }

    pub(crate) fn register_extension(&mut self, info: ExtensionInfo) {
        self.extensions.push(info);
    }

    /// Names of registered compiler extensions of type `E`
    pub fn extensions_of<E: Any>(&self) -> Vec<&str> {
        let type_id = TypeId::of::<E>();
        self.extensions
            .iter()
            .filter(|info| info.type_id == type_id)
            .map(|info| info.name.as_str())
            .collect()
    }

    /// Seal the builder into a container
    pub fn build(self) -> DIResult<Arc<Container>> {
        let parameters = if self.export_parameters {
            self.parameters
        } else {
            Parameters::new()
        };

        info!(
            "Building container with {} definitions and {} parameters",
            self.definitions.len(),
            parameters.len()
        );
        Container::from_definitions(self.definitions, parameters)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("definitions", &self.definitions)
            .field("parameters", &self.parameters)
            .field("export_parameters", &self.export_parameters)
            .field("extensions", &self.extensions)
            .finish()
    }
}

//! Build-time service definitions
//!
//! A [`ServiceDefinition`] describes how a service is created (its factory and
//! setup closures) and what is statically known about it: the declared type,
//! the type its factory produces, and any tags. Compiler extensions read and
//! rewrite definitions before the container is sealed.

use std::any::{type_name, Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{Container, DIResult, ServiceLifetime};

/// Factory creating a service instance
pub type Factory = Arc<dyn Fn(&Container) -> DIResult<Instance> + Send + Sync>;

/// Setup step applied to a freshly created instance
///
/// Setups may return the same instance or a decorated replacement.
pub type Setup = Arc<dyn Fn(&Container, Instance) -> DIResult<Instance> + Send + Sync>;

/// Type-erased service instance
///
/// Keeps the name of the concrete type so that resolution errors can report
/// what a service actually returned.
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Wrap a concrete value
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an already shared value
    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            value,
            type_name: type_name::<T>(),
        }
    }

    /// Wrap an erased value, reporting `type_name` as its concrete type
    ///
    /// Used when the stored value is a wrapper (e.g. a trait object) but
    /// diagnostics should name the implementation.
    pub fn erased(value: Arc<dyn Any + Send + Sync>, type_name: &'static str) -> Self {
        Self { value, type_name }
    }

    /// Name of the concrete type behind this instance
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether the stored value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        let value: &(dyn Any + Send + Sync) = &*self.value;
        value.is::<T>()
    }

    /// Borrow the stored value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let value: &(dyn Any + Send + Sync) = &*self.value;
        value.downcast_ref::<T>()
    }

    /// Share the stored value as `T`
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.value.clone().downcast::<T>().ok()
    }

    /// Check whether two instances share the same allocation
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Statically known type of a service
///
/// Besides the type identity, a `ServiceType` carries typed extension slots
/// that let integrations attach capabilities to a type, such as the static
/// defaults a command type declares.
#[derive(Clone)]
pub struct ServiceType {
    name: &'static str,
    type_id: TypeId,
    extensions: Vec<Arc<dyn Any + Send + Sync>>,
}

impl ServiceType {
    /// Describe type `T`
    pub fn of<T: Any>() -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            extensions: Vec::new(),
        }
    }

    /// Attach an extension value, replacing one of the same type
    pub fn with<E>(mut self, extension: E) -> Self
    where
        E: Any + Send + Sync,
    {
        self.extensions.retain(|existing| !existing.is::<E>());
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Look up an attached extension
    pub fn extension<E: Any>(&self) -> Option<&E> {
        self.extensions
            .iter()
            .find_map(|extension| extension.downcast_ref::<E>())
    }

    /// Check whether an extension of type `E` is attached
    pub fn has_extension<E: Any>(&self) -> bool {
        self.extension::<E>().is_some()
    }

    /// Full type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Check whether this describes `T`
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceType")
            .field("name", &self.name)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

/// Value of a service tag
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TagValue {
    /// Tag without a value
    #[default]
    Empty,
    /// Bare string value
    String(String),
    /// Structured attributes
    Map(BTreeMap<String, serde_json::Value>),
}

impl TagValue {
    /// Build a structured tag from key/value pairs
    pub fn attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        Self::Map(
            attributes
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Bare string value, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// String attribute of a structured tag, if any
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        match self {
            TagValue::Map(attributes) => attributes.get(key).and_then(|value| value.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::String(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::String(value)
    }
}

/// Description of a service
pub struct ServiceDefinition {
    id: String,
    service_type: Option<ServiceType>,
    factory_type: Option<ServiceType>,
    factory: Option<Factory>,
    setups: Vec<Setup>,
    tags: BTreeMap<String, TagValue>,
    lifetime: ServiceLifetime,
    autowired: bool,
}

pub(crate) struct DefinitionParts {
    pub id: String,
    pub service_type: Option<ServiceType>,
    pub factory: Option<Factory>,
    pub setups: Vec<Setup>,
    pub lifetime: ServiceLifetime,
    pub autowired: bool,
}

impl ServiceDefinition {
    /// Create an empty definition
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            service_type: None,
            factory_type: None,
            factory: None,
            setups: Vec::new(),
            tags: BTreeMap::new(),
            lifetime: ServiceLifetime::Singleton,
            autowired: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the declared type of the service
    pub fn set_type(&mut self, service_type: ServiceType) -> &mut Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn service_type(&self) -> Option<&ServiceType> {
        self.service_type.as_ref()
    }

    /// Set the type the factory is known to produce
    pub fn set_factory_type(&mut self, factory_type: ServiceType) -> &mut Self {
        self.factory_type = Some(factory_type);
        self
    }

    pub fn factory_type(&self) -> Option<&ServiceType> {
        self.factory_type.as_ref()
    }

    /// Set the factory, replacing any previous one
    pub fn set_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(&Container) -> DIResult<Instance> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Append a setup step run after the factory
    pub fn add_setup<F>(&mut self, setup: F) -> &mut Self
    where
        F: Fn(&Container, Instance) -> DIResult<Instance> + Send + Sync + 'static,
    {
        self.setups.push(Arc::new(setup));
        self
    }

    pub fn setup_count(&self) -> usize {
        self.setups.len()
    }

    /// Attach a tag, replacing a previous value of the same tag
    pub fn add_tag(&mut self, tag: impl Into<String>, value: impl Into<TagValue>) -> &mut Self {
        self.tags.insert(tag.into(), value.into());
        self
    }

    pub fn remove_tag(&mut self, tag: &str) -> Option<TagValue> {
        self.tags.remove(tag)
    }

    pub fn tag(&self, tag: &str) -> Option<&TagValue> {
        self.tags.get(tag)
    }

    pub fn tags(&self) -> &BTreeMap<String, TagValue> {
        &self.tags
    }

    pub fn set_lifetime(&mut self, lifetime: ServiceLifetime) -> &mut Self {
        self.lifetime = lifetime;
        self
    }

    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    /// Control whether the service can be resolved by type
    pub fn set_autowired(&mut self, autowired: bool) -> &mut Self {
        self.autowired = autowired;
        self
    }

    pub fn is_autowired(&self) -> bool {
        self.autowired
    }

    pub(crate) fn into_parts(self) -> DefinitionParts {
        DefinitionParts {
            id: self.id,
            service_type: self.service_type,
            factory: self.factory,
            setups: self.setups,
            lifetime: self.lifetime,
            autowired: self.autowired,
        }
    }
}

impl fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("id", &self.id)
            .field("service_type", &self.service_type)
            .field("factory_type", &self.factory_type)
            .field("has_factory", &self.factory.is_some())
            .field("setups", &self.setups.len())
            .field("tags", &self.tags)
            .field("lifetime", &self.lifetime)
            .field("autowired", &self.autowired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    #[test]
    fn test_service_type_extensions() {
        let ty = ServiceType::of::<String>()
            .with(Marker("first"))
            .with(Marker("second"));

        assert!(ty.is::<String>());
        assert!(!ty.is::<u8>());
        assert_eq!(ty.extension::<Marker>().map(|m| m.0), Some("second"));
        assert!(!ty.has_extension::<u32>());
    }

    #[test]
    fn test_tag_value_accessors() {
        let bare = TagValue::from("alpha");
        assert_eq!(bare.as_str(), Some("alpha"));
        assert_eq!(bare.attribute_str("name"), None);

        let structured = TagValue::attributes([
            ("name", serde_json::json!("beta")),
            ("priority", serde_json::json!(3)),
        ]);
        assert_eq!(structured.attribute_str("name"), Some("beta"));
        assert_eq!(structured.attribute_str("priority"), None);
        assert_eq!(structured.as_str(), None);
    }

    #[test]
    fn test_instance_downcast() {
        let instance = Instance::new(String::from("value"));

        assert!(instance.is::<String>());
        assert_eq!(instance.downcast_ref::<String>().map(String::as_str), Some("value"));
        assert!(instance.downcast::<u32>().is_none());
        assert!(instance.type_name().ends_with("String"));
    }
}

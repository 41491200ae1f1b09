//! Command metadata resolution
//!
//! A command's name and description may come from three places, applied in
//! increasing precedence:
//!
//! 1. the static defaults of the type its factory produces,
//! 2. the static defaults of its declared type,
//! 3. the command tag, either a bare name or a map with `description`,
//!    `command` and `name` keys (`name` wins over `command`).
//!
//! The resolved name is then split on `|` into the name and its aliases. A
//! leading empty segment (`|name|alias`) marks the command hidden.

use cmdwire_console::CommandType;
use cmdwire_di::{ServiceDefinition, ServiceType, TagValue};

/// Value of the command tag on a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTag {
    /// Bare name, possibly with aliases
    Name(String),
    /// Structured attributes; non-string values are ignored
    Structured {
        name: Option<String>,
        description: Option<String>,
        command: Option<String>,
    },
}

impl CommandTag {
    /// Interpret a container tag value; an empty tag carries no metadata
    pub fn from_tag_value(value: &TagValue) -> Option<Self> {
        match value {
            TagValue::Empty => None,
            TagValue::String(name) => Some(CommandTag::Name(name.clone())),
            TagValue::Map(_) => Some(CommandTag::Structured {
                name: value.attribute_str("name").map(str::to_string),
                description: value.attribute_str("description").map(str::to_string),
                command: value.attribute_str("command").map(str::to_string),
            }),
        }
    }
}

/// One candidate command as seen at build time
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub service_id: String,
    pub static_type: Option<ServiceType>,
    pub factory_type: Option<ServiceType>,
    pub tag: Option<CommandTag>,
}

impl CommandDescriptor {
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            static_type: None,
            factory_type: None,
            tag: None,
        }
    }

    /// Describe a definition, reading the command tag named `tag_name`
    pub fn from_definition(definition: &ServiceDefinition, tag_name: &str) -> Self {
        Self {
            service_id: definition.id().to_string(),
            static_type: definition.service_type().cloned(),
            factory_type: definition.factory_type().cloned(),
            tag: definition.tag(tag_name).and_then(CommandTag::from_tag_value),
        }
    }

    pub fn with_static_type(mut self, service_type: ServiceType) -> Self {
        self.static_type = Some(service_type);
        self
    }

    pub fn with_factory_type(mut self, factory_type: ServiceType) -> Self {
        self.factory_type = Some(factory_type);
        self
    }

    pub fn with_tag(mut self, tag: CommandTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Best known type name, for diagnostics
    pub fn type_name(&self) -> &str {
        self.static_type
            .as_ref()
            .or(self.factory_type.as_ref())
            .map_or("unknown", ServiceType::name)
    }
}

/// Effective metadata of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    /// Only meaningful when `name` is set
    pub hidden: bool,
}

/// How a command gets registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Name and description known, wrapped without construction
    Lazy,
    /// Name known, constructed on lookup
    Named,
    /// No name, added to the application eagerly
    Nameless,
}

impl ResolvedMetadata {
    pub fn kind(&self) -> CommandKind {
        match (&self.name, &self.description) {
            (Some(_), Some(_)) => CommandKind::Lazy,
            (Some(_), None) => CommandKind::Named,
            (None, _) => CommandKind::Nameless,
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.kind() == CommandKind::Lazy
    }
}

/// Name split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName {
    pub name: String,
    pub aliases: Vec<String>,
    pub hidden: bool,
}

/// Split `[|]name[|alias...]`
///
/// Returns `None` when no non-empty name segment is left. Empty alias
/// segments such as the middle of `a||b` are dropped.
pub fn split_name(raw: &str) -> Option<SplitName> {
    let mut segments = raw.split('|').map(str::to_string);
    let mut name = segments.next()?;
    let hidden = name.is_empty();
    if hidden {
        name = segments.next()?;
    }

    if name.is_empty() {
        return None;
    }

    Some(SplitName {
        name,
        aliases: segments.filter(|alias| !alias.is_empty()).collect(),
        hidden,
    })
}

fn apply_type_defaults(
    service_type: Option<&ServiceType>,
    name: &mut Option<String>,
    description: &mut Option<String>,
) {
    let Some(command_type) = service_type.and_then(ServiceType::extension::<CommandType>) else {
        return;
    };

    if let Some(default_name) = command_type.default_name {
        *name = Some(default_name.to_string());
    }
    if let Some(default_description) = command_type.default_description {
        *description = Some(default_description.to_string());
    }
}

/// Raw name and description before alias splitting
pub fn resolve_raw(descriptor: &CommandDescriptor) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut description = None;

    apply_type_defaults(descriptor.factory_type.as_ref(), &mut name, &mut description);
    apply_type_defaults(descriptor.static_type.as_ref(), &mut name, &mut description);

    match &descriptor.tag {
        Some(CommandTag::Name(tag_name)) => name = Some(tag_name.clone()),
        Some(CommandTag::Structured {
            name: tag_name,
            description: tag_description,
            command,
        }) => {
            if let Some(tag_description) = tag_description {
                description = Some(tag_description.clone());
            }
            if let Some(command) = command {
                name = Some(command.clone());
            }
            if let Some(tag_name) = tag_name {
                name = Some(tag_name.clone());
            }
        }
        None => {}
    }

    (name, description)
}

/// Resolve the effective metadata of a descriptor; never fails
pub fn resolve(descriptor: &CommandDescriptor) -> ResolvedMetadata {
    let (raw_name, description) = resolve_raw(descriptor);

    match raw_name.as_deref().and_then(split_name) {
        Some(split) => ResolvedMetadata {
            name: Some(split.name),
            description,
            aliases: split.aliases,
            hidden: split.hidden,
        },
        None => ResolvedMetadata {
            description,
            ..ResolvedMetadata::default()
        },
    }
}

//! The console compiler extension
//!
//! During `load_configuration` the extension registers the command loader,
//! the application and the two built-in commands. During `before_compile` it
//! discovers command services, resolves their metadata and decides how each
//! one is registered:
//!
//! - name and description known: a `<name>.lazy.<service>` definition wraps
//!   the service in a [`LazyCommand`] and the loader maps the name to it,
//! - name only: the service is decorated with its name, aliases and hidden
//!   flag and the loader maps the name to the service itself,
//! - no name: the application adds the service eagerly.
//!
//! Commands missing a name or a description are reported by
//! `commands-debug`.

use std::sync::Arc;

use cmdwire_console::{Application, CommandMetadata, CommandType, ConfiguredCommand, LazyCommand};
use cmdwire_di::{
    CompilerExtension, Container, ContainerBuilder, DIError, DIResult, Instance, Parameters,
    ServiceType,
};
use tracing::{debug, info};

use crate::commands::{CommandsDebugCommand, DiParametersCommand, NotLazyCommand};
use crate::config::ConsoleConfig;
use crate::error::{ExtensionError, Message, Result};
use crate::loader::{
    into_console_error, resolve_command, LazyCommandLoader, LazyCommandLoaderBuilder,
};
use crate::metadata::{resolve, CommandDescriptor, CommandKind, ResolvedMetadata};
use crate::service::{
    as_command, command_instance, command_type, shared_command_instance, COMMAND_CAPABILITY,
};

pub const DEFAULT_NAME: &str = "console";

const COMMAND_LOADER: &str = "commandLoader";
const APPLICATION: &str = "application";
const DI_PARAMETERS_COMMAND: &str = "command.diParameters";
const COMMANDS_DEBUG_COMMAND: &str = "command.commandsDebug";

/// Registers a console application and its commands in the container
#[derive(Debug, Clone)]
pub struct ConsoleExtension {
    name: String,
    config: ConsoleConfig,
    parameters: Parameters,
}

impl ConsoleExtension {
    pub fn new(config: ConsoleConfig) -> Self {
        Self::with_name(DEFAULT_NAME, config)
    }

    /// Create an extension whose services are prefixed with `name`
    pub fn with_name(name: impl Into<String>, config: ConsoleConfig) -> Self {
        Self {
            name: name.into(),
            config,
            parameters: Parameters::new(),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn prefix(&self, id: &str) -> String {
        format!("{}.{}", self.name, id)
    }

    pub fn command_loader_id(&self) -> String {
        self.prefix(COMMAND_LOADER)
    }

    pub fn application_id(&self) -> String {
        self.prefix(APPLICATION)
    }

    pub fn di_parameters_command_id(&self) -> String {
        self.prefix(DI_PARAMETERS_COMMAND)
    }

    pub fn commands_debug_command_id(&self) -> String {
        self.prefix(COMMANDS_DEBUG_COMMAND)
    }

    fn register(&mut self, builder: &mut ContainerBuilder) -> Result<()> {
        self.config.validate()?;
        let tag = self.config.command_tag().to_string();

        builder
            .add_definition(self.command_loader_id())?
            .set_type(ServiceType::of::<LazyCommandLoader>())
            .set_autowired(false);

        builder
            .add_definition(self.application_id())?
            .set_type(ServiceType::of::<Application>());

        self.parameters = builder.parameters().clone();
        builder
            .add_definition(self.di_parameters_command_id())?
            .set_type(command_type::<DiParametersCommand>())
            .add_tag(tag.as_str(), cmdwire_di::TagValue::Empty);

        builder
            .add_definition(self.commands_debug_command_id())?
            .set_type(command_type::<CommandsDebugCommand>())
            .add_tag(tag.as_str(), cmdwire_di::TagValue::Empty);

        debug!("Console extension '{}' registered its services", self.name);
        Ok(())
    }

    fn wire(&mut self, builder: &mut ContainerBuilder) -> Result<()> {
        for id in [
            self.command_loader_id(),
            self.application_id(),
            self.di_parameters_command_id(),
            self.commands_debug_command_id(),
        ] {
            if !builder.has_definition(&id) {
                return Err(ExtensionError::MissingCollaborator(
                    Message::new(
                        format!("Console extension '{}' is compiling.", self.name),
                        format!("Service '{}' registered by the extension is missing.", id),
                    )
                    .with_solution("Do not remove services registered by the console extension."),
                ));
            }
        }

        let mut loader = LazyCommandLoaderBuilder::new();
        let mut eager = Vec::new();
        let mut not_lazy = Vec::new();

        for descriptor in self.discover(builder) {
            let metadata = resolve(&descriptor);
            let service_id = descriptor.service_id.clone();
            debug!("Resolved command '{}' as {:?}", service_id, metadata.kind());

            match (metadata.kind(), metadata.name.clone()) {
                (CommandKind::Lazy, Some(name)) => {
                    let lazy_id = self.add_lazy_definition(builder, &service_id, &metadata)?;
                    loader.insert(name, lazy_id);
                }
                (_, Some(name)) => {
                    decorate(builder, &service_id, &metadata)?;
                    loader.insert(name, service_id.clone());
                }
                (_, None) => {
                    decorate(builder, &service_id, &metadata)?;
                    eager.push(service_id.clone());
                }
            }

            if !metadata.is_lazy() {
                not_lazy.push(NotLazyCommand {
                    service_id,
                    type_name: descriptor.type_name().to_string(),
                    has_name: metadata.name.is_some(),
                    has_description: metadata.description.is_some(),
                });
            }
        }

        for (name, service_id) in loader.entries() {
            if !builder.has_definition(service_id) {
                return Err(ExtensionError::MissingCollaborator(Message::new(
                    format!("Command '{}' is mapped to service '{}'.", name, service_id),
                    "The service does not exist.",
                )));
            }
        }

        info!(
            "Console extension '{}' wired {} named and {} eager commands, {} not lazy",
            self.name,
            loader.len(),
            eager.len(),
            not_lazy.len()
        );

        self.configure_loader(builder, loader)?;
        self.configure_application(builder, eager)?;
        self.configure_di_parameters(builder)?;
        self.configure_commands_debug(builder, not_lazy)?;
        Ok(())
    }

    fn discover(&self, builder: &ContainerBuilder) -> Vec<CommandDescriptor> {
        let ids: Vec<&str> = match &self.config.discovery.tag {
            Some(tag) => builder.find_by_tag(tag).into_iter().map(|(id, _)| id).collect(),
            None => builder.find_by_type_extension::<CommandType>(),
        };

        let other_consoles: Vec<&str> = builder
            .extensions_of::<ConsoleExtension>()
            .into_iter()
            .filter(|name| *name != self.name)
            .collect();

        let tag = self.config.command_tag();
        ids.into_iter()
            .filter(|id| !is_from_console(id, &other_consoles))
            .filter_map(|id| builder.definition(id))
            .map(|definition| CommandDescriptor::from_definition(definition, tag))
            .collect()
    }

    fn add_lazy_definition(
        &self,
        builder: &mut ContainerBuilder,
        service_id: &str,
        metadata: &ResolvedMetadata,
    ) -> Result<String> {
        let lazy_id = format!("{}.lazy.{}", self.name, service_id);
        let mut command_metadata = CommandMetadata::default()
            .with_aliases(metadata.aliases.clone())
            .with_hidden(metadata.hidden);
        command_metadata.name = metadata.name.clone();
        command_metadata.description = metadata.description.clone().unwrap_or_default();

        let target = service_id.to_string();
        builder
            .add_definition(lazy_id.clone())?
            .set_type(command_type::<LazyCommand>())
            .set_factory(move |container| {
                let locator = container.downgrade();
                let target = target.clone();
                let name = command_metadata.name.clone().unwrap_or_default();
                let lazy = LazyCommand::new(command_metadata.clone(), move || {
                    resolve_command(&locator, &target)
                        .map_err(|error| into_console_error(&name, error))
                });
                Ok(command_instance(lazy))
            });

        Ok(lazy_id)
    }

    fn configure_loader(
        &self,
        builder: &mut ContainerBuilder,
        loader: LazyCommandLoaderBuilder,
    ) -> Result<()> {
        definition(builder, &self.command_loader_id())?.set_factory(move |container| {
            let locator = Arc::new(container.downgrade());
            Ok(Instance::new(loader.clone().seal(locator)))
        });
        Ok(())
    }

    fn configure_application(
        &self,
        builder: &mut ContainerBuilder,
        eager: Vec<String>,
    ) -> Result<()> {
        let extension = self.name.clone();
        let loader_id = self.command_loader_id();
        let name = self.config.application_name();
        let version = self.config.application_version();
        let catch_exceptions = self.config.catch_exceptions;

        definition(builder, &self.application_id())?.set_factory(move |container| {
            let mut application = Application::new(name.clone(), version.clone());
            application.set_catch_exceptions(catch_exceptions);
            application.set_command_loader(container.get::<LazyCommandLoader>(&loader_id)?);

            for service_id in &eager {
                let command = get_command(container, service_id)?;
                application.add(command).map_err(|error| DIError::Extension {
                    extension: extension.clone(),
                    source: Box::new(error),
                })?;
            }

            Ok(Instance::new(application))
        });
        Ok(())
    }

    fn configure_di_parameters(&self, builder: &mut ContainerBuilder) -> Result<()> {
        let export_disabled = !self.parameters.is_empty()
            && (builder.parameters().is_empty() || !builder.exports_parameters());
        let backup = self.config.di.parameters.backup;
        let export_hint = export_disabled && !backup;
        let snapshot = (export_disabled && backup).then(|| self.parameters.clone());

        if export_disabled {
            debug!("Parameter export is disabled, backup: {}", backup);
        }

        definition(builder, &self.di_parameters_command_id())?.set_factory(move |container| {
            let parameters = snapshot
                .clone()
                .unwrap_or_else(|| container.parameters().clone());
            Ok(command_instance(DiParametersCommand::new(parameters, export_hint)))
        });
        Ok(())
    }

    fn configure_commands_debug(
        &self,
        builder: &mut ContainerBuilder,
        not_lazy: Vec<NotLazyCommand>,
    ) -> Result<()> {
        definition(builder, &self.commands_debug_command_id())?
            .set_factory(move |_| {
                Ok(command_instance(CommandsDebugCommand::new(not_lazy.clone())))
            });
        Ok(())
    }
}

impl CompilerExtension for ConsoleExtension {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_configuration(&mut self, builder: &mut ContainerBuilder) -> DIResult<()> {
        self.register(builder).map_err(|error| error.into_di(&self.name))
    }

    fn before_compile(&mut self, builder: &mut ContainerBuilder) -> DIResult<()> {
        self.wire(builder).map_err(|error| error.into_di(&self.name))
    }
}

fn is_from_console(service_id: &str, consoles: &[&str]) -> bool {
    consoles.iter().any(|console| {
        service_id.starts_with(&format!("{}.lazy.", console))
            || service_id.starts_with(&format!("{}.command.", console))
    })
}

fn definition<'a>(
    builder: &'a mut ContainerBuilder,
    id: &str,
) -> Result<&'a mut cmdwire_di::ServiceDefinition> {
    builder.definition_mut(id).ok_or_else(|| {
        ExtensionError::MissingCollaborator(Message::new(
            "Console extension is compiling.",
            format!("Service '{}' is missing.", id),
        ))
    })
}

/// Apply resolved metadata to a command service that is not wrapped lazily
fn decorate(
    builder: &mut ContainerBuilder,
    service_id: &str,
    metadata: &ResolvedMetadata,
) -> Result<()> {
    if metadata.name.is_none() && metadata.description.is_none() {
        return Ok(());
    }

    let metadata = metadata.clone();
    let id = service_id.to_string();
    definition(builder, service_id)?.add_setup(move |_, instance| {
        let inner = as_command(&instance).ok_or_else(|| DIError::InvalidServiceType {
            service_id: id.clone(),
            expected: COMMAND_CAPABILITY.to_string(),
            actual: instance.type_name().to_string(),
        })?;

        let mut configured = ConfiguredCommand::new(inner);
        if let Some(name) = &metadata.name {
            configured = configured
                .with_name(name.clone())
                .with_aliases(metadata.aliases.clone())
                .with_hidden(metadata.hidden);
        }
        if let Some(description) = &metadata.description {
            configured = configured.with_description(description.clone());
        }

        Ok(shared_command_instance(Arc::new(configured), instance.type_name()))
    });
    Ok(())
}

fn get_command(
    container: &Container,
    service_id: &str,
) -> DIResult<cmdwire_console::SharedCommand> {
    let instance = container.get_service(service_id)?;
    as_command(&instance).ok_or_else(|| DIError::InvalidServiceType {
        service_id: service_id.to_string(),
        expected: COMMAND_CAPABILITY.to_string(),
        actual: instance.type_name().to_string(),
    })
}

//! Dispatch and listing behaviour of the application
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cmdwire_console::*;

struct Fixed {
    metadata: CommandMetadata,
    code: i32,
}

impl Fixed {
    fn shared(metadata: CommandMetadata, code: i32) -> SharedCommand {
        Arc::new(Self { metadata, code })
    }
}

impl Command for Fixed {
    fn metadata(&self) -> CommandMetadata {
        self.metadata.clone()
    }

    fn execute(&self, _input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        output.writeln(&format!("ran {}", self.metadata.name.as_deref().unwrap_or("?")))?;
        Ok(self.code)
    }
}

struct Failing;

impl Command for Failing {
    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::new("fail")
    }

    fn execute(&self, _input: &Input, _output: &mut dyn Output) -> ConsoleResult<i32> {
        Err(anyhow::anyhow!("boom").into())
    }
}

fn counting_loader(built: Arc<AtomicUsize>) -> FactoryCommandLoader {
    let mut loader = FactoryCommandLoader::new();
    loader.add("lazy", move || {
        built.fetch_add(1, Ordering::SeqCst);
        Ok(Fixed::shared(
            CommandMetadata::new("lazy")
                .with_description("Loaded on demand")
                .with_aliases(["lz"]),
            0,
        ))
    });
    loader
}

#[test]
fn test_add_rejects_nameless_command() {
    let mut app = Application::default();
    let result = app.add(Fixed::shared(CommandMetadata::default(), 0));
    assert!(matches!(result, Err(ConsoleError::InvalidCommand(_))));
}

#[test]
fn test_get_by_name_and_alias() {
    let mut app = Application::default();
    app.add(Fixed::shared(
        CommandMetadata::new("cache:clear").with_aliases(["cc"]),
        0,
    ))
    .unwrap();

    assert!(app.has("cache:clear"));
    assert!(app.has("cc"));
    assert!(app.get("cc").is_ok());
    assert!(matches!(
        app.get("missing"),
        Err(ConsoleError::CommandNotFound { .. })
    ));
}

#[test]
fn test_loader_commands_are_not_cached() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut app = Application::default();
    app.set_command_loader(Arc::new(counting_loader(built.clone())));

    assert!(app.has("lazy"));
    assert_eq!(built.load(Ordering::SeqCst), 0);

    app.get("lazy").unwrap();
    app.get("lazy").unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_find_resolves_loader_alias() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut app = Application::default();
    app.set_command_loader(Arc::new(counting_loader(built)));

    assert!(!app.has("lz"));
    let command = app.find("lz").unwrap();
    assert_eq!(command.metadata().name.as_deref(), Some("lazy"));
}

#[test]
fn test_all_lists_added_then_loader_names() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut loader = counting_loader(built);
    loader.add("first", || Ok(Fixed::shared(CommandMetadata::new("shadowed"), 0)));

    let mut app = Application::default();
    app.add(Fixed::shared(CommandMetadata::new("first"), 0)).unwrap();
    app.set_command_loader(Arc::new(loader));

    let names: Vec<String> = app.all().unwrap().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["first", "lazy"]);
}

#[test]
fn test_run_unknown_command() {
    let app = Application::default();
    let mut output = BufferedOutput::new();

    let code = app.run(["nope"], &mut output).unwrap();
    assert_eq!(code, FAILURE);
    assert_eq!(output.fetch(), "Command \"nope\" is not defined.\n");
}

#[test]
fn test_unknown_command_next_to_broken_loader_entry() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut loader = FactoryCommandLoader::new();
    loader.add("broken", || {
        Err(ConsoleError::InvalidCommand("not a command".to_string()))
    });
    loader.add("lazy", {
        let built = built.clone();
        move || {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(Fixed::shared(CommandMetadata::new("lazy").with_aliases(["lz"]), 0))
        }
    });

    let mut app = Application::default();
    app.set_command_loader(Arc::new(loader));

    let mut output = BufferedOutput::new();
    assert_eq!(app.run(["nosuch"], &mut output).unwrap(), FAILURE);
    assert_eq!(output.fetch(), "Command \"nosuch\" is not defined.\n");

    let command = app.find("lz").unwrap();
    assert_eq!(command.metadata().name.as_deref(), Some("lazy"));
    assert!(matches!(
        app.get("broken"),
        Err(ConsoleError::InvalidCommand(_))
    ));
}

#[test]
fn test_run_returns_command_exit_code() {
    let mut app = Application::default();
    app.add(Fixed::shared(CommandMetadata::new("check"), 3)).unwrap();
    let mut output = BufferedOutput::new();

    assert_eq!(app.run(["check"], &mut output).unwrap(), 3);
    assert_eq!(output.fetch(), "ran check\n");
}

#[test]
fn test_run_propagates_or_catches_errors() {
    let mut app = Application::default();
    app.add(Arc::new(Failing)).unwrap();
    let mut output = BufferedOutput::new();

    let result = app.run(["fail"], &mut output);
    assert!(matches!(result, Err(ConsoleError::Execution(_))));

    app.set_catch_exceptions(true);
    assert_eq!(app.run(["fail"], &mut output).unwrap(), FAILURE);
    assert_eq!(output.fetch(), "Command execution failed: boom\n");
}

#[test]
fn test_list_omits_hidden_commands() {
    let mut app = Application::new("Demo", "1.2.0");
    app.add(Fixed::shared(
        CommandMetadata::new("visible").with_description("Shown"),
        0,
    ))
    .unwrap();
    app.add(Fixed::shared(
        CommandMetadata::new("secret").with_hidden(true),
        0,
    ))
    .unwrap();
    let mut output = BufferedOutput::new();

    assert_eq!(app.run(Vec::<String>::new(), &mut output).unwrap(), SUCCESS);
    assert_eq!(
        output.fetch(),
        "Demo 1.2.0\n\nAvailable commands:\n  visible Shown\n"
    );

    app.run([LIST_COMMAND], &mut output).unwrap();
    assert!(!output.fetch().contains("secret"));
}

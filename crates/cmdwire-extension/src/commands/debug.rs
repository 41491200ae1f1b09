//! `commands-debug`: report commands that cannot be lazy loaded

use cmdwire_console::{
    Cell, Command, CommandMetadata, ConsoleResult, Input, Output, Table, FAILURE, SUCCESS,
};
use colored::Color;

pub const ALL_LAZY: &str = "All commands are lazy-loaded.";

/// A command that is missing its name, its description or both
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotLazyCommand {
    pub service_id: String,
    pub type_name: String,
    pub has_name: bool,
    pub has_description: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CommandsDebugCommand {
    commands: Vec<NotLazyCommand>,
}

impl CommandsDebugCommand {
    pub fn new(commands: Vec<NotLazyCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[NotLazyCommand] {
        &self.commands
    }
}

fn mark(present: bool) -> Cell {
    if present {
        Cell::colored("✔️", Color::Green)
    } else {
        Cell::colored("❌", Color::Red)
    }
}

impl Command for CommandsDebugCommand {
    fn default_name() -> Option<&'static str> {
        Some("commands-debug")
    }

    fn default_description() -> Option<&'static str> {
        Some("Check which commands are not lazy loaded")
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::from_defaults::<Self>()
    }

    fn execute(&self, _input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        if self.commands.is_empty() {
            output.writeln(ALL_LAZY)?;
            return Ok(SUCCESS);
        }

        let style = output.style();
        output.writeln(&format!(
            "Following commands are missing {} either name or description. \
             Check the cmdwire documentation about lazy loading to learn how to fix it.",
            style.paint("❌", Color::Red)
        ))?;
        output.writeln("")?;

        let mut table =
            Table::new().with_headers(["Name", "Description", "Service name", "Service type"]);
        for command in &self.commands {
            table.add_row(vec![
                mark(command.has_name),
                mark(command.has_description),
                Cell::plain(command.service_id.as_str()),
                Cell::plain(command.type_name.as_str()),
            ]);
        }

        for line in table.render(style) {
            output.writeln(&line)?;
        }
        Ok(FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdwire_console::BufferedOutput;

    #[test]
    fn test_all_lazy() {
        let mut output = BufferedOutput::new();
        let code = CommandsDebugCommand::default()
            .execute(&Input::default(), &mut output)
            .unwrap();

        assert_eq!(code, SUCCESS);
        assert_eq!(output.fetch(), "All commands are lazy-loaded.\n");
    }

    #[test]
    fn test_report_rows() {
        let command = CommandsDebugCommand::new(vec![
            NotLazyCommand {
                service_id: "app.nameless".to_string(),
                type_name: "app::Nameless".to_string(),
                has_name: false,
                has_description: true,
            },
            NotLazyCommand {
                service_id: "app.undescribed".to_string(),
                type_name: "app::Undescribed".to_string(),
                has_name: true,
                has_description: false,
            },
        ]);
        let mut output = BufferedOutput::new();
        let code = command.execute(&Input::default(), &mut output).unwrap();
        assert_eq!(code, FAILURE);

        let text = output.fetch();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Following commands are missing ❌ either name or description."));
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            vec!["Name", "Description", "Service", "name", "Service", "type"]
        );
        assert_eq!(
            lines[3].split_whitespace().collect::<Vec<_>>(),
            vec!["❌", "✔️", "app.nameless", "app::Nameless"]
        );
        assert_eq!(
            lines[4].split_whitespace().collect::<Vec<_>>(),
            vec!["✔️", "❌", "app.undescribed", "app::Undescribed"]
        );
        assert_eq!(lines.len(), 5);
    }
}

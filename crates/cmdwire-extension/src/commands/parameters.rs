//! `di:parameters`: print container parameters

use cmdwire_console::{
    Command, CommandMetadata, ConsoleResult, Input, Output, Style, FAILURE, SUCCESS,
};
use cmdwire_di::{ParameterValue, Parameters};
use colored::Color;

use crate::sorter::{sort_by_type, SortedValue};

pub const NO_PARAMETERS: &str = "No parameters found in DI container.";

pub const EXPORT_HINT: &str = "Export of parameters into DIC is disabled. You may enable it for \
only this command by setting console extension option 'di > parameters > backup' to 'true'";

const INDENT: usize = 2;

/// Prints parameters grouped by kind, nested structures indented
#[derive(Debug, Clone)]
pub struct DiParametersCommand {
    parameters: Parameters,
    export_hint: bool,
}

impl DiParametersCommand {
    /// `export_hint` signals that parameters were withheld from the container
    pub fn new(parameters: Parameters, export_hint: bool) -> Self {
        Self {
            parameters,
            export_hint,
        }
    }
}

impl Command for DiParametersCommand {
    fn default_name() -> Option<&'static str> {
        Some("di:parameters")
    }

    fn default_description() -> Option<&'static str> {
        Some("Show DI container parameters")
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata::from_defaults::<Self>()
    }

    fn execute(&self, _input: &Input, output: &mut dyn Output) -> ConsoleResult<i32> {
        if self.parameters.is_empty() {
            output.writeln(NO_PARAMETERS)?;
            if self.export_hint {
                output.writeln(EXPORT_HINT)?;
                return Ok(FAILURE);
            }
            return Ok(SUCCESS);
        }

        let style = output.style();
        print_level(output, style, &sort_by_type(&self.parameters), INDENT)?;
        Ok(SUCCESS)
    }
}

fn print_level(
    output: &mut dyn Output,
    style: Style,
    items: &[(String, SortedValue<'_>)],
    indent: usize,
) -> ConsoleResult<()> {
    let spaces = " ".repeat(indent);

    for (position, (key, value)) in items.iter().enumerate() {
        let key = style.paint(key, Color::Cyan);
        let next = items.get(position + 1).map(|(_, next)| next);

        match value {
            SortedValue::Nested(children) if children.is_empty() => {
                let empty = style.paint("[]", Color::White);
                output.writeln(&format!("{}{}: {}", spaces, key, empty))?;
                if next.is_some() {
                    output.writeln("")?;
                }
            }
            SortedValue::Nested(children) => {
                output.writeln(&format!("{}{}:", spaces, key))?;
                print_level(output, style, children, indent + INDENT)?;
            }
            SortedValue::Scalar(scalar) => {
                output.writeln(&format!("{}{}: {}", spaces, key, format_scalar(scalar, style)))?;
                if next.map_or(true, SortedValue::is_nested) {
                    output.writeln("")?;
                }
            }
        }
    }

    Ok(())
}

fn format_scalar(value: &ParameterValue, style: Style) -> String {
    match value {
        ParameterValue::Bool(value) => style.paint(&value.to_string(), Color::Yellow),
        ParameterValue::Null => style.paint("null", Color::Yellow),
        ParameterValue::Int(value) => style.paint(&value.to_string(), Color::Green),
        ParameterValue::Float(value) => style.paint(&value.to_string(), Color::Green),
        ParameterValue::String(value) => style.paint(value, Color::White),
        ParameterValue::Opaque(type_name) => style.paint(type_name, Color::Red),
        // Nested values never reach here
        ParameterValue::List(_) | ParameterValue::Map(_) => String::new(),
    }
}

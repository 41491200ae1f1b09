//! Borderless column layout

use colored::Color;
use unicode_width::UnicodeWidthStr;

use crate::style::Style;

/// A table cell, optionally coloured
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn width(&self) -> usize {
        self.text.width()
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::plain(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::plain(text)
    }
}

/// Rows padded to the display width of their widest cell per column
///
/// Columns are separated by a single space and trailing whitespace is
/// trimmed from every line. Colours never affect the layout.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
    indent: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers<I, C>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Indent every line by `indent` spaces
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn add_row<I, C>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (index, cell) in row.iter().enumerate() {
                if index == widths.len() {
                    widths.push(0);
                }
                widths[index] = widths[index].max(cell.width());
            }
        }
        widths
    }

    /// Render all lines, without trailing newlines
    pub fn render(&self, style: Style) -> Vec<String> {
        let widths = self.column_widths();
        let headers = (!self.headers.is_empty()).then_some(&self.headers);

        headers
            .into_iter()
            .chain(&self.rows)
            .map(|row| {
                let mut line = " ".repeat(self.indent);
                for (index, cell) in row.iter().enumerate() {
                    if index > 0 {
                        line.push(' ');
                    }
                    match cell.color {
                        Some(color) => line.push_str(&style.paint(&cell.text, color)),
                        None => line.push_str(&cell.text),
                    }
                    let padding = widths[index].saturating_sub(cell.width());
                    line.push_str(&" ".repeat(padding));
                }
                line.trim_end().to_string()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_padded() {
        let mut table = Table::new().with_headers(["Name", "Description"]);
        table.add_row(["list", "Lists commands"]);
        table.add_row(["di:parameters", "Show parameters"]);

        let lines = table.render(Style::new(false));
        assert_eq!(
            lines,
            vec![
                "Name          Description",
                "list          Lists commands",
                "di:parameters Show parameters",
            ]
        );
    }

    #[test]
    fn test_indent_and_trailing_trim() {
        let mut table = Table::new().with_indent(2);
        table.add_row(vec![Cell::plain("a"), Cell::plain("")]);
        table.add_row(vec![Cell::colored("bbb", Color::Green), Cell::plain("x")]);

        let lines = table.render(Style::new(false));
        assert_eq!(lines, vec!["  a", "  bbb x"]);
    }

    #[test]
    fn test_wide_characters_use_display_width() {
        let mut table = Table::new();
        table.add_row(["日本", "x"]);
        table.add_row(["abcde", "y"]);

        let lines = table.render(Style::new(false));
        assert_eq!(lines, vec!["日本  x", "abcde y"]);
    }
}

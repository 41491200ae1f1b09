//! Output styling

use colored::{Color, Colorize};

/// Colour helpers that only decorate when enabled
#[derive(Debug, Clone, Copy)]
pub struct Style {
    decorated: bool,
}

impl Style {
    pub fn new(decorated: bool) -> Self {
        Self { decorated }
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    /// Paint text in a colour
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.decorated {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    pub fn comment(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn error(&self, text: &str) -> String {
        if self.decorated {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        if self.decorated {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

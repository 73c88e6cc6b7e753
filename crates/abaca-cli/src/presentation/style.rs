use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

/// Rendering capabilities of the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: bool,
    /// Available columns; `None` means never truncate
    pub width: Option<usize>,
}

impl Style {
    /// No color, no width limit (pipes, files, tests)
    pub fn plain() -> Self {
        Self::default()
    }

    /// Colors and width only when stdout is a terminal; NO_COLOR is honored
    pub fn for_stdout() -> Self {
        if !std::io::stdout().is_terminal() {
            return Self::plain();
        }
        Self {
            color: std::env::var_os("NO_COLOR").is_none(),
            width: terminal_size().map(|(Width(w), _)| w as usize),
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.bright_black().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn header(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bar(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}

// EMR Log Analyser - ui/theme.rs
//
// Terminal colour palette. Colouring can be switched off entirely
// (--no-color, [display] color = false, or output that is not a terminal).

use owo_colors::{OwoColorize, Style};

/// Applies styles to text when colour output is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape sequences.
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    /// Style `text`, or return it unchanged when colour is off.
    ///
    /// Pad before painting: escape sequences count towards `{:<N}` widths.
    pub fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(text, Style::new().cyan().bold())
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, Style::new().dimmed())
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, Style::new().green())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, Style::new().yellow())
    }

    /// Colour a (possibly padded) level cell by the level it contains.
    pub fn level(&self, cell: &str) -> String {
        self.paint(cell, level_style(cell.trim()))
    }
}

/// Style for a raw level string. Both log4j and java.util.logging names
/// are recognised; anything else is left unstyled.
pub fn level_style(level: &str) -> Style {
    match level {
        "FATAL" | "SEVERE" | "ERROR" => Style::new().red().bold(),
        "WARN" | "WARNING" => Style::new().yellow(),
        "INFO" => Style::new().green(),
        "DEBUG" | "CONFIG" | "FINE" => Style::new().blue(),
        "TRACE" | "FINER" | "FINEST" => Style::new().dimmed(),
        _ => Style::new(),
    }
}

use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    /// Per-tag colors
    pub tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x18),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x56, 0xB6, 0xC2),
            dim: Color::Rgb(0x6A, 0x6A, 0x80),
            red: Color::Rgb(0xE0, 0x6C, 0x75),
            yellow: Color::Rgb(0xE5, 0xC0, 0x7B),
            green: Color::Rgb(0x98, 0xC3, 0x79),
            cyan: Color::Rgb(0x56, 0xB6, 0xC2),
            purple: Color::Rgb(0xC6, 0x78, 0xDD),
            blue: Color::Rgb(0x61, 0xAF, 0xEF),
            selection_bg: Color::Rgb(0x2C, 0x31, 0x3C),
            tag_colors: HashMap::new(),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Built-in light variant.
    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xFA, 0xF5),
            text: Color::Rgb(0x38, 0x38, 0x48),
            text_bright: Color::Rgb(0x10, 0x10, 0x18),
            highlight: Color::Rgb(0x00, 0x73, 0x80),
            dim: Color::Rgb(0x90, 0x90, 0xA0),
            red: Color::Rgb(0xC0, 0x30, 0x30),
            yellow: Color::Rgb(0xA0, 0x70, 0x00),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            cyan: Color::Rgb(0x00, 0x73, 0x80),
            purple: Color::Rgb(0x7B, 0x3F, 0xA0),
            blue: Color::Rgb(0x1A, 0x5C, 0xC8),
            selection_bg: Color::Rgb(0xE2, 0xE6, 0xEE),
            tag_colors: HashMap::new(),
        }
    }

    /// Named variant: "light" or anything else for the dark default.
    pub fn variant(name: &str) -> Self {
        match name {
            "light" => Theme::light(),
            _ => Theme::default(),
        }
    }

    /// Create a theme from client UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        Theme::default().with_overrides(ui)
    }

    /// Apply [ui.colors] / [ui.tag_colors] overrides on top of this base.
    pub fn with_overrides(mut self, ui: &UiConfig) -> Self {
        let theme = &mut self;

        for (name, hex) in &ui.colors {
            let Some(color) = parse_hex_color(hex) else {
                continue;
            };
            match name.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }

        for (tag, hex) in &ui.tag_colors {
            if let Some(color) = parse_hex_color(hex) {
                theme.tag_colors.insert(tag.clone(), color);
            }
        }

        self
    }

    pub fn tag_color(&self, tag: &str) -> Color {
        self.tag_colors.get(tag).copied().unwrap_or(self.purple)
    }
}

use ratatui::style::Color;

use crate::model::task::{Priority, Status};
use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
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
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            name: "dark",
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            background: Color::Rgb(0xFA, 0xF8, 0xF5),
            text: Color::Rgb(0x3A, 0x36, 0x5C),
            text_bright: Color::Rgb(0x0C, 0x00, 0x1B),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            dim: Color::Rgb(0x8A, 0x86, 0xA8),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            yellow: Color::Rgb(0xB2, 0x82, 0x00),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            cyan: Color::Rgb(0x00, 0x83, 0x8F),
            purple: Color::Rgb(0x7B, 0x1F, 0xA2),
            selection_bg: Color::Rgb(0xF3, 0xD9, 0xE6),
            search_match_bg: Color::Rgb(0xFF, 0xE0, 0x82),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    /// Theme for a stored theme name plus `[ui.colors]` overrides. Unknown
    /// names fall back to dark.
    pub fn named(name: &str, ui: &UiConfig) -> Self {
        let mut theme = match name {
            "light" => Theme::light(),
            _ => Theme::dark(),
        };

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                log::warn!("ignoring invalid color {} = {:?}", key, value);
                continue;
            };
            match theme.slot_mut(key) {
                Some(slot) => *slot = color,
                None => log::warn!("ignoring unknown color slot {}", key),
            }
        }

        theme
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.green,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "yellow" => &mut self.yellow,
            "green" => &mut self.green,
            "cyan" => &mut self.cyan,
            "purple" => &mut self.purple,
            "selection_bg" => &mut self.selection_bg,
            "search_match_bg" => &mut self.search_match_bg,
            "search_match_fg" => &mut self.search_match_fg,
            _ => return None,
        })
    }

    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Todo => self.text,
            Status::Doing => self.cyan,
            Status::Done => self.dim,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
        assert_eq!(parse_hex_color("#a\u{e9}\u{e9}b"), None); // six bytes, not six digits
    }

    #[test]
    fn non_ascii_override_keeps_base_color() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#a\u{e9}\u{e9}b".into());
        assert_eq!(Theme::named("dark", &ui).highlight, Theme::dark().highlight);
    }

    #[test]
    fn template_lists_only_real_slots() {
        let template = include_str!("../templates/taskmate.toml");
        let listed: Vec<&str> = template
            .lines()
            .skip_while(|l| !l.contains("per theme slot"))
            .skip(1)
            .take_while(|l| l.starts_with("# "))
            .flat_map(|l| l.trim_start_matches("# ").split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(listed.len(), 13);
        let mut theme = Theme::dark();
        for slot in listed {
            assert!(theme.slot_mut(slot).is_some(), "unknown slot {}", slot);
        }
    }

    #[test]
    fn named_picks_base_theme() {
        let ui = UiConfig::default();
        assert_eq!(Theme::named("light", &ui), Theme::light());
        assert_eq!(Theme::named("dark", &ui), Theme::dark());
        assert_eq!(Theme::named("neon", &ui).name, "dark");
    }

    #[test]
    fn overrides_apply_on_top_of_base() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#00FF00".into());
        ui.colors.insert("text".into(), "not-a-color".into());
        let theme = Theme::named("light", &ui);
        assert_eq!(theme.highlight, Color::Rgb(0, 0xFF, 0));
        assert_eq!(theme.text, Theme::light().text);
    }
}

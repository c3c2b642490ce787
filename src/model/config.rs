use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from taskmate.toml. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Default: see src/templates/taskmate.toml
    #[serde(default = "default_minutes")]
    pub minutes: u32,
    /// Durations (minutes) cycled through with `p` in the focus view
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            minutes: default_minutes(),
            presets: default_presets(),
        }
    }
}

impl TimerConfig {
    /// Configured duration in seconds (never zero)
    pub fn duration_secs(&self) -> u32 {
        self.minutes.max(1).saturating_mul(60)
    }
}

/// Default: see src/templates/taskmate.toml
fn default_minutes() -> u32 {
    25
}

/// Default: see src/templates/taskmate.toml
fn default_presets() -> Vec<u32> {
    vec![15, 25, 50]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Send a desktop notification (notify-send) when a focus session ends.
    /// Falls back to an in-terminal message when false or when sending fails.
    #[serde(default)]
    pub desktop: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.timer.minutes, 25);
        assert_eq!(config.timer.presets, vec![15, 25, 50]);
        assert!(!config.notify.desktop);
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config: Config = toml::from_str(
            r##"
[timer]
minutes = 50

[ui]
colors = { highlight = "#FF0000" }
"##,
        )
        .unwrap();
        assert_eq!(config.timer.minutes, 50);
        assert_eq!(config.timer.duration_secs(), 3000);
        assert_eq!(config.timer.presets, vec![15, 25, 50]);
        assert_eq!(config.ui.colors.get("highlight").unwrap(), "#FF0000");
    }

    #[test]
    fn zero_minutes_clamps_to_one() {
        let timer = TimerConfig {
            minutes: 0,
            presets: vec![],
        };
        assert_eq!(timer.duration_secs(), 60);
    }

    #[test]
    fn huge_minutes_saturate() {
        let config: Config = toml::from_str("[timer]\nminutes = 100000000\n").unwrap();
        assert_eq!(config.timer.duration_secs(), u32::MAX);
    }
}

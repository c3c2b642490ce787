use std::process::{Command, Stdio};

use crate::model::config::NotifyConfig;

const APP_NAME: &str = "TaskMate";

/// Receives the focus-session completion message
pub trait Notifier {
    /// Deliver `message`. Returns false when the caller must show it itself
    /// (the modal fallback).
    fn notify(&mut self, message: &str) -> bool;
}

/// Desktop notifications through `notify-send`, when enabled in config
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        DesktopNotifier {
            enabled: config.desktop,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, message: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let status = Command::new("notify-send")
            .arg(APP_NAME)
            .arg(message)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) if s.success() => true,
            Ok(s) => {
                log::warn!("notify-send exited with {}", s);
                false
            }
            Err(e) => {
                log::warn!("notify-send unavailable: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_notifier_defers_to_caller() {
        let mut notifier = DesktopNotifier::from_config(&NotifyConfig { desktop: false });
        assert!(!notifier.notify("done"));
    }
}

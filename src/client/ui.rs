//! Alert and loading-indicator hooks used by the API wrappers.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// Severity of a transient alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Warning,
    Info,
}

impl AlertKind {
    pub fn label(self) -> &'static str {
        match self {
            AlertKind::Success => "OK",
            AlertKind::Error => "ERROR",
            AlertKind::Warning => "AVISO",
            AlertKind::Info => "INFO",
        }
    }
}

/// Front-end surface the API wrappers report to
pub trait ClientUi: Send + Sync {
    /// Shows or hides the single loading indicator.
    fn set_loading(&self, loading: bool);

    fn alert(&self, message: &str, kind: AlertKind);
}

/// Writes alerts and the loading indicator to stderr
#[derive(Debug, Default)]
pub struct TerminalUi {
    loading: AtomicBool,
    quiet: bool,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the loading indicator; alerts are still printed
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }
}

impl ClientUi for TerminalUi {
    fn set_loading(&self, loading: bool) {
        let was_loading = self.loading.swap(loading, Ordering::SeqCst);
        if self.quiet || was_loading == loading {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        if loading {
            let _ = write!(stderr, "Cargando...\r");
        } else {
            let _ = write!(stderr, "           \r");
        }
        let _ = stderr.flush();
    }

    fn alert(&self, message: &str, kind: AlertKind) {
        eprintln!("[{}] {}", kind.label(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_flag_is_a_single_boolean() {
        let ui = TerminalUi::quiet();
        ui.set_loading(true);
        ui.set_loading(true);
        assert!(ui.is_loading());
        ui.set_loading(false);
        assert!(!ui.is_loading());
    }

    #[test]
    fn test_alert_labels() {
        assert_eq!(AlertKind::Error.label(), "ERROR");
        assert_eq!(AlertKind::Success.label(), "OK");
    }
}

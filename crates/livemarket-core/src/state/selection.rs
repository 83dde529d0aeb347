use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::config::DEFAULT_INSTRUMENT;

/// Currently selected instrument; the source of truth observed by the
/// instrument-keyed containers.
#[derive(Debug, Clone)]
pub struct SelectionState {
    default_instrument: Arc<str>,
    current: Arc<watch::Sender<String>>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUMENT)
    }
}

impl SelectionState {
    pub fn new(default_instrument: impl Into<String>) -> Self {
        let default_instrument: String = default_instrument.into();
        Self {
            current: Arc::new(watch::channel(default_instrument.clone()).0),
            default_instrument: Arc::from(default_instrument),
        }
    }

    /// Replace the selection. Any string is accepted, including an empty one.
    ///
    /// Observers are woken only when the value actually changes.
    pub fn select(&self, instrument: impl Into<String>) {
        let instrument = instrument.into();
        let changed = self.current.send_if_modified(|current| {
            if *current == instrument {
                return false;
            }
            *current = instrument;
            true
        });
        if changed {
            debug!(instrument = %self.current.borrow().as_str(), "instrument selected");
        }
    }

    /// Go back to the default instrument.
    pub fn reset(&self) {
        self.select(self.default_instrument.as_ref());
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn default_instrument(&self) -> &str {
        &self.default_instrument
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_default_instrument() {
        assert_eq!(SelectionState::default().current(), "IPSA");
    }

    #[test]
    fn select_round_trips_any_identifier() {
        let selection = SelectionState::default();
        for id in ["AGUAS-A", "BCI2024", "ipsa", "BANCO ESTADO", ""] {
            selection.select(id);
            assert_eq!(selection.current(), id);
        }
    }

    #[test]
    fn reset_restores_default_after_empty_selection() {
        let selection = SelectionState::default();
        selection.select("");
        selection.reset();
        assert_eq!(selection.current(), "IPSA");
    }

    #[test]
    fn observers_only_see_real_changes() {
        let selection = SelectionState::default();
        let mut observer = selection.subscribe();

        selection.select("IPSA");
        assert!(!observer.has_changed().expect("sender alive"));

        selection.select("AGUAS-A");
        assert!(observer.has_changed().expect("sender alive"));
        assert_eq!(observer.borrow_and_update().as_str(), "AGUAS-A");
    }

    #[test]
    fn clones_share_one_selection() {
        let selection = SelectionState::new("BCI");
        let handle = selection.clone();
        handle.select("ENEL");
        assert_eq!(selection.current(), "ENEL");
        assert_eq!(selection.default_instrument(), "BCI");
    }
}

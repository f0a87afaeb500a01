//! Scoped activation of the input controller.
//!
//! Every action that drives the desktop runs while holding an
//! [`ActivationGuard`]. The controller is active exactly while at least one
//! guard is alive, so concurrent actions never flip each other's state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct InputController {
    active: Arc<AtomicUsize>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, label: &str) -> ActivationGuard {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(label, active = now, "Input controller activated");
        ActivationGuard {
            active: Arc::clone(&self.active),
            label: label.to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[must_use = "the controller deactivates as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ActivationGuard {
    active: Arc<AtomicUsize>,
    label: String,
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        let left = self.active.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!(label = %self.label, active = left, "Input controller released");
    }
}

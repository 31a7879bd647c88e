//! Round-robin backend selection.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::backend::Backend;

/// Rotates through a slice of backends using a shared atomic cursor.
///
/// The cursor is only advanced when there is something to pick from, and
/// the index is taken modulo the length of the slice handed in, so the
/// slice may differ in size from one call to the next.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    const fn starting_at(cursor: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(cursor),
        }
    }

    pub fn pick(&self, backends: &[Backend]) -> Option<Backend> {
        if backends.is_empty() {
            return None;
        }

        // fetch_add wraps on overflow, which keeps the rotation going
        let ticket = self.cursor.fetch_add(1, Ordering::Relaxed);
        backends.get(ticket % backends.len()).cloned()
    }

    /// Number of selections made so far (modulo `usize`).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

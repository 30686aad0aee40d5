use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pairwise_shared::types::PairKey;
use pairwise_shared::{AppError, AppResult};

/// Per-pair mutex registry. The like engine holds a pair's lock across every
/// check-reverse-and-act sequence, so two callers racing on the same
/// unordered pair are serialized and mutual completion happens exactly once.
///
/// Slots are keyed by the canonical pair string and never reclaimed; one
/// entry exists per pair ever locked.
#[derive(Default)]
pub struct PairLocks {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared mutex for a canonical pair. Callers lock the returned slot
    /// for the duration of their read-check-write sequence.
    pub fn slot(&self, pair: &PairKey) -> AppResult<Arc<Mutex<()>>> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::internal("pair lock registry poisoned"))?;
        Ok(slots.entry(pair.to_string()).or_default().clone())
    }
}

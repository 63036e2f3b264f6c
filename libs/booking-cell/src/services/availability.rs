use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::models::{Slot, SlotQuery};

/// Source of bookable instants for an intake submission.
///
/// Implementations return a finite sequence ordered by time; callers may still
/// normalize it with [`normalize_slots`].
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    async fn get_slots(&self, query: &SlotQuery) -> Result<Vec<Slot>>;
}

/// Fixed slot list. Stands in until availability is computed from the clinic calendar.
#[derive(Debug, Clone)]
pub struct MockAvailabilityProvider {
    slots: Vec<Slot>,
}

impl MockAvailabilityProvider {
    pub fn with_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn default_slots() -> Vec<Slot> {
        [9, 10, 11]
            .into_iter()
            .filter_map(|hour| Utc.with_ymd_and_hms(2024, 9, 26, hour, 0, 0).single())
            .collect()
    }
}

impl Default for MockAvailabilityProvider {
    fn default() -> Self {
        Self::with_slots(Self::default_slots())
    }
}

#[async_trait]
impl AvailabilityProvider for MockAvailabilityProvider {
    async fn get_slots(&self, query: &SlotQuery) -> Result<Vec<Slot>> {
        debug!(
            "Serving {} fixed slots (vet: {:?}, window: {} - {})",
            self.slots.len(), query.vet_id, query.from, query.to
        );
        Ok(self.slots.clone())
    }
}

/// Sorts ascending and drops duplicate instants.
pub fn normalize_slots(mut slots: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    slots.sort();
    slots.dedup();
    slots
}

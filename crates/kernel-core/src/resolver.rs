//! Single-draw cumulative selection over the event table.
//!
//! One uniform sample `r` in `[0, 1)` is compared against the running sum of
//! probabilities in catalog order; the first definition whose running sum is
//! strictly greater than `r` fires. Draws in the uncovered tail fire nothing,
//! so at most one event happens per turn.

use contracts::GameEvent;
use rand::Rng;

use crate::error::DrawOutOfRange;
use crate::events::{EventCatalog, EventDefinition};

/// A validated uniform sample in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct EventDraw(f64);

impl EventDraw {
    pub fn new(value: f64) -> Result<Self, DrawOutOfRange> {
        if (0.0..1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DrawOutOfRange(value))
        }
    }

    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen::<f64>())
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventResolver;

impl EventResolver {
    pub fn select<'a>(
        &self,
        catalog: &'a EventCatalog,
        draw: EventDraw,
    ) -> Option<&'a EventDefinition> {
        let mut cumulative = 0.0_f64;
        for definition in catalog.iter() {
            cumulative += definition.probability;
            if draw.value() < cumulative {
                return Some(definition);
            }
        }
        None
    }

    /// Stamps an immutable occurrence of `definition`.
    pub fn instantiate(
        &self,
        definition: &EventDefinition,
        occurrence_id: impl Into<String>,
        timestamp_ms: i64,
    ) -> GameEvent {
        GameEvent {
            occurrence_id: occurrence_id.into(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            effects: definition.effects.clone(),
            timestamp: timestamp_ms,
            polarity: definition.polarity,
        }
    }
}

//! Deterministic turn engine for grad-survival.
//!
//! A turn applies the chosen action's stat deltas, resolves at most one
//! weighted random event from a single injected draw, clamps the merged
//! deltas into the stat bounds, advances the calendar, and evaluates the
//! graduation and loss conditions. The engine performs no I/O and holds no
//! ambient random or clock state: callers pass both in through
//! [`TurnInput`].

pub mod actions;
pub mod error;
pub mod events;
pub mod resolver;
pub mod session;
pub mod stats;
pub mod turn;

pub use actions::{ActionCatalog, ActionDefinition};
pub use error::{CatalogError, DrawOutOfRange, TurnError};
pub use events::{EventCatalog, EventDefinition};
pub use resolver::{EventDraw, EventResolver};
pub use session::{create_session, summarize};
pub use stats::{apply_deltas, merge_deltas};
pub use turn::{loss_reason, TurnInput, TurnOutcome, TurnProcessor};

//! Session facade over the turn engine, with pluggable storage and an HTTP server.

pub mod config;
mod persistence;
mod server;

use contracts::{ActionInfo, EventInfo, GameSession, SessionListing, SessionSummary, TurnReport};
use kernel_core::{summarize, EventDraw, TurnError, TurnInput, TurnProcessor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

pub use config::{ApiConfig, ConfigError, StoreBackend};
pub use persistence::{MemorySessionStore, PersistenceError, SessionStore, SqliteSessionStore};
pub use server::{router, serve, AppState, ServerError};

/// Milliseconds since the Unix epoch, stamped onto fired events.
pub type Clock = fn() -> i64;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error(transparent)]
    Persistence(PersistenceError),
}

impl From<PersistenceError> for ApiFailure {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::SessionNotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

impl From<TurnError> for ApiFailure {
    fn from(value: TurnError) -> Self {
        match value {
            TurnError::UnknownAction(action) => Self::UnknownAction(action),
        }
    }
}

pub struct GameApi {
    store: Box<dyn SessionStore>,
    processor: TurnProcessor,
    rng: StdRng,
    clock: Clock,
}

impl GameApi {
    pub fn new(store: Box<dyn SessionStore>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            processor: TurnProcessor::standard(),
            rng,
            clock: wall_clock_ms,
        }
    }

    pub fn in_memory(seed: Option<u64>) -> Self {
        Self::new(Box::new(MemorySessionStore::new()), seed)
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, PersistenceError> {
        Ok(Self::new(config.store.open()?, config.seed))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn create_game(&mut self) -> Result<GameSession, ApiFailure> {
        let session = self.store.create()?;
        info!(game_id = %session.id, "created game session");
        Ok(session)
    }

    pub fn get_game(&self, game_id: &str) -> Result<GameSession, ApiFailure> {
        Ok(self.store.get(game_id)?)
    }

    /// Runs one turn using the facade's generator and clock.
    pub fn perform_action(
        &mut self,
        game_id: &str,
        action: &str,
    ) -> Result<TurnReport, ApiFailure> {
        let input = TurnInput::new(EventDraw::sample(&mut self.rng), (self.clock)());
        self.perform_action_with(game_id, action, input)
    }

    pub fn perform_action_with(
        &mut self,
        game_id: &str,
        action: &str,
        input: TurnInput,
    ) -> Result<TurnReport, ApiFailure> {
        let session = self.store.get(game_id)?;
        let outcome = self.processor.perform_turn(&session, action, input)?;

        if outcome.session == session {
            debug!(game_id, action, "turn ignored for finished session");
        } else {
            self.store.put(&outcome.session)?;
        }

        Ok(TurnReport {
            game_state: outcome.session,
            event: outcome.event,
            changes: outcome.deltas,
        })
    }

    /// Removes the session; a missing id is reported as not found.
    pub fn reset_game(&mut self, game_id: &str) -> Result<(), ApiFailure> {
        if self.store.delete(game_id)? {
            info!(game_id, "deleted game session");
            Ok(())
        } else {
            Err(ApiFailure::NotFound(game_id.to_string()))
        }
    }

    pub fn summary(&self, game_id: &str) -> Result<SessionSummary, ApiFailure> {
        Ok(summarize(&self.store.get(game_id)?))
    }

    pub fn list_games(&self, limit: Option<usize>) -> Result<Vec<SessionListing>, ApiFailure> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        Ok(self.store.list(limit)?)
    }

    pub fn actions(&self) -> Vec<ActionInfo> {
        self.processor.actions().infos()
    }

    pub fn events(&self) -> Vec<EventInfo> {
        self.processor.events().infos()
    }
}

fn wall_clock_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

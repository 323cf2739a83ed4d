//! v1 cross-boundary contracts for the turn kernel, session stores, HTTP API and clients.
//!
//! Field names serialise in camelCase. Termination flags and consumption
//! counters are nested objects (`terminal`, `counters`) rather than flat fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod api;

pub use api::{
    ActionInfo, ApiError, ErrorCode, EventInfo, PerformActionRequest, SessionListing,
    SessionSummary, TurnReport,
};

pub const SCHEMA_VERSION_V1: &str = "1.0";

pub const DAYS_PER_SEMESTER: u32 = 30;
pub const STAT_CAP: i64 = 100;
pub const MONEY_CAP: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StatKey {
    Health,
    Mental,
    Research,
    Money,
    AdvisorFavor,
}

impl StatKey {
    pub const ALL: [StatKey; 5] = [
        StatKey::Health,
        StatKey::Mental,
        StatKey::Research,
        StatKey::Money,
        StatKey::AdvisorFavor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Mental => "mental",
            Self::Research => "research",
            Self::Money => "money",
            Self::AdvisorFavor => "advisorFavor",
        }
    }

    /// Inclusive upper bound of the stat. The lower bound is always zero.
    pub fn upper_bound(self) -> i64 {
        match self {
            Self::Money => MONEY_CAP,
            _ => STAT_CAP,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed per-stat changes. Absent keys mean "no change".
pub type StatDeltas = BTreeMap<StatKey, i64>;

/// The five bounded resources describing the player's condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub health: i64,
    pub mental: i64,
    pub research: i64,
    pub money: i64,
    pub advisor_favor: i64,
}

impl Stats {
    pub const INITIAL: Stats = Stats {
        health: 80,
        mental: 70,
        research: 0,
        money: 500_000,
        advisor_favor: 50,
    };

    pub fn get(&self, key: StatKey) -> i64 {
        match key {
            StatKey::Health => self.health,
            StatKey::Mental => self.mental,
            StatKey::Research => self.research,
            StatKey::Money => self.money,
            StatKey::AdvisorFavor => self.advisor_favor,
        }
    }

    pub fn get_mut(&mut self, key: StatKey) -> &mut i64 {
        match key {
            StatKey::Health => &mut self.health,
            StatKey::Mental => &mut self.mental,
            StatKey::Research => &mut self.research,
            StatKey::Money => &mut self.money,
            StatKey::AdvisorFavor => &mut self.advisor_favor,
        }
    }

    pub fn within_bounds(&self) -> bool {
        StatKey::ALL
            .iter()
            .all(|key| (0..=key.upper_bound()).contains(&self.get(*key)))
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "health={} mental={} research={} money={} advisorFavor={}",
            self.health, self.mental, self.research, self.money, self.advisor_favor
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// Cosmetic tallies kept for the end-of-game statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Counter {
    Coffee,
    Ramen,
    AllNighter,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    pub coffee: u32,
    pub ramen: u32,
    pub all_nighter: u32,
}

impl SessionCounters {
    pub fn increment(&mut self, counter: Counter) {
        let slot = match counter {
            Counter::Coffee => &mut self.coffee,
            Counter::Ramen => &mut self.ramen,
            Counter::AllNighter => &mut self.all_nighter,
        };
        *slot = slot.saturating_add(1);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    Health,
    Mental,
    Advisor,
    Money,
}

impl LossReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Mental => "mental",
            Self::Advisor => "advisor",
            Self::Money => "money",
        }
    }
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw termination flags. Both may be set by the same turn. A loss always
/// carries its reason; payloads where `isGameOver` and `gameOverReason`
/// disagree are rejected on deserialization.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", try_from = "TerminalFlags")]
pub struct TerminalStatus {
    pub is_graduated: bool,
    pub is_game_over: bool,
    pub game_over_reason: Option<LossReason>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TerminalFlags {
    #[serde(default)]
    is_graduated: bool,
    #[serde(default)]
    is_game_over: bool,
    #[serde(default)]
    game_over_reason: Option<LossReason>,
}

impl TryFrom<TerminalFlags> for TerminalStatus {
    type Error = String;

    fn try_from(raw: TerminalFlags) -> Result<Self, Self::Error> {
        match (raw.is_game_over, raw.game_over_reason) {
            (true, None) => Err("isGameOver is set without a gameOverReason".to_string()),
            (false, Some(reason)) => Err(format!(
                "gameOverReason {reason} is set but isGameOver is false"
            )),
            _ => Ok(Self {
                is_graduated: raw.is_graduated,
                is_game_over: raw.is_game_over,
                game_over_reason: raw.game_over_reason,
            }),
        }
    }
}

impl TerminalStatus {
    pub fn record_loss(&mut self, reason: LossReason) {
        self.is_game_over = true;
        self.game_over_reason = Some(reason);
    }
}

/// Which end state a client should present. Graduation takes precedence
/// over a loss recorded in the same turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Active,
    Graduated,
    GameOver(LossReason),
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Graduated => f.write_str("graduated"),
            Self::GameOver(reason) => write!(f, "game_over({reason})"),
        }
    }
}

/// A logged occurrence of a random event. Never mutated once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub occurrence_id: String,
    pub title: String,
    pub description: String,
    pub effects: StatDeltas,
    pub timestamp: i64,
    pub polarity: Polarity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    pub stats: Stats,
    pub day: u32,
    pub semester: u32,
    pub total_days: u32,
    #[serde(default)]
    pub terminal: TerminalStatus,
    #[serde(default)]
    pub event_log: Vec<GameEvent>,
    pub last_action: Option<String>,
    #[serde(default)]
    pub counters: SessionCounters,
}

impl GameSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stats: Stats::INITIAL,
            day: 1,
            semester: 1,
            total_days: 0,
            terminal: TerminalStatus::default(),
            event_log: Vec::new(),
            last_action: None,
            counters: SessionCounters::default(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    pub fn outcome(&self) -> Outcome {
        if self.terminal.is_graduated {
            return Outcome::Graduated;
        }
        match self.terminal.game_over_reason {
            Some(reason) if self.terminal.is_game_over => Outcome::GameOver(reason),
            _ => Outcome::Active,
        }
    }
}

impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} semester={} day={} total_days={} outcome={} {}",
            self.id,
            self.semester,
            self.day,
            self.total_days,
            self.outcome(),
            self.stats
        )
    }
}

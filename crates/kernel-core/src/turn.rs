//! One full turn: action deltas, at most one random event, calendar advance,
//! termination checks.

use contracts::{
    GameEvent, GameSession, LossReason, StatDeltas, Stats, DAYS_PER_SEMESTER, STAT_CAP,
};
use tracing::{debug, info};

use crate::actions::ActionCatalog;
use crate::error::TurnError;
use crate::events::EventCatalog;
use crate::resolver::{EventDraw, EventResolver};
use crate::stats::{apply_deltas, merge_deltas};

/// Every external input a turn consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnInput {
    pub draw: EventDraw,
    pub timestamp_ms: i64,
}

impl TurnInput {
    pub fn new(draw: EventDraw, timestamp_ms: i64) -> Self {
        Self { draw, timestamp_ms }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub session: GameSession,
    pub event: Option<GameEvent>,
    pub deltas: StatDeltas,
}

impl TurnOutcome {
    /// True when the turn was skipped because the session had already ended.
    pub fn is_noop(&self) -> bool {
        self.deltas.is_empty() && self.event.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TurnProcessor {
    actions: ActionCatalog,
    events: EventCatalog,
    resolver: EventResolver,
}

impl TurnProcessor {
    pub fn new(actions: ActionCatalog, events: EventCatalog) -> Self {
        Self {
            actions,
            events,
            resolver: EventResolver,
        }
    }

    pub fn standard() -> Self {
        Self::new(ActionCatalog::standard(), EventCatalog::standard())
    }

    pub fn actions(&self) -> &ActionCatalog {
        &self.actions
    }

    pub fn events(&self) -> &EventCatalog {
        &self.events
    }

    /// Runs one turn against `session` and returns the successor state. The
    /// input session is never modified; an unknown action leaves the caller
    /// holding the original.
    pub fn perform_turn(
        &self,
        session: &GameSession,
        action_id: &str,
        input: TurnInput,
    ) -> Result<TurnOutcome, TurnError> {
        if session.is_terminal() {
            debug!(session_id = %session.id, action_id, "turn on finished session ignored");
            return Ok(TurnOutcome {
                session: session.clone(),
                event: None,
                deltas: StatDeltas::new(),
            });
        }

        let action = self.actions.get(action_id)?;
        let mut next = session.clone();
        let mut deltas = action.effects.clone();
        if let Some(counter) = action.counter {
            next.counters.increment(counter);
        }

        let mut triggered = None;
        if let Some(definition) = self.resolver.select(&self.events, input.draw) {
            merge_deltas(&mut deltas, &definition.effects);
            if let Some(counter) = definition.counter {
                next.counters.increment(counter);
            }
            let occurrence_id = format!(
                "{}-{}-{}",
                definition.id,
                input.timestamp_ms,
                session.total_days + 1
            );
            let event = self
                .resolver
                .instantiate(definition, occurrence_id, input.timestamp_ms);
            next.event_log.push(event.clone());
            triggered = Some(event);
        }

        next.stats = apply_deltas(&session.stats, &deltas);

        next.day += 1;
        next.total_days += 1;
        if next.day > DAYS_PER_SEMESTER {
            next.day = 1;
            next.semester += 1;
        }

        if next.stats.research >= STAT_CAP {
            next.terminal.is_graduated = true;
        }
        if let Some(reason) = loss_reason(&next.stats) {
            next.terminal.record_loss(reason);
        }

        next.last_action = Some(action_id.to_string());

        debug!(
            session_id = %next.id,
            action_id,
            event = triggered.as_ref().map(|event| event.title.as_str()),
            draw = input.draw.value(),
            "turn applied"
        );
        if next.is_terminal() {
            info!(
                session_id = %next.id,
                outcome = %next.outcome(),
                total_days = next.total_days,
                "session reached a terminal state"
            );
        }

        Ok(TurnOutcome {
            session: next,
            event: triggered,
            deltas,
        })
    }
}

/// First depleted stat in priority order health, mental, advisor favor, money.
pub fn loss_reason(stats: &Stats) -> Option<LossReason> {
    if stats.health <= 0 {
        Some(LossReason::Health)
    } else if stats.mental <= 0 {
        Some(LossReason::Mental)
    } else if stats.advisor_favor <= 0 {
        Some(LossReason::Advisor)
    } else if stats.money <= 0 {
        Some(LossReason::Money)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use contracts::{Counter, Outcome, Polarity, StatKey};

    use super::*;
    use crate::events::EventDefinition;

    const QUIET: f64 = 0.99;
    const NOW: i64 = 1_700_000_000_000;

    fn input(r: f64) -> TurnInput {
        TurnInput::new(EventDraw::new(r).expect("draw in range"), NOW)
    }

    fn always(definition: EventDefinition) -> TurnProcessor {
        TurnProcessor::new(
            ActionCatalog::standard(),
            EventCatalog::new(vec![definition]).expect("valid catalog"),
        )
    }

    #[test]
    fn sleep_on_fresh_session_clamps_health() {
        let processor = TurnProcessor::standard();
        let session = GameSession::new("fresh");
        let outcome = processor
            .perform_turn(&session, "sleep", input(QUIET))
            .expect("sleep is known");

        assert_eq!(outcome.session.stats.health, 100);
        assert_eq!(outcome.session.stats.mental, 80);
        assert_eq!(outcome.session.day, 2);
        assert_eq!(outcome.session.total_days, 1);
        assert!(outcome.event.is_none());
        assert!(!outcome.session.is_terminal());
        assert_eq!(outcome.session.last_action.as_deref(), Some("sleep"));
        assert_eq!(
            outcome.deltas,
            StatDeltas::from([(StatKey::Health, 25), (StatKey::Mental, 10)])
        );
        assert_eq!(session, GameSession::new("fresh"));
    }

    #[test]
    fn event_effects_merge_into_deltas_and_log() {
        let processor = always(
            EventDefinition::new(
                "praise",
                Polarity::Positive,
                1.0,
                &[(StatKey::Mental, 25), (StatKey::AdvisorFavor, 15)],
            )
            .with_text("Praise", "Well done"),
        );
        let session = GameSession::new("merge");
        let outcome = processor
            .perform_turn(&session, "meetAdvisor", input(0.3))
            .expect("meetAdvisor is known");

        assert_eq!(outcome.deltas[&StatKey::Mental], 15);
        assert_eq!(outcome.deltas[&StatKey::AdvisorFavor], 25);
        assert_eq!(outcome.deltas[&StatKey::Research], 3);
        assert_eq!(outcome.session.stats.mental, 85);
        assert_eq!(outcome.session.stats.advisor_favor, 75);

        let event = outcome.event.expect("event fired");
        assert_eq!(event.occurrence_id, format!("praise-{NOW}-1"));
        assert_eq!(outcome.session.event_log, vec![event]);
    }

    #[test]
    fn all_nighter_counter_follows_the_event() {
        let processor = always(
            EventDefinition::new("all_nighter", Polarity::Negative, 1.0, &[(StatKey::Health, -20)])
                .with_counter(Counter::AllNighter),
        );
        let outcome = processor
            .perform_turn(&GameSession::new("late"), "drinkCoffee", input(0.5))
            .expect("drinkCoffee is known");
        assert_eq!(outcome.session.counters.all_nighter, 1);
        assert_eq!(outcome.session.counters.coffee, 1);
        assert_eq!(outcome.session.stats.health, 57);
    }

    #[test]
    fn unknown_action_is_rejected_without_side_effects() {
        let processor = TurnProcessor::standard();
        let session = GameSession::new("strict");
        let err = processor
            .perform_turn(&session, "procrastinate", input(QUIET))
            .unwrap_err();
        assert_eq!(err, TurnError::UnknownAction("procrastinate".to_string()));
    }

    #[test]
    fn finished_session_is_returned_unchanged() {
        let processor = TurnProcessor::standard();
        let mut session = GameSession::new("done");
        session.terminal.record_loss(LossReason::Mental);

        for action in ["sleep", "not-an-action"] {
            let outcome = processor
                .perform_turn(&session, action, input(0.0))
                .expect("terminal turns never fail");
            assert!(outcome.is_noop());
            assert_eq!(outcome.session, session);
        }
    }

    #[test]
    fn semester_rolls_over_after_day_thirty() {
        let processor = TurnProcessor::standard();
        let mut session = GameSession::new("calendar");
        session.day = 30;
        session.semester = 3;
        session.total_days = 89;

        let outcome = processor
            .perform_turn(&session, "rest", input(QUIET))
            .expect("rest is known");
        assert_eq!(outcome.session.day, 1);
        assert_eq!(outcome.session.semester, 4);
        assert_eq!(outcome.session.total_days, 90);
    }

    #[test]
    fn graduation_and_loss_can_land_together() {
        let processor = TurnProcessor::standard();
        let mut session = GameSession::new("photo-finish");
        session.stats.research = 95;
        session.stats.health = 5;

        let outcome = processor
            .perform_turn(&session, "writePaper", input(QUIET))
            .expect("writePaper is known");
        assert!(outcome.session.terminal.is_graduated);
        assert!(outcome.session.terminal.is_game_over);
        assert_eq!(
            outcome.session.terminal.game_over_reason,
            Some(LossReason::Health)
        );
        assert_eq!(outcome.session.outcome(), Outcome::Graduated);
    }

    #[test]
    fn loss_reasons_follow_priority_order() {
        let mut stats = Stats::INITIAL;
        assert_eq!(loss_reason(&stats), None);

        stats.money = 0;
        assert_eq!(loss_reason(&stats), Some(LossReason::Money));
        stats.advisor_favor = 0;
        assert_eq!(loss_reason(&stats), Some(LossReason::Advisor));
        stats.mental = 0;
        assert_eq!(loss_reason(&stats), Some(LossReason::Mental));
        stats.health = 0;
        assert_eq!(loss_reason(&stats), Some(LossReason::Health));
    }
}

use contracts::{GameSession, SessionSummary};
use uuid::Uuid;

/// A fresh session with a new v4 id and the starting stats.
pub fn create_session() -> GameSession {
    GameSession::new(Uuid::new_v4().to_string())
}

pub fn summarize(session: &GameSession) -> SessionSummary {
    let positive_events = session
        .event_log
        .iter()
        .filter(|event| event.polarity.is_positive())
        .count();

    SessionSummary {
        id: session.id.clone(),
        outcome: session.outcome(),
        day: session.day,
        semester: session.semester,
        total_days: session.total_days,
        stats: session.stats,
        counters: session.counters,
        events_logged: session.event_log.len(),
        positive_events,
        negative_events: session.event_log.len() - positive_events,
    }
}

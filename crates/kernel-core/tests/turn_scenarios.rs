use contracts::{GameSession, LossReason, Outcome, Polarity, StatKey, Stats};
use kernel_core::{
    ActionCatalog, EventCatalog, EventDefinition, EventDraw, TurnInput, TurnProcessor,
};

const NOW: i64 = 1_717_000_000_000;

fn quiet() -> TurnInput {
    // Above the standard table's total mass of 0.54.
    TurnInput::new(EventDraw::new(0.95).expect("draw in range"), NOW)
}

fn session_with(adjust: impl FnOnce(&mut Stats)) -> GameSession {
    let mut session = GameSession::new("scenario");
    adjust(&mut session.stats);
    session
}

#[test]
fn scenario_1_sleep_on_fresh_session() {
    let processor = TurnProcessor::standard();
    let outcome = processor
        .perform_turn(&GameSession::new("fresh"), "sleep", quiet())
        .expect("sleep is known");

    let stats = outcome.session.stats;
    assert_eq!(stats.health, 100);
    assert_eq!(stats.mental, 80);
    assert_eq!(stats.research, 0);
    assert_eq!(stats.money, 500_000);
    assert_eq!(stats.advisor_favor, 50);
    assert_eq!(outcome.session.day, 2);
    assert!(outcome.event.is_none());
    assert!(!outcome.session.is_terminal());
}

#[test]
fn scenario_2_write_paper_graduates() {
    let processor = TurnProcessor::standard();
    let session = session_with(|stats| stats.research = 95);
    let outcome = processor
        .perform_turn(&session, "writePaper", quiet())
        .expect("writePaper is known");

    assert_eq!(outcome.session.stats.research, 100);
    assert!(outcome.session.terminal.is_graduated);
    assert!(!outcome.session.terminal.is_game_over);
    assert_eq!(outcome.session.outcome(), Outcome::Graduated);
}

#[test]
fn scenario_3_part_time_job_exhausts_health() {
    let processor = TurnProcessor::standard();
    let session = session_with(|stats| {
        stats.health = 5;
        stats.advisor_favor = 5;
    });
    let outcome = processor
        .perform_turn(&session, "partTimeJob", quiet())
        .expect("partTimeJob is known");

    assert_eq!(outcome.session.stats.health, 0);
    // advisor favor also hit zero, but health is checked first.
    assert_eq!(outcome.session.stats.advisor_favor, 0);
    assert!(outcome.session.terminal.is_game_over);
    assert_eq!(
        outcome.session.terminal.game_over_reason,
        Some(LossReason::Health)
    );
}

#[test]
fn scenario_4_ramen_bankrupts_but_still_counts() {
    let processor = TurnProcessor::standard();
    let session = session_with(|stats| stats.money = 2_000);
    let outcome = processor
        .perform_turn(&session, "eatRamen", quiet())
        .expect("eatRamen is known");

    assert_eq!(outcome.session.stats.money, 0);
    assert_eq!(
        outcome.session.outcome(),
        Outcome::GameOver(LossReason::Money)
    );
    assert_eq!(outcome.session.counters.ramen, 1);
}

#[test]
fn scenario_5_cumulative_boundary_is_strict() {
    let catalog = EventCatalog::new(vec![
        EventDefinition::new("early", Polarity::Negative, 0.125, &[(StatKey::Mental, -1)]),
        EventDefinition::new("late", Polarity::Positive, 0.125, &[(StatKey::Mental, 1)]),
    ])
    .expect("valid catalog");
    let processor = TurnProcessor::new(ActionCatalog::standard(), catalog);

    let at_boundary = TurnInput::new(EventDraw::new(0.125).expect("draw in range"), NOW);
    let outcome = processor
        .perform_turn(&GameSession::new("edge"), "rest", at_boundary)
        .expect("rest is known");
    let event = outcome.event.expect("boundary draw fires the later event");
    assert!(event.occurrence_id.starts_with("late-"));
    assert_eq!(outcome.session.event_log.len(), 1);

    let just_below = TurnInput::new(EventDraw::new(0.124_999_9).expect("draw in range"), NOW);
    let outcome = processor
        .perform_turn(&GameSession::new("edge"), "rest", just_below)
        .expect("rest is known");
    assert!(outcome
        .event
        .expect("event fires")
        .occurrence_id
        .starts_with("early-"));
}

#[test]
fn a_full_semester_of_sleep_rolls_the_calendar() {
    let processor = TurnProcessor::standard();
    let mut session = GameSession::new("sleepy");
    for _ in 0..30 {
        session = processor
            .perform_turn(&session, "sleep", quiet())
            .expect("sleep is known")
            .session;
    }
    assert_eq!(session.day, 1);
    assert_eq!(session.semester, 2);
    assert_eq!(session.total_days, 30);
    assert_eq!(session.stats.health, 100);
    assert_eq!(session.stats.mental, 100);
}

#[test]
fn research_grind_ends_in_graduation_or_loss() {
    let processor = TurnProcessor::standard();
    let mut session = GameSession::new("grind");
    let mut turns = 0;
    while !session.is_terminal() && turns < 200 {
        let action = if session.stats.health < 30 || session.stats.mental < 30 {
            "sleep"
        } else if session.stats.advisor_favor < 30 {
            "meetAdvisor"
        } else {
            "writePaper"
        };
        session = processor
            .perform_turn(&session, action, quiet())
            .expect("standard actions are known")
            .session;
        turns += 1;
    }
    assert_eq!(session.outcome(), Outcome::Graduated);
    assert!(session.stats.within_bounds());
}

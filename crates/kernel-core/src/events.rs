//! Weighted random event table. Declaration order is significant: the
//! resolver walks it front to back and the first cumulative bound above the
//! draw wins.

use std::collections::BTreeSet;

use contracts::{Counter, EventInfo, Polarity, StatDeltas, StatKey};

use crate::error::CatalogError;

const PROBABILITY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct EventDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effects: StatDeltas,
    pub probability: f64,
    pub polarity: Polarity,
    pub counter: Option<Counter>,
}

impl EventDefinition {
    pub fn new(
        id: impl Into<String>,
        polarity: Polarity,
        probability: f64,
        effects: &[(StatKey, i64)],
    ) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            description: String::new(),
            effects: effects.iter().copied().collect(),
            probability,
            polarity,
            counter: None,
            id,
        }
    }

    pub fn with_text(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = title.into();
        self.description = description.into();
        self
    }

    pub fn with_counter(mut self, counter: Counter) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn info(&self) -> EventInfo {
        EventInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            effects: self.effects.clone(),
            probability: self.probability,
            polarity: self.polarity,
            counter: self.counter,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCatalog {
    entries: Vec<EventDefinition>,
}

impl EventCatalog {
    pub fn new(entries: Vec<EventDefinition>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            if !(entry.probability > 0.0 && entry.probability <= 1.0) {
                return Err(CatalogError::InvalidProbability {
                    id: entry.id.clone(),
                    probability: entry.probability,
                });
            }
        }
        let catalog = Self { entries };
        let total = catalog.total_probability();
        if total > 1.0 + PROBABILITY_EPSILON {
            return Err(CatalogError::ProbabilityMassExceeded { total });
        }
        Ok(catalog)
    }

    /// The twelve events of the game, total mass 0.54.
    pub fn standard() -> Self {
        Self {
            entries: standard_events(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventDefinition> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&EventDefinition> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|entry| entry.probability).sum()
    }

    pub fn infos(&self) -> Vec<EventInfo> {
        self.entries.iter().map(EventDefinition::info).collect()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_events() -> Vec<EventDefinition> {
    use Polarity::{Negative, Positive};
    use StatKey::{AdvisorFavor, Health, Mental, Money, Research};

    vec![
        EventDefinition::new("advisor_angry", Negative, 0.05, &[(Mental, -20), (AdvisorFavor, -15)])
            .with_text(
                "Summoned by your advisor",
                "Your advisor calls you in and is furious about how slow the research is going.",
            ),
        EventDefinition::new("experiment_fail", Negative, 0.06, &[(Mental, -25), (Research, -10)])
            .with_text(
                "Experiment failed",
                "The experiment you spent days preparing failed completely.",
            ),
        EventDefinition::new(
            "paper_reject",
            Negative,
            0.04,
            &[(Mental, -30), (Research, -5), (AdvisorFavor, -10)],
        )
        .with_text(
            "Paper rejected",
            "Your submission was rejected. The reviewer comments are brutal.",
        ),
        EventDefinition::new("sudden_meeting", Negative, 0.075, &[(Mental, -10), (Health, -5)])
            .with_text("Surprise meeting", "A lab meeting was just scheduled for tonight."),
        EventDefinition::new(
            "computer_crash",
            Negative,
            0.025,
            &[(Mental, -20), (Research, -8), (Money, -100_000)],
        )
        .with_text(
            "Computer crash",
            "The lab computer died. The data you had not saved yet...",
        ),
        EventDefinition::new("senior_help", Positive, 0.05, &[(Research, 10), (Mental, 10)])
            .with_text("Help from a senior", "A kind senior student helps with your research."),
        EventDefinition::new("scholarship", Positive, 0.04, &[(Money, 200_000), (Mental, 15)])
            .with_text("Scholarship paid", "This month's scholarship just landed in your account!"),
        EventDefinition::new("advisor_praise", Positive, 0.035, &[(Mental, 25), (AdvisorFavor, 15)])
            .with_text(
                "Praise from your advisor",
                "Your advisor is pleased with your progress and says so!",
            ),
        EventDefinition::new(
            "paper_accept",
            Positive,
            0.025,
            &[(Mental, 30), (Research, 15), (AdvisorFavor, 20)],
        )
        .with_text(
            "Paper accepted",
            "Your paper was accepted at the conference. Congratulations!",
        ),
        EventDefinition::new(
            "free_food",
            Positive,
            0.06,
            &[(Health, 10), (Mental, 5), (Money, 10_000)],
        )
        .with_text("Free food", "You got a free meal at a seminar."),
        EventDefinition::new(
            "all_nighter",
            Negative,
            0.05,
            &[(Health, -20), (Mental, -15), (Research, 8)],
        )
        .with_text(
            "Forced all-nighter",
            "Your advisor wants results by tomorrow, so you are up all night...",
        )
        .with_counter(Counter::AllNighter),
        EventDefinition::new("lab_mate_quit", Negative, 0.03, &[(Mental, -15)]).with_text(
            "A lab mate drops out",
            "A student from your cohort announced they are quitting. You are tempted too...",
        ),
    ]
}

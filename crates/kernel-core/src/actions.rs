//! The fixed table of player actions, keyed by id in declaration order.

use std::collections::BTreeMap;

use contracts::{ActionInfo, Counter, StatDeltas, StatKey};

use crate::error::{CatalogError, TurnError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub effects: StatDeltas,
    /// Counter bumped whenever the action is taken.
    pub counter: Option<Counter>,
}

impl ActionDefinition {
    pub fn new(id: impl Into<String>, effects: &[(StatKey, i64)]) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            description: String::new(),
            icon: String::new(),
            effects: effects.iter().copied().collect(),
            counter: None,
            id,
        }
    }

    pub fn with_text(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.description = description.into();
        self.icon = icon.into();
        self
    }

    pub fn with_counter(mut self, counter: Counter) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn info(&self) -> ActionInfo {
        ActionInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            effects: self.effects.clone(),
            counter: self.counter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionCatalog {
    entries: Vec<ActionDefinition>,
    index: BTreeMap<String, usize>,
}

impl ActionCatalog {
    pub fn new(entries: Vec<ActionDefinition>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// The ten actions of the game.
    pub fn standard() -> Self {
        let entries = standard_actions();
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.id.clone(), position))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, id: &str) -> Result<&ActionDefinition, TurnError> {
        self.index
            .get(id)
            .map(|position| &self.entries[*position])
            .ok_or_else(|| TurnError::UnknownAction(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn infos(&self) -> Vec<ActionInfo> {
        self.entries.iter().map(ActionDefinition::info).collect()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_actions() -> Vec<ActionDefinition> {
    use StatKey::{AdvisorFavor, Health, Mental, Money, Research};

    vec![
        ActionDefinition::new("readPapers", &[(Research, 5), (Mental, -5), (Health, -3)])
            .with_text(
                "Read papers",
                "Catch up on the latest literature and fold it into your research",
                "BookOpen",
            ),
        ActionDefinition::new("experiment", &[(Research, 10), (Mental, -8), (Health, -5)])
            .with_text(
                "Run experiment",
                "Spend the day running experiments in the lab",
                "FlaskConical",
            ),
        ActionDefinition::new(
            "writePaper",
            &[(Research, 15), (Mental, -15), (Health, -8), (AdvisorFavor, 5)],
        )
        .with_text("Write paper", "Turn your results into a manuscript", "PenTool"),
        ActionDefinition::new("sleep", &[(Health, 25), (Mental, 10)])
            .with_text("Sleep", "Get a full night of sleep and recover", "Moon"),
        ActionDefinition::new("drinkCoffee", &[(Mental, 8), (Health, -3), (Money, -5_000)])
            .with_text("Drink coffee", "Caffeine keeps you going", "Coffee")
            .with_counter(Counter::Coffee),
        ActionDefinition::new("eatRamen", &[(Health, 5), (Mental, 3), (Money, -3_000)])
            .with_text("Eat ramen", "A cheap meal between experiments", "Soup")
            .with_counter(Counter::Ramen),
        ActionDefinition::new("meetAdvisor", &[(AdvisorFavor, 10), (Mental, -10), (Research, 3)])
            .with_text("Meet advisor", "Report your progress to your advisor", "UserCheck"),
        ActionDefinition::new(
            "partTimeJob",
            &[(Money, 50_000), (Health, -10), (Mental, -5), (AdvisorFavor, -5)],
        )
        .with_text("Part-time job", "Work a shift to cover living costs", "Briefcase"),
        ActionDefinition::new("rest", &[(Mental, 15), (Health, 5), (AdvisorFavor, -3)])
            .with_text("Rest", "Take a break and let your mind recover", "Armchair"),
        ActionDefinition::new("exercise", &[(Health, 15), (Mental, 5), (Money, -10_000)])
            .with_text("Exercise", "Work out to stay healthy", "Dumbbell"),
    ]
}

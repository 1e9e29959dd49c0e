//! Scenario files
//!
//! A scenario describes one design session in TOML: the event kind, the room,
//! elements to place, people to import and the assignment steps to run.
//!
//! ```toml
//! event = "conference"
//! arrange = "department"
//!
//! [room]
//! shape = "rectangle"
//! width = 1600
//! height = 900
//!
//! [[elements]]
//! kind = { variant = "table", shape = "circle" }
//! seat_count = 6
//! quantity = 3
//!
//! [[people]]
//! name = "Ada"
//! attribute1 = "Engineering"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use seatwise_core::config::ConfigError;
use seatwise_core::{
    ElementSpec, ElementTemplate, Error, EventKind, GroupBy, ImportRecord, ImportReport,
    LayoutStore, Result, RoomShape, RoomTemplate, TableShape,
};

/// Room section: either a template or explicit dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomSection {
    Template { template: RoomTemplate },
    Custom { shape: RoomShape, width: f64, height: f64 },
}

/// One `[[elements]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    #[serde(flatten)]
    pub spec: ElementSpec,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// `[auto_arrange]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoArrangeSection {
    pub shape: TableShape,
    pub width: f64,
    pub height: f64,
    pub seats: u32,
    pub count: usize,
}

/// Manual assignment by person name and element label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub person: String,
    pub element: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub event: EventKind,
    #[serde(default)]
    pub room: Option<RoomSection>,
    #[serde(default)]
    pub elements: Vec<ElementEntry>,
    #[serde(default)]
    pub auto_arrange: Option<AutoArrangeSection>,
    #[serde(default)]
    pub people: Vec<ImportRecord>,
    #[serde(default)]
    pub assignments: Vec<AssignmentEntry>,
    #[serde(default)]
    pub arrange: Option<GroupBy>,
}

/// What running a scenario did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOutcome {
    pub import: ImportReport,
    pub auto_arranged: usize,
    /// Manual assignments that could not be applied, with the reason
    pub rejected: Vec<String>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(ConfigError::ParseError(e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(ConfigError::NotFound(path.to_path_buf())));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply every step to the store, in file order
    pub fn run(&self, store: &mut LayoutStore) -> Result<ScenarioOutcome> {
        let mut outcome = ScenarioOutcome::default();

        match &self.room {
            Some(RoomSection::Template { template }) => {
                store.apply_room_template(*template);
            }
            Some(RoomSection::Custom {
                shape,
                width,
                height,
            }) => {
                store.set_room(*shape, *width, *height)?;
            }
            None => {}
        }

        for entry in &self.elements {
            if entry.quantity > 1 {
                store.add_elements_batch(entry.spec.clone(), entry.quantity)?;
            } else {
                store.add_element(entry.spec.clone())?;
            }
        }

        if let Some(section) = &self.auto_arrange {
            let template =
                ElementTemplate::new(section.shape, section.width, section.height, section.seats);
            outcome.auto_arranged = store.auto_arrange(&template, section.count)?.len();
        }

        outcome.import = store.import_people(self.people.iter().cloned());

        for entry in &self.assignments {
            if let Err(reason) = assign_by_name(store, entry) {
                tracing::warn!(person = %entry.person, element = %entry.element, %reason, "Assignment rejected");
                outcome.rejected.push(format!("{} -> {}: {}", entry.person, entry.element, reason));
            }
        }

        if let Some(group_by) = self.arrange {
            store.smart_arrange(group_by);
        }

        Ok(outcome)
    }
}

fn assign_by_name(store: &mut LayoutStore, entry: &AssignmentEntry) -> std::result::Result<(), String> {
    let person = store
        .people()
        .iter()
        .find(|p| p.name == entry.person)
        .map(|p| p.id.clone())
        .ok_or_else(|| "unknown person".to_string())?;
    let element = store
        .elements()
        .iter()
        .find(|e| e.label == entry.element)
        .map(|e| e.id.clone())
        .ok_or_else(|| "unknown element".to_string())?;
    store
        .assign_to_element(&person, &element)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

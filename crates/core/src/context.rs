//! Design session context
//!
//! One context per design session: which kind of event is being planned,
//! the session code it is stored under, the planner configuration and the
//! id generator every new element and person draws from.

use std::fmt;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::models::PersonKind;

/// Unique string producer for element and person ids
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random ids (uuid v4)
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic ids `id1`, `id2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::with_prefix("id")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }

    /// Continue after ids already in use (e.g. after restoring a snapshot)
    pub fn starting_at(prefix: &str, next: u64) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: next.max(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Kind of event being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Conference,
    TradeShow,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Conference => "conference",
            EventKind::TradeShow => "tradeshow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conference" => Some(EventKind::Conference),
            "tradeshow" => Some(EventKind::TradeShow),
            _ => None,
        }
    }

    fn code_prefix(&self) -> char {
        match self {
            EventKind::Conference => 'C',
            EventKind::TradeShow => 'T',
        }
    }

    /// People added to this kind of event
    pub fn person_kind(&self) -> PersonKind {
        match self {
            EventKind::Conference => PersonKind::Attendee,
            EventKind::TradeShow => PersonKind::Exhibitor,
        }
    }
}

/// Session code such as `C-20250908-6927`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCode(pub String);

impl SessionCode {
    /// Generate a fresh code for today
    pub fn generate(kind: EventKind) -> Self {
        let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);
        Self::for_date(kind, Utc::now().date_naive(), suffix)
    }

    pub fn for_date(kind: EventKind, date: NaiveDate, suffix: u16) -> Self {
        Self(format!(
            "{}-{}-{:04}",
            kind.code_prefix(),
            date.format("%Y%m%d"),
            suffix
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit per-session state handed to the layout store
pub struct SessionContext {
    pub kind: EventKind,
    pub code: SessionCode,
    pub config: PlannerConfig,
    ids: Box<dyn IdGenerator>,
}

impl SessionContext {
    /// New session with random ids and a generated code
    pub fn new(kind: EventKind, config: PlannerConfig) -> Self {
        Self {
            kind,
            code: SessionCode::generate(kind),
            config,
            ids: Box::new(UuidIdGenerator),
        }
    }

    /// Session with a known code and a custom id generator
    pub fn with_ids(
        kind: EventKind,
        code: SessionCode,
        config: PlannerConfig,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self {
            kind,
            code,
            config,
            ids,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("kind", &self.kind)
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), "id1");
        assert_eq!(ids.next_id(), "id2");
        let mut resumed = SequentialIdGenerator::starting_at("p", 10);
        assert_eq!(resumed.next_id(), "p10");
    }

    #[test]
    fn test_uuid_ids_unique() {
        let mut ids = UuidIdGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_session_code_format() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        let code = SessionCode::for_date(EventKind::Conference, date, 6927);
        assert_eq!(code.as_str(), "C-20250908-6927");

        let generated = SessionCode::generate(EventKind::TradeShow);
        assert!(generated.as_str().starts_with("T-"));
        assert_eq!(generated.as_str().len(), "T-20250908-1234".len());
    }

    #[test]
    fn test_context_uses_injected_generator() {
        let mut ctx = SessionContext::with_ids(
            EventKind::Conference,
            SessionCode("C-test".into()),
            PlannerConfig::default(),
            Box::new(SequentialIdGenerator::new()),
        );
        assert_eq!(ctx.next_id(), "id1");
        assert_eq!(ctx.kind.person_kind(), PersonKind::Attendee);
    }
}

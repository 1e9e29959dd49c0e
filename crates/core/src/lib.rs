//! Seatwise Core Library
//!
//! Layout and assignment engine for event seating: element and seat models,
//! the geometry kernel, the placement planner, the assignment ledger, the
//! layout store and SQLite snapshot storage.

pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod invariants;
pub mod ledger;
pub mod models;
pub mod planner;
pub mod storage;
pub mod store;

pub use config::{ConfigError, PlannerConfig};
pub use context::{
    EventKind, IdGenerator, SequentialIdGenerator, SessionCode, SessionContext, UuidIdGenerator,
};
pub use error::{Error, Result};
pub use ledger::{ArrangeReport, AssignOutcome, AssignmentLedger, GroupBy};
pub use models::*;
pub use planner::{Capacity, ElementTemplate, Footprint, Placement};
pub use storage::{Database, LayoutInfo, LayoutRepository};
pub use store::{
    AssignmentRow, Confirm, DestructiveAction, ElementSpec, ImportReport, LayoutSnapshot,
    LayoutStore, LayoutSummary,
};

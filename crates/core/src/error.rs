//! Error types for Seatwise Core

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::{ElementId, PersonId, SeatId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid seat count: {0} (at least one seat is required)")]
    InvalidSeatCount(u32),

    #[error("No room selected: apply a room layout before adding elements")]
    NoRoomSelected,

    #[error("Seat {seat} is already occupied by {occupant}")]
    SeatOccupied { seat: SeatId, occupant: PersonId },

    #[error("Person not found: {0}")]
    PersonNotFound(PersonId),

    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Seat not found: {0}")]
    SeatNotFound(SeatId),

    #[error("Element {0} cannot receive assignments")]
    NotAssignable(ElementId),

    #[error("Invalid name: names must not be empty")]
    InvalidName,

    #[error("Invalid dimensions: {width} x {height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Inconsistent layout: {0}")]
    Inconsistent(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Data models for Seatwise

mod element;
mod ids;
mod person;
mod room;

pub use element::*;
pub use ids::*;
pub use person::*;
pub use room::*;

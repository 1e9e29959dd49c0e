//! Room model - the bounded canvas elements are laid out in

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Outline of the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomShape {
    Rectangle,
    Circle,
}

impl RoomShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomShape::Rectangle => "rectangle",
            RoomShape::Circle => "circle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rectangle" => Some(RoomShape::Rectangle),
            "circle" => Some(RoomShape::Circle),
            _ => None,
        }
    }
}

/// Room dimensions in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub shape: RoomShape,
    pub width: f64,
    pub height: f64,
}

impl Room {
    /// Create a room, rejecting non-positive dimensions
    pub fn new(shape: RoomShape, width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            shape,
            width,
            height,
        })
    }

    /// Canvas area in square centimeters
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the largest circle that fits the room
    pub fn inscribed_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Predefined room layouts offered to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomTemplate {
    Rectangle,
    Circle,
}

impl RoomTemplate {
    pub const DEFAULT_WIDTH: f64 = 1600.0;
    pub const DEFAULT_HEIGHT: f64 = 900.0;

    pub fn display_name(&self) -> &'static str {
        match self {
            RoomTemplate::Rectangle => "Rectangular room",
            RoomTemplate::Circle => "Circular room",
        }
    }

    pub fn room(&self) -> Room {
        let shape = match self {
            RoomTemplate::Rectangle => RoomShape::Rectangle,
            RoomTemplate::Circle => RoomShape::Circle,
        };
        Room {
            shape,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

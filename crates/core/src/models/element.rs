//! Placeable elements: tables, booths and decor components

use serde::{Deserialize, Serialize};

use super::{ElementId, PersonId, SeatId};

/// Seat arrangement of a table or booth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    Circle,
    Square,
    Row,
    /// Unrecognized shape; seats are split between top and bottom edges
    #[serde(other)]
    Other,
}

impl TableShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableShape::Circle => "circle",
            TableShape::Square => "square",
            TableShape::Row => "row",
            TableShape::Other => "other",
        }
    }

    /// Parse a stored shape name; anything unknown maps to [`TableShape::Other`]
    pub fn parse(s: &str) -> Self {
        match s {
            "circle" => TableShape::Circle,
            "square" => TableShape::Square,
            "row" => TableShape::Row,
            _ => TableShape::Other,
        }
    }

    /// Default (width, height) in centimeters
    pub fn default_size(&self) -> (f64, f64) {
        match self {
            TableShape::Row => (180.0, 60.0),
            _ => (120.0, 120.0),
        }
    }
}

/// Trade-show booth flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothKind {
    /// Regular booth that hosts exhibitors
    Exhibitor,
    /// Rest area, never assigned
    Lounge,
}

impl BoothKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoothKind::Exhibitor => "exhibitor",
            BoothKind::Lounge => "lounge",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exhibitor" => Some(BoothKind::Exhibitor),
            "lounge" => Some(BoothKind::Lounge),
            _ => None,
        }
    }

    /// Label prefix, e.g. `E001`
    pub fn label_prefix(&self) -> char {
        match self {
            BoothKind::Exhibitor => 'E',
            BoothKind::Lounge => 'L',
        }
    }
}

/// Non-seating room furniture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorKind {
    Podium,
    Door,
    Window,
    Stage,
    Screen,
}

impl DecorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecorKind::Podium => "podium",
            DecorKind::Door => "door",
            DecorKind::Window => "window",
            DecorKind::Stage => "stage",
            DecorKind::Screen => "screen",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "podium" => Some(DecorKind::Podium),
            "door" => Some(DecorKind::Door),
            "window" => Some(DecorKind::Window),
            "stage" => Some(DecorKind::Stage),
            "screen" => Some(DecorKind::Screen),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DecorKind::Podium => "Podium",
            DecorKind::Door => "Door",
            DecorKind::Window => "Window",
            DecorKind::Stage => "Stage",
            DecorKind::Screen => "Screen",
        }
    }

    /// Default (width, height) in centimeters
    pub fn default_size(&self) -> (f64, f64) {
        match self {
            DecorKind::Podium => (100.0, 60.0),
            DecorKind::Door => (80.0, 120.0),
            DecorKind::Window => (200.0, 40.0),
            DecorKind::Stage => (300.0, 80.0),
            DecorKind::Screen => (60.0, 200.0),
        }
    }
}

/// Variant data of a placeable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum ElementKind {
    Table { shape: TableShape },
    Booth { kind: BoothKind, shape: TableShape },
    Decor { kind: DecorKind },
}

/// Element families that share label sequences and auto-arrange replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFamily {
    Table,
    Booth,
    Decor,
}

impl ElementKind {
    pub fn family(&self) -> ElementFamily {
        match self {
            ElementKind::Table { .. } => ElementFamily::Table,
            ElementKind::Booth { .. } => ElementFamily::Booth,
            ElementKind::Decor { .. } => ElementFamily::Decor,
        }
    }

    /// Seat shape, if this kind carries seats at all
    pub fn shape(&self) -> Option<TableShape> {
        match self {
            ElementKind::Table { shape } | ElementKind::Booth { shape, .. } => Some(*shape),
            ElementKind::Decor { .. } => None,
        }
    }

    /// Can people be assigned to this kind of element?
    pub fn is_assignable(&self) -> bool {
        match self {
            ElementKind::Table { .. } => true,
            ElementKind::Booth { kind, .. } => *kind == BoothKind::Exhibitor,
            ElementKind::Decor { .. } => false,
        }
    }
}

/// A discrete occupancy slot attached to a table or booth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    /// Offset of the seat glyph from the element origin
    pub left: f64,
    pub top: f64,
    /// Weak reference to the seated person
    pub occupant: Option<PersonId>,
}

impl Seat {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// A table, booth or decor component on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub label: String,
    pub kind: ElementKind,
    /// Top-left corner in room coordinates (cm)
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, stored exactly as committed
    pub rotation: f64,
    pub seat_count: u32,
    pub seats: Vec<Seat>,
}

impl Element {
    pub fn family(&self) -> ElementFamily {
        self.kind.family()
    }

    pub fn is_assignable(&self) -> bool {
        self.kind.is_assignable()
    }

    /// Rotation folded into `[0, 360)` for display
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }

    /// Seat currently holding `person_id`
    pub fn seat_of(&self, person_id: &PersonId) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|s| s.occupant.as_ref() == Some(person_id))
    }

    pub fn occupants(&self) -> impl Iterator<Item = &PersonId> {
        self.seats.iter().filter_map(|s| s.occupant.as_ref())
    }

    pub fn occupied_count(&self) -> usize {
        self.occupants().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_shape_deserializes_to_other() {
        let shape: TableShape = serde_json::from_str("\"hexagon\"").unwrap();
        assert_eq!(shape, TableShape::Other);
        assert_eq!(TableShape::parse("banquet"), TableShape::Other);
    }

    #[test]
    fn test_assignable_kinds() {
        assert!(ElementKind::Table {
            shape: TableShape::Circle
        }
        .is_assignable());
        assert!(ElementKind::Booth {
            kind: BoothKind::Exhibitor,
            shape: TableShape::Row
        }
        .is_assignable());
        assert!(!ElementKind::Booth {
            kind: BoothKind::Lounge,
            shape: TableShape::Row
        }
        .is_assignable());
        assert!(!ElementKind::Decor {
            kind: DecorKind::Stage
        }
        .is_assignable());
    }

    #[test]
    fn test_normalized_rotation() {
        let element = Element {
            id: ElementId::new("t"),
            label: "T1".into(),
            kind: ElementKind::Table {
                shape: TableShape::Square,
            },
            x: 0.0,
            y: 0.0,
            width: 120.0,
            height: 120.0,
            rotation: -90.0,
            seat_count: 0,
            seats: Vec::new(),
        };
        assert_eq!(element.normalized_rotation(), 270.0);
        assert_eq!(element.rotation, -90.0);
    }
}

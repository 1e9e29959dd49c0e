//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;

use crate::context::EventKind;
use crate::models::{BoothKind, DecorKind, ElementKind, Profile, Room, RoomShape, TableShape};

fn unknown_value(column: usize, what: &str, value: &str) -> SqlError {
    SqlError::FromSqlConversionFailure(
        column,
        Type::Text,
        format!("unknown {} {:?}", what, value).into(),
    )
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

pub fn parse_event_kind(s: &str) -> Result<EventKind, SqlError> {
    EventKind::parse(s).ok_or_else(|| unknown_value(1, "event kind", s))
}

/// Rebuild the room from its nullable columns
pub fn parse_room(
    shape: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<Option<Room>, SqlError> {
    match (shape, width, height) {
        (Some(shape), Some(width), Some(height)) => {
            let shape = RoomShape::parse(&shape).ok_or_else(|| unknown_value(2, "room shape", &shape))?;
            Ok(Some(Room {
                shape,
                width,
                height,
            }))
        }
        _ => Ok(None),
    }
}

/// Column values (variant, subkind, shape) for an element kind
pub fn element_kind_columns(kind: &ElementKind) -> (&'static str, Option<&'static str>, Option<&'static str>) {
    match kind {
        ElementKind::Table { shape } => ("table", None, Some(shape.as_str())),
        ElementKind::Booth { kind, shape } => ("booth", Some(kind.as_str()), Some(shape.as_str())),
        ElementKind::Decor { kind } => ("decor", Some(kind.as_str()), None),
    }
}

/// Inverse of [`element_kind_columns`]
pub fn parse_element_kind(
    variant: &str,
    subkind: Option<String>,
    shape: Option<String>,
) -> Result<ElementKind, SqlError> {
    let shape = TableShape::parse(shape.as_deref().unwrap_or_default());
    let subkind = subkind.unwrap_or_default();
    match variant {
        "table" => Ok(ElementKind::Table { shape }),
        "booth" => {
            let kind = BoothKind::parse(&subkind).ok_or_else(|| unknown_value(5, "booth kind", &subkind))?;
            Ok(ElementKind::Booth { kind, shape })
        }
        "decor" => {
            let kind = DecorKind::parse(&subkind).ok_or_else(|| unknown_value(5, "decor kind", &subkind))?;
            Ok(ElementKind::Decor { kind })
        }
        other => Err(unknown_value(4, "element variant", other)),
    }
}

/// Column values (variant, attribute1, attribute2) for a profile
pub fn profile_columns(profile: &Profile) -> (&'static str, &str, &str) {
    match profile {
        Profile::Attendee {
            department,
            position,
        } => ("attendee", department.as_str(), position.as_str()),
        Profile::Exhibitor { company, industry } => ("exhibitor", company.as_str(), industry.as_str()),
    }
}

pub fn parse_profile(variant: &str, attribute1: String, attribute2: String) -> Result<Profile, SqlError> {
    match variant {
        "attendee" => Ok(Profile::Attendee {
            department: attribute1,
            position: attribute2,
        }),
        "exhibitor" => Ok(Profile::Exhibitor {
            company: attribute1,
            industry: attribute2,
        }),
        other => Err(unknown_value(4, "person variant", other)),
    }
}

/// Parse the JSON array a person's tags are stored as
pub fn parse_tags(s: &str) -> Result<Vec<String>, SqlError> {
    serde_json::from_str(s).map_err(|e| SqlError::FromSqlConversionFailure(7, Type::Text, Box::new(e)))
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

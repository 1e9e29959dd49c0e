//! Layout snapshot storage operations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::parse::{
    element_kind_columns, parse_datetime, parse_element_kind, parse_event_kind, parse_profile,
    parse_room, parse_tags, profile_columns, OptionalExt,
};
use crate::context::{EventKind, SessionCode};
use crate::error::Result;
use crate::models::{Element, ElementId, Person, PersonId, Seat, SeatId};
use crate::store::LayoutSnapshot;

/// Listing entry for a saved layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub code: SessionCode,
    pub kind: EventKind,
    pub saved_at: DateTime<Utc>,
    pub elements: u32,
    pub people: u32,
}

pub struct SnapshotStore<'a> {
    conn: &'a Connection,
}

impl<'a> SnapshotStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Save a layout, replacing any previous save under the same code
    #[instrument(skip(self, snapshot), fields(code = %snapshot.code, elements = snapshot.elements.len(), people = snapshot.people.len()))]
    pub fn save(&self, snapshot: &LayoutSnapshot) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM layouts WHERE code = ?1",
            params![snapshot.code.as_str()],
        )?;
        tx.execute(
            "INSERT INTO layouts (code, kind, room_shape, room_width, room_height, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                snapshot.code.as_str(),
                snapshot.kind.as_str(),
                snapshot.room.map(|r| r.shape.as_str()),
                snapshot.room.map(|r| r.width),
                snapshot.room.map(|r| r.height),
                snapshot.saved_at.to_rfc3339(),
            ],
        )?;

        {
            let mut insert_element = tx.prepare(
                "INSERT INTO elements (layout_code, id, position, label, variant, subkind, shape, x, y, width, height, rotation, seat_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            let mut insert_seat = tx.prepare(
                "INSERT INTO seats (layout_code, id, element_id, position, left_offset, top_offset, occupant)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (position, element) in snapshot.elements.iter().enumerate() {
                let (variant, subkind, shape) = element_kind_columns(&element.kind);
                insert_element.execute(params![
                    snapshot.code.as_str(),
                    element.id.as_str(),
                    position as i64,
                    element.label,
                    variant,
                    subkind,
                    shape,
                    element.x,
                    element.y,
                    element.width,
                    element.height,
                    element.rotation,
                    element.seat_count,
                ])?;
                for (seat_position, seat) in element.seats.iter().enumerate() {
                    insert_seat.execute(params![
                        snapshot.code.as_str(),
                        seat.id.as_str(),
                        element.id.as_str(),
                        seat_position as i64,
                        seat.left,
                        seat.top,
                        seat.occupant.as_ref().map(PersonId::as_str),
                    ])?;
                }
            }

            let mut insert_person = tx.prepare(
                "INSERT INTO people (layout_code, id, position, name, variant, attribute1, attribute2, tags_json, element_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (position, person) in snapshot.people.iter().enumerate() {
                let (variant, attribute1, attribute2) = profile_columns(&person.profile);
                insert_person.execute(params![
                    snapshot.code.as_str(),
                    person.id.as_str(),
                    position as i64,
                    person.name,
                    variant,
                    attribute1,
                    attribute2,
                    serde_json::to_string(&person.tags)?,
                    person.element_id.as_ref().map(ElementId::as_str),
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Load a saved layout by session code
    #[instrument(skip(self), fields(code = %code))]
    pub fn load(&self, code: &SessionCode) -> Result<Option<LayoutSnapshot>> {
        let header = self
            .conn
            .query_row(
                "SELECT kind, room_shape, room_width, room_height, saved_at FROM layouts WHERE code = ?1",
                params![code.as_str()],
                |row| {
                    Ok((
                        parse_event_kind(&row.get::<_, String>(0)?)?,
                        parse_room(row.get(1)?, row.get(2)?, row.get(3)?)?,
                        parse_datetime(&row.get::<_, String>(4)?)?,
                    ))
                },
            )
            .optional()?;

        let Some((kind, room, saved_at)) = header else {
            return Ok(None);
        };

        Ok(Some(LayoutSnapshot {
            code: code.clone(),
            kind,
            room,
            elements: self.load_elements(code)?,
            people: self.load_people(code)?,
            saved_at,
        }))
    }

    fn load_elements(&self, code: &SessionCode) -> Result<Vec<Element>> {
        let mut seats_by_element: HashMap<String, Vec<Seat>> = HashMap::new();
        let mut stmt = self.conn.prepare(
            "SELECT id, element_id, left_offset, top_offset, occupant
             FROM seats WHERE layout_code = ?1
             ORDER BY element_id, position",
        )?;
        let seats = stmt.query_map(params![code.as_str()], |row| {
            let element_id: String = row.get(1)?;
            let seat = Seat {
                id: SeatId::new(row.get::<_, String>(0)?),
                left: row.get(2)?,
                top: row.get(3)?,
                occupant: row.get::<_, Option<String>>(4)?.map(PersonId::new),
            };
            Ok((element_id, seat))
        })?;
        for seat in seats {
            let (element_id, seat) = seat?;
            seats_by_element.entry(element_id).or_default().push(seat);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, label, variant, subkind, shape, x, y, width, height, rotation, seat_count
             FROM elements WHERE layout_code = ?1
             ORDER BY position",
        )?;
        let elements = stmt
            .query_map(params![code.as_str()], |row| {
                let id: String = row.get(0)?;
                Ok(Element {
                    seats: seats_by_element.remove(&id).unwrap_or_default(),
                    id: ElementId::new(id),
                    label: row.get(1)?,
                    kind: parse_element_kind(&row.get::<_, String>(2)?, row.get(3)?, row.get(4)?)?,
                    x: row.get(5)?,
                    y: row.get(6)?,
                    width: row.get(7)?,
                    height: row.get(8)?,
                    rotation: row.get(9)?,
                    seat_count: row.get(10)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(elements)
    }

    fn load_people(&self, code: &SessionCode) -> Result<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, variant, attribute1, attribute2, tags_json, element_id
             FROM people WHERE layout_code = ?1
             ORDER BY position",
        )?;
        let people = stmt
            .query_map(params![code.as_str()], |row| {
                Ok(Person {
                    id: PersonId::new(row.get::<_, String>(0)?),
                    name: row.get(1)?,
                    profile: parse_profile(&row.get::<_, String>(2)?, row.get(3)?, row.get(4)?)?,
                    tags: parse_tags(&row.get::<_, String>(5)?)?,
                    element_id: row.get::<_, Option<String>>(6)?.map(ElementId::new),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(people)
    }

    /// All saved layouts, most recent first
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<LayoutInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.code, l.kind, l.saved_at,
                    (SELECT COUNT(*) FROM elements e WHERE e.layout_code = l.code),
                    (SELECT COUNT(*) FROM people p WHERE p.layout_code = l.code)
             FROM layouts l
             ORDER BY l.saved_at DESC, l.code",
        )?;
        let layouts = stmt
            .query_map([], |row| {
                Ok(LayoutInfo {
                    code: SessionCode(row.get(0)?),
                    kind: parse_event_kind(&row.get::<_, String>(1)?)?,
                    saved_at: parse_datetime(&row.get::<_, String>(2)?)?,
                    elements: row.get(3)?,
                    people: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(layouts)
    }

    /// Delete a saved layout; returns whether anything was removed
    #[instrument(skip(self), fields(code = %code))]
    pub fn delete(&self, code: &SessionCode) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM layouts WHERE code = ?1",
            params![code.as_str()],
        )?;
        Ok(removed > 0)
    }
}

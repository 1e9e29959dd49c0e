//! Layout store
//!
//! In-memory source of truth for one design session: the room, every placed
//! element and every person. Geometry and planning are delegated to the pure
//! kernels; all occupancy changes go through the [`AssignmentLedger`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::context::{EventKind, SessionCode, SessionContext};
use crate::error::{Error, Result};
use crate::geometry::{compute_seat_positions, overlapping_pairs, SeatLayoutInput};
use crate::invariants::{
    assert_element_invariants, assert_occupancy_invariants, assert_person_invariants,
    assert_room_invariants, audit_occupancy,
};
use crate::ledger::{ArrangeReport, AssignOutcome, AssignmentLedger, GroupBy};
use crate::models::{
    Attribute, BoothKind, DecorKind, Element, ElementFamily, ElementId, ElementKind,
    ImportRecord, Person, PersonDraft, PersonFilter, PersonId, PersonKind, Profile, Room,
    RoomShape, RoomTemplate, Seat, SeatId, TableShape,
};
use crate::planner::{self, Capacity, ElementTemplate, Footprint, Placement};

/// What to create when adding an element
///
/// Unset size and seat count fall back to the kind's defaults; an unset
/// position drops the element onto the default grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub kind: ElementKind,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub seat_count: Option<u32>,
    #[serde(default)]
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl ElementSpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            width: None,
            height: None,
            seat_count: None,
            position: None,
            rotation: 0.0,
            label: None,
        }
    }

    pub fn table(shape: TableShape, seat_count: u32) -> Self {
        Self::new(ElementKind::Table { shape }).with_seats(seat_count)
    }

    pub fn booth(kind: BoothKind) -> Self {
        Self::new(ElementKind::Booth {
            kind,
            shape: TableShape::Row,
        })
    }

    pub fn decor(kind: DecorKind) -> Self {
        Self::new(ElementKind::Decor { kind })
    }

    pub fn with_seats(mut self, seat_count: u32) -> Self {
        self.seat_count = Some(seat_count);
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn labeled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    fn default_size(&self) -> (f64, f64) {
        match self.kind {
            ElementKind::Table { shape } => shape.default_size(),
            ElementKind::Booth { .. } => (140.0, 90.0),
            ElementKind::Decor { kind } => kind.default_size(),
        }
    }
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    /// Records dropped because their name was blank
    pub skipped: usize,
}

/// One flattened row of the assignment list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub name: String,
    pub kind: PersonKind,
    pub attribute1: String,
    pub attribute2: String,
    pub tags: Vec<String>,
    /// Element label, or `Unassigned`
    pub assignment: String,
}

/// Headline numbers for a layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub room: Option<Room>,
    pub tables: usize,
    pub booths: usize,
    pub decor: usize,
    pub total_seats: usize,
    pub occupied_seats: usize,
    pub people: usize,
    pub assigned: usize,
    pub unassigned: usize,
}

/// Operations that throw away work and need the host's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructiveAction {
    ResetAll,
    DeleteElement(ElementId),
}

impl DestructiveAction {
    pub fn prompt(&self) -> String {
        match self {
            DestructiveAction::ResetAll => {
                "Reset the room? All elements and people will be removed.".to_string()
            }
            DestructiveAction::DeleteElement(id) => {
                format!("Delete element {}? Its occupants become unassigned.", id)
            }
        }
    }
}

/// Confirmation collaborator for destructive actions
pub trait Confirm {
    fn confirm(&self, action: &DestructiveAction) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&DestructiveAction) -> bool,
{
    fn confirm(&self, action: &DestructiveAction) -> bool {
        self(action)
    }
}

/// Complete, serializable state of a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub code: SessionCode,
    pub kind: EventKind,
    pub room: Option<Room>,
    pub elements: Vec<Element>,
    pub people: Vec<Person>,
    pub saved_at: DateTime<Utc>,
}

/// Owner of the room, elements and people of one session
#[derive(Debug)]
pub struct LayoutStore {
    ctx: SessionContext,
    room: Option<Room>,
    elements: Vec<Element>,
    people: Vec<Person>,
}

impl LayoutStore {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            room: None,
            elements: Vec::new(),
            people: Vec::new(),
        }
    }

    /// Rebuild a store from a snapshot, refusing inconsistent data
    #[instrument(skip(ctx, snapshot), fields(code = %snapshot.code))]
    pub fn restore(mut ctx: SessionContext, snapshot: LayoutSnapshot) -> Result<Self> {
        if let Some(room) = &snapshot.room {
            if !room.is_valid() {
                return Err(Error::InvalidDimensions {
                    width: room.width,
                    height: room.height,
                });
            }
        }

        let violations = audit_occupancy(&snapshot.elements, &snapshot.people);
        if !violations.is_empty() {
            let details = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            warn!(count = violations.len(), "Refusing inconsistent snapshot");
            return Err(Error::Inconsistent(details));
        }

        ctx.code = snapshot.code;
        ctx.kind = snapshot.kind;
        info!(
            elements = snapshot.elements.len(),
            people = snapshot.people.len(),
            "Restored layout"
        );
        Ok(Self {
            ctx,
            room: snapshot.room,
            elements: snapshot.elements,
            people: snapshot.people,
        })
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            code: self.ctx.code.clone(),
            kind: self.ctx.kind,
            room: self.room,
            elements: self.elements.clone(),
            people: self.people.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn code(&self) -> &SessionCode {
        &self.ctx.code
    }

    fn ledger(&mut self) -> AssignmentLedger<'_> {
        AssignmentLedger::new(&mut self.elements, &mut self.people)
    }

    fn require_room(&self) -> Result<Room> {
        self.room.ok_or(Error::NoRoomSelected)
    }

    fn element_index(&self, id: &ElementId) -> Result<usize> {
        self.elements
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| Error::ElementNotFound(id.clone()))
    }

    fn person_mut(&mut self, id: &PersonId) -> Result<&mut Person> {
        self.people
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| Error::PersonNotFound(id.clone()))
    }

    // ---- room ----

    #[instrument(skip(self))]
    pub fn set_room(&mut self, shape: RoomShape, width: f64, height: f64) -> Result<Room> {
        let room = Room::new(shape, width, height)?;
        assert_room_invariants(&room);
        self.room = Some(room);
        info!(shape = shape.as_str(), width, height, "Room set");
        Ok(room)
    }

    pub fn apply_room_template(&mut self, template: RoomTemplate) -> Room {
        let room = template.room();
        self.room = Some(room);
        info!(template = template.display_name(), "Room template applied");
        room
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    // ---- elements ----

    /// Next generated id not already used by an element or a person
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ctx.next_id();
            let taken = self.elements.iter().any(|e| e.id.as_str() == id)
                || self.people.iter().any(|p| p.id.as_str() == id);
            if !taken {
                return id;
            }
        }
    }

    /// Next automatic label: `T<n>`/`R<n>` for tables, `E001`/`L001` for booths
    fn next_label(&self, kind: &ElementKind) -> String {
        match kind {
            ElementKind::Table { shape } => {
                let n = self
                    .elements
                    .iter()
                    .filter(|e| e.family() == ElementFamily::Table)
                    .count()
                    + 1;
                let prefix = if *shape == TableShape::Row { 'R' } else { 'T' };
                format!("{}{}", prefix, n)
            }
            ElementKind::Booth { kind: booth, .. } => {
                let n = self
                    .elements
                    .iter()
                    .filter(|e| matches!(e.kind, ElementKind::Booth { kind, .. } if kind == *booth))
                    .count()
                    + 1;
                format!("{}{:03}", booth.label_prefix(), n)
            }
            ElementKind::Decor { kind } => kind.display_name().to_string(),
        }
    }

    /// Where a new element lands when the caller gives no position
    fn default_position(&self, kind: &ElementKind) -> (f64, f64) {
        let layout = &self.ctx.config.layout;
        if kind.family() == ElementFamily::Decor {
            return (layout.decor_origin, layout.decor_origin);
        }
        let index = self
            .elements
            .iter()
            .filter(|e| e.family() != ElementFamily::Decor)
            .count();
        let columns = layout.grid_columns.max(1) as usize;
        let (row, col) = (index / columns, index % columns);
        (
            layout.grid_origin + col as f64 * layout.grid_pitch,
            layout.grid_origin + row as f64 * layout.grid_pitch,
        )
    }

    fn build_element(&mut self, spec: &ElementSpec, position: (f64, f64)) -> Result<Element> {
        let sizes = &self.ctx.config.sizes;
        let (default_w, default_h) = spec.default_size();
        let width = sizes.clamp(spec.width.unwrap_or(default_w));
        let height = sizes.clamp(spec.height.unwrap_or(default_h));
        let seat_count = match spec.kind {
            ElementKind::Decor { .. } => 0,
            ElementKind::Booth { .. } => spec.seat_count.unwrap_or(sizes.default_booth_seats),
            ElementKind::Table { .. } => spec.seat_count.unwrap_or(sizes.default_seats),
        };
        if spec.kind.family() != ElementFamily::Decor && seat_count == 0 {
            return Err(Error::InvalidSeatCount(seat_count));
        }

        let label = match &spec.label {
            Some(label) if !label.trim().is_empty() => label.trim().to_string(),
            _ => self.next_label(&spec.kind),
        };
        let id = ElementId::new(self.fresh_id());

        let mut element = Element {
            id,
            label,
            kind: spec.kind,
            x: position.0,
            y: position.1,
            width,
            height,
            rotation: spec.rotation,
            seat_count,
            seats: Vec::new(),
        };
        if let Some(input) = SeatLayoutInput::for_element(&element) {
            element.seats = compute_seat_positions(&element.id, &input, &self.ctx.config.geometry)?;
        }
        assert_element_invariants(&element, &self.ctx.config.sizes);
        Ok(element)
    }

    /// Place one element
    #[instrument(skip(self, spec), fields(kind = ?spec.kind))]
    pub fn add_element(&mut self, spec: ElementSpec) -> Result<Element> {
        self.require_room()?;
        let position = spec
            .position
            .unwrap_or_else(|| self.default_position(&spec.kind));
        let element = self.build_element(&spec, position)?;
        self.elements.push(element.clone());
        info!(element_id = %element.id, label = %element.label, "Element added");
        Ok(element)
    }

    /// Place `quantity` copies of an element on the default grid
    ///
    /// The quantity is clamped to `1..=max_batch`. Positions and labels are
    /// always generated.
    #[instrument(skip(self, spec), fields(kind = ?spec.kind))]
    pub fn add_elements_batch(&mut self, spec: ElementSpec, quantity: u32) -> Result<Vec<Element>> {
        self.require_room()?;
        let quantity = quantity.clamp(1, self.ctx.config.sizes.max_batch.max(1));
        let spec = ElementSpec {
            position: None,
            label: None,
            ..spec
        };

        let mut added = Vec::with_capacity(quantity as usize);
        for _ in 0..quantity {
            let position = self.default_position(&spec.kind);
            let element = self.build_element(&spec, position)?;
            self.elements.push(element.clone());
            added.push(element);
        }
        info!(count = added.len(), "Elements added");
        Ok(added)
    }

    /// Commit a drag or rotation
    ///
    /// Seat ids and occupants survive; only the seat offsets are refreshed
    /// when the rotation changes.
    #[instrument(skip(self), fields(element_id = %id))]
    pub fn move_element(&mut self, id: &ElementId, x: f64, y: f64, rotation: Option<f64>) -> Result<()> {
        let idx = self.element_index(id)?;
        let geometry = &self.ctx.config.geometry;
        let element = &mut self.elements[idx];
        element.x = x;
        element.y = y;

        if let Some(rotation) = rotation {
            if rotation != element.rotation {
                element.rotation = rotation;
                if let Some(input) = SeatLayoutInput::for_element(element) {
                    let fresh = compute_seat_positions(&element.id, &input, geometry)?;
                    for (seat, placed) in element.seats.iter_mut().zip(fresh) {
                        seat.left = placed.left;
                        seat.top = placed.top;
                    }
                }
            }
        }
        tracing::debug!(x, y, rotation = element.rotation, "Element moved");
        Ok(())
    }

    /// Replace an element's seats, unassigning whoever sat there
    fn regenerate_seats(&mut self, idx: usize, width: f64, height: f64, seat_count: u32) -> Result<Vec<PersonId>> {
        let element = &self.elements[idx];
        let id = element.id.clone();
        let seats = match element.kind.shape() {
            Some(shape) => {
                let input = SeatLayoutInput {
                    shape,
                    width,
                    height,
                    seat_count,
                    rotation: element.rotation,
                };
                compute_seat_positions(&id, &input, &self.ctx.config.geometry)?
            }
            None => Vec::new(),
        };

        let displaced = self.ledger().clear_element(&id)?;
        let element = &mut self.elements[idx];
        element.width = width;
        element.height = height;
        element.seat_count = seat_count;
        element.seats = seats;
        assert_element_invariants(element, &self.ctx.config.sizes);

        if !displaced.is_empty() {
            warn!(element_id = %id, displaced = displaced.len(), "Seats regenerated, occupants unassigned");
        }
        Ok(displaced)
    }

    /// Change an element's size; returns the people who lost their seat
    #[instrument(skip(self), fields(element_id = %id))]
    pub fn resize_element(&mut self, id: &ElementId, width: f64, height: f64) -> Result<Vec<PersonId>> {
        let idx = self.element_index(id)?;
        let sizes = &self.ctx.config.sizes;
        let (width, height) = (sizes.clamp(width), sizes.clamp(height));
        let seat_count = self.elements[idx].seat_count;
        self.regenerate_seats(idx, width, height, seat_count)
    }

    /// Change how many seats a table or booth has
    #[instrument(skip(self), fields(element_id = %id))]
    pub fn set_seat_count(&mut self, id: &ElementId, seat_count: u32) -> Result<Vec<PersonId>> {
        let idx = self.element_index(id)?;
        if self.elements[idx].family() == ElementFamily::Decor {
            return Err(Error::NotAssignable(id.clone()));
        }
        if seat_count == 0 {
            return Err(Error::InvalidSeatCount(seat_count));
        }
        let (width, height) = (self.elements[idx].width, self.elements[idx].height);
        self.regenerate_seats(idx, width, height, seat_count)
    }

    /// Remove an element; its occupants become unassigned
    #[instrument(skip(self), fields(element_id = %id))]
    pub fn delete_element(&mut self, id: &ElementId) -> Result<Element> {
        let displaced = self.ledger().clear_element(id)?;
        let idx = self.element_index(id)?;
        let element = self.elements.remove(idx);
        assert_occupancy_invariants(&self.elements, &self.people);
        info!(label = %element.label, displaced = displaced.len(), "Element deleted");
        Ok(element)
    }

    /// Pairs of elements whose footprints overlap
    pub fn collisions(&self) -> Vec<(ElementId, ElementId)> {
        overlapping_pairs(&self.elements, self.ctx.config.geometry.seat_glyph_half)
    }

    // ---- auto-arrange ----

    /// Seating kind auto-arrange produces for this event
    fn seating_kind(&self, shape: TableShape) -> ElementKind {
        match self.ctx.kind {
            EventKind::Conference => ElementKind::Table { shape },
            EventKind::TradeShow => ElementKind::Booth {
                kind: BoothKind::Exhibitor,
                shape,
            },
        }
    }

    /// Planner output for the current room without touching the layout
    pub fn preview_auto_arrange(&self, template: &ElementTemplate, count: usize) -> Result<Vec<Placement>> {
        let room = self.require_room()?;
        let template = self.clamped_template(template);
        Ok(planner::auto_arrange(&room, &template, count, &self.ctx.config.layout))
    }

    /// Template with the footprint every placed element will actually have
    fn clamped_template(&self, template: &ElementTemplate) -> ElementTemplate {
        let sizes = &self.ctx.config.sizes;
        ElementTemplate {
            width: sizes.clamp(template.width),
            height: sizes.clamp(template.height),
            ..*template
        }
    }

    /// Replace every table (booth, at trade shows) with an arranged grid
    ///
    /// Decor stays where it is. People seated at removed elements become
    /// unassigned.
    #[instrument(skip(self, template), fields(shape = template.shape.as_str()))]
    pub fn auto_arrange(&mut self, template: &ElementTemplate, count: usize) -> Result<Vec<Element>> {
        if template.seat_count == 0 {
            return Err(Error::InvalidSeatCount(0));
        }
        let template = self.clamped_template(template);
        let placements = self.preview_auto_arrange(&template, count)?;

        let kind = self.seating_kind(template.shape);
        let family = kind.family();
        let replaced: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|e| e.family() == family)
            .map(|e| e.id.clone())
            .collect();
        for id in &replaced {
            self.ledger().clear_element(id)?;
        }
        self.elements.retain(|e| e.family() != family);

        let spec = ElementSpec::new(kind)
            .sized(template.width, template.height)
            .with_seats(template.seat_count);
        let mut created = Vec::with_capacity(placements.len());
        for placement in &placements {
            let element = self.build_element(&spec.clone().rotated(placement.rotation), (placement.x, placement.y))?;
            self.elements.push(element.clone());
            created.push(element);
        }

        info!(
            requested = count,
            placed = created.len(),
            replaced = replaced.len(),
            "Auto-arrange applied"
        );
        Ok(created)
    }

    /// Capacity estimate for the current room
    pub fn estimate_capacity(&self, footprint: Footprint, spacing_factor: f64) -> Result<Capacity> {
        let room = self.require_room()?;
        Ok(planner::estimate_capacity(
            &room,
            footprint,
            spacing_factor,
            self.ctx.config.capacity.seats_per_element,
        ))
    }

    // ---- people ----

    #[instrument(skip(self, draft))]
    pub fn add_person(&mut self, draft: PersonDraft) -> Result<Person> {
        if draft.clean_name().is_none() {
            return Err(Error::InvalidName);
        }
        let id = PersonId::new(self.fresh_id());
        let person = draft.into_person(id).ok_or(Error::InvalidName)?;
        assert_person_invariants(&person);
        self.people.push(person.clone());
        tracing::debug!(person_id = %person.id, "Person added");
        Ok(person)
    }

    /// Add many people at once; blank names are skipped, not fatal
    #[instrument(skip(self, records))]
    pub fn import_people<I>(&mut self, records: I) -> ImportReport
    where
        I: IntoIterator<Item = ImportRecord>,
    {
        let kind = self.ctx.kind.person_kind();
        let mut report = ImportReport::default();
        for record in records {
            match self.add_person(record.into_draft(kind)) {
                Ok(_) => report.imported += 1,
                Err(_) => report.skipped += 1,
            }
        }
        if report.skipped > 0 {
            warn!(skipped = report.skipped, "Import skipped records without a name");
        }
        info!(imported = report.imported, "People imported");
        report
    }

    pub fn add_tag(&mut self, id: &PersonId, tag: &str) -> Result<bool> {
        Ok(self.person_mut(id)?.add_tag(tag))
    }

    pub fn remove_tag(&mut self, id: &PersonId, tag: &str) -> Result<bool> {
        Ok(self.person_mut(id)?.remove_tag(tag))
    }

    pub fn remove_person(&mut self, id: &PersonId) -> Result<Person> {
        self.ledger().remove_person(id)
    }

    // ---- assignment ----

    pub fn assign(&mut self, person: &PersonId, seat: &SeatId) -> Result<AssignOutcome> {
        self.ledger().assign(person, seat)
    }

    pub fn assign_to_element(&mut self, person: &PersonId, element: &ElementId) -> Result<AssignOutcome> {
        self.ledger().assign_to_element(person, element)
    }

    pub fn vacate(&mut self, person: &PersonId) -> Result<bool> {
        self.ledger().vacate(person)
    }

    pub fn smart_arrange(&mut self, group_by: GroupBy) -> ArrangeReport {
        self.ledger().smart_arrange(group_by)
    }

    pub fn smart_arrange_by<F>(&mut self, key: F) -> ArrangeReport
    where
        F: Fn(&Person) -> String,
    {
        self.ledger().smart_arrange_by(key)
    }

    // ---- queries ----

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Element and seat a person sits in
    pub fn seat_of(&self, id: &PersonId) -> Option<(&Element, &Seat)> {
        let element = self.element(self.person(id)?.element_id.as_ref()?)?;
        element.seat_of(id).map(|seat| (element, seat))
    }

    pub fn unassigned_people(&self) -> Vec<&Person> {
        self.people.iter().filter(|p| !p.is_assigned()).collect()
    }

    /// Seats people can actually be assigned to
    pub fn total_seats(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.is_assignable())
            .map(|e| e.seats.len())
            .sum()
    }

    /// Distinct non-empty values of an attribute, in first-seen order
    pub fn attribute_options(&self, attribute: Attribute) -> Vec<String> {
        let mut seen = HashSet::new();
        self.people
            .iter()
            .filter_map(|p| p.attribute(attribute))
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect()
    }

    pub fn filter_people(&self, filter: &PersonFilter) -> Vec<&Person> {
        self.people.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Rows for export collaborators
    pub fn assignment_rows(&self) -> Vec<AssignmentRow> {
        self.people
            .iter()
            .map(|person| {
                let (attribute1, attribute2) = match &person.profile {
                    Profile::Attendee {
                        department,
                        position,
                    } => (department.clone(), position.clone()),
                    Profile::Exhibitor { company, industry } => (company.clone(), industry.clone()),
                };
                let assignment = person
                    .element_id
                    .as_ref()
                    .and_then(|id| self.element(id))
                    .map(|e| e.label.clone())
                    .unwrap_or_else(|| "Unassigned".to_string());
                AssignmentRow {
                    name: person.name.clone(),
                    kind: person.kind(),
                    attribute1,
                    attribute2,
                    tags: person.tags.clone(),
                    assignment,
                }
            })
            .collect()
    }

    pub fn summary(&self) -> LayoutSummary {
        let count = |family| self.elements.iter().filter(|e| e.family() == family).count();
        let assigned = self.people.iter().filter(|p| p.is_assigned()).count();
        LayoutSummary {
            room: self.room,
            tables: count(ElementFamily::Table),
            booths: count(ElementFamily::Booth),
            decor: count(ElementFamily::Decor),
            total_seats: self.total_seats(),
            occupied_seats: self.elements.iter().map(Element::occupied_count).sum(),
            people: self.people.len(),
            assigned,
            unassigned: self.people.len() - assigned,
        }
    }

    // ---- destructive ----

    /// Drop the room, every element and every person
    pub fn reset_all(&mut self) {
        self.room = None;
        self.elements.clear();
        self.people.clear();
        info!(code = %self.ctx.code, "Layout reset");
    }

    /// Reset only if the host confirms; returns whether it happened
    pub fn reset_all_confirmed(&mut self, confirm: &impl Confirm) -> bool {
        if !confirm.confirm(&DestructiveAction::ResetAll) {
            warn!("Reset declined");
            return false;
        }
        self.reset_all();
        true
    }

    /// Delete an element only if the host confirms
    pub fn delete_element_confirmed(
        &mut self,
        id: &ElementId,
        confirm: &impl Confirm,
    ) -> Result<Option<Element>> {
        self.element_index(id)?;
        if !confirm.confirm(&DestructiveAction::DeleteElement(id.clone())) {
            warn!(element_id = %id, "Delete declined");
            return Ok(None);
        }
        self.delete_element(id).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::context::SequentialIdGenerator;
    use crate::invariants::Violation;

    fn store(kind: EventKind) -> LayoutStore {
        let ctx = SessionContext::with_ids(
            kind,
            SessionCode("C-20250908-1234".into()),
            PlannerConfig::default(),
            Box::new(SequentialIdGenerator::new()),
        );
        LayoutStore::new(ctx)
    }

    fn store_with_room() -> LayoutStore {
        let mut store = store(EventKind::Conference);
        store.apply_room_template(RoomTemplate::Rectangle);
        store
    }

    fn add_people(store: &mut LayoutStore, n: usize, department: &str) -> Vec<PersonId> {
        (0..n)
            .map(|i| {
                store
                    .add_person(PersonDraft::attendee(&format!("Person {}", i), department, ""))
                    .unwrap()
                    .id
            })
            .collect()
    }

    #[test]
    fn test_elements_need_a_room() {
        let mut store = store(EventKind::Conference);
        let err = store
            .add_element(ElementSpec::table(TableShape::Circle, 6))
            .unwrap_err();
        assert!(matches!(err, Error::NoRoomSelected));
    }

    #[test]
    fn test_set_room_rejects_bad_dimensions() {
        let mut store = store(EventKind::Conference);
        assert!(matches!(
            store.set_room(RoomShape::Rectangle, 0.0, 900.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(store.room().is_none());
        store.set_room(RoomShape::Circle, 1200.0, 1200.0).unwrap();
        assert_eq!(store.room().map(|r| r.shape), Some(RoomShape::Circle));
    }

    #[test]
    fn test_add_element_defaults() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 6))
            .unwrap();
        assert_eq!(table.label, "T1");
        assert_eq!((table.x, table.y), (100.0, 100.0));
        assert_eq!((table.width, table.height), (120.0, 120.0));
        assert_eq!(table.seats.len(), 6);

        let row = store
            .add_element(ElementSpec::table(TableShape::Row, 4))
            .unwrap();
        assert_eq!(row.label, "R2");
        assert_eq!((row.x, row.y), (350.0, 100.0));

        let stage = store.add_element(ElementSpec::decor(DecorKind::Stage)).unwrap();
        assert_eq!(stage.label, "Stage");
        assert_eq!((stage.x, stage.y), (100.0, 100.0));
        assert!(stage.seats.is_empty());
    }

    #[test]
    fn test_zero_seats_rejected() {
        let mut store = store_with_room();
        assert!(matches!(
            store.add_element(ElementSpec::table(TableShape::Square, 0)),
            Err(Error::InvalidSeatCount(0))
        ));
        assert!(store.elements().is_empty());
    }

    #[test]
    fn test_sizes_are_clamped() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Square, 4).sized(5.0, 900.0))
            .unwrap();
        assert_eq!((table.width, table.height), (20.0, 500.0));
    }

    #[test]
    fn test_booth_labels() {
        let mut store = store(EventKind::TradeShow);
        store.apply_room_template(RoomTemplate::Rectangle);
        let e1 = store.add_element(ElementSpec::booth(BoothKind::Exhibitor)).unwrap();
        let l1 = store.add_element(ElementSpec::booth(BoothKind::Lounge)).unwrap();
        let e2 = store.add_element(ElementSpec::booth(BoothKind::Exhibitor)).unwrap();
        assert_eq!((e1.label.as_str(), l1.label.as_str(), e2.label.as_str()), ("E001", "L001", "E002"));
        assert_eq!(e1.seats.len(), 1);
        assert_eq!((e1.width, e1.height), (140.0, 90.0));
    }

    #[test]
    fn test_batch_quantity_clamped() {
        let mut store = store_with_room();
        let one = store
            .add_elements_batch(ElementSpec::table(TableShape::Circle, 4), 0)
            .unwrap();
        assert_eq!(one.len(), 1);
        let many = store
            .add_elements_batch(ElementSpec::table(TableShape::Circle, 4), 80)
            .unwrap();
        assert_eq!(many.len(), 50);
        // fifth seating element wraps to the second grid row
        assert_eq!((many[3].x, many[3].y), (100.0, 350.0));
        assert_eq!(many[49].label, "T51");
    }

    #[test]
    fn test_rotation_keeps_seat_ids_and_occupants() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Square, 4))
            .unwrap();
        let people = add_people(&mut store, 1, "Ops");
        store.assign(&people[0], &table.seats[1].id).unwrap();

        store.move_element(&table.id, 400.0, 300.0, Some(90.0)).unwrap();
        let moved = store.element(&table.id).unwrap();
        assert_eq!((moved.x, moved.y, moved.rotation), (400.0, 300.0, 90.0));
        let ids: Vec<_> = moved.seats.iter().map(|s| s.id.clone()).collect();
        let before: Vec<_> = table.seats.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, before);
        assert_eq!(moved.seats[1].occupant, Some(people[0].clone()));
        assert_ne!(moved.seats[0].left, table.seats[0].left);

        // a full turn lands back on the original offsets
        store.move_element(&table.id, 400.0, 300.0, Some(360.0)).unwrap();
        let turned = store.element(&table.id).unwrap();
        for (a, b) in turned.seats.iter().zip(&table.seats) {
            assert!((a.left - b.left).abs() < 1e-9);
            assert!((a.top - b.top).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resize_vacates_occupants() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 4))
            .unwrap();
        let people = add_people(&mut store, 2, "Ops");
        store.assign(&people[0], &table.seats[0].id).unwrap();
        store.assign(&people[1], &table.seats[3].id).unwrap();

        let displaced = store.resize_element(&table.id, 200.0, 200.0).unwrap();
        assert_eq!(displaced.len(), 2);
        assert_eq!(store.unassigned_people().len(), 2);
        assert_eq!(store.element(&table.id).unwrap().width, 200.0);

        let displaced = store.set_seat_count(&table.id, 8).unwrap();
        assert!(displaced.is_empty());
        assert_eq!(store.element(&table.id).unwrap().seats.len(), 8);
        assert!(matches!(
            store.set_seat_count(&table.id, 0),
            Err(Error::InvalidSeatCount(0))
        ));
    }

    #[test]
    fn test_delete_element_cascades() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 4))
            .unwrap();
        let people = add_people(&mut store, 1, "Ops");
        store.assign_to_element(&people[0], &table.id).unwrap();

        let removed = store.delete_element(&table.id).unwrap();
        assert_eq!(removed.id, table.id);
        assert!(store.person(&people[0]).unwrap().element_id.is_none());
        assert!(matches!(
            store.delete_element(&table.id),
            Err(Error::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_collisions() {
        let mut store = store_with_room();
        let a = store
            .add_element(ElementSpec::table(TableShape::Circle, 6).at(300.0, 300.0))
            .unwrap();
        let b = store
            .add_element(ElementSpec::table(TableShape::Circle, 6).at(360.0, 300.0))
            .unwrap();
        store
            .add_element(ElementSpec::table(TableShape::Circle, 6).at(1200.0, 600.0))
            .unwrap();
        assert_eq!(store.collisions(), vec![(a.id, b.id)]);
    }

    #[test]
    fn test_auto_arrange_replaces_tables_only() {
        let mut store = store_with_room();
        let old = store
            .add_element(ElementSpec::table(TableShape::Circle, 4))
            .unwrap();
        store.add_element(ElementSpec::decor(DecorKind::Door)).unwrap();
        let people = add_people(&mut store, 1, "Ops");
        store.assign_to_element(&people[0], &old.id).unwrap();

        let template = ElementTemplate::new(TableShape::Circle, 120.0, 120.0, 6);
        let preview = store.preview_auto_arrange(&template, 10).unwrap();
        assert_eq!(preview.len(), 10);
        assert_eq!(store.elements().len(), 2);

        let created = store.auto_arrange(&template, 10).unwrap();
        assert_eq!(created.len(), 10);
        assert_eq!(created[0].label, "T1");
        assert_eq!((created[0].x, created[0].y), (140.0, 160.0));
        assert!(store.element(&old.id).is_none());
        assert_eq!(store.summary().decor, 1);
        assert_eq!(store.summary().tables, 10);
        assert!(store.person(&people[0]).unwrap().element_id.is_none());
        assert_eq!(store.total_seats(), 60);
    }

    #[test]
    fn test_trade_show_auto_arrange_makes_booths() {
        let mut store = store(EventKind::TradeShow);
        store.apply_room_template(RoomTemplate::Rectangle);
        let template = ElementTemplate::new(TableShape::Row, 140.0, 90.0, 1);
        let created = store.auto_arrange(&template, 3).unwrap();
        assert!(created.iter().all(|e| e.family() == ElementFamily::Booth));
        assert_eq!(created[2].label, "E003");
    }

    #[test]
    fn test_auto_arrange_plans_with_clamped_size() {
        let mut store = store_with_room();
        let room = *store.room().unwrap();
        let layout = store.context().config.layout.clone();
        let tiny = ElementTemplate::new(TableShape::Square, 5.0, 5.0, 4);

        let preview = store.preview_auto_arrange(&tiny, 200).unwrap();
        let created = store.auto_arrange(&tiny, 200).unwrap();
        assert_eq!(created.len(), preview.len());

        let placed_size = ElementTemplate::new(TableShape::Square, 20.0, 20.0, 4);
        let usable = planner::usable_bounds(&room, &layout);
        for element in &created {
            assert_eq!((element.width, element.height), (20.0, 20.0));
            let placement = Placement {
                x: element.x,
                y: element.y,
                rotation: 0.0,
            };
            assert!(usable.contains(&planner::padded_bounds(&placement, &placed_size, &layout)));
        }
    }

    #[test]
    fn test_capacity_uses_current_room() {
        let mut store = store(EventKind::Conference);
        let footprint = Footprint {
            width: 120.0,
            height: 120.0,
        };
        assert!(matches!(
            store.estimate_capacity(footprint, 1.5),
            Err(Error::NoRoomSelected)
        ));
        store.set_room(RoomShape::Rectangle, 4000.0, 3000.0).unwrap();
        let capacity = store.estimate_capacity(footprint, 1.5).unwrap();
        assert_eq!(capacity.max_elements, 555);
        assert_eq!(capacity.estimated_occupancy, 3330);
    }

    #[test]
    fn test_people_crud() {
        let mut store = store_with_room();
        assert!(matches!(
            store.add_person(PersonDraft::attendee("   ", "Ops", "")),
            Err(Error::InvalidName)
        ));
        let person = store
            .add_person(PersonDraft::attendee(" Ada ", "Eng", "Lead").with_tags(["vip", " vip", ""]))
            .unwrap();
        assert_eq!(person.name, "Ada");
        assert_eq!(person.tags, vec!["vip".to_string()]);

        assert!(store.add_tag(&person.id, "speaker").unwrap());
        assert!(!store.add_tag(&person.id, "vip").unwrap());
        assert!(store.remove_tag(&person.id, "vip").unwrap());
        assert_eq!(store.person(&person.id).unwrap().tags, vec!["speaker".to_string()]);

        store.remove_person(&person.id).unwrap();
        assert!(store.people().is_empty());
        assert!(matches!(
            store.add_tag(&person.id, "x"),
            Err(Error::PersonNotFound(_))
        ));
    }

    #[test]
    fn test_import_people() {
        let mut store = store(EventKind::TradeShow);
        let records = vec![
            ImportRecord {
                name: "Acme rep".into(),
                attribute1: "Acme".into(),
                attribute2: "Robotics".into(),
                tags: vec!["sponsor".into()],
            },
            ImportRecord {
                name: "  ".into(),
                ..Default::default()
            },
            ImportRecord {
                name: "Globex rep".into(),
                attribute1: "Globex".into(),
                ..Default::default()
            },
        ];
        let report = store.import_people(records);
        assert_eq!(report, ImportReport { imported: 2, skipped: 1 });
        assert!(store.people().iter().all(|p| p.kind() == PersonKind::Exhibitor));
        assert_eq!(
            store.attribute_options(Attribute::Company),
            vec!["Acme".to_string(), "Globex".to_string()]
        );
        assert_eq!(store.attribute_options(Attribute::Industry), vec!["Robotics".to_string()]);
    }

    #[test]
    fn test_filter_people() {
        let mut store = store_with_room();
        store.add_person(PersonDraft::attendee("Ada", "Eng", "Lead")).unwrap();
        store.add_person(PersonDraft::attendee("Grace", "Eng", "IC")).unwrap();
        store.add_person(PersonDraft::attendee("Linus", "Ops", "Lead")).unwrap();

        let eng = store.filter_people(&PersonFilter::by(Attribute::Department, "Eng"));
        assert_eq!(eng.len(), 2);
        let search = PersonFilter {
            position: Some("Lead".into()),
            search: Some("li".into()),
            ..Default::default()
        };
        let found = store.filter_people(&search);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Linus");
    }

    #[test]
    fn test_six_seat_table_scenario() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 6))
            .unwrap();
        let people = add_people(&mut store, 6, "Ops");

        for (person, seat) in people.iter().zip(&table.seats) {
            store.assign(person, &seat.id).unwrap();
        }
        assert!(store.unassigned_people().is_empty());
        for person in &people[..3] {
            assert!(store.vacate(person).unwrap());
        }
        assert_eq!(store.unassigned_people().len(), 3);

        let report = store.smart_arrange(GroupBy::Department);
        assert_eq!(report.assigned, 6);
        assert_eq!(report.unassigned, 0);
        assert_eq!(store.summary().occupied_seats, 6);
    }

    #[test]
    fn test_smart_arrange_overflow() {
        let mut store = store_with_room();
        store
            .add_elements_batch(ElementSpec::table(TableShape::Circle, 4), 2)
            .unwrap();
        add_people(&mut store, 5, "Eng");
        add_people(&mut store, 6, "Ops");

        let report = store.smart_arrange(GroupBy::Department);
        assert_eq!(report.assigned, 8);
        assert_eq!(report.unassigned, 11 - 8);
        assert!(audit_occupancy(store.elements(), store.people()).is_empty());
    }

    #[test]
    fn test_queries() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 2))
            .unwrap();
        let people = add_people(&mut store, 2, "Ops");
        store.assign(&people[0], &table.seats[1].id).unwrap();

        let (element, seat) = store.seat_of(&people[0]).unwrap();
        assert_eq!(element.id, table.id);
        assert_eq!(seat.id, table.seats[1].id);
        assert!(store.seat_of(&people[1]).is_none());

        let rows = store.assignment_rows();
        assert_eq!(rows[0].assignment, "T1");
        assert_eq!(rows[0].attribute1, "Ops");
        assert_eq!(rows[1].assignment, "Unassigned");

        let summary = store.summary();
        assert_eq!(summary.tables, 1);
        assert_eq!(summary.total_seats, 2);
        assert_eq!(summary.assigned, 1);
        assert_eq!(summary.unassigned, 1);
    }

    #[test]
    fn test_confirmation_gate() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 2))
            .unwrap();

        let decline = |_: &DestructiveAction| false;
        let accept = |_: &DestructiveAction| true;

        assert_eq!(store.delete_element_confirmed(&table.id, &decline).unwrap(), None);
        assert!(store.element(&table.id).is_some());
        assert!(!store.reset_all_confirmed(&decline));
        assert!(store.room().is_some());

        let deleted = store.delete_element_confirmed(&table.id, &accept).unwrap();
        assert_eq!(deleted.map(|e| e.id), Some(table.id));
        assert!(store.reset_all_confirmed(&accept));
        assert!(store.room().is_none());
        assert!(store.elements().is_empty());
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Square, 5).rotated(30.0))
            .unwrap();
        let people = add_people(&mut store, 2, "Ops");
        store.assign(&people[1], &table.seats[4].id).unwrap();
        let snapshot = store.snapshot();

        let ctx = SessionContext::with_ids(
            EventKind::TradeShow,
            SessionCode("T-other".into()),
            PlannerConfig::default(),
            Box::new(SequentialIdGenerator::new()),
        );
        let mut restored = LayoutStore::restore(ctx, snapshot.clone()).unwrap();
        assert_eq!(restored.code(), &snapshot.code);
        assert_eq!(restored.context().kind, EventKind::Conference);
        assert_eq!(restored.elements(), store.elements());
        assert_eq!(restored.people(), store.people());

        // new ids must not collide with restored ones
        let added = restored.add_person(PersonDraft::attendee("New", "", "")).unwrap();
        assert!(!people.contains(&added.id));
        assert_ne!(added.id.as_str(), table.id.as_str());
    }

    #[test]
    fn test_restore_rejects_inconsistent_snapshot() {
        let mut store = store_with_room();
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 2))
            .unwrap();
        let people = add_people(&mut store, 1, "Ops");
        let mut snapshot = store.snapshot();
        snapshot.elements[0].seats[0].occupant = Some(people[0].clone());

        let ctx = SessionContext::new(EventKind::Conference, PlannerConfig::default());
        let err = LayoutStore::restore(ctx, snapshot).unwrap_err();
        let expected = Violation::ElementMismatch {
            person: people[0].clone(),
            claimed: None,
            actual: Some(table.id),
        };
        assert!(matches!(err, Error::Inconsistent(ref msg) if msg == &expected.to_string()));
    }
}

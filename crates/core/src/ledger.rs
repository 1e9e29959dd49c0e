//! Assignment ledger
//!
//! The only code allowed to write `Seat::occupant` and `Person::element_id`.
//! Both sides of the link are updated in the same call, so a person is never
//! observed in two seats and a seat never points at someone who thinks they
//! are elsewhere.
//!
//! Seat-level assignment is strict: dropping a person onto a seat someone
//! else holds fails with [`Error::SeatOccupied`]. Element-level assignment
//! ("drop on booth") takes the first free seat and, when the element is full,
//! moves the occupant of its first seat back to unassigned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::invariants::assert_occupancy_invariants;
use crate::models::{Attribute, Element, ElementId, Person, PersonId, Seat, SeatId};

/// What an assignment changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The person was unassigned and now sits here
    Seated { seat: SeatId },
    /// The person moved; their previous seat was vacated
    VacatedPrevious { seat: SeatId, previous_seat: SeatId },
    /// The element was full; `previous` lost the seat and is now unassigned
    Displaced { seat: SeatId, previous: PersonId },
    /// The person already sat here
    Unchanged { seat: SeatId },
}

impl AssignOutcome {
    /// Seat the person ended up in
    pub fn seat(&self) -> &SeatId {
        match self {
            AssignOutcome::Seated { seat }
            | AssignOutcome::VacatedPrevious { seat, .. }
            | AssignOutcome::Displaced { seat, .. }
            | AssignOutcome::Unchanged { seat } => seat,
        }
    }
}

/// Counts reported back to the host after a smart arrange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrangeReport {
    pub assigned: usize,
    pub unassigned: usize,
    pub groups: usize,
}

/// Attribute smart arrange groups people by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Department,
    Position,
    Company,
    Industry,
}

impl GroupBy {
    pub fn attribute(&self) -> Attribute {
        match self {
            GroupBy::Department => Attribute::Department,
            GroupBy::Position => Attribute::Position,
            GroupBy::Company => Attribute::Company,
            GroupBy::Industry => Attribute::Industry,
        }
    }

    /// Bucket for people without a value
    pub fn missing_label(&self) -> &'static str {
        match self {
            GroupBy::Department => "No Department",
            GroupBy::Position => "No Position",
            GroupBy::Company => "No Company",
            GroupBy::Industry => "No Industry",
        }
    }

    pub fn key(&self, person: &Person) -> String {
        person
            .attribute(self.attribute())
            .unwrap_or(self.missing_label())
            .to_string()
    }
}

/// Mutable view over the store's elements and people
pub struct AssignmentLedger<'a> {
    elements: &'a mut Vec<Element>,
    people: &'a mut Vec<Person>,
}

impl<'a> AssignmentLedger<'a> {
    pub fn new(elements: &'a mut Vec<Element>, people: &'a mut Vec<Person>) -> Self {
        Self { elements, people }
    }

    fn person_index(&self, person_id: &PersonId) -> Result<usize> {
        self.people
            .iter()
            .position(|p| &p.id == person_id)
            .ok_or_else(|| Error::PersonNotFound(person_id.clone()))
    }

    fn element_index(&self, element_id: &ElementId) -> Result<usize> {
        self.elements
            .iter()
            .position(|e| &e.id == element_id)
            .ok_or_else(|| Error::ElementNotFound(element_id.clone()))
    }

    fn locate_seat(&self, seat_id: &SeatId) -> Result<(usize, usize)> {
        self.elements
            .iter()
            .enumerate()
            .find_map(|(e, element)| {
                element
                    .seats
                    .iter()
                    .position(|s| &s.id == seat_id)
                    .map(|s| (e, s))
            })
            .ok_or_else(|| Error::SeatNotFound(seat_id.clone()))
    }

    /// Clear the person's seat (wherever it is) and their back reference
    fn detach(&mut self, person_idx: usize) -> Option<SeatId> {
        let person_id = self.people[person_idx].id.clone();
        let mut freed = None;
        for seat in self.elements.iter_mut().flat_map(|e| e.seats.iter_mut()) {
            if seat.occupant.as_ref() == Some(&person_id) {
                seat.occupant = None;
                freed.get_or_insert_with(|| seat.id.clone());
            }
        }
        self.people[person_idx].element_id = None;
        freed
    }

    fn seat_person(&mut self, person_idx: usize, element_idx: usize, seat_idx: usize) {
        let person_id = self.people[person_idx].id.clone();
        let element = &mut self.elements[element_idx];
        element.seats[seat_idx].occupant = Some(person_id);
        self.people[person_idx].element_id = Some(element.id.clone());
    }

    /// Put a person on a specific seat
    #[instrument(skip(self), fields(person_id = %person_id, seat_id = %seat_id))]
    pub fn assign(&mut self, person_id: &PersonId, seat_id: &SeatId) -> Result<AssignOutcome> {
        let person_idx = self.person_index(person_id)?;
        let (element_idx, seat_idx) = self.locate_seat(seat_id)?;

        let element = &self.elements[element_idx];
        if !element.is_assignable() {
            return Err(Error::NotAssignable(element.id.clone()));
        }
        match &element.seats[seat_idx].occupant {
            Some(occupant) if occupant == person_id => {
                return Ok(AssignOutcome::Unchanged {
                    seat: seat_id.clone(),
                });
            }
            Some(occupant) => {
                return Err(Error::SeatOccupied {
                    seat: seat_id.clone(),
                    occupant: occupant.clone(),
                });
            }
            None => {}
        }

        let previous_seat = self.detach(person_idx);
        self.seat_person(person_idx, element_idx, seat_idx);
        assert_occupancy_invariants(self.elements, self.people);

        tracing::debug!(previous = ?previous_seat, "Assigned person to seat");
        Ok(match previous_seat {
            Some(previous_seat) => AssignOutcome::VacatedPrevious {
                seat: seat_id.clone(),
                previous_seat,
            },
            None => AssignOutcome::Seated {
                seat: seat_id.clone(),
            },
        })
    }

    /// Drop a person onto an element rather than a particular seat
    #[instrument(skip(self), fields(person_id = %person_id, element_id = %element_id))]
    pub fn assign_to_element(
        &mut self,
        person_id: &PersonId,
        element_id: &ElementId,
    ) -> Result<AssignOutcome> {
        let person_idx = self.person_index(person_id)?;
        let element_idx = self.element_index(element_id)?;

        let element = &self.elements[element_idx];
        if !element.is_assignable() || element.seats.is_empty() {
            return Err(Error::NotAssignable(element_id.clone()));
        }
        if let Some(seat) = element.seat_of(person_id) {
            return Ok(AssignOutcome::Unchanged {
                seat: seat.id.clone(),
            });
        }

        let outcome = match element.seats.iter().position(Seat::is_free) {
            Some(seat_idx) => {
                let seat = element.seats[seat_idx].id.clone();
                let previous_seat = self.detach(person_idx);
                self.seat_person(person_idx, element_idx, seat_idx);
                match previous_seat {
                    Some(previous_seat) => AssignOutcome::VacatedPrevious {
                        seat,
                        previous_seat,
                    },
                    None => AssignOutcome::Seated { seat },
                }
            }
            None => {
                let seat = element.seats[0].id.clone();
                let previous = element.seats[0]
                    .occupant
                    .clone()
                    .ok_or_else(|| Error::Inconsistent(format!("full element {} has a free first seat", element_id)))?;
                let previous_idx = self.person_index(&previous)?;
                self.detach(previous_idx);
                self.detach(person_idx);
                self.seat_person(person_idx, element_idx, 0);
                tracing::info!(displaced = %previous, "Element full, previous occupant unassigned");
                AssignOutcome::Displaced { seat, previous }
            }
        };

        assert_occupancy_invariants(self.elements, self.people);
        Ok(outcome)
    }

    /// Free the person's seat; `Ok(false)` if they had none
    #[instrument(skip(self), fields(person_id = %person_id))]
    pub fn vacate(&mut self, person_id: &PersonId) -> Result<bool> {
        let person_idx = self.person_index(person_id)?;
        let was_assigned = self.people[person_idx].element_id.is_some();
        let freed = self.detach(person_idx);
        assert_occupancy_invariants(self.elements, self.people);
        Ok(was_assigned || freed.is_some())
    }

    /// Vacate, then delete the person record
    #[instrument(skip(self), fields(person_id = %person_id))]
    pub fn remove_person(&mut self, person_id: &PersonId) -> Result<Person> {
        let person_idx = self.person_index(person_id)?;
        self.detach(person_idx);
        let person = self.people.remove(person_idx);
        assert_occupancy_invariants(self.elements, self.people);
        Ok(person)
    }

    /// Unassign everyone seated at an element; returns who was displaced
    pub fn clear_element(&mut self, element_id: &ElementId) -> Result<Vec<PersonId>> {
        let element_idx = self.element_index(element_id)?;
        let mut displaced = Vec::new();
        for seat in &mut self.elements[element_idx].seats {
            if let Some(person) = seat.occupant.take() {
                displaced.push(person);
            }
        }
        for person in self.people.iter_mut() {
            if person.element_id.as_ref() == Some(element_id) {
                person.element_id = None;
            }
        }
        assert_occupancy_invariants(self.elements, self.people);
        Ok(displaced)
    }

    /// Unassign everyone; returns how many people lost a seat
    pub fn clear_all(&mut self) -> usize {
        let mut cleared = 0;
        for seat in self.elements.iter_mut().flat_map(|e| e.seats.iter_mut()) {
            if seat.occupant.take().is_some() {
                cleared += 1;
            }
        }
        for person in self.people.iter_mut() {
            person.element_id = None;
        }
        cleared
    }

    /// Smart arrange grouped by one of the built-in attributes
    pub fn smart_arrange(&mut self, group_by: GroupBy) -> ArrangeReport {
        self.smart_arrange_by(|person| group_by.key(person))
    }

    /// Clear every assignment, then refill seats group by group
    ///
    /// Groups keep first-appearance order. Elements are visited largest
    /// first, round-robin, with one cursor shared across all groups. Once a
    /// person finds every element full the arrangement stops; the rest of the
    /// people stay unassigned. There is no backtracking or rebalancing.
    #[instrument(skip(self, key))]
    pub fn smart_arrange_by<F>(&mut self, key: F) -> ArrangeReport
    where
        F: Fn(&Person) -> String,
    {
        self.clear_all();

        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (idx, person) in self.people.iter().enumerate() {
            let slot = *group_index.entry(key(person)).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(idx);
        }

        let mut usable: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_assignable() && !e.seats.is_empty())
            .map(|(idx, _)| idx)
            .collect();
        // stable: ties keep insertion order
        usable.sort_by(|&a, &b| self.elements[b].seats.len().cmp(&self.elements[a].seats.len()));

        let mut cursor = 0usize;
        let mut assigned = 0usize;
        'groups: for members in &groups {
            for &person_idx in members {
                let target = (0..usable.len()).find_map(|j| {
                    let element_idx = usable[(cursor + j) % usable.len()];
                    self.elements[element_idx]
                        .seats
                        .iter()
                        .position(Seat::is_free)
                        .map(|seat_idx| (element_idx, seat_idx))
                });
                let Some((element_idx, seat_idx)) = target else {
                    break 'groups;
                };
                self.seat_person(person_idx, element_idx, seat_idx);
                cursor += 1;
                assigned += 1;
            }
        }

        assert_occupancy_invariants(self.elements, self.people);

        let report = ArrangeReport {
            assigned,
            unassigned: self.people.len() - assigned,
            groups: groups.len(),
        };
        if report.unassigned > 0 {
            tracing::warn!(
                assigned = report.assigned,
                unassigned = report.unassigned,
                "Not enough free seats for everyone"
            );
        } else {
            tracing::info!(assigned = report.assigned, groups = report.groups, "Smart arrange complete");
        }
        report
    }
}

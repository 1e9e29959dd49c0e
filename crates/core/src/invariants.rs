//! Developer guardrails and invariants
//!
//! `audit_*` functions return every violation found and are used when
//! restoring untrusted snapshots. `assert_*` functions are debug assertions
//! for detecting impossible states during development; they are compiled out
//! in release builds.

use std::collections::{HashMap, HashSet};

use crate::config::SizeConfig;
use crate::models::{Element, ElementFamily, ElementId, Person, PersonId, Room, SeatId};

/// A broken occupancy or identity rule
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("duplicate element id {0}")]
    DuplicateElement(ElementId),
    #[error("duplicate person id {0}")]
    DuplicatePerson(PersonId),
    #[error("duplicate seat id {0}")]
    DuplicateSeat(SeatId),
    #[error("seat {seat} references missing person {person}")]
    UnknownOccupant { seat: SeatId, person: PersonId },
    #[error("person {0} occupies more than one seat")]
    MultipleSeats(PersonId),
    #[error("person {person} points at {claimed:?} but sits at {actual:?}")]
    ElementMismatch {
        person: PersonId,
        claimed: Option<ElementId>,
        actual: Option<ElementId>,
    },
    #[error("element {element} has {seats} seats but a seat count of {expected}")]
    SeatCountMismatch {
        element: ElementId,
        seats: usize,
        expected: u32,
    },
    #[error("element {0} cannot hold occupants")]
    OccupiedNonAssignable(ElementId),
}

/// Check the person <-> seat consistency rules
///
/// - no seat references a missing person
/// - no person occupies two seats
/// - `person.element_id` names exactly the element whose seat holds them
pub fn audit_occupancy(elements: &[Element], people: &[Person]) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut person_ids = HashSet::new();
    for person in people {
        if !person_ids.insert(&person.id) {
            violations.push(Violation::DuplicatePerson(person.id.clone()));
        }
    }

    let mut element_ids = HashSet::new();
    let mut seat_ids = HashSet::new();
    let mut seated_at: HashMap<&PersonId, &ElementId> = HashMap::new();

    for element in elements {
        if !element_ids.insert(&element.id) {
            violations.push(Violation::DuplicateElement(element.id.clone()));
        }
        if element.family() != ElementFamily::Decor
            && element.seats.len() != element.seat_count as usize
        {
            violations.push(Violation::SeatCountMismatch {
                element: element.id.clone(),
                seats: element.seats.len(),
                expected: element.seat_count,
            });
        }
        if !element.is_assignable() && element.occupied_count() > 0 {
            violations.push(Violation::OccupiedNonAssignable(element.id.clone()));
        }
        for seat in &element.seats {
            if !seat_ids.insert(&seat.id) {
                violations.push(Violation::DuplicateSeat(seat.id.clone()));
            }
            let Some(occupant) = &seat.occupant else {
                continue;
            };
            if !person_ids.contains(occupant) {
                violations.push(Violation::UnknownOccupant {
                    seat: seat.id.clone(),
                    person: occupant.clone(),
                });
            }
            if seated_at.insert(occupant, &element.id).is_some() {
                violations.push(Violation::MultipleSeats(occupant.clone()));
            }
        }
    }

    for person in people {
        let actual = seated_at.get(&person.id).copied();
        if person.element_id.as_ref() != actual {
            violations.push(Violation::ElementMismatch {
                person: person.id.clone(),
                claimed: person.element_id.clone(),
                actual: actual.cloned(),
            });
        }
    }

    violations
}

/// Validate occupancy consistency (debug builds only)
pub fn assert_occupancy_invariants(elements: &[Element], people: &[Person]) {
    if cfg!(debug_assertions) {
        let violations = audit_occupancy(elements, people);
        debug_assert!(
            violations.is_empty(),
            "Occupancy invariants violated: {:?}",
            violations
        );
    }
}

/// Validate that an element's size and seats are sane
pub fn assert_element_invariants(element: &Element, sizes: &SizeConfig) {
    debug_assert!(
        element.width >= sizes.min_size && element.width <= sizes.max_size,
        "Element {} has width {} outside [{}, {}]",
        element.id,
        element.width,
        sizes.min_size,
        sizes.max_size
    );
    debug_assert!(
        element.height >= sizes.min_size && element.height <= sizes.max_size,
        "Element {} has height {} outside [{}, {}]",
        element.id,
        element.height,
        sizes.min_size,
        sizes.max_size
    );

    match element.family() {
        ElementFamily::Decor => debug_assert!(
            element.seats.is_empty(),
            "Decor element {} has seats",
            element.id
        ),
        _ => debug_assert_eq!(
            element.seats.len(),
            element.seat_count as usize,
            "Element {} seat list does not match its seat count",
            element.id
        ),
    }
}

/// Validate that a room has positive dimensions
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(
        room.is_valid(),
        "Room has non-positive dimensions {} x {}",
        room.width,
        room.height
    );
}

/// Validate a person record
pub fn assert_person_invariants(person: &Person) {
    debug_assert!(
        !person.name.trim().is_empty(),
        "Person {} has empty name",
        person.id
    );

    let unique: HashSet<_> = person.tags.iter().collect();
    debug_assert!(
        unique.len() == person.tags.len(),
        "Person {} has duplicate tags",
        person.id
    );
}

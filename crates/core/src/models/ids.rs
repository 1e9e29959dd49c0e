//! Identifier newtypes
//!
//! Ids are plain strings produced by the session's [`IdGenerator`](crate::IdGenerator).
//! Cross references between people and seats are always by id, never by pointer.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a table, booth or decor component
    ElementId
);

string_id!(
    /// Identifier of an attendee or exhibitor
    PersonId
);

string_id!(
    /// Identifier of a seat, derived from its owning element's id
    SeatId
);

impl SeatId {
    /// Seat id for the `index`-th seat of an element
    pub fn for_element(element_id: &ElementId, index: usize) -> Self {
        Self(format!("{}-seat-{}", element_id, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_id_is_prefixed_by_element() {
        let element = ElementId::new("id7");
        assert_eq!(SeatId::for_element(&element, 3).as_str(), "id7-seat-3");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = PersonId::new("id42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"id42\"");
    }
}

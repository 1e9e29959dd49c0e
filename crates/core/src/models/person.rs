//! Attendees and exhibitors

use serde::{Deserialize, Serialize};

use super::{ElementId, PersonId};

/// Categorical attributes, depending on the kind of event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Profile {
    Attendee { department: String, position: String },
    Exhibitor { company: String, industry: String },
}

/// Person variants, used when importing records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Attendee,
    Exhibitor,
}

impl Profile {
    pub fn kind(&self) -> PersonKind {
        match self {
            Profile::Attendee { .. } => PersonKind::Attendee,
            Profile::Exhibitor { .. } => PersonKind::Exhibitor,
        }
    }

    fn trimmed(self) -> Self {
        match self {
            Profile::Attendee {
                department,
                position,
            } => Profile::Attendee {
                department: department.trim().to_string(),
                position: position.trim().to_string(),
            },
            Profile::Exhibitor { company, industry } => Profile::Exhibitor {
                company: company.trim().to_string(),
                industry: industry.trim().to_string(),
            },
        }
    }
}

/// Attributes people can be grouped or filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Department,
    Position,
    Company,
    Industry,
}

/// An attendee or exhibitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub profile: Profile,
    /// Short notes, ordered, without duplicates
    pub tags: Vec<String>,
    /// Element this person is seated at. Only the ledger writes this.
    pub element_id: Option<ElementId>,
}

impl Person {
    pub fn kind(&self) -> PersonKind {
        self.profile.kind()
    }

    pub fn is_assigned(&self) -> bool {
        self.element_id.is_some()
    }

    /// Value of an attribute, `None` when missing or not applicable
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        let value = match (&self.profile, attribute) {
            (Profile::Attendee { department, .. }, Attribute::Department) => department,
            (Profile::Attendee { position, .. }, Attribute::Position) => position,
            (Profile::Exhibitor { company, .. }, Attribute::Company) => company,
            (Profile::Exhibitor { industry, .. }, Attribute::Industry) => industry,
            _ => return None,
        };
        (!value.is_empty()).then_some(value.as_str())
    }

    /// Add a tag unless it is blank or already present
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag.trim());
        self.tags.len() != before
    }
}

/// Trim tags, drop blanks and suppress duplicates while keeping order
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Input for creating a person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub profile: Profile,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PersonDraft {
    pub fn attendee(name: &str, department: &str, position: &str) -> Self {
        Self {
            name: name.to_string(),
            profile: Profile::Attendee {
                department: department.to_string(),
                position: position.to_string(),
            },
            tags: Vec::new(),
        }
    }

    pub fn exhibitor(name: &str, company: &str, industry: &str) -> Self {
        Self {
            name: name.to_string(),
            profile: Profile::Exhibitor {
                company: company.to_string(),
                industry: industry.to_string(),
            },
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags.into_iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    /// Trimmed name, or `None` if it is blank
    pub fn clean_name(&self) -> Option<String> {
        let name = self.name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Build the person record, or `None` if the name is blank
    pub fn into_person(self, id: PersonId) -> Option<Person> {
        let name = self.clean_name()?;
        Some(Person {
            id,
            name,
            profile: self.profile.trimmed(),
            tags: normalize_tags(&self.tags),
            element_id: None,
        })
    }
}

/// One row produced by a bulk import collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub name: String,
    /// Department (attendees) or company (exhibitors)
    #[serde(default)]
    pub attribute1: String,
    /// Position (attendees) or industry (exhibitors)
    #[serde(default)]
    pub attribute2: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ImportRecord {
    pub fn into_draft(self, kind: PersonKind) -> PersonDraft {
        let draft = match kind {
            PersonKind::Attendee => {
                PersonDraft::attendee(&self.name, &self.attribute1, &self.attribute2)
            }
            PersonKind::Exhibitor => {
                PersonDraft::exhibitor(&self.name, &self.attribute1, &self.attribute2)
            }
        };
        draft.with_tags(self.tags)
    }
}

/// Attribute filter for the people list; empty fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub department: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

impl PersonFilter {
    pub fn by(attribute: Attribute, value: &str) -> Self {
        let mut filter = Self::default();
        let slot = match attribute {
            Attribute::Department => &mut filter.department,
            Attribute::Position => &mut filter.position,
            Attribute::Company => &mut filter.company,
            Attribute::Industry => &mut filter.industry,
        };
        *slot = Some(value.to_string());
        filter
    }

    pub fn matches(&self, person: &Person) -> bool {
        let checks = [
            (Attribute::Department, &self.department),
            (Attribute::Position, &self.position),
            (Attribute::Company, &self.company),
            (Attribute::Industry, &self.industry),
        ];
        let attributes_match = checks.iter().all(|(attribute, wanted)| match wanted {
            Some(wanted) if !wanted.is_empty() => person.attribute(*attribute) == Some(wanted),
            _ => true,
        });
        let search_match = match &self.search {
            Some(needle) if !needle.trim().is_empty() => person
                .name
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            _ => true,
        };
        attributes_match && search_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let draft = PersonDraft::attendee("   ", "Sales", "Lead");
        assert!(draft.into_person(PersonId::new("p")).is_none());
    }

    #[test]
    fn test_draft_trims_and_dedups() {
        let person = PersonDraft::attendee("  Ada ", " R&D ", "Engineer")
            .with_tags(["vip", " vip", "", "speaker"])
            .into_person(PersonId::new("p1"))
            .unwrap();
        assert_eq!(person.name, "Ada");
        assert_eq!(person.attribute(Attribute::Department), Some("R&D"));
        assert_eq!(person.tags, vec!["vip", "speaker"]);
        assert!(!person.is_assigned());
    }

    #[test]
    fn test_attribute_not_applicable() {
        let person = PersonDraft::exhibitor("Acme", "", "Robotics")
            .into_person(PersonId::new("p2"))
            .unwrap();
        assert_eq!(person.attribute(Attribute::Department), None);
        assert_eq!(person.attribute(Attribute::Company), None);
        assert_eq!(person.attribute(Attribute::Industry), Some("Robotics"));
    }

    #[test]
    fn test_tag_editing() {
        let mut person = PersonDraft::attendee("Bo", "", "")
            .into_person(PersonId::new("p3"))
            .unwrap();
        assert!(person.add_tag("vegan"));
        assert!(!person.add_tag(" vegan "));
        assert!(person.remove_tag("vegan"));
        assert!(person.tags.is_empty());
    }

    #[test]
    fn test_filter() {
        let person = PersonDraft::attendee("Carla Diaz", "Sales", "Manager")
            .into_person(PersonId::new("p4"))
            .unwrap();
        assert!(PersonFilter::by(Attribute::Department, "Sales").matches(&person));
        assert!(!PersonFilter::by(Attribute::Position, "Intern").matches(&person));
        let search = PersonFilter {
            search: Some("diaz".into()),
            ..Default::default()
        };
        assert!(search.matches(&person));
    }

    #[test]
    fn test_import_record_mapping() {
        let record = ImportRecord {
            name: "Zed".into(),
            attribute1: "Globex".into(),
            attribute2: "Energy".into(),
            tags: vec!["hall-b".into()],
        };
        let draft = record.into_draft(PersonKind::Exhibitor);
        assert_eq!(
            draft.profile,
            Profile::Exhibitor {
                company: "Globex".into(),
                industry: "Energy".into()
            }
        );
        assert_eq!(draft.tags, vec!["hall-b"]);
    }
}

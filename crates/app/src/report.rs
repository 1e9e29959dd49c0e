//! Plain-text plan report

use seatwise_core::{Capacity, LayoutStore};

use crate::scenario::ScenarioOutcome;

/// Render the layout summary, element occupancy and assignment list
pub fn render(store: &LayoutStore, outcome: &ScenarioOutcome, capacity: Option<Capacity>) -> String {
    let summary = store.summary();
    let mut lines = vec![format!(
        "Session {} ({})",
        store.code(),
        store.context().kind.as_str()
    )];

    lines.push(match summary.room {
        Some(room) => format!(
            "Room: {} {} x {} cm",
            room.shape.as_str(),
            room.width,
            room.height
        ),
        None => "Room: not set".to_string(),
    });
    lines.push(format!(
        "Elements: {} tables, {} booths, {} decor",
        summary.tables, summary.booths, summary.decor
    ));
    lines.push(format!(
        "Seats: {} occupied of {}",
        summary.occupied_seats, summary.total_seats
    ));
    lines.push(format!(
        "People: {} ({} assigned, {} unassigned)",
        summary.people, summary.assigned, summary.unassigned
    ));
    if outcome.import.skipped > 0 {
        lines.push(format!("Import: {} skipped", outcome.import.skipped));
    }
    if let Some(capacity) = capacity {
        lines.push(format!(
            "Capacity: up to {} elements, ~{} seats, {}% utilisation, {} m2",
            capacity.max_elements,
            capacity.estimated_occupancy,
            capacity.utilization_percent,
            capacity.room_area_m2
        ));
    }

    let collisions = store.collisions();
    if !collisions.is_empty() {
        lines.push(format!("Overlapping elements: {}", collisions.len()));
    }

    lines.push(String::new());
    lines.extend(
        store
            .elements()
            .iter()
            .filter(|e| !e.seats.is_empty())
            .map(|e| format!("{:<8} {}/{}", e.label, e.occupied_count(), e.seats.len())),
    );

    lines.push(String::new());
    lines.extend(
        store
            .assignment_rows()
            .into_iter()
            .map(|row| format!("{:<24} {:<16} {}", row.name, row.attribute1, row.assignment)),
    );
    lines.extend(outcome.rejected.iter().map(|r| format!("rejected: {}", r)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_core::{
        ElementSpec, EventKind, PersonDraft, PlannerConfig, RoomTemplate, SequentialIdGenerator,
        SessionCode, SessionContext, TableShape,
    };

    #[test]
    fn test_report_lists_assignments() {
        let mut store = LayoutStore::new(SessionContext::with_ids(
            EventKind::Conference,
            SessionCode("C-20250908-6927".into()),
            PlannerConfig::default(),
            Box::new(SequentialIdGenerator::new()),
        ));
        store.apply_room_template(RoomTemplate::Rectangle);
        let table = store
            .add_element(ElementSpec::table(TableShape::Circle, 2))
            .unwrap();
        let ada = store
            .add_person(PersonDraft::attendee("Ada", "Eng", ""))
            .unwrap();
        store.add_person(PersonDraft::attendee("Grace", "Eng", "")).unwrap();
        store.assign_to_element(&ada.id, &table.id).unwrap();

        let report = render(&store, &ScenarioOutcome::default(), None);
        assert!(report.starts_with("Session C-20250908-6927 (conference)"));
        assert!(report.contains("Seats: 1 occupied of 2"));
        assert!(report.contains("T1       1/2"));
        assert!(report
            .lines()
            .any(|line| line.starts_with("Grace") && line.ends_with("Unassigned")));
    }

    #[test]
    fn test_report_optional_lines() {
        let mut store = LayoutStore::new(SessionContext::with_ids(
            EventKind::TradeShow,
            SessionCode("T-20250908-0001".into()),
            PlannerConfig::default(),
            Box::new(SequentialIdGenerator::new()),
        ));
        store.apply_room_template(RoomTemplate::Rectangle);
        let outcome = ScenarioOutcome {
            import: seatwise_core::ImportReport {
                imported: 0,
                skipped: 2,
            },
            auto_arranged: 0,
            rejected: vec!["Ada -> E009: unknown element".into()],
        };

        let report = render(&store, &outcome, None);
        assert!(report.contains("Import: 2 skipped"));
        assert!(!report.contains("Capacity:"));
        assert!(report.ends_with("rejected: Ada -> E009: unknown element\n"));
    }
}

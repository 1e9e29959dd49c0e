//! Placement planner
//!
//! Heuristic auto-arrangement of many identical elements inside a room, and
//! a capacity estimate used to preview an arrangement before committing it.
//! Nothing here mutates state; callers turn [`Placement`]s into elements.
//!
//! Placements that would push an element's seat clearance outside the room
//! margin are dropped rather than squeezed in, so the output can be shorter
//! than the requested count.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::geometry::Bounds;
use crate::models::{Room, RoomShape, TableShape};

/// The element every auto-arranged slot is filled with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementTemplate {
    pub shape: TableShape,
    pub width: f64,
    pub height: f64,
    pub seat_count: u32,
}

impl ElementTemplate {
    pub fn new(shape: TableShape, width: f64, height: f64, seat_count: u32) -> Self {
        Self {
            shape,
            width,
            height,
            seat_count,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Horizontal and vertical size of one grid slot, seats and gap included
    pub fn safety_size(&self, config: &LayoutConfig) -> (f64, f64) {
        (
            self.width + config.safety_extra_width,
            self.height + config.safety_extra_height,
        )
    }
}

/// Top-left position chosen for one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// Bounds of a placement including seat clearance
pub fn padded_bounds(placement: &Placement, template: &ElementTemplate, config: &LayoutConfig) -> Bounds {
    Bounds::new(placement.x, placement.y, template.width, template.height)
        .inflate(config.bound_pad_x, config.bound_pad_y)
}

/// Usable area of the room: everything inside the margin
pub fn usable_bounds(room: &Room, config: &LayoutConfig) -> Bounds {
    Bounds {
        min_x: config.margin,
        min_y: config.margin,
        max_x: room.width - config.margin,
        max_y: room.height - config.margin,
    }
}

fn fits(placement: &Placement, template: &ElementTemplate, room: &Room, config: &LayoutConfig) -> bool {
    usable_bounds(room, config).contains(&padded_bounds(placement, template, config))
}

fn can_plan(room: &Room, template: &ElementTemplate, count: usize) -> bool {
    count > 0 && room.is_valid() && template.is_valid()
}

/// Fill the room row by row, left to right then top to bottom
pub fn auto_arrange_in_rectangle(
    room: &Room,
    template: &ElementTemplate,
    count: usize,
    config: &LayoutConfig,
) -> Vec<Placement> {
    if !can_plan(room, template, count) {
        return Vec::new();
    }

    let (safety_w, safety_h) = template.safety_size(config);
    if !(safety_w > 0.0 && safety_h > 0.0) {
        return Vec::new();
    }
    let per_row = (((room.width - 2.0 * config.margin) / safety_w).floor() as usize).max(1);
    let bottom = room.height - config.margin;

    let mut placements = Vec::new();
    for i in 0..count {
        let (row, col) = (i / per_row, i % per_row);
        let placement = Placement {
            x: config.margin + config.bound_pad_x + col as f64 * safety_w,
            y: config.margin + config.bound_pad_y + row as f64 * safety_h,
            rotation: 0.0,
        };
        // Rows only move down, nothing after this one fits either
        if placement.y + template.height + config.bound_pad_y > bottom {
            break;
        }
        if fits(&placement, template, room, config) {
            placements.push(placement);
        }
    }

    if placements.len() < count {
        tracing::warn!(
            requested = count,
            placed = placements.len(),
            "Some elements did not fit the rectangular room"
        );
    }
    placements
}

/// Fill concentric rings around the room center
pub fn auto_arrange_in_circle(
    room: &Room,
    template: &ElementTemplate,
    count: usize,
    config: &LayoutConfig,
) -> Vec<Placement> {
    if !can_plan(room, template, count) {
        return Vec::new();
    }

    let (safety_w, safety_h) = template.safety_size(config);
    let (cx, cy) = room.center();
    let radius_step = safety_w.max(safety_h);
    if !(safety_w > 0.0 && radius_step > 0.0) {
        return Vec::new();
    }
    let max_radius =
        room.inscribed_radius() - config.margin - template.width.max(template.height) / 2.0;

    let mut placements = Vec::new();
    let mut skipped = 0usize;
    let mut ring = 0usize;

    while placements.len() < count && (ring as f64) * radius_step < max_radius {
        let radius = (ring + 1) as f64 * radius_step;
        let slots = (2.0 * PI * radius / safety_w).floor() as usize;
        let on_ring = slots.min(count - placements.len());

        if on_ring > 0 {
            let angle_step = 2.0 * PI / on_ring as f64;
            for i in 0..on_ring {
                let angle = i as f64 * angle_step;
                let placement = Placement {
                    x: cx + radius * angle.cos() - template.width / 2.0,
                    y: cy + radius * angle.sin() - template.height / 2.0,
                    rotation: 0.0,
                };
                if fits(&placement, template, room, config) {
                    placements.push(placement);
                } else {
                    skipped += 1;
                }
            }
        }
        ring += 1;
    }

    if placements.len() < count {
        tracing::warn!(
            requested = count,
            placed = placements.len(),
            skipped,
            rings = ring,
            "Some elements did not fit the circular room"
        );
    }
    placements
}

/// Auto-arrange according to the room's shape
pub fn auto_arrange(
    room: &Room,
    template: &ElementTemplate,
    count: usize,
    config: &LayoutConfig,
) -> Vec<Placement> {
    match room.shape {
        RoomShape::Rectangle => auto_arrange_in_rectangle(room, template, count, config),
        RoomShape::Circle => auto_arrange_in_circle(room, template, count, config),
    }
}

/// Size of one element used for capacity estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl From<&ElementTemplate> for Footprint {
    fn from(template: &ElementTemplate) -> Self {
        Self {
            width: template.width,
            height: template.height,
        }
    }
}

/// Result of a capacity estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub max_elements: u64,
    pub estimated_occupancy: u64,
    pub utilization_percent: u64,
    /// Room area in square meters, rounded
    pub room_area_m2: u64,
}

/// Estimate how many elements (and seats) a room could hold
pub fn estimate_capacity(
    room: &Room,
    footprint: Footprint,
    spacing_factor: f64,
    seats_per_element: u32,
) -> Capacity {
    let room_area = room.area();
    let element_area = footprint.area();
    if !(room_area > 0.0 && element_area > 0.0 && spacing_factor > 0.0) {
        return Capacity::default();
    }

    let max_elements = (room_area / (element_area * spacing_factor)).floor() as u64;
    Capacity {
        max_elements,
        estimated_occupancy: max_elements * u64::from(seats_per_element),
        utilization_percent: (max_elements as f64 * element_area / room_area * 100.0).round() as u64,
        room_area_m2: (room_area / 10_000.0).round() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_room(side: f64) -> Room {
        Room::new(RoomShape::Rectangle, side, side).unwrap()
    }

    fn template() -> ElementTemplate {
        ElementTemplate::new(TableShape::Circle, 120.0, 120.0, 6)
    }

    #[test]
    fn test_rectangle_drops_what_does_not_fit() {
        let config = LayoutConfig::default();
        let room = square_room(1000.0);
        let placements = auto_arrange_in_rectangle(&room, &template(), 50, &config);

        assert!(placements.len() < 50);
        assert!(!placements.is_empty());
        for p in &placements {
            let b = padded_bounds(p, &template(), &config);
            assert!(b.min_x >= 100.0 && b.max_x <= 900.0, "{:?}", b);
            assert!(b.min_y >= 100.0 && b.max_y <= 900.0, "{:?}", b);
        }
    }

    #[test]
    fn test_rectangle_row_major_order() {
        let config = LayoutConfig::default();
        let room = square_room(1000.0);
        let placements = auto_arrange_in_rectangle(&room, &template(), 6, &config);
        // floor(800 / 200) = 4 per row
        assert_eq!(placements.len(), 6);
        assert_eq!(placements[0].x, 140.0);
        assert_eq!(placements[1].x, 340.0);
        assert_eq!(placements[3].x, 740.0);
        assert_eq!(placements[4].x, 140.0);
        assert_eq!(placements[4].y, placements[0].y + 240.0);
    }

    #[test]
    fn test_rectangle_single_column() {
        let config = LayoutConfig::default();
        let room = Room::new(RoomShape::Rectangle, 400.0, 2000.0).unwrap();
        let row = ElementTemplate::new(TableShape::Row, 100.0, 60.0, 4);
        let placements = auto_arrange_in_rectangle(&room, &row, 3, &config);
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().all(|p| p.x == 140.0));
        assert_eq!(placements[2].y, 160.0 + 2.0 * 180.0);
    }

    #[test]
    fn test_huge_count_is_bounded_by_the_room() {
        let config = LayoutConfig::default();
        let count = usize::MAX / 2;

        let rect = auto_arrange_in_rectangle(&square_room(1000.0), &template(), count, &config);
        assert_eq!(rect, auto_arrange_in_rectangle(&square_room(1000.0), &template(), 50, &config));

        let room = Room::new(RoomShape::Circle, 1600.0, 1600.0).unwrap();
        let ring = auto_arrange_in_circle(&room, &template(), count, &config);
        assert!(!ring.is_empty());
        assert_eq!(ring, auto_arrange_in_circle(&room, &template(), 500, &config));
    }

    #[test]
    fn test_rectangle_too_narrow_places_nothing() {
        let config = LayoutConfig::default();
        let room = Room::new(RoomShape::Rectangle, 300.0, 2000.0).unwrap();
        let row = ElementTemplate::new(TableShape::Row, 100.0, 60.0, 4);
        assert!(auto_arrange_in_rectangle(&room, &row, 3, &config).is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        let config = LayoutConfig::default();
        let room = square_room(1000.0);
        assert!(auto_arrange(&room, &template(), 0, &config).is_empty());
        let bad_room = Room {
            shape: RoomShape::Circle,
            width: 0.0,
            height: 500.0,
        };
        assert!(auto_arrange(&bad_room, &template(), 5, &config).is_empty());
    }

    #[test]
    fn test_circle_stays_inside_margin() {
        let config = LayoutConfig::default();
        let room = Room::new(RoomShape::Circle, 1600.0, 1600.0).unwrap();
        let placements = auto_arrange_in_circle(&room, &template(), 40, &config);
        assert!(!placements.is_empty());
        assert!(placements.len() <= 40);
        let usable = usable_bounds(&room, &config);
        for p in &placements {
            assert!(usable.contains(&padded_bounds(p, &template(), &config)));
        }
    }

    #[test]
    fn test_circle_first_ring() {
        let config = LayoutConfig::default();
        let room = Room::new(RoomShape::Circle, 1600.0, 1600.0).unwrap();
        let placements = auto_arrange_in_circle(&room, &template(), 3, &config);
        // step = max(200, 240) = 240; first ring radius 240 has floor(2*pi*240/200) = 7 slots
        assert_eq!(placements.len(), 3);
        let first = placements[0];
        assert!((first.x - (800.0 + 240.0 - 60.0)).abs() < 1e-9);
        assert!((first.y - (800.0 - 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_dispatch_by_shape() {
        let config = LayoutConfig::default();
        let rect = square_room(1000.0);
        assert_eq!(
            auto_arrange(&rect, &template(), 2, &config),
            auto_arrange_in_rectangle(&rect, &template(), 2, &config)
        );
    }

    #[test]
    fn test_capacity_estimate() {
        let room = Room::new(RoomShape::Rectangle, 4000.0, 3000.0).unwrap();
        let capacity = estimate_capacity(
            &room,
            Footprint {
                width: 120.0,
                height: 120.0,
            },
            1.5,
            6,
        );
        assert_eq!(capacity.max_elements, 555);
        assert_eq!(capacity.estimated_occupancy, 3330);
        assert_eq!(capacity.utilization_percent, 67);
        assert_eq!(capacity.room_area_m2, 1200);
    }

    #[test]
    fn test_capacity_degenerate_inputs() {
        let room = square_room(1000.0);
        let zero = Footprint {
            width: 0.0,
            height: 120.0,
        };
        assert_eq!(estimate_capacity(&room, zero, 1.5, 6), Capacity::default());
        let footprint = Footprint {
            width: 120.0,
            height: 120.0,
        };
        assert_eq!(estimate_capacity(&room, footprint, 0.0, 6), Capacity::default());
    }
}

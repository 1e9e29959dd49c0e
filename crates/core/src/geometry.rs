//! Geometry kernel
//!
//! Pure functions that place seats around tables and booths and compute the
//! bounding boxes used for collision and room-bound checks. All coordinates
//! are centimeters; element-local space has its origin at the element's
//! top-left corner.

use std::f64::consts::PI;

use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::models::{Element, ElementId, Seat, SeatId, TableShape};

/// Everything the kernel needs to lay out an element's seats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatLayoutInput {
    pub shape: TableShape,
    pub width: f64,
    pub height: f64,
    pub seat_count: u32,
    pub rotation: f64,
}

impl SeatLayoutInput {
    /// Layout input for an existing element, `None` for decor
    pub fn for_element(element: &Element) -> Option<Self> {
        Some(Self {
            shape: element.kind.shape()?,
            width: element.width,
            height: element.height,
            seat_count: element.seat_count,
            rotation: element.rotation,
        })
    }
}

/// Compute the ordered seats of an element
///
/// The returned seats are fresh: no occupants, ids `<element>-seat-<k>`.
/// Offsets are already rotated about the element center and shifted so the
/// seat glyph is centered on its point.
pub fn compute_seat_positions(
    element_id: &ElementId,
    input: &SeatLayoutInput,
    config: &GeometryConfig,
) -> Result<Vec<Seat>> {
    if input.seat_count == 0 {
        return Err(Error::InvalidSeatCount(input.seat_count));
    }

    let center = (input.width / 2.0, input.height / 2.0);
    let seats = raw_seat_points(input, config)
        .into_iter()
        .enumerate()
        .map(|(index, point)| {
            let (x, y) = rotate_about(point, center, input.rotation);
            Seat {
                id: SeatId::for_element(element_id, index),
                left: x - config.seat_glyph_half,
                top: y - config.seat_glyph_half,
                occupant: None,
            }
        })
        .collect::<Vec<_>>();

    debug_assert_eq!(seats.len(), input.seat_count as usize);
    tracing::debug!(
        element_id = %element_id,
        shape = input.shape.as_str(),
        seats = seats.len(),
        "Computed seat positions"
    );
    Ok(seats)
}

/// Unrotated seat points in element-local space
fn raw_seat_points(input: &SeatLayoutInput, config: &GeometryConfig) -> Vec<(f64, f64)> {
    let n = input.seat_count as usize;
    let (w, h) = (input.width, input.height);
    let above = -config.edge_clearance;
    let left_of = -config.edge_clearance;
    let below = h + config.edge_gap;
    let right_of = w + config.edge_gap;

    match input.shape {
        TableShape::Circle => {
            let min_side = w.min(h);
            let scale = min_side / config.reference_size;
            let radius = min_side / 2.0 + config.circle_clearance * scale;
            (0..n)
                .map(|i| {
                    let angle = 2.0 * PI * i as f64 / n as f64;
                    (w / 2.0 + radius * angle.cos(), h / 2.0 + radius * angle.sin())
                })
                .collect()
        }
        TableShape::Square => {
            let per_edge = n.div_ceil(4);
            let slot = |len: f64, i: usize| len / (per_edge + 1) as f64 * (i + 1) as f64;
            let mut points = Vec::with_capacity(n);
            // top, right, bottom, left
            for edge in 0..4 {
                for i in 0..per_edge {
                    if points.len() == n {
                        break;
                    }
                    let point = match edge {
                        0 => (slot(w, i), above),
                        1 => (right_of, slot(h, i)),
                        2 => (slot(w, i), below),
                        _ => (left_of, slot(h, i)),
                    };
                    points.push(point);
                }
            }
            points
        }
        TableShape::Row => (0..n)
            .map(|i| (w / (n + 1) as f64 * (i + 1) as f64, above))
            .collect(),
        TableShape::Other => {
            let top = n.div_ceil(2);
            let spacing = w / (top + 1) as f64;
            let top_points = (0..top).map(|i| (spacing * (i + 1) as f64, above));
            let bottom_points = (0..n - top).map(|i| (spacing * (i + 1) as f64, below));
            top_points.chain(bottom_points).collect()
        }
    }
}

/// Rotate `point` about `center` by `degrees` (clockwise on screen, y down)
pub fn rotate_about(point: (f64, f64), center: (f64, f64), degrees: f64) -> (f64, f64) {
    let theta = degrees * PI / 180.0;
    let (sin, cos) = theta.sin_cos();
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    (
        center.0 + dx * cos - dy * sin,
        center.1 + dx * sin + dy * cos,
    )
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Smallest box containing every point, `None` when empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc: Option<Bounds>, (x, y)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow the box by `dx` horizontally and `dy` vertically on each side
    pub fn inflate(&self, dx: f64, dy: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Is `other` entirely inside this box (edges inclusive)?
    pub fn contains(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Do the boxes overlap with positive area? Touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Bounds of the element's rotated rectangle in room coordinates
pub fn element_bounds(element: &Element) -> Bounds {
    let local_center = (element.width / 2.0, element.height / 2.0);
    let corners = [
        (0.0, 0.0),
        (element.width, 0.0),
        (element.width, element.height),
        (0.0, element.height),
    ];
    let rotated = corners.into_iter().map(|corner| {
        let (x, y) = rotate_about(corner, local_center, element.rotation);
        (element.x + x, element.y + y)
    });
    Bounds::from_points(rotated)
        .unwrap_or_else(|| Bounds::new(element.x, element.y, element.width, element.height))
}

/// Element bounds extended by every seat glyph: the safety footprint
pub fn footprint_bounds(element: &Element, seat_glyph_half: f64) -> Bounds {
    let glyph = seat_glyph_half * 2.0;
    element.seats.iter().fold(element_bounds(element), |acc, seat| {
        acc.union(&Bounds::new(
            element.x + seat.left,
            element.y + seat.top,
            glyph,
            glyph,
        ))
    })
}

/// Pairs of elements whose safety footprints overlap
pub fn overlapping_pairs(elements: &[Element], seat_glyph_half: f64) -> Vec<(ElementId, ElementId)> {
    let footprints: Vec<Bounds> = elements
        .iter()
        .map(|e| footprint_bounds(e, seat_glyph_half))
        .collect();

    let mut pairs = Vec::new();
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            if footprints[i].intersects(&footprints[j]) {
                pairs.push((elements[i].id.clone(), elements[j].id.clone()));
            }
        }
    }
    pairs
}

//! Contest between two reference points
//!
//! The rivalry is defined by a pair of reference points in the current
//! plane. The connector joins them and the bisector splits the plane
//! between them; segment shares are filled in by presentation.

use crate::entity::{Entity, EntityName};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// A position in the displayed plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

impl PlanePoint {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the two rivals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Index into the configuration's points
    pub index: usize,
    pub name: String,
    pub label: String,
    pub position: PlanePoint,
}

/// Straight segment with its slope (`None` when vertical)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: PlanePoint,
    pub end: PlanePoint,
    pub slope: Option<f64>,
}

impl Line {
    #[must_use]
    pub fn through(start: PlanePoint, end: PlanePoint) -> Self {
        let dx = end.x - start.x;
        let slope = if dx.abs() < f64::EPSILON {
            None
        } else {
            Some((end.y - start.y) / dx)
        };
        Self { start, end, slope }
    }
}

/// Percent of scored respondents in each segment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentShares {
    pub base: Vec<f64>,
    pub battleground: Vec<f64>,
    pub convertible: Vec<f64>,
    pub core: Vec<f64>,
    pub first: Vec<f64>,
    pub likely: Vec<f64>,
    pub second: Vec<f64>,
}

/// Rivalry between two reference points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rivalry {
    pub rival_a: Option<ReferencePoint>,
    pub rival_b: Option<ReferencePoint>,
    pub connector: Option<Line>,
    pub bisector: Option<Line>,
    /// Respondent by segment membership
    pub segments: Table,
    pub core_radius: f64,
    pub shares: SegmentShares,
}

impl Rivalry {
    /// Set both rivals and derive the connector and bisector
    pub fn set_reference_points(&mut self, a: ReferencePoint, b: ReferencePoint) {
        self.rival_a = Some(a);
        self.rival_b = Some(b);
        self.segments = Table::default();
        self.shares = SegmentShares::default();
        self.refresh_lines();
    }

    /// Whether a contest is defined
    #[inline]
    #[must_use]
    pub fn has_reference_points(&self) -> bool {
        self.rival_a.is_some() && self.rival_b.is_some()
    }

    /// Recompute the connector and bisector from the rivals' positions
    pub fn refresh_lines(&mut self) {
        let (Some(a), Some(b)) = (&self.rival_a, &self.rival_b) else {
            self.connector = None;
            self.bisector = None;
            return;
        };
        let (pa, pb) = (a.position, b.position);
        self.connector = Some(Line::through(pa, pb));

        let mid = PlanePoint::new((pa.x + pb.x) / 2.0, (pa.y + pb.y) / 2.0);
        // perpendicular direction, same length as the connector
        let (dx, dy) = (pb.x - pa.x, pb.y - pa.y);
        self.bisector = Some(Line::through(
            PlanePoint::new(mid.x + dy, mid.y - dx),
            PlanePoint::new(mid.x - dy, mid.y + dx),
        ));
        self.core_radius = (dx * dx + dy * dy).sqrt() / 2.0;
    }
}

impl Entity for Rivalry {
    const NAME: EntityName = EntityName::Rivalry;

    fn is_empty(&self) -> bool {
        !self.has_reference_points() && self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rival(index: usize, name: &str, x: f64, y: f64) -> ReferencePoint {
        ReferencePoint {
            index,
            name: name.to_string(),
            label: name[..1].to_string(),
            position: PlanePoint::new(x, y),
        }
    }

    #[test]
    fn bisector_is_perpendicular_through_midpoint() {
        let mut rivalry = Rivalry::default();
        assert!(rivalry.is_empty());

        rivalry.set_reference_points(rival(0, "Carter", -1.0, 0.0), rival(1, "Reagan", 1.0, 0.0));
        assert!(!rivalry.is_empty());

        let connector = rivalry.connector.unwrap();
        assert_eq!(connector.slope, Some(0.0));
        let bisector = rivalry.bisector.unwrap();
        assert_eq!(bisector.slope, None);
        assert_eq!(bisector.start.x, 0.0);
        assert_eq!(rivalry.core_radius, 1.0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Branch centerlines and chainage lookup.

use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};

/// Chainages this close outside the branch snap to its ends.
const CHAINAGE_TOLERANCE: f64 = 1e-9;

/// World-space polyline of a branch.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchGeometry {
    points: Vec<Point2<f64>>,
    /// Distance from the start to each point
    cumulative: Vec<f64>,
}

/// A point on a branch together with the local flow direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLocation {
    pub point: Point2<f64>,
    /// Unit direction of the segment containing the point
    pub direction: Vector2<f64>,
}

impl BranchLocation {
    /// Unit normal pointing to the left of the flow direction.
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(-self.direction.y, self.direction.x)
    }
}

impl BranchGeometry {
    pub fn new(points: Vec<Point2<f64>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidBranch(format!(
                "a branch needs at least two points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::InvalidBranch(
                "coordinates must be finite".to_string(),
            ));
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut length = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            length += (pair[1] - pair[0]).norm();
            cumulative.push(length);
        }
        if length <= 0.0 {
            return Err(Error::InvalidBranch("branch has zero length".to_string()));
        }

        Ok(Self { points, cumulative })
    }

    /// Straight branch between two points.
    pub fn straight(from: Point2<f64>, to: Point2<f64>) -> Result<Self> {
        Self::new(vec![from, to])
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point and direction at `chainage` along the branch. The end point
    /// takes the direction of the last segment.
    pub fn locate(&self, chainage: f64) -> Result<BranchLocation> {
        let length = self.length();
        if !chainage.is_finite()
            || chainage < -CHAINAGE_TOLERANCE
            || chainage > length + CHAINAGE_TOLERANCE
        {
            return Err(Error::ChainageOutOfRange { chainage, length });
        }
        let chainage = chainage.clamp(0.0, length);

        // first segment whose end lies at or beyond the chainage, skipping
        // zero-length segments
        let segment = (1..self.points.len())
            .find(|&i| self.cumulative[i] >= chainage && self.cumulative[i] > self.cumulative[i - 1])
            .unwrap_or(self.points.len() - 1);

        let start = self.points[segment - 1];
        let end = self.points[segment];
        let seg_length = self.cumulative[segment] - self.cumulative[segment - 1];
        let along = chainage - self.cumulative[segment - 1];
        let delta = end - start;

        Ok(BranchLocation {
            point: start + delta * (along / seg_length),
            direction: delta / seg_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn l_shaped() -> BranchGeometry {
        BranchGeometry::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 50.0),
        ])
        .unwrap()
    }

    #[test]
    fn length_and_locate() {
        let branch = l_shaped();
        assert_relative_eq!(branch.length(), 150.0);

        let loc = branch.locate(120.0).unwrap();
        assert_relative_eq!(loc.point.x, 100.0);
        assert_relative_eq!(loc.point.y, 20.0);
        assert_relative_eq!(loc.direction.y, 1.0);
        assert_relative_eq!(loc.normal().x, -1.0);
    }

    #[test]
    fn end_points_use_adjacent_segment() {
        let branch = l_shaped();
        let start = branch.locate(0.0).unwrap();
        assert_relative_eq!(start.direction.x, 1.0);
        let end = branch.locate(150.0).unwrap();
        assert_relative_eq!(end.point.y, 50.0);
        assert_relative_eq!(end.direction.y, 1.0);
    }

    #[test]
    fn repeated_points_are_skipped() {
        let branch = BranchGeometry::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
        ])
        .unwrap();
        let loc = branch.locate(0.0).unwrap();
        assert_relative_eq!(loc.direction.x, 1.0);
    }

    #[test]
    fn invalid_input() {
        assert!(BranchGeometry::new(vec![Point2::new(0.0, 0.0)]).is_err());
        assert!(BranchGeometry::straight(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)).is_err());
        assert!(matches!(
            l_shaped().locate(151.0),
            Err(Error::ChainageOutOfRange { .. })
        ));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placing profiles on a branch.
//!
//! A cross-section line runs perpendicular to the branch through the point
//! at its chainage. The profile offset equal to the thalweg lands on the
//! branch; offsets below it lie to the left of the flow direction, offsets
//! above it to the right.

use nalgebra::{Point2, Point3};
use xsection_core::ProfilePoint;

use crate::branch::BranchGeometry;
use crate::error::{Error, Result};

/// World-space 3-D line of `profile` at `chainage`; Z is the elevation.
pub fn project_profile(
    branch: &BranchGeometry,
    chainage: f64,
    profile: &[ProfilePoint],
    thalweg: f64,
) -> Result<Vec<Point3<f64>>> {
    let first = profile.first().ok_or(Error::EmptyProfile)?;
    let location = branch.locate(chainage)?;
    let normal = location.normal();
    let thalweg_offset = thalweg - first.offset;

    Ok(profile
        .iter()
        .map(|p| {
            let along = thalweg_offset - (p.offset - first.offset);
            let xy = location.point + normal * along;
            Point3::new(xy.x, xy.y, p.elevation)
        })
        .collect())
}

/// Straight 2-point line perpendicular to the branch, spanning profile
/// offsets `min_y..max_y`.
pub fn perpendicular_line(
    branch: &BranchGeometry,
    chainage: f64,
    min_y: f64,
    max_y: f64,
    thalweg: f64,
) -> Result<[Point2<f64>; 2]> {
    let location = branch.locate(chainage)?;
    let normal = location.normal();
    Ok([
        location.point + normal * (thalweg - min_y),
        location.point + normal * (thalweg - max_y),
    ])
}

/// Limits `thalweg` to the offset range of `profile`.
pub fn clamp_thalweg(profile: &[ProfilePoint], thalweg: f64) -> f64 {
    match xsection_core::point::offset_range(profile) {
        Some((min, max)) => thalweg.clamp(min, max),
        None => thalweg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn east() -> BranchGeometry {
        BranchGeometry::straight(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)).unwrap()
    }

    #[test]
    fn thalweg_lands_on_branch() {
        let profile = vec![
            ProfilePoint::new(0.0, 5.0),
            ProfilePoint::new(10.0, 0.0),
            ProfilePoint::new(20.0, 5.0),
        ];
        let line = project_profile(&east(), 40.0, &profile, 10.0).unwrap();
        assert_eq!(line.len(), 3);
        assert_relative_eq!(line[1].x, 40.0);
        assert_relative_eq!(line[1].y, 0.0);
        assert_relative_eq!(line[1].z, 0.0);
        // left bank to the north of an eastward branch
        assert_relative_eq!(line[0].y, 10.0);
        assert_relative_eq!(line[2].y, -10.0);
        assert_relative_eq!(line[2].z, 5.0);
    }

    #[test]
    fn symmetric_profile_centred_on_zero() {
        let profile = vec![ProfilePoint::new(-25.0, 2.0), ProfilePoint::new(25.0, 2.0)];
        let line = project_profile(&east(), 0.0, &profile, 0.0).unwrap();
        assert_relative_eq!(line[0].y, 25.0);
        assert_relative_eq!(line[1].y, -25.0);
    }

    #[test]
    fn perpendicular_default_line() {
        let [a, b] = perpendicular_line(&east(), 50.0, 0.0, 100.0, 50.0).unwrap();
        assert_relative_eq!(a.x, 50.0);
        assert_relative_eq!(a.y, 50.0);
        assert_relative_eq!(b.y, -50.0);
    }

    #[test]
    fn empty_profile_is_an_error() {
        assert_eq!(
            project_profile(&east(), 0.0, &[], 0.0),
            Err(Error::EmptyProfile)
        );
    }

    #[test]
    fn thalweg_clamping() {
        let profile = vec![ProfilePoint::new(-5.0, 0.0), ProfilePoint::new(5.0, 0.0)];
        assert_eq!(clamp_thalweg(&profile, 9.0), 5.0);
        assert_eq!(clamp_thalweg(&profile, -9.0), -5.0);
        assert_eq!(clamp_thalweg(&profile, 1.0), 1.0);
        assert_eq!(clamp_thalweg(&[], 3.0), 3.0);
    }
}

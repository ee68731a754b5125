// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use nalgebra::{Point2, Point3};
use proptest::prelude::*;
use xsection_core::{CrossSectionDefinition, YzDefinition, ZwDefinition};
use xsection_geometry::{profile_from_polyline, project_profile, BranchGeometry};

fn diagonal_branch() -> BranchGeometry {
    BranchGeometry::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(30.0, 40.0),
        Point2::new(60.0, 40.0),
    ])
    .unwrap()
}

#[test]
fn projected_yz_profile_keeps_its_shape() {
    let def = YzDefinition::create_default("yz", 90.0);
    let profile = def.profile();
    let line = project_profile(&diagonal_branch(), 25.0, &profile, def.thalweg()).unwrap();

    // the projected line measured back along its own length is the profile
    let back = profile_from_polyline(&line);
    for (p, q) in profile.iter().zip(&back) {
        assert_relative_eq!(p.offset, q.offset, epsilon = 1e-9);
        assert_relative_eq!(p.elevation, q.elevation);
    }

    // thalweg (offset 45) sits on the branch at chainage 25, i.e. (15, 20)
    let mid = Point3::new(15.0, 20.0, 0.0);
    let first = line[0];
    let last = line[line.len() - 1];
    assert_relative_eq!((first.xy() - mid.xy()).norm(), 45.0, epsilon = 1e-9);
    assert_relative_eq!((last.xy() - mid.xy()).norm(), 45.0, epsilon = 1e-9);
}

#[test]
fn zw_profile_is_centred_on_branch() {
    let def = ZwDefinition::create_default("zw", 100.0);
    let line = project_profile(&diagonal_branch(), 50.0, &def.profile(), def.thalweg()).unwrap();
    // chainage 50 is the corner (30, 40); the incoming segment's direction applies
    let first = line.first().unwrap();
    let last = line.last().unwrap();
    assert_relative_eq!((first.x + last.x) / 2.0, 30.0, epsilon = 1e-9);
    assert_relative_eq!((first.y + last.y) / 2.0, 40.0, epsilon = 1e-9);
}

proptest! {
    #[test]
    fn projection_is_perpendicular_to_branch(
        chainage in 0.0..80.0f64,
        offsets in prop::collection::vec(0.0..50.0f64, 2..10),
        thalweg in 0.0..50.0f64,
    ) {
        let branch = diagonal_branch();
        let mut offsets = offsets;
        offsets.sort_by(f64::total_cmp);
        let profile: Vec<_> = offsets
            .iter()
            .map(|&o| xsection_core::ProfilePoint::new(o, 0.0))
            .collect();

        let line = project_profile(&branch, chainage, &profile, thalweg).unwrap();
        let location = branch.locate(chainage).unwrap();
        for point in &line {
            let v = point.xy() - location.point;
            prop_assert!(v.dot(&location.direction).abs() < 1e-9);
        }
    }
}

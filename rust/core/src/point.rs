// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile points and helpers that work on whole profiles.

use nalgebra::{Point2, Point3};

/// One point of a transverse profile: lateral offset and bed elevation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfilePoint {
    pub offset: f64,
    pub elevation: f64,
}

impl ProfilePoint {
    #[inline]
    pub const fn new(offset: f64, elevation: f64) -> Self {
        Self { offset, elevation }
    }

    /// Same offset, elevation raised by `delta`
    #[inline]
    pub fn shifted(self, delta: f64) -> Self {
        Self {
            offset: self.offset,
            elevation: self.elevation + delta,
        }
    }
}

impl From<(f64, f64)> for ProfilePoint {
    fn from((offset, elevation): (f64, f64)) -> Self {
        Self::new(offset, elevation)
    }
}

impl From<ProfilePoint> for Point2<f64> {
    fn from(p: ProfilePoint) -> Self {
        Point2::new(p.offset, p.elevation)
    }
}

/// Adds `delta` to every elevation in place.
pub fn shift_profile(profile: &mut [ProfilePoint], delta: f64) {
    for p in profile.iter_mut() {
        p.elevation += delta;
    }
}

/// `max(offset) - min(offset)`, zero for an empty profile.
pub fn profile_width(profile: &[ProfilePoint]) -> f64 {
    offset_range(profile).map_or(0.0, |(min, max)| max - min)
}

/// Smallest and largest offset
pub fn offset_range(profile: &[ProfilePoint]) -> Option<(f64, f64)> {
    range_of(profile.iter().map(|p| p.offset))
}

/// Lowest and highest elevation
pub fn elevation_range(profile: &[ProfilePoint]) -> Option<(f64, f64)> {
    range_of(profile.iter().map(|p| p.elevation))
}

fn range_of(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Offsets along a 3-D polyline: cumulative distance in the horizontal
/// plane, paired with each vertex's Z.
pub fn profile_from_polyline(vertices: &[Point3<f64>]) -> Vec<ProfilePoint> {
    let mut profile = Vec::with_capacity(vertices.len());
    let mut offset = 0.0;
    for (i, v) in vertices.iter().enumerate() {
        if i > 0 {
            let prev = &vertices[i - 1];
            offset += (v.x - prev.x).hypot(v.y - prev.y);
        }
        profile.push(ProfilePoint::new(offset, v.z));
    }
    profile
}

/// Area enclosed between a bed profile and the flow profile above it.
///
/// The ring is the bed profile followed by the reversed flow profile; the
/// area is the absolute shoelace sum of that ring.
pub fn storage_area(bottom: &[ProfilePoint], flow: &[ProfilePoint]) -> f64 {
    if bottom.len() < 2 {
        return 0.0;
    }

    let ring: Vec<ProfilePoint> = bottom.iter().chain(flow.iter().rev()).copied().collect();
    let mut twice_area = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        twice_area += a.offset * b.elevation - b.offset * a.elevation;
    }
    (twice_area / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn width_of_empty_profile_is_zero() {
        assert_eq!(profile_width(&[]), 0.0);
        assert!(elevation_range(&[]).is_none());
    }

    #[test]
    fn width_and_elevations() {
        let profile = vec![
            ProfilePoint::new(-20.0, 4.0),
            ProfilePoint::new(0.0, -2.0),
            ProfilePoint::new(30.0, 5.0),
        ];
        assert_relative_eq!(profile_width(&profile), 50.0);
        assert_eq!(elevation_range(&profile), Some((-2.0, 5.0)));
    }

    #[test]
    fn polyline_offsets_ignore_z() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(3.0, 4.0, -100.0),
            Point3::new(3.0, 10.0, 1.0),
        ];
        let profile = profile_from_polyline(&vertices);
        assert_relative_eq!(profile[1].offset, 5.0);
        assert_relative_eq!(profile[2].offset, 11.0);
        assert_relative_eq!(profile[1].elevation, -100.0);
    }

    #[test]
    fn storage_area_of_raised_floor() {
        // 10 m wide, floor raised by 2 m over its full width
        let bottom = vec![ProfilePoint::new(0.0, 0.0), ProfilePoint::new(10.0, 0.0)];
        let flow = vec![ProfilePoint::new(0.0, 2.0), ProfilePoint::new(10.0, 2.0)];
        assert_relative_eq!(storage_area(&bottom, &flow), 20.0);
    }

    #[test]
    fn shifting_profile() {
        let mut profile = vec![ProfilePoint::new(1.0, 1.0), ProfilePoint::new(2.0, 3.0)];
        shift_profile(&mut profile, -1.5);
        assert_eq!(profile[0], ProfilePoint::new(1.0, -0.5));
        assert_eq!(profile[1], ProfilePoint::new(2.0, 1.5));
    }
}

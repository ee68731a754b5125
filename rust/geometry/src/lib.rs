// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # XSection Geometry
//!
//! Turns 1-D cross-section profiles into world-space lines.
//!
//! - [`BranchGeometry`]: branch centerline with chainage lookup
//! - [`project_profile`]: profile + branch + chainage to a 3-D line
//! - [`perpendicular_line`]: default 2-point line across the branch
//! - [`profile_from_polyline`] / [`storage_area`]: helpers shared with the
//!   surveyed (XYZ) representation

pub mod branch;
pub mod error;
pub mod projector;

pub use branch::{BranchGeometry, BranchLocation};
pub use error::{Error, Result};
pub use projector::{clamp_thalweg, perpendicular_line, project_profile};
pub use xsection_core::point::{profile_from_polyline, storage_area};

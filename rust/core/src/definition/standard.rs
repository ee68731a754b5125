// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parametric standard shapes (culverts, sewers, trapezoidal channels).
//!
//! A standard definition stores only the shape parameters and a level
//! shift. Its profile is derived on every read by tabulating the shape into
//! level/width rows, the same representation a [`ZwDefinition`] uses.

use std::f64::consts::PI;

use smallvec::SmallVec;

use super::{CrossSectionDefinition, DefinitionHeader, ZwDefinition, ZwRow};
use crate::error::{ensure_finite, DataError, Result};
use crate::point::ProfilePoint;
use crate::section::{Section, SectionType};

/// Dimensions below this are treated as degenerate.
const MIN_DIMENSION: f64 = 1.0e-6;

/// Smallest width or height a rectangle is tabulated with.
const MIN_RECTANGLE_SIDE: f64 = 0.001;

/// Quarter-ellipse resolution used by the round shapes.
const ELLIPSE_STEPS: usize = 10;

/// Parametric cross-section shapes. All dimensions in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardShape {
    Rectangle { width: f64, height: f64, closed: bool },
    /// Open channel; `slope` is the horizontal run per unit rise of a bank.
    Trapezium {
        slope: f64,
        bottom_width: f64,
        top_width: f64,
    },
    Circle { diameter: f64 },
    Elliptical { width: f64, height: f64 },
    /// Egg profile, pointed end down. Height is 1.5 times the width.
    Egg { width: f64 },
    /// Egg profile, pointed end up.
    InvertedEgg { width: f64 },
    Arch { width: f64, height: f64, arch_height: f64 },
    UShape { width: f64, height: f64, arch_height: f64 },
}

impl StandardShape {
    pub fn name(&self) -> &'static str {
        match self {
            StandardShape::Rectangle { .. } => "Rectangle",
            StandardShape::Trapezium { .. } => "Trapezium",
            StandardShape::Circle { .. } => "Round",
            StandardShape::Elliptical { .. } => "Elliptical",
            StandardShape::Egg { .. } => "Egg",
            StandardShape::InvertedEgg { .. } => "InvertedEgg",
            StandardShape::Arch { .. } => "Arch",
            StandardShape::UShape { .. } => "UShape",
        }
    }

    /// Whether the shape has a roof. Only closed shapes may sit on
    /// enclosed branches (culverts, sewers).
    pub fn is_closed(&self) -> bool {
        !matches!(self, StandardShape::Trapezium { .. })
    }

    fn dimensions(&self) -> SmallVec<[f64; 3]> {
        match *self {
            StandardShape::Rectangle { width, height, .. } => SmallVec::from_slice(&[width, height]),
            StandardShape::Trapezium {
                slope,
                bottom_width,
                top_width,
            } => SmallVec::from_slice(&[slope, bottom_width, top_width]),
            StandardShape::Circle { diameter } => SmallVec::from_slice(&[diameter]),
            StandardShape::Elliptical { width, height } => SmallVec::from_slice(&[width, height]),
            StandardShape::Egg { width } | StandardShape::InvertedEgg { width } => {
                SmallVec::from_slice(&[width])
            }
            StandardShape::Arch {
                width,
                height,
                arch_height,
            }
            | StandardShape::UShape {
                width,
                height,
                arch_height,
            } => SmallVec::from_slice(&[width, height, arch_height]),
        }
    }

    /// Rejects non-finite and negative parameters.
    pub fn validate(&self) -> Result<()> {
        for value in self.dimensions() {
            if ensure_finite(value)? < 0.0 {
                return Err(DataError::NegativeWidth.into());
            }
        }
        Ok(())
    }

    /// Level/width rows with the bed at level 0, highest level first and
    /// without repeated levels.
    pub fn rows(&self) -> Vec<ZwRow> {
        let mut rows = match *self {
            StandardShape::Rectangle {
                width,
                height,
                closed,
            } => rectangle(width, height, closed),
            StandardShape::Trapezium {
                slope,
                bottom_width,
                top_width,
            } => trapezium(slope, bottom_width, top_width),
            StandardShape::Circle { diameter } => ellipse(diameter, diameter),
            StandardShape::Elliptical { width, height } => ellipse(width, height),
            StandardShape::Egg { width } => egg(width, false),
            StandardShape::InvertedEgg { width } => egg(width, true),
            StandardShape::Arch {
                width,
                height,
                arch_height,
            } => arch(width, height, arch_height, false),
            StandardShape::UShape {
                width,
                height,
                arch_height,
            } => arch(width, height, arch_height, true),
        };

        rows.sort_by(|a, b| b.level.total_cmp(&a.level));
        rows.dedup_by(|later, earlier| later.level == earlier.level);
        rows
    }
}

fn row(level: f64, width: f64) -> ZwRow {
    ZwRow::new(level, width.max(0.0), 0.0)
}

fn rectangle(width: f64, height: f64, closed: bool) -> Vec<ZwRow> {
    let width = width.max(MIN_RECTANGLE_SIDE);
    let height = height.max(MIN_RECTANGLE_SIDE);
    let mut rows = vec![row(0.0, width), row(height, width)];
    if closed {
        rows.push(row(height + MIN_DIMENSION, 0.0));
    }
    rows
}

fn trapezium(slope: f64, bottom_width: f64, top_width: f64) -> Vec<ZwRow> {
    let mut height = if slope > 0.0 {
        (top_width - bottom_width) / (2.0 * slope)
    } else {
        0.0
    };
    if height == 0.0 {
        height = MIN_DIMENSION;
    }
    vec![row(0.0, bottom_width), row(height, top_width)]
}

/// Right upper quarter of an ellipse, top down: `(half width, height above
/// centre)` at evenly spaced angles from the vertical.
fn quarter_ellipse(width: f64, height: f64) -> SmallVec<[(f64, f64); ELLIPSE_STEPS]> {
    let half_width = width / 2.0;
    (0..ELLIPSE_STEPS)
        .map(|i| {
            let theta = (i as f64 * 90.0 / ELLIPSE_STEPS as f64) * PI / 180.0;
            let y = theta.sin() * half_width;
            let z = ((1.0 - (y * y) / (half_width * half_width)) * (height * height / 4.0))
                .max(0.0)
                .sqrt();
            (y, z)
        })
        .collect()
}

fn ellipse(width: f64, height: f64) -> Vec<ZwRow> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return rectangle(width, height, false);
    }
    let coords = quarter_ellipse(width, height);
    let centre = coords[0].1;

    let mut rows = Vec::with_capacity(ELLIPSE_STEPS * 2 + 1);
    rows.extend(coords.iter().map(|&(y, z)| row(centre - z, 2.0 * y)));
    rows.push(row(centre, width));
    rows.extend(coords.iter().rev().map(|&(y, z)| row(centre + z, 2.0 * y)));
    rows
}

/// Egg shapes combine two half ellipses of the same width: one of height
/// `width` and one of height `width / 2`. `inverted` puts the tall half on top.
fn egg(width: f64, inverted: bool) -> Vec<ZwRow> {
    let height = 1.5 * width;
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return rectangle(width, height, false);
    }
    let coords = quarter_ellipse(width, width);
    let radius = coords[0].1;
    let (lower, upper) = if inverted { (1.0, 2.0) } else { (2.0, 1.0) };
    // Both orientations put the bed at level 0, the inverted egg included,
    // so a level shift means the same thing for every shape.
    let widest = lower * radius;

    let mut rows = Vec::with_capacity(ELLIPSE_STEPS * 2 + 1);
    rows.extend(coords.iter().map(|&(y, z)| row(widest - lower * z, 2.0 * y)));
    rows.push(row(widest, width));
    rows.extend(coords.iter().rev().map(|&(y, z)| row(widest + upper * z, 2.0 * y)));
    rows
}

/// Rectangle with an elliptic roof (`Arch`) or an elliptic floor (`UShape`).
fn arch(width: f64, height: f64, arch_height: f64, upside_down: bool) -> Vec<ZwRow> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION || arch_height < MIN_DIMENSION {
        return rectangle(width, height, false);
    }
    let arch_height = if arch_height >= height {
        height - MIN_DIMENSION
    } else {
        arch_height
    };

    let step = arch_height / 2.0 - (54.0 * PI / 180.0).sin() * arch_height / 2.0;
    let count = (arch_height / step + 1.0) as usize;
    let springing = height - arch_height;

    let mut rows = Vec::with_capacity(count + 2);
    rows.push(row(if upside_down { height } else { 0.0 }, width));
    for i in 0..count {
        let rise = i as f64 * step;
        let ratio = rise / arch_height;
        let chord = 2.0 * ((1.0 - ratio * ratio).max(0.0) * width * width / 4.0).sqrt();
        let level = if upside_down {
            arch_height - rise
        } else {
            springing + rise
        };
        rows.push(row(level, chord));
    }
    rows.push(row(if upside_down { 0.0 } else { height }, 0.0));
    rows
}

/// A standard shape definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardDefinition {
    header: DefinitionHeader,
    shape: StandardShape,
    level_shift: f64,
}

impl StandardDefinition {
    pub fn new(name: impl Into<String>, shape: StandardShape) -> Result<Self> {
        shape.validate()?;
        Ok(Self {
            header: DefinitionHeader::new(name),
            shape,
            level_shift: 0.0,
        })
    }

    /// Open 1 x 1 m rectangle.
    pub fn create_default(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            shape: StandardShape::Rectangle {
                width: 1.0,
                height: 1.0,
                closed: false,
            },
            level_shift: 0.0,
        }
    }

    pub fn shape(&self) -> &StandardShape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: StandardShape) -> Result<()> {
        shape.validate()?;
        self.shape = shape;
        Ok(())
    }

    pub fn level_shift(&self) -> f64 {
        self.level_shift
    }

    pub fn set_level_shift(&mut self, level_shift: f64) -> Result<()> {
        self.level_shift = ensure_finite(level_shift)?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.shape.is_closed()
    }

    /// Culverts and sewers need a roof; open channel shapes stay on open
    /// branches.
    pub fn allowed_on_enclosed_branch(&self) -> bool {
        self.is_closed()
    }

    /// Shape tabulated as level/width rows, raised by the level shift.
    pub fn tabulated(&self) -> Result<ZwDefinition> {
        let shift = self.level_shift;
        ZwDefinition::from_rows(
            self.header.name.clone(),
            self.shape
                .rows()
                .into_iter()
                .map(|r| ZwRow::new(r.level + shift, r.total_width, r.storage_width)),
        )
    }

    /// Standalone ZW definition with the same profile. Keeps the type of the
    /// first section (a main section otherwise) spanning the whole width.
    pub fn to_zw(&self) -> Result<ZwDefinition> {
        let mut zw = self.tabulated()?;
        zw.set_thalweg(self.header.thalweg);
        let section_type = self
            .header
            .sections
            .first()
            .map(|s| s.section_type.clone())
            .unwrap_or_else(SectionType::main);
        let half = zw.width() / 2.0;
        zw.header_mut().sections = vec![Section::new(section_type, 0.0, half)];
        Ok(zw)
    }
}

impl CrossSectionDefinition for StandardDefinition {
    fn header(&self) -> &DefinitionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DefinitionHeader {
        &mut self.header
    }

    fn profile(&self) -> Vec<ProfilePoint> {
        self.tabulated().map(|t| t.profile()).unwrap_or_default()
    }

    fn flow_profile(&self) -> Vec<ProfilePoint> {
        self.tabulated().map(|t| t.flow_profile()).unwrap_or_default()
    }

    fn shift_level(&mut self, delta: f64) -> Result<()> {
        self.level_shift += ensure_finite(delta)?;
        Ok(())
    }
}

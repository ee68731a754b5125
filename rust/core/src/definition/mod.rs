// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-section definitions.
//!
//! Four representations share one contract, [`CrossSectionDefinition`]:
//!
//! - [`YzDefinition`]: tabulated offset/elevation rows
//! - [`ZwDefinition`]: tabulated level/width rows, symmetric around offset 0
//! - [`XyzDefinition`]: surveyed 3-D points
//! - [`StandardDefinition`]: parametric shape plus a level shift
//!
//! [`Definition`] is the closed sum of the four. Mutators specific to one
//! representation are only reachable on that variant.

mod standard;
mod xyz;
mod yz;
mod zw;

pub use standard::{StandardDefinition, StandardShape};
pub use xyz::{XyzColumn, XyzDefinition};
pub use yz::{YzColumn, YzDefinition, YzRow};
pub use zw::{ZwColumn, ZwDefinition, ZwRow};

use std::fmt;

use tracing::{info, warn};

use crate::config::{Settings, DEFAULT_WIDTH_TOLERANCE};
use crate::error::Result;
use crate::point::{self, ProfilePoint};
use crate::reconcile::reconcile_sections;
use crate::section::{
    Section, SectionBounds, SectionRejection, SectionType, SectionWidthChange,
    MAIN_SECTION_TYPE_NAME,
};

/// Data every definition carries regardless of representation.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinitionHeader {
    pub name: String,
    /// Offset aligned with the branch centerline when projecting to world space.
    pub thalweg: f64,
    pub sections: Vec<Section>,
}

impl DefinitionHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thalweg: 0.0,
            sections: Vec::new(),
        }
    }
}

/// Shared contract of all cross-section definition representations.
pub trait CrossSectionDefinition {
    fn header(&self) -> &DefinitionHeader;

    fn header_mut(&mut self) -> &mut DefinitionHeader;

    /// Bed profile, ordered by offset.
    fn profile(&self) -> Vec<ProfilePoint>;

    /// Profile restricted to conveying geometry (storage excluded).
    fn flow_profile(&self) -> Vec<ProfilePoint>;

    /// Adds `delta` to every elevation of the native representation.
    fn shift_level(&mut self, delta: f64) -> Result<()>;

    /// Offset range the sections should cover.
    fn section_bounds(&self) -> SectionBounds {
        SectionBounds::new(0.0, self.width())
    }

    /// Multiplier from a section's offset range to the width it represents.
    fn section_width_factor(&self) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        &self.header().name
    }

    fn set_name(&mut self, name: impl Into<String>)
    where
        Self: Sized,
    {
        self.header_mut().name = name.into();
    }

    fn thalweg(&self) -> f64 {
        self.header().thalweg
    }

    fn set_thalweg(&mut self, thalweg: f64) {
        self.header_mut().thalweg = thalweg;
    }

    fn sections(&self) -> &[Section] {
        &self.header().sections
    }

    fn width(&self) -> f64 {
        point::profile_width(&self.profile())
    }

    fn flow_width(&self) -> f64 {
        point::profile_width(&self.flow_profile())
    }

    fn lowest_point(&self) -> Option<f64> {
        point::elevation_range(&self.profile()).map(|(lo, _)| lo)
    }

    fn highest_point(&self) -> Option<f64> {
        point::elevation_range(&self.profile()).map(|(_, hi)| hi)
    }

    /// Area between the bed profile and the flow profile.
    fn storage_area(&self) -> f64 {
        point::storage_area(&self.profile(), &self.flow_profile())
    }

    /// Sum of section widths in definition units.
    fn sections_total_width(&self) -> f64 {
        let factor = self.section_width_factor();
        self.sections().iter().map(|s| s.width() * factor).sum()
    }

    /// Appends a section of `width` after the existing ones.
    ///
    /// Negative widths and duplicate type names are refused; the refusal is
    /// logged and returned, the section list stays unchanged.
    fn add_section(
        &mut self,
        section_type: SectionType,
        width: f64,
    ) -> std::result::Result<&Section, SectionRejection> {
        if width < 0.0 {
            let rejection = SectionRejection::NegativeWidth {
                width,
                definition: self.name().to_string(),
            };
            warn!("{}", rejection);
            return Err(rejection);
        }
        if self
            .sections()
            .iter()
            .any(|s| s.is_named(&section_type.name))
        {
            let rejection = SectionRejection::DuplicateName {
                name: section_type.name,
            };
            warn!("{}", rejection);
            return Err(rejection);
        }

        let start = self
            .sections()
            .iter()
            .map(|s| s.max_offset)
            .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))
            .unwrap_or_else(|| self.section_bounds().min);
        let range = width / self.section_width_factor();

        let sections = &mut self.header_mut().sections;
        sections.push(Section::new(section_type, start, start + range));
        let last = sections.len() - 1;
        Ok(&sections[last])
    }

    /// Reconciles sections with the default main section name and tolerance.
    fn adjust_section_widths(&mut self) -> Option<SectionWidthChange> {
        self.adjust_section_widths_with(MAIN_SECTION_TYPE_NAME, DEFAULT_WIDTH_TOLERANCE)
    }

    /// Refits the sections to the current section bounds.
    fn adjust_section_widths_with(
        &mut self,
        main_section_name: &str,
        tolerance: f64,
    ) -> Option<SectionWidthChange> {
        let bounds = self.section_bounds();
        let factor = self.section_width_factor();
        let header = self.header_mut();
        let resize = reconcile_sections(
            &mut header.sections,
            bounds,
            factor,
            main_section_name,
            tolerance,
        )?;

        let change = SectionWidthChange {
            section_type: header.sections[resize.index].section_type.name.clone(),
            definition: header.name.clone(),
            old_width: resize.old_width,
            new_width: resize.new_width,
        };
        info!("{}", change);
        Some(change)
    }
}

/// Discriminant of [`Definition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionKind {
    Yz,
    Zw,
    Xyz,
    Standard,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Yz => "YZ",
            DefinitionKind::Zw => "ZW",
            DefinitionKind::Xyz => "XYZ",
            DefinitionKind::Standard => "Standard",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cross-section definition in one of its four representations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Definition {
    Yz(YzDefinition),
    Zw(ZwDefinition),
    Xyz(XyzDefinition),
    Standard(StandardDefinition),
}

macro_rules! dispatch {
    ($self:expr, $def:ident => $body:expr) => {
        match $self {
            Definition::Yz($def) => $body,
            Definition::Zw($def) => $body,
            Definition::Xyz($def) => $body,
            Definition::Standard($def) => $body,
        }
    };
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Yz(_) => DefinitionKind::Yz,
            Definition::Zw(_) => DefinitionKind::Zw,
            Definition::Xyz(_) => DefinitionKind::Xyz,
            Definition::Standard(_) => DefinitionKind::Standard,
        }
    }

    /// Whether the definition may live in a shared pool. Surveyed XYZ
    /// geometry only makes sense at the location it was measured.
    pub fn is_shareable(&self) -> bool {
        !matches!(self, Definition::Xyz(_))
    }

    /// Independent copy whose profile is raised by `delta`.
    ///
    /// Standard shapes fold the shift into their own level shift; tabulated
    /// variants get the shift baked into their rows.
    pub fn with_level_shift(&self, delta: f64) -> Result<Definition> {
        let mut clone = self.clone();
        if delta != 0.0 {
            clone.shift_level(delta)?;
        }
        Ok(clone)
    }

    /// Number of native rows (profile points for standard shapes).
    pub fn row_count(&self) -> usize {
        match self {
            Definition::Yz(d) => d.rows().len(),
            Definition::Zw(d) => d.rows().len(),
            Definition::Xyz(d) => d.vertices().len(),
            Definition::Standard(d) => d.profile().len(),
        }
    }

    /// Removes a native row. XYZ rows follow the geometry and standard
    /// shapes have no rows, so both refuse.
    pub fn remove_row(&mut self, index: usize) -> Result<()> {
        match self {
            Definition::Yz(d) => d.remove_row(index).map(|_| ()),
            Definition::Zw(d) => d.remove_row(index).map(|_| ()),
            Definition::Xyz(_) => Err(crate::Error::invalid_operation(
                "rows of an XYZ definition follow its geometry and cannot be removed",
            )),
            Definition::Standard(_) => Err(crate::Error::invalid_operation(
                "a standard shape definition has no editable rows",
            )),
        }
    }

    /// Places the thalweg in the middle of the profile.
    pub fn set_default_thalweg(&mut self) {
        let mid = point::offset_range(&self.profile()).map_or(0.0, |(lo, hi)| (lo + hi) / 2.0);
        self.set_thalweg(mid);
    }

    /// Keeps the thalweg inside the profile's offset range.
    pub fn clamp_thalweg(&mut self) {
        if let Some((lo, hi)) = point::offset_range(&self.profile()) {
            let t = self.thalweg();
            self.set_thalweg(t.clamp(lo, hi));
        }
    }

    pub fn as_yz(&self) -> Option<&YzDefinition> {
        match self {
            Definition::Yz(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_zw(&self) -> Option<&ZwDefinition> {
        match self {
            Definition::Zw(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_xyz(&self) -> Option<&XyzDefinition> {
        match self {
            Definition::Xyz(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_standard(&self) -> Option<&StandardDefinition> {
        match self {
            Definition::Standard(d) => Some(d),
            _ => None,
        }
    }
}

impl CrossSectionDefinition for Definition {
    fn header(&self) -> &DefinitionHeader {
        dispatch!(self, d => d.header())
    }

    fn header_mut(&mut self) -> &mut DefinitionHeader {
        dispatch!(self, d => d.header_mut())
    }

    fn profile(&self) -> Vec<ProfilePoint> {
        dispatch!(self, d => d.profile())
    }

    fn flow_profile(&self) -> Vec<ProfilePoint> {
        dispatch!(self, d => d.flow_profile())
    }

    fn shift_level(&mut self, delta: f64) -> Result<()> {
        dispatch!(self, d => d.shift_level(delta))
    }

    fn section_bounds(&self) -> SectionBounds {
        dispatch!(self, d => d.section_bounds())
    }

    fn section_width_factor(&self) -> f64 {
        dispatch!(self, d => d.section_width_factor())
    }

    fn width(&self) -> f64 {
        dispatch!(self, d => d.width())
    }

    fn flow_width(&self) -> f64 {
        dispatch!(self, d => d.flow_width())
    }
}

impl From<YzDefinition> for Definition {
    fn from(d: YzDefinition) -> Self {
        Definition::Yz(d)
    }
}

impl From<ZwDefinition> for Definition {
    fn from(d: ZwDefinition) -> Self {
        Definition::Zw(d)
    }
}

impl From<XyzDefinition> for Definition {
    fn from(d: XyzDefinition) -> Self {
        Definition::Xyz(d)
    }
}

impl From<StandardDefinition> for Definition {
    fn from(d: StandardDefinition) -> Self {
        Definition::Standard(d)
    }
}

/// Creates the default definition for a representation, using the
/// configured default width. XYZ has no default and yields `None`.
pub fn create_default(kind: DefinitionKind, name: &str, settings: &Settings) -> Option<Definition> {
    match kind {
        DefinitionKind::Yz => Some(YzDefinition::create_default(name, settings.default_width).into()),
        DefinitionKind::Zw => Some(ZwDefinition::create_default(name, settings.default_width).into()),
        DefinitionKind::Standard => Some(StandardDefinition::create_default(name).into()),
        DefinitionKind::Xyz => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kinds_and_sharing() {
        let yz: Definition = YzDefinition::create_default("yz", 100.0).into();
        let xyz: Definition = XyzDefinition::new("xyz").into();
        assert_eq!(yz.kind(), DefinitionKind::Yz);
        assert_eq!(xyz.kind().to_string(), "XYZ");
        assert!(yz.is_shareable());
        assert!(!xyz.is_shareable());
    }

    #[test]
    fn localized_clone_is_independent() {
        let original: Definition = ZwDefinition::create_default("zw", 30.0).into();
        let shifted = original.with_level_shift(2.5).unwrap();
        let before = original.profile();
        let after = shifted.profile();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            assert_relative_eq!(a.offset, b.offset);
            assert_relative_eq!(a.elevation + 2.5, b.elevation);
        }
    }

    #[test]
    fn remove_row_refused_for_xyz_and_standard() {
        let mut xyz: Definition =
            XyzDefinition::from_yz_coordinates("xyz", [(0.0, 1.0), (5.0, 0.0), (10.0, 1.0)])
                .unwrap()
                .into();
        assert!(matches!(
            xyz.remove_row(1),
            Err(crate::Error::InvalidOperation(_))
        ));
        assert_eq!(xyz.row_count(), 3);

        let mut standard: Definition = StandardDefinition::create_default("std").into();
        assert!(matches!(
            standard.remove_row(0),
            Err(crate::Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn default_thalweg_is_profile_midpoint() {
        let mut def: Definition = YzDefinition::create_default("yz", 90.0).into();
        def.set_thalweg(500.0);
        def.clamp_thalweg();
        assert_relative_eq!(def.thalweg(), 90.0);
        def.set_default_thalweg();
        assert_relative_eq!(def.thalweg(), 45.0);
    }

    #[test]
    fn default_factory() {
        let settings = Settings::default();
        let zw = create_default(DefinitionKind::Zw, "zw", &settings).unwrap();
        assert_relative_eq!(zw.width(), 100.0);
        assert!(create_default(DefinitionKind::Xyz, "xyz", &settings).is_none());
    }
}

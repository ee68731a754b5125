// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named sub-ranges of a profile's offset axis.

use std::fmt;

use thiserror::Error;

pub const MAIN_SECTION_TYPE_NAME: &str = "Main";
pub const FLOODPLAIN1_SECTION_TYPE_NAME: &str = "FloodPlain1";
pub const FLOODPLAIN2_SECTION_TYPE_NAME: &str = "FloodPlain2";

/// Section type (main channel, floodplain, custom...). Identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionType {
    pub name: String,
}

impl SectionType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn main() -> Self {
        Self::new(MAIN_SECTION_TYPE_NAME)
    }

    pub fn floodplain1() -> Self {
        Self::new(FLOODPLAIN1_SECTION_TYPE_NAME)
    }

    pub fn floodplain2() -> Self {
        Self::new(FLOODPLAIN2_SECTION_TYPE_NAME)
    }

    /// Section type names compare case-insensitively.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A sub-range `[min_offset, max_offset)` of a profile.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub section_type: SectionType,
    pub min_offset: f64,
    pub max_offset: f64,
}

impl Section {
    pub fn new(section_type: SectionType, min_offset: f64, max_offset: f64) -> Self {
        Self {
            section_type,
            min_offset,
            max_offset,
        }
    }

    /// Length of the offset range (not scaled by the definition's width factor)
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_offset - self.min_offset
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.section_type.name
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.section_type.is_named(name)
    }
}

/// Outer offset range that the sections of a definition should cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub min: f64,
    pub max: f64,
}

impl SectionBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Why `add_section` refused a section. Reported and logged, never thrown.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionRejection {
    #[error("Could not add CrossSectionSection with negative length {width} to cross section definition '{definition}'")]
    NegativeWidth { width: f64, definition: String },

    #[error("Could not add CrossSectionSection with duplicate name '{name}'")]
    DuplicateName { name: String },
}

/// Advisory produced when section reconciliation resized a section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionWidthChange {
    pub section_type: String,
    pub definition: String,
    pub old_width: f64,
    pub new_width: f64,
}

impl fmt::Display for SectionWidthChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The {} section width of cross section {} has been changed from {}m to {}m",
            self.section_type,
            self.definition,
            format_width(self.old_width),
            format_width(self.new_width)
        )
    }
}

/// Shortest decimal form, rounded to micrometres, `-0` printed as `0`.
pub(crate) fn format_width(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6 + 0.0;
    rounded.to_string()
}

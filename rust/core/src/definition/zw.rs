// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tabulated level/width definition.
//!
//! Rows are kept sorted by level, highest first, and levels are unique. The
//! profile is symmetric around offset 0, so sections only cover the right
//! half and their widths count double.

use super::{CrossSectionDefinition, DefinitionHeader};
use crate::error::{check_row, ensure_finite, DataError, Result};
use crate::point::ProfilePoint;
use crate::section::SectionBounds;
use crate::validation::{parse_cell_value, CellValidation, CellValue};

/// One ZW table row: a level with its total and storage-only width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZwRow {
    pub level: f64,
    pub total_width: f64,
    pub storage_width: f64,
}

impl ZwRow {
    pub const fn new(level: f64, total_width: f64, storage_width: f64) -> Self {
        Self {
            level,
            total_width,
            storage_width,
        }
    }

    /// Width carrying flow at this level.
    #[inline]
    pub fn flow_width(&self) -> f64 {
        self.total_width - self.storage_width
    }

    fn validated(self) -> std::result::Result<Self, DataError> {
        ensure_finite(self.level)?;
        ensure_finite(self.total_width)?;
        ensure_finite(self.storage_width)?;
        check_widths(self.total_width, self.storage_width)?;
        Ok(self)
    }
}

fn check_widths(total: f64, storage: f64) -> std::result::Result<(), DataError> {
    if total < 0.0 {
        return Err(DataError::NegativeWidth);
    }
    if storage < 0.0 {
        return Err(DataError::NegativeStorage);
    }
    if storage > total {
        return Err(DataError::StorageExceedsTotal);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZwColumn {
    Level,
    TotalWidth,
    StorageWidth,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZwDefinition {
    header: DefinitionHeader,
    rows: Vec<ZwRow>,
}

impl ZwDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            rows: Vec::new(),
        }
    }

    /// Builds a table from rows in any order.
    pub fn from_rows(name: impl Into<String>, rows: impl IntoIterator<Item = ZwRow>) -> Result<Self> {
        let rows = rows
            .into_iter()
            .map(ZwRow::validated)
            .collect::<std::result::Result<Vec<_>, DataError>>()?;
        let mut def = Self::new(name);
        def.rows = sorted_unique(rows)?;
        Ok(def)
    }

    /// Trapezoid 10 m deep, `width` wide at the top and a third of that at
    /// the bed.
    pub fn create_default(name: impl Into<String>, width: f64) -> Self {
        let mut def = Self::new(name);
        def.rows = vec![
            ZwRow::new(0.0, width, 0.0),
            ZwRow::new(-10.0, width / 3.0, 0.0),
        ];
        def
    }

    /// Rows, highest level first.
    pub fn rows(&self) -> &[ZwRow] {
        &self.rows
    }

    pub fn add_row(&mut self, level: f64, total_width: f64, storage_width: f64) -> Result<()> {
        let row = ZwRow::new(level, total_width, storage_width).validated()?;
        if self.rows.iter().any(|r| r.level == row.level) {
            return Err(DataError::DuplicateLevel.into());
        }
        let at = self
            .rows
            .iter()
            .position(|r| r.level < row.level)
            .unwrap_or(self.rows.len());
        self.rows.insert(at, row);
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<ZwRow> {
        check_row(index, self.rows.len())?;
        Ok(self.rows.remove(index))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Moves a row to a new level; the table is re-sorted afterwards.
    pub fn set_level(&mut self, index: usize, level: f64) -> Result<()> {
        check_row(index, self.rows.len())?;
        let level = ensure_finite(level)?;
        if self.level_taken(index, level) {
            return Err(DataError::DuplicateLevel.into());
        }
        self.rows[index].level = level;
        self.sort();
        Ok(())
    }

    pub fn set_total_width(&mut self, index: usize, total_width: f64) -> Result<()> {
        check_row(index, self.rows.len())?;
        let total_width = ensure_finite(total_width)?;
        check_widths(total_width, self.rows[index].storage_width)?;
        self.rows[index].total_width = total_width;
        Ok(())
    }

    pub fn set_storage_width(&mut self, index: usize, storage_width: f64) -> Result<()> {
        check_row(index, self.rows.len())?;
        let storage_width = ensure_finite(storage_width)?;
        check_widths(self.rows[index].total_width, storage_width)?;
        self.rows[index].storage_width = storage_width;
        Ok(())
    }

    /// Replaces the table with a rectangle of `width` from `bed_level` up
    /// `height`.
    pub fn set_as_rectangle(&mut self, bed_level: f64, width: f64, height: f64) -> Result<()> {
        let rows = vec![
            ZwRow::new(bed_level + height, width, 0.0).validated()?,
            ZwRow::new(bed_level, width, 0.0).validated()?,
        ];
        self.rows = sorted_unique(rows)?;
        Ok(())
    }

    /// Row with the largest total width; the highest one on ties.
    pub fn outer_row(&self) -> Option<&ZwRow> {
        self.rows.iter().fold(None, |best: Option<&ZwRow>, row| match best {
            Some(b) if b.total_width >= row.total_width => Some(b),
            _ => Some(row),
        })
    }

    /// Zero flow widths are only allowed at the highest and/or lowest row,
    /// and two of them need at least one row in between.
    pub fn is_flow_profile_valid(&self) -> bool {
        let zeros: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.flow_width() <= 0.0)
            .map(|(i, _)| i)
            .collect();

        let last = self.rows.len().saturating_sub(1);
        match zeros.as_slice() {
            [] => true,
            [i] => *i == 0 || *i == last,
            [a, b] => self.rows.len() >= 3 && *a == 0 && *b == last,
            _ => false,
        }
    }

    pub fn validate_cell_value(
        &self,
        row: usize,
        column: ZwColumn,
        candidate: &CellValue,
    ) -> CellValidation {
        if row > self.rows.len() {
            return CellValidation::row_out_of_range(row, self.rows.len());
        }
        let value = match parse_cell_value(candidate) {
            Ok(v) => v,
            Err(invalid) => return invalid,
        };
        let existing = self.rows.get(row);

        let checked = match column {
            ZwColumn::Level => {
                if self.level_taken(row, value) {
                    Err(DataError::DuplicateLevel)
                } else {
                    Ok(())
                }
            }
            ZwColumn::TotalWidth => {
                check_widths(value, existing.map_or(0.0, |r| r.storage_width))
            }
            ZwColumn::StorageWidth => match existing {
                Some(r) => check_widths(r.total_width, value),
                None if value < 0.0 => Err(DataError::NegativeStorage),
                None => Ok(()),
            },
        };

        match checked {
            Ok(()) => CellValidation::Valid(value),
            Err(err) => CellValidation::from_data_error(err),
        }
    }

    fn level_taken(&self, except: usize, level: f64) -> bool {
        self.rows
            .iter()
            .enumerate()
            .any(|(i, r)| i != except && r.level == level)
    }

    fn sort(&mut self) {
        self.rows.sort_by(|a, b| b.level.total_cmp(&a.level));
    }

    /// Mirrors `half_width(row)` around 0: left side from the top down, right
    /// side from the bottom up.
    fn mirrored(&self, half_width: impl Fn(&ZwRow) -> f64) -> Vec<ProfilePoint> {
        let mut points: Vec<ProfilePoint> = Vec::with_capacity(self.rows.len() * 2);
        let left = self
            .rows
            .iter()
            .map(|r| ProfilePoint::new(-half_width(r) + 0.0, r.level));
        let right = self
            .rows
            .iter()
            .rev()
            .map(|r| ProfilePoint::new(half_width(r) + 0.0, r.level));
        for p in left.chain(right) {
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        points
    }
}

fn sorted_unique(mut rows: Vec<ZwRow>) -> Result<Vec<ZwRow>> {
    rows.sort_by(|a, b| b.level.total_cmp(&a.level));
    if rows.windows(2).any(|w| w[0].level == w[1].level) {
        return Err(DataError::DuplicateLevel.into());
    }
    Ok(rows)
}

impl CrossSectionDefinition for ZwDefinition {
    fn header(&self) -> &DefinitionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DefinitionHeader {
        &mut self.header
    }

    fn profile(&self) -> Vec<ProfilePoint> {
        self.mirrored(|r| r.total_width / 2.0)
    }

    fn flow_profile(&self) -> Vec<ProfilePoint> {
        self.mirrored(|r| r.flow_width() / 2.0)
    }

    fn shift_level(&mut self, delta: f64) -> Result<()> {
        let delta = ensure_finite(delta)?;
        let shifted = self
            .rows
            .iter()
            .map(|r| ZwRow::new(r.level + delta, r.total_width, r.storage_width))
            .collect();
        self.rows = sorted_unique(shifted)?;
        Ok(())
    }

    fn section_bounds(&self) -> SectionBounds {
        let storage = self.outer_row().map_or(0.0, |r| r.storage_width);
        SectionBounds::new(0.0, (self.width() - storage) / 2.0)
    }

    fn section_width_factor(&self) -> f64 {
        2.0
    }

    fn flow_width(&self) -> f64 {
        self.rows
            .iter()
            .map(ZwRow::flow_width)
            .fold(0.0, f64::max)
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tabulated offset/elevation definition.

use std::cell::OnceCell;

use super::{CrossSectionDefinition, DefinitionHeader};
use crate::error::{check_row, ensure_finite, DataError, Result};
use crate::point::ProfilePoint;
use crate::validation::{parse_cell_value, CellValidation, CellValue};

/// One YZ table row. `storage_delta` is the height above the bed that
/// only stores water.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YzRow {
    pub offset: f64,
    pub elevation: f64,
    pub storage_delta: f64,
}

impl YzRow {
    pub const fn new(offset: f64, elevation: f64, storage_delta: f64) -> Self {
        Self {
            offset,
            elevation,
            storage_delta,
        }
    }

    fn validated(self) -> std::result::Result<Self, DataError> {
        ensure_finite(self.offset)?;
        ensure_finite(self.elevation)?;
        ensure_finite(self.storage_delta)?;
        if self.storage_delta < 0.0 {
            return Err(DataError::NegativeStorage);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YzColumn {
    Offset,
    Elevation,
    StorageDelta,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YzDefinition {
    header: DefinitionHeader,
    rows: Vec<YzRow>,
    /// Row indices ordered by offset, built on first read.
    #[cfg_attr(feature = "serde", serde(skip))]
    sorted: OnceCell<Vec<usize>>,
}

impl YzDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            rows: Vec::new(),
            sorted: OnceCell::new(),
        }
    }

    /// Builds a definition from `(offset, elevation)` pairs without storage.
    pub fn from_coordinates(
        name: impl Into<String>,
        coordinates: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self> {
        let mut def = Self::new(name);
        for (offset, elevation) in coordinates {
            def.add_row(offset, elevation, 0.0)?;
        }
        Ok(def)
    }

    /// Symmetric trapezoidal channel 10 m deep spanning `width`.
    pub fn create_default(name: impl Into<String>, width: f64) -> Self {
        let step = width / 18.0;
        let rows = [
            (0.0, 0.0),
            (4.0 * step, 0.0),
            (6.0 * step, -10.0),
            (12.0 * step, -10.0),
            (14.0 * step, 0.0),
            (width, 0.0),
        ];
        let mut def = Self::new(name);
        def.rows = rows
            .iter()
            .map(|&(offset, elevation)| YzRow::new(offset, elevation, 0.0))
            .collect();
        def.header.thalweg = width / 2.0;
        def
    }

    /// Rows in table (insertion) order.
    pub fn rows(&self) -> &[YzRow] {
        &self.rows
    }

    pub fn add_row(&mut self, offset: f64, elevation: f64, storage_delta: f64) -> Result<()> {
        let row = YzRow::new(offset, elevation, storage_delta).validated()?;
        self.rows.push(row);
        self.invalidate();
        Ok(())
    }

    pub fn insert_row(&mut self, index: usize, row: YzRow) -> Result<()> {
        check_row(index, self.rows.len() + 1)?;
        let row = row.validated()?;
        self.rows.insert(index, row);
        self.invalidate();
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<YzRow> {
        check_row(index, self.rows.len())?;
        let row = self.rows.remove(index);
        self.invalidate();
        Ok(row)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.invalidate();
    }

    pub fn set_offset(&mut self, index: usize, offset: f64) -> Result<()> {
        check_row(index, self.rows.len())?;
        self.rows[index].offset = ensure_finite(offset)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_elevation(&mut self, index: usize, elevation: f64) -> Result<()> {
        check_row(index, self.rows.len())?;
        self.rows[index].elevation = ensure_finite(elevation)?;
        Ok(())
    }

    pub fn set_storage_delta(&mut self, index: usize, storage_delta: f64) -> Result<()> {
        check_row(index, self.rows.len())?;
        let storage_delta = ensure_finite(storage_delta)?;
        if storage_delta < 0.0 {
            return Err(DataError::NegativeStorage.into());
        }
        self.rows[index].storage_delta = storage_delta;
        Ok(())
    }

    /// Checks a candidate cell value without applying it. `row == len`
    /// addresses the row about to be appended.
    pub fn validate_cell_value(
        &self,
        row: usize,
        column: YzColumn,
        candidate: &CellValue,
    ) -> CellValidation {
        if row > self.rows.len() {
            return CellValidation::row_out_of_range(row, self.rows.len());
        }
        let value = match parse_cell_value(candidate) {
            Ok(v) => v,
            Err(invalid) => return invalid,
        };
        match column {
            YzColumn::StorageDelta if value < 0.0 => {
                CellValidation::from_data_error(DataError::NegativeStorage)
            }
            _ => CellValidation::Valid(value),
        }
    }

    fn sorted_indices(&self) -> &[usize] {
        self.sorted.get_or_init(|| {
            let mut indices: Vec<usize> = (0..self.rows.len()).collect();
            // stable: equal offsets keep insertion order
            indices.sort_by(|&a, &b| self.rows[a].offset.total_cmp(&self.rows[b].offset));
            indices
        })
    }

    fn invalidate(&mut self) {
        self.sorted.take();
    }
}

impl PartialEq for YzDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && self.rows == other.rows
    }
}

impl CrossSectionDefinition for YzDefinition {
    fn header(&self) -> &DefinitionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DefinitionHeader {
        &mut self.header
    }

    fn profile(&self) -> Vec<ProfilePoint> {
        self.sorted_indices()
            .iter()
            .map(|&i| ProfilePoint::new(self.rows[i].offset, self.rows[i].elevation))
            .collect()
    }

    fn flow_profile(&self) -> Vec<ProfilePoint> {
        self.sorted_indices()
            .iter()
            .map(|&i| {
                let row = &self.rows[i];
                ProfilePoint::new(row.offset, row.elevation + row.storage_delta)
            })
            .collect()
    }

    fn shift_level(&mut self, delta: f64) -> Result<()> {
        let delta = ensure_finite(delta)?;
        for row in &mut self.rows {
            row.elevation += delta;
        }
        Ok(())
    }
}

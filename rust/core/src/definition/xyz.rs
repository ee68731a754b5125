// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surveyed 3-D cross-section.
//!
//! The geometry is a world-space polyline. Table rows are derived from its
//! vertices: offset is the cumulative horizontal distance, elevation is Z.
//! The only data not carried by the geometry is a storage height per
//! vertex, kept index-aligned with the vertices.

use nalgebra::Point3;

use super::{CrossSectionDefinition, DefinitionHeader};
use crate::error::{check_row, ensure_finite, DataError, Error, Result};
use crate::point::{profile_from_polyline, ProfilePoint};
use crate::validation::{parse_cell_value, CellFailure, CellValidation, CellValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyzColumn {
    /// Derived from the geometry, read-only
    Offset,
    Elevation,
    StorageDelta,
}

const READ_ONLY_OFFSET: &str =
    "The offset of an XYZ cross section follows its geometry and cannot be edited.";

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XyzDefinition {
    header: DefinitionHeader,
    vertices: Vec<Point3<f64>>,
    storage: Vec<f64>,
}

impl XyzDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: DefinitionHeader::new(name),
            vertices: Vec::new(),
            storage: Vec::new(),
        }
    }

    pub fn from_points(name: impl Into<String>, vertices: Vec<Point3<f64>>) -> Result<Self> {
        for v in &vertices {
            ensure_finite(v.x)?;
            ensure_finite(v.y)?;
            ensure_finite(v.z)?;
        }
        let storage = vec![0.0; vertices.len()];
        Ok(Self {
            header: DefinitionHeader::new(name),
            vertices,
            storage,
        })
    }

    /// Lays `(offset, elevation)` pairs out along the world X axis.
    pub fn from_yz_coordinates(
        name: impl Into<String>,
        coordinates: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self> {
        let vertices = coordinates
            .into_iter()
            .map(|(y, z)| Point3::new(y, 0.0, z))
            .collect();
        Self::from_points(name, vertices)
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Storage height per vertex.
    pub fn storage(&self) -> &[f64] {
        &self.storage
    }

    /// Inserts a vertex; its row gets zero storage.
    pub fn insert_vertex(&mut self, index: usize, vertex: Point3<f64>) -> Result<()> {
        check_row(index, self.vertices.len() + 1)?;
        ensure_finite(vertex.x)?;
        ensure_finite(vertex.y)?;
        ensure_finite(vertex.z)?;
        self.vertices.insert(index, vertex);
        self.storage.insert(index, 0.0);
        Ok(())
    }

    pub fn remove_vertex(&mut self, index: usize) -> Result<Point3<f64>> {
        check_row(index, self.vertices.len())?;
        self.storage.remove(index);
        Ok(self.vertices.remove(index))
    }

    /// Moves the geometry horizontally. Storage stays with its vertex.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            v.x += dx;
            v.y += dy;
        }
    }

    /// Replaces the geometry, carrying storage over to the new vertices.
    ///
    /// A single inserted or removed vertex is detected by comparing
    /// coordinates; other edits with a changed vertex count map storage by
    /// nearest relative index.
    pub fn set_geometry(&mut self, vertices: Vec<Point3<f64>>) -> Result<()> {
        for v in &vertices {
            ensure_finite(v.x)?;
            ensure_finite(v.y)?;
            ensure_finite(v.z)?;
        }

        let old = &self.vertices;
        let storage = if vertices.len() == old.len() {
            self.storage.clone()
        } else if let Some(at) = single_insertion(old, &vertices) {
            let mut s = self.storage.clone();
            s.insert(at, 0.0);
            s
        } else if let Some(at) = single_insertion(&vertices, old) {
            let mut s = self.storage.clone();
            s.remove(at);
            s
        } else {
            nearest_index_storage(&self.storage, vertices.len())
        };

        self.vertices = vertices;
        self.storage = storage;
        Ok(())
    }

    pub fn set_elevation(&mut self, index: usize, elevation: f64) -> Result<()> {
        check_row(index, self.vertices.len())?;
        self.vertices[index].z = ensure_finite(elevation)?;
        Ok(())
    }

    pub fn set_storage_delta(&mut self, index: usize, storage: f64) -> Result<()> {
        check_row(index, self.vertices.len())?;
        let storage = ensure_finite(storage)?;
        if storage < 0.0 {
            return Err(DataError::NegativeStorage.into());
        }
        self.storage[index] = storage;
        Ok(())
    }

    /// Writes one table cell. The offset column is refused.
    pub fn set_value(&mut self, row: usize, column: XyzColumn, value: f64) -> Result<()> {
        match column {
            XyzColumn::Offset => Err(Error::invalid_operation(READ_ONLY_OFFSET)),
            XyzColumn::Elevation => self.set_elevation(row, value),
            XyzColumn::StorageDelta => self.set_storage_delta(row, value),
        }
    }

    pub fn validate_cell_value(
        &self,
        row: usize,
        column: XyzColumn,
        candidate: &CellValue,
    ) -> CellValidation {
        if row >= self.vertices.len() {
            return CellValidation::row_out_of_range(row, self.vertices.len());
        }
        if column == XyzColumn::Offset {
            return CellValidation::invalid(CellFailure::ReadOnlyColumn, READ_ONLY_OFFSET);
        }
        let value = match parse_cell_value(candidate) {
            Ok(v) => v,
            Err(invalid) => return invalid,
        };
        if column == XyzColumn::StorageDelta && value < 0.0 {
            return CellValidation::from_data_error(DataError::NegativeStorage);
        }
        CellValidation::Valid(value)
    }
}

/// Index at which `longer` has one extra vertex compared to `shorter`.
fn single_insertion(shorter: &[Point3<f64>], longer: &[Point3<f64>]) -> Option<usize> {
    if longer.len() != shorter.len() + 1 {
        return None;
    }
    let at = shorter
        .iter()
        .zip(longer)
        .position(|(a, b)| a != b)
        .unwrap_or(shorter.len());
    (shorter[at..] == longer[at + 1..]).then_some(at)
}

fn nearest_index_storage(storage: &[f64], len: usize) -> Vec<f64> {
    if storage.is_empty() || len == 0 {
        return vec![0.0; len];
    }
    if len == 1 {
        return vec![storage[0]];
    }
    let scale = (storage.len() - 1) as f64 / (len - 1) as f64;
    (0..len)
        .map(|i| storage[((i as f64 * scale).round() as usize).min(storage.len() - 1)])
        .collect()
}

impl CrossSectionDefinition for XyzDefinition {
    fn header(&self) -> &DefinitionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DefinitionHeader {
        &mut self.header
    }

    fn profile(&self) -> Vec<ProfilePoint> {
        profile_from_polyline(&self.vertices)
    }

    fn flow_profile(&self) -> Vec<ProfilePoint> {
        profile_from_polyline(&self.vertices)
            .into_iter()
            .zip(&self.storage)
            .map(|(p, s)| p.shifted(*s))
            .collect()
    }

    fn shift_level(&mut self, delta: f64) -> Result<()> {
        let delta = ensure_finite(delta)?;
        for v in &mut self.vertices {
            v.z += delta;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn survey() -> XyzDefinition {
        let mut def = XyzDefinition::from_points(
            "xyz",
            vec![
                Point3::new(0.0, 0.0, 5.0),
                Point3::new(3.0, 4.0, 0.0),
                Point3::new(6.0, 8.0, 5.0),
            ],
        )
        .unwrap();
        def.set_storage_delta(0, 1.0).unwrap();
        def.set_storage_delta(1, 2.0).unwrap();
        def.set_storage_delta(2, 3.0).unwrap();
        def
    }

    #[test]
    fn offsets_are_horizontal_chord_lengths() {
        let def = survey();
        let offsets: Vec<f64> = def.profile().iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0.0, 5.0, 10.0]);
        assert_relative_eq!(def.width(), 10.0);
        assert_relative_eq!(def.flow_profile()[1].elevation, 2.0);
    }

    #[test]
    fn inserting_a_vertex_inserts_a_zero_storage_row() {
        let mut def = survey();
        def.insert_vertex(1, Point3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(def.storage(), &[1.0, 0.0, 2.0, 3.0]);
        def.remove_vertex(2).unwrap();
        assert_eq!(def.storage(), &[1.0, 0.0, 3.0]);
    }

    #[test]
    fn translation_keeps_storage() {
        let mut def = survey();
        def.translate(100.0, -50.0);
        assert_eq!(def.storage(), &[1.0, 2.0, 3.0]);
        assert_eq!(def.vertices()[0], Point3::new(100.0, -50.0, 5.0));
        assert_relative_eq!(def.width(), 10.0);
    }

    #[test]
    fn set_geometry_detects_single_insert_and_remove() {
        let mut def = survey();
        let mut geometry = def.vertices().to_vec();
        geometry.insert(2, Point3::new(4.0, 5.0, 0.5));
        def.set_geometry(geometry).unwrap();
        assert_eq!(def.storage(), &[1.0, 2.0, 0.0, 3.0]);

        let mut geometry = def.vertices().to_vec();
        geometry.remove(0);
        def.set_geometry(geometry).unwrap();
        assert_eq!(def.storage(), &[2.0, 0.0, 3.0]);
    }

    #[test]
    fn set_geometry_maps_by_nearest_index() {
        let mut def = survey();
        def.set_geometry(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)])
            .unwrap();
        assert_eq!(def.storage(), &[1.0, 3.0]);
    }

    #[test]
    fn offset_column_is_read_only() {
        let mut def = survey();
        assert!(matches!(
            def.set_value(0, XyzColumn::Offset, 3.0),
            Err(Error::InvalidOperation(_))
        ));
        match def.validate_cell_value(0, XyzColumn::Offset, &1.0.into()) {
            CellValidation::Invalid { failure, .. } => {
                assert_eq!(failure, CellFailure::ReadOnlyColumn)
            }
            other => panic!("unexpected {other:?}"),
        }
        def.set_value(1, XyzColumn::Elevation, -2.0).unwrap();
        assert_eq!(def.vertices()[1].z, -2.0);
        assert!(!def
            .validate_cell_value(1, XyzColumn::StorageDelta, &"-0.5".into())
            .is_valid());
    }
}

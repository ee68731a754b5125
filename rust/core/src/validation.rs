// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cell-level validation used by table editors before committing an edit.
//!
//! Each definition variant exposes `validate_cell_value(row, column, value)`
//! with its own column enum; this module holds the shared value type, the
//! result type and the numeric parsing.

use crate::error::DataError;

/// A candidate value as typed or pasted by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Kind of validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFailure {
    NotANumber,
    DuplicateLevel,
    StorageExceedsTotal,
    NegativeValue,
    ReadOnlyColumn,
    RowOutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValidation {
    /// Accepted, carrying the parsed value
    Valid(f64),
    Invalid {
        failure: CellFailure,
        message: String,
    },
}

impl CellValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, CellValidation::Valid(_))
    }

    /// `(message, is_valid)` pair as consumed by grid editors; the message
    /// is empty for valid input.
    pub fn as_message(&self) -> (&str, bool) {
        match self {
            CellValidation::Valid(_) => ("", true),
            CellValidation::Invalid { message, .. } => (message.as_str(), false),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            CellValidation::Valid(v) => Some(*v),
            CellValidation::Invalid { .. } => None,
        }
    }

    pub(crate) fn invalid(failure: CellFailure, message: impl Into<String>) -> Self {
        CellValidation::Invalid {
            failure,
            message: message.into(),
        }
    }

    pub(crate) fn from_data_error(err: DataError) -> Self {
        let failure = match err {
            DataError::DuplicateLevel => CellFailure::DuplicateLevel,
            DataError::StorageExceedsTotal => CellFailure::StorageExceedsTotal,
            DataError::NegativeStorage | DataError::NegativeWidth => CellFailure::NegativeValue,
            DataError::NotFinite => CellFailure::NotANumber,
        };
        Self::invalid(failure, err.to_string())
    }

    pub(crate) fn row_out_of_range(row: usize, len: usize) -> Self {
        Self::invalid(
            CellFailure::RowOutOfRange,
            format!("Row {row} is out of range for a table of {len} rows"),
        )
    }
}

/// Parses a candidate into a finite number.
pub fn parse_cell_value(value: &CellValue) -> Result<f64, CellValidation> {
    let parsed = match value {
        CellValue::Number(v) => Some(*v),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            fast_float::parse::<f64, _>(trimmed).ok()
        }
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(CellValidation::from_data_error(DataError::NotFinite)),
    }
}

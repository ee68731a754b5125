// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for cross-section definitions.
//!
//! Two families are kept apart: [`DataError`] is a rejected user edit whose
//! message is shown verbatim by the editing surface, while
//! [`Error::InvalidOperation`] flags structural misuse by calling code.

use thiserror::Error;

/// Result type for cross-section operations
pub type Result<T> = std::result::Result<T, Error>;

/// A user edit that was rejected. The definition keeps its prior state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    #[error("Z must be unique.")]
    DuplicateLevel,

    #[error("Storage Width cannot exceed Total Width.")]
    StorageExceedsTotal,

    #[error("Storage cannot be negative.")]
    NegativeStorage,

    #[error("Width cannot be negative.")]
    NegativeWidth,

    #[error("Value must be a finite number.")]
    NotFinite,
}

/// Errors that can occur while editing or deriving a definition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Row {index} is out of range for a table of {len} rows")]
    RowOutOfRange { index: usize, len: usize },
}

impl Error {
    /// Shorthand for [`Error::InvalidOperation`]
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Error::InvalidOperation(msg.into())
    }

    /// True for rejected user data, false for misuse.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::Data(_))
    }
}

/// Rejects NaN and infinities.
#[inline]
pub(crate) fn ensure_finite(value: f64) -> std::result::Result<f64, DataError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DataError::NotFinite)
    }
}

#[inline]
pub(crate) fn check_row(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::RowOutOfRange { index, len })
    }
}

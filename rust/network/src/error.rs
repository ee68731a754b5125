// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for network operations.

use crate::keys::{BranchKey, CrossSectionKey, DefinitionKey};

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during network operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("branch not found: {0:?}")]
    BranchNotFound(BranchKey),

    #[error("cross section not found: {0:?}")]
    CrossSectionNotFound(CrossSectionKey),

    #[error("shared definition not found: {0:?}")]
    DefinitionNotFound(DefinitionKey),

    /// Structural misuse, e.g. sharing a surveyed (XYZ) definition.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A shared definition cannot be removed while cross-sections use it.
    #[error("Cannot remove definition '{name}', it is in use by {count} cross section(s). (For example cross section: '{example}').")]
    DefinitionInUse {
        name: String,
        count: usize,
        example: String,
    },

    /// A copied definition refers to a section type the target network lacks.
    #[error("Section type '{0}' is not defined in the target network")]
    UnknownSectionType(String),

    #[error(transparent)]
    Definition(#[from] xsection_core::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] xsection_geometry::Error),
}

impl Error {
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Error::InvalidOperation(msg.into())
    }
}

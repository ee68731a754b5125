// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use xsection_geometry::BranchGeometry;

/// Whether water flows in the open or through a closed conduit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BranchKind {
    /// Channel
    #[default]
    Open,
    /// Pipe or sewer
    Enclosed,
}

impl BranchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::Open => "Open",
            BranchKind::Enclosed => "Enclosed",
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub name: String,
    pub geometry: BranchGeometry,
    pub kind: BranchKind,
}

impl Branch {
    pub fn new(name: impl Into<String>, geometry: BranchGeometry, kind: BranchKind) -> Self {
        Self {
            name: name.into(),
            geometry,
            kind,
        }
    }

    pub fn length(&self) -> f64 {
        self.geometry.length()
    }
}

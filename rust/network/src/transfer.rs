// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Copying cross-sections within a network and between networks.

use rustc_hash::FxHashSet;
use xsection_core::CrossSectionDefinition;

use crate::error::{Error, Result};
use crate::keys::{BranchKey, CrossSectionKey};
use crate::network::Network;

impl Network {
    /// Copies a cross-section to another location in this network.
    ///
    /// An owned definition is cloned; a proxy stays a proxy over the same
    /// shared definition, with the same level shift.
    pub fn duplicate_cross_section(
        &mut self,
        source: CrossSectionKey,
        name: impl Into<String>,
        branch: BranchKey,
        chainage: f64,
    ) -> Result<CrossSectionKey> {
        let definition = self
            .cross_sections
            .get(source)
            .ok_or(Error::CrossSectionNotFound(source))?
            .definition
            .clone();
        self.add_cross_section(name, branch, chainage, definition)
    }

    /// Copies a cross-section from another network.
    ///
    /// The other network's shared pool is not visible here, so a proxy is
    /// localized on the way in: the copy owns a definition equal to what
    /// the proxy showed. Refused when the definition uses a section type
    /// this network does not know.
    pub fn import_cross_section(
        &mut self,
        source: &Network,
        cross_section: CrossSectionKey,
        branch: BranchKey,
        chainage: f64,
    ) -> Result<CrossSectionKey> {
        let name = source
            .cross_section(cross_section)
            .ok_or(Error::CrossSectionNotFound(cross_section))?
            .name
            .clone();
        let definition = source.definition_view(cross_section)?.localized()?;

        let known: FxHashSet<String> = self
            .section_types
            .iter()
            .map(|t| t.name.to_ascii_lowercase())
            .collect();
        if let Some(unknown) = definition
            .sections()
            .iter()
            .find(|s| !known.contains(&s.name().to_ascii_lowercase()))
        {
            return Err(Error::UnknownSectionType(unknown.name().to_string()));
        }

        self.add_cross_section(name, branch, chainage, definition.into())
    }
}

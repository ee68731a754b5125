// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-sections and their definition references.

use std::cell::OnceCell;

use nalgebra::Point3;
use xsection_core::{
    CrossSectionDefinition, Definition, DefinitionKind, ProfilePoint, Section,
};

use crate::keys::{BranchKey, DefinitionKey};

/// Wraps a shared definition and raises it by `level_shift` without
/// copying it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proxy {
    pub inner: DefinitionKey,
    pub level_shift: f64,
}

impl Proxy {
    pub fn new(inner: DefinitionKey) -> Self {
        Self {
            inner,
            level_shift: 0.0,
        }
    }

    pub fn with_level_shift(inner: DefinitionKey, level_shift: f64) -> Self {
        Self { inner, level_shift }
    }
}

/// How a cross-section holds its definition.
#[derive(Debug, Clone)]
pub enum DefinitionRef {
    /// Owned exclusively by the cross-section
    Local(Definition),
    /// Referenced from the network's shared pool
    Shared(Proxy),
}

impl DefinitionRef {
    pub fn is_proxy(&self) -> bool {
        matches!(self, DefinitionRef::Shared(_))
    }

    pub fn proxy(&self) -> Option<&Proxy> {
        match self {
            DefinitionRef::Shared(proxy) => Some(proxy),
            DefinitionRef::Local(_) => None,
        }
    }
}

impl From<Definition> for DefinitionRef {
    fn from(def: Definition) -> Self {
        DefinitionRef::Local(def)
    }
}

impl From<Proxy> for DefinitionRef {
    fn from(proxy: Proxy) -> Self {
        DefinitionRef::Shared(proxy)
    }
}

/// A definition placed at a chainage along a branch.
#[derive(Debug, Clone)]
pub struct CrossSection {
    pub name: String,
    pub branch: BranchKey,
    pub chainage: f64,
    pub(crate) definition: DefinitionRef,
    /// World-space line, built on first request.
    pub(crate) geometry: OnceCell<Vec<Point3<f64>>>,
}

impl CrossSection {
    pub(crate) fn new(
        name: impl Into<String>,
        branch: BranchKey,
        chainage: f64,
        definition: DefinitionRef,
    ) -> Self {
        Self {
            name: name.into(),
            branch,
            chainage,
            definition,
            geometry: OnceCell::new(),
        }
    }

    pub fn definition_ref(&self) -> &DefinitionRef {
        &self.definition
    }

    pub fn is_proxy(&self) -> bool {
        self.definition.is_proxy()
    }

    /// Key of the shared definition, if the cross-section uses one.
    pub fn shared_definition(&self) -> Option<DefinitionKey> {
        self.definition.proxy().map(|p| p.inner)
    }

    pub(crate) fn invalidate_geometry(&mut self) {
        self.geometry.take();
    }
}

/// A definition as seen through a cross-section: the resolved definition
/// and the level shift to apply to it.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionView<'a> {
    definition: &'a Definition,
    level_shift: f64,
    proxied: bool,
}

impl<'a> DefinitionView<'a> {
    pub(crate) fn new(definition: &'a Definition, level_shift: f64, proxied: bool) -> Self {
        Self {
            definition,
            level_shift,
            proxied,
        }
    }

    /// The unshifted definition (the shared one for proxies).
    pub fn definition(&self) -> &'a Definition {
        self.definition
    }

    pub fn level_shift(&self) -> f64 {
        self.level_shift
    }

    pub fn is_proxy(&self) -> bool {
        self.proxied
    }

    pub fn kind(&self) -> DefinitionKind {
        self.definition.kind()
    }

    pub fn name(&self) -> &'a str {
        self.definition.name()
    }

    pub fn thalweg(&self) -> f64 {
        self.definition.thalweg()
    }

    pub fn sections(&self) -> &'a [Section] {
        self.definition.sections()
    }

    pub fn profile(&self) -> Vec<ProfilePoint> {
        self.shifted(self.definition.profile())
    }

    pub fn flow_profile(&self) -> Vec<ProfilePoint> {
        self.shifted(self.definition.flow_profile())
    }

    pub fn width(&self) -> f64 {
        self.definition.width()
    }

    pub fn flow_width(&self) -> f64 {
        self.definition.flow_width()
    }

    pub fn sections_total_width(&self) -> f64 {
        self.definition.sections_total_width()
    }

    pub fn lowest_point(&self) -> Option<f64> {
        self.definition.lowest_point().map(|z| z + self.level_shift)
    }

    pub fn highest_point(&self) -> Option<f64> {
        self.definition.highest_point().map(|z| z + self.level_shift)
    }

    /// Independent copy with the level shift folded in.
    pub fn localized(&self) -> xsection_core::Result<Definition> {
        self.definition.with_level_shift(self.level_shift)
    }

    fn shifted(&self, mut profile: Vec<ProfilePoint>) -> Vec<ProfilePoint> {
        if self.level_shift != 0.0 {
            xsection_core::point::shift_profile(&mut profile, self.level_shift);
        }
        profile
    }
}

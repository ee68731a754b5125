// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for branches, cross-sections and shared definitions.
//!
//! The [`Network`] owns every entity in slot maps with stable, generational
//! keys. Shared definitions live in a pool; cross-sections refer to them
//! through a [`Proxy`] holding a [`DefinitionKey`], never through a
//! reference, so swapping or removing a pool entry is a single key rewrite.

use std::fmt;

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use tracing::{debug, error};
use xsection_core::{CrossSectionDefinition, Definition, SectionType, Settings};
use xsection_geometry::{project_profile, BranchGeometry};

use crate::branch::{Branch, BranchKind};
use crate::cross_section::{CrossSection, DefinitionRef, DefinitionView, Proxy};
use crate::error::{Error, Result};
use crate::events::{Listener, NetworkEvent};
use crate::keys::{BranchKey, CrossSectionKey, DefinitionKey, ListenerKey};

/// A network of branches carrying cross-sections.
///
/// # Example
///
/// ```
/// use nalgebra::Point2;
/// use xsection_core::{YzDefinition, Definition};
/// use xsection_geometry::BranchGeometry;
/// use xsection_network::{BranchKind, Network};
///
/// let mut network = Network::new();
/// let geometry = BranchGeometry::straight(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)).unwrap();
/// let branch = network.add_branch("branch1", geometry, BranchKind::Open);
/// let def: Definition = YzDefinition::create_default("profile", 50.0).into();
/// let cs = network.add_cross_section("cs1", branch, 25.0, def.into()).unwrap();
///
/// assert_eq!(network.cross_section_count(), 1);
/// assert!(!network.cross_section(cs).unwrap().is_proxy());
/// ```
pub struct Network {
    pub(crate) settings: Settings,
    pub(crate) branches: SlotMap<BranchKey, Branch>,
    pub(crate) cross_sections: SlotMap<CrossSectionKey, CrossSection>,

    // Shared pool, plus insertion order for enumeration
    pub(crate) definitions: SlotMap<DefinitionKey, Definition>,
    pub(crate) shared_order: Vec<DefinitionKey>,
    pub(crate) default_definition: Option<DefinitionKey>,

    pub(crate) section_types: Vec<SectionType>,

    listeners: SlotMap<ListenerKey, Listener>,
}

impl Network {
    /// Creates an empty network with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let section_types = settings
            .default_section_types
            .iter()
            .map(SectionType::new)
            .collect();
        Self {
            settings,
            branches: SlotMap::with_key(),
            cross_sections: SlotMap::with_key(),
            definitions: SlotMap::with_key(),
            shared_order: Vec::new(),
            default_definition: None,
            section_types,
            listeners: SlotMap::with_key(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Listeners ──────────────────────────────────────────────────────

    /// Registers a listener called synchronously after each mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&NetworkEvent) + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    pub(crate) fn emit(&mut self, event: NetworkEvent) {
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    // ── Branches ───────────────────────────────────────────────────────

    pub fn add_branch(
        &mut self,
        name: impl Into<String>,
        geometry: BranchGeometry,
        kind: BranchKind,
    ) -> BranchKey {
        self.branches.insert(Branch::new(name, geometry, kind))
    }

    pub fn branch(&self, key: BranchKey) -> Option<&Branch> {
        self.branches.get(key)
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Replaces a branch's geometry; cross-sections on it are re-projected
    /// on their next geometry request.
    pub fn set_branch_geometry(&mut self, key: BranchKey, geometry: BranchGeometry) -> Result<()> {
        let branch = self
            .branches
            .get_mut(key)
            .ok_or(Error::BranchNotFound(key))?;
        branch.geometry = geometry;
        for cs in self.cross_sections.values_mut().filter(|cs| cs.branch == key) {
            cs.invalidate_geometry();
        }
        Ok(())
    }

    // ── Cross-sections ─────────────────────────────────────────────────

    /// Places a definition on a branch.
    pub fn add_cross_section(
        &mut self,
        name: impl Into<String>,
        branch: BranchKey,
        chainage: f64,
        definition: DefinitionRef,
    ) -> Result<CrossSectionKey> {
        self.check_location(branch, chainage)?;
        if let DefinitionRef::Shared(proxy) = &definition {
            self.shared(proxy.inner)?;
        }

        let key = self
            .cross_sections
            .insert(CrossSection::new(name, branch, chainage, definition));
        self.emit(NetworkEvent::CrossSectionAdded(key));
        Ok(key)
    }

    /// Places a new proxy over a shared definition on a branch.
    pub fn add_shared_cross_section(
        &mut self,
        name: impl Into<String>,
        branch: BranchKey,
        chainage: f64,
        definition: DefinitionKey,
    ) -> Result<CrossSectionKey> {
        self.add_cross_section(name, branch, chainage, Proxy::new(definition).into())
    }

    pub fn remove_cross_section(&mut self, key: CrossSectionKey) -> Result<CrossSection> {
        let cs = self
            .cross_sections
            .remove(key)
            .ok_or(Error::CrossSectionNotFound(key))?;
        self.emit(NetworkEvent::CrossSectionRemoved(key));
        Ok(cs)
    }

    pub fn cross_section(&self, key: CrossSectionKey) -> Option<&CrossSection> {
        self.cross_sections.get(key)
    }

    pub fn cross_sections(&self) -> impl Iterator<Item = (CrossSectionKey, &CrossSection)> {
        self.cross_sections.iter()
    }

    pub fn cross_section_count(&self) -> usize {
        self.cross_sections.len()
    }

    /// Moves a cross-section along its branch or onto another one.
    pub fn move_cross_section(
        &mut self,
        key: CrossSectionKey,
        branch: BranchKey,
        chainage: f64,
    ) -> Result<()> {
        self.check_location(branch, chainage)?;
        let cs = self.cross_section_mut(key)?;
        cs.branch = branch;
        cs.chainage = chainage;
        cs.invalidate_geometry();
        Ok(())
    }

    /// Resolves a cross-section's definition with its level shift.
    pub fn definition_view(&self, key: CrossSectionKey) -> Result<DefinitionView<'_>> {
        let cs = self
            .cross_sections
            .get(key)
            .ok_or(Error::CrossSectionNotFound(key))?;
        match &cs.definition {
            DefinitionRef::Local(def) => Ok(DefinitionView::new(def, 0.0, false)),
            DefinitionRef::Shared(proxy) => Ok(DefinitionView::new(
                self.shared(proxy.inner)?,
                proxy.level_shift,
                true,
            )),
        }
    }

    /// World-space line of a cross-section, cached until the definition,
    /// the proxy or the branch changes. Surveyed definitions are their own
    /// geometry.
    pub fn cross_section_geometry(&self, key: CrossSectionKey) -> Result<&[Point3<f64>]> {
        let cs = self
            .cross_sections
            .get(key)
            .ok_or(Error::CrossSectionNotFound(key))?;
        if let Some(geometry) = cs.geometry.get() {
            return Ok(geometry.as_slice());
        }

        let computed = match &cs.definition {
            DefinitionRef::Local(Definition::Xyz(xyz)) => xyz.vertices().to_vec(),
            _ => {
                let branch = self
                    .branches
                    .get(cs.branch)
                    .ok_or(Error::BranchNotFound(cs.branch))?;
                let view = self.definition_view(key)?;
                project_profile(&branch.geometry, cs.chainage, &view.profile(), view.thalweg())?
            }
        };
        Ok(cs.geometry.get_or_init(|| computed).as_slice())
    }

    // ── Shared pool ────────────────────────────────────────────────────

    /// Adds a definition to the shared pool. Surveyed (XYZ) definitions
    /// are tied to their location and cannot be shared.
    pub fn add_shared_definition(&mut self, definition: Definition) -> Result<DefinitionKey> {
        if !definition.is_shareable() {
            return Err(Error::invalid_operation(format!(
                "{} definition '{}' cannot be shared",
                definition.kind(),
                definition.name()
            )));
        }
        let key = self.insert_shared(definition);
        self.emit(NetworkEvent::SharedDefinitionAdded(key));
        Ok(key)
    }

    fn insert_shared(&mut self, definition: Definition) -> DefinitionKey {
        let key = self.definitions.insert(definition);
        self.shared_order.push(key);
        key
    }

    /// Removes a definition from the shared pool. Refused while any
    /// cross-section uses it; clears the default when it was the default.
    pub fn remove_shared_definition(&mut self, key: DefinitionKey) -> Result<Definition> {
        let name = self.shared(key)?.name().to_string();

        let mut users = self
            .cross_sections
            .values()
            .filter(|cs| cs.shared_definition() == Some(key));
        if let Some(example) = users.next() {
            let err = Error::DefinitionInUse {
                name,
                count: users.count() + 1,
                example: example.name.clone(),
            };
            error!("{}", err);
            return Err(err);
        }

        let definition = self
            .definitions
            .remove(key)
            .ok_or(Error::DefinitionNotFound(key))?;
        self.shared_order.retain(|k| *k != key);
        if self.default_definition == Some(key) {
            self.default_definition = None;
        }
        debug!("removed shared definition '{}'", name);
        self.emit(NetworkEvent::SharedDefinitionRemoved(key));
        Ok(definition)
    }

    pub fn shared_definition(&self, key: DefinitionKey) -> Option<&Definition> {
        self.definitions.get(key)
    }

    /// Shared definitions in insertion order.
    pub fn shared_definitions(&self) -> impl Iterator<Item = (DefinitionKey, &Definition)> {
        self.shared_order
            .iter()
            .filter_map(|k| self.definitions.get(*k).map(|d| (*k, d)))
    }

    pub fn shared_definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Number of cross-sections referencing each shared definition.
    pub fn shared_definition_usage(&self) -> FxHashMap<DefinitionKey, usize> {
        let mut usage = FxHashMap::default();
        for cs in self.cross_sections.values() {
            if let Some(key) = cs.shared_definition() {
                *usage.entry(key).or_insert(0) += 1;
            }
        }
        usage
    }

    pub fn default_definition(&self) -> Option<DefinitionKey> {
        self.default_definition
    }

    pub fn set_default_definition(&mut self, key: Option<DefinitionKey>) -> Result<()> {
        if let Some(key) = key {
            self.shared(key)?;
        }
        self.default_definition = key;
        self.emit(NetworkEvent::DefaultDefinitionChanged(key));
        Ok(())
    }

    // ── Section types ──────────────────────────────────────────────────

    pub fn section_types(&self) -> &[SectionType] {
        &self.section_types
    }

    /// Registers a section type; returns `false` when the name is taken.
    pub fn add_section_type(&mut self, section_type: SectionType) -> bool {
        if self.has_section_type(&section_type.name) {
            return false;
        }
        self.section_types.push(section_type);
        true
    }

    pub fn has_section_type(&self, name: &str) -> bool {
        self.section_types.iter().any(|t| t.is_named(name))
    }

    // ── Helpers ────────────────────────────────────────────────────────

    pub(crate) fn shared(&self, key: DefinitionKey) -> Result<&Definition> {
        self.definitions
            .get(key)
            .ok_or(Error::DefinitionNotFound(key))
    }

    pub(crate) fn cross_section_mut(&mut self, key: CrossSectionKey) -> Result<&mut CrossSection> {
        self.cross_sections
            .get_mut(key)
            .ok_or(Error::CrossSectionNotFound(key))
    }

    fn check_location(&self, branch: BranchKey, chainage: f64) -> Result<()> {
        let b = self.branches.get(branch).ok_or(Error::BranchNotFound(branch))?;
        b.geometry.locate(chainage)?;
        Ok(())
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones every entity, keeping their keys. Proxies in the clone therefore
/// resolve against the clone's own pool. Listeners are not cloned.
impl Clone for Network {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            branches: self.branches.clone(),
            cross_sections: self.cross_sections.clone(),
            definitions: self.definitions.clone(),
            shared_order: self.shared_order.clone(),
            default_definition: self.default_definition,
            section_types: self.section_types.clone(),
            listeners: SlotMap::with_key(),
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("branches", &self.branches.len())
            .field("cross_sections", &self.cross_sections.len())
            .field("shared_definitions", &self.definitions.len())
            .field("default_definition", &self.default_definition)
            .field("section_types", &self.section_types)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Moving definitions between cross-sections and the shared pool, and
//! editing them in place.
//!
//! Each entry point performs one logical mutation: it validates first,
//! mutates, reconciles sections, drops stale geometry and then emits a
//! single [`NetworkEvent`].

use slotmap::Key;
use tracing::debug;
use xsection_core::{CrossSectionDefinition, Definition};

use crate::cross_section::{DefinitionRef, Proxy};
use crate::error::{Error, Result};
use crate::events::{DefinitionTarget, NetworkEvent};
use crate::keys::{CrossSectionKey, DefinitionKey};
use crate::network::Network;

impl Network {
    /// Points a cross-section at a shared definition with no level shift.
    /// Whatever it held before is dropped.
    pub fn use_shared_definition(
        &mut self,
        cross_section: CrossSectionKey,
        definition: DefinitionKey,
    ) -> Result<()> {
        self.shared(definition)?;
        let cs = self.cross_section_mut(cross_section)?;
        cs.definition = Proxy::new(definition).into();
        cs.invalidate_geometry();
        self.emit(NetworkEvent::DefinitionShared {
            cross_section,
            definition,
        });
        Ok(())
    }

    /// Moves the cross-section's own definition into the shared pool and
    /// replaces it with a proxy (level shift 0) over that same entry.
    ///
    /// Surveyed (XYZ) definitions are refused and the pool is left
    /// untouched; so is a cross-section that already uses a proxy.
    pub fn share_definition_and_change_to_proxy(
        &mut self,
        cross_section: CrossSectionKey,
    ) -> Result<DefinitionKey> {
        let cs = self
            .cross_sections
            .get_mut(cross_section)
            .ok_or(Error::CrossSectionNotFound(cross_section))?;
        match &cs.definition {
            DefinitionRef::Shared(_) => {
                return Err(Error::invalid_operation(format!(
                    "cross section '{}' already uses a shared definition",
                    cs.name
                )))
            }
            DefinitionRef::Local(def) if !def.is_shareable() => {
                return Err(Error::invalid_operation(format!(
                    "cannot share the {} definition of cross section '{}'",
                    def.kind(),
                    cs.name
                )))
            }
            DefinitionRef::Local(_) => {}
        }

        let placeholder = DefinitionRef::Shared(Proxy::new(DefinitionKey::null()));
        let DefinitionRef::Local(definition) = std::mem::replace(&mut cs.definition, placeholder)
        else {
            return Err(Error::invalid_operation("cross section has no local definition"));
        };
        let key = self.definitions.insert(definition);
        self.shared_order.push(key);
        cs.definition = Proxy::new(key).into();
        debug!("shared definition of cross section '{}'", cs.name);

        self.emit(NetworkEvent::DefinitionShared {
            cross_section,
            definition: key,
        });
        Ok(key)
    }

    /// Replaces a proxy with an owned copy of what it shows: the shared
    /// definition raised by the proxy's level shift. A cross-section that
    /// already owns its definition is left as it is.
    pub fn make_definition_local(&mut self, cross_section: CrossSectionKey) -> Result<()> {
        let localized = {
            let view = self.definition_view(cross_section)?;
            if !view.is_proxy() {
                return Ok(());
            }
            view.localized()?
        };

        let cs = self.cross_section_mut(cross_section)?;
        cs.definition = DefinitionRef::Local(localized);
        cs.invalidate_geometry();
        debug!("made definition of cross section '{}' local", cs.name);
        self.emit(NetworkEvent::DefinitionLocalized { cross_section });
        Ok(())
    }

    /// Swaps the shared definition behind a proxy, keeping its level shift.
    pub fn set_proxy_inner(
        &mut self,
        cross_section: CrossSectionKey,
        inner: DefinitionKey,
    ) -> Result<()> {
        self.shared(inner)?;
        let proxy = self.proxy_mut(cross_section)?;
        proxy.inner = inner;
        self.cross_section_mut(cross_section)?.invalidate_geometry();
        self.emit(NetworkEvent::ProxyInnerChanged {
            cross_section,
            inner,
        });
        Ok(())
    }

    pub fn set_proxy_level_shift(
        &mut self,
        cross_section: CrossSectionKey,
        level_shift: f64,
    ) -> Result<()> {
        if !level_shift.is_finite() {
            return Err(xsection_core::Error::from(xsection_core::DataError::NotFinite).into());
        }
        let proxy = self.proxy_mut(cross_section)?;
        proxy.level_shift = level_shift;
        self.cross_section_mut(cross_section)?.invalidate_geometry();
        self.emit(NetworkEvent::LevelShiftChanged {
            cross_section,
            level_shift,
        });
        Ok(())
    }

    /// Raises a cross-section's profile by `delta`. Proxies accumulate the
    /// shift; owned definitions get it baked into their data.
    pub fn shift_level(&mut self, cross_section: CrossSectionKey, delta: f64) -> Result<()> {
        let cs = self
            .cross_sections
            .get(cross_section)
            .ok_or(Error::CrossSectionNotFound(cross_section))?;
        match &cs.definition {
            DefinitionRef::Shared(proxy) => {
                let shifted = proxy.level_shift + delta;
                self.set_proxy_level_shift(cross_section, shifted)
            }
            DefinitionRef::Local(_) => self.edit_local(cross_section, |def| def.shift_level(delta)),
        }
    }

    /// Runs `edit` on the definition a cross-section shows. For a proxy
    /// this is the shared definition, so every cross-section using it
    /// sees the change.
    ///
    /// `edit` works on a copy that replaces the definition only when it
    /// succeeds; on failure the definition keeps its prior state and no
    /// event is emitted. A shared definition cannot be turned into a
    /// surveyed (XYZ) one.
    pub fn edit_definition<R>(
        &mut self,
        cross_section: CrossSectionKey,
        edit: impl FnOnce(&mut Definition) -> xsection_core::Result<R>,
    ) -> Result<R> {
        let cs = self
            .cross_sections
            .get(cross_section)
            .ok_or(Error::CrossSectionNotFound(cross_section))?;
        match &cs.definition {
            DefinitionRef::Shared(proxy) => {
                let inner = proxy.inner;
                self.edit_shared_definition(inner, edit)
            }
            DefinitionRef::Local(_) => self.edit_local(cross_section, edit),
        }
    }

    /// Runs `edit` on a copy of a shared definition and commits it, then
    /// refits its sections and drops the geometry of every cross-section
    /// using it. Edits that fail or turn it into a surveyed (XYZ)
    /// definition leave the pool untouched.
    pub fn edit_shared_definition<R>(
        &mut self,
        key: DefinitionKey,
        edit: impl FnOnce(&mut Definition) -> xsection_core::Result<R>,
    ) -> Result<R> {
        let definition = self
            .definitions
            .get_mut(key)
            .ok_or(Error::DefinitionNotFound(key))?;
        let mut candidate = definition.clone();
        let result = edit(&mut candidate)?;
        if !candidate.is_shareable() {
            return Err(Error::invalid_operation(format!(
                "shared definition '{}' cannot become a {} definition",
                definition.name(),
                candidate.kind()
            )));
        }
        *definition = candidate;
        let section_change = definition.adjust_section_widths_with(
            &self.settings.main_section_name,
            self.settings.width_tolerance,
        );

        for cs in self
            .cross_sections
            .values_mut()
            .filter(|cs| cs.shared_definition() == Some(key))
        {
            cs.invalidate_geometry();
        }
        self.emit(NetworkEvent::DefinitionChanged {
            target: DefinitionTarget::Shared(key),
            section_change,
        });
        Ok(result)
    }

    fn edit_local<R>(
        &mut self,
        cross_section: CrossSectionKey,
        edit: impl FnOnce(&mut Definition) -> xsection_core::Result<R>,
    ) -> Result<R> {
        let cs = self
            .cross_sections
            .get_mut(cross_section)
            .ok_or(Error::CrossSectionNotFound(cross_section))?;
        let DefinitionRef::Local(definition) = &mut cs.definition else {
            return Err(Error::invalid_operation(format!(
                "cross section '{}' does not own its definition",
                cs.name
            )));
        };

        let mut candidate = definition.clone();
        let result = edit(&mut candidate)?;
        *definition = candidate;
        let section_change = definition.adjust_section_widths_with(
            &self.settings.main_section_name,
            self.settings.width_tolerance,
        );
        cs.invalidate_geometry();
        self.emit(NetworkEvent::DefinitionChanged {
            target: DefinitionTarget::Local(cross_section),
            section_change,
        });
        Ok(result)
    }

    fn proxy_mut(&mut self, cross_section: CrossSectionKey) -> Result<&mut Proxy> {
        let cs = self.cross_section_mut(cross_section)?;
        match &mut cs.definition {
            DefinitionRef::Shared(proxy) => Ok(proxy),
            DefinitionRef::Local(_) => Err(Error::invalid_operation(format!(
                "cross section '{}' does not use a shared definition",
                cs.name
            ))),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change notifications.
//!
//! Every mutating entry point of [`Network`](crate::Network) emits exactly
//! one event after the mutation is complete and derived state (sections,
//! cached geometry) has been brought up to date.

use xsection_core::SectionWidthChange;

use crate::keys::{CrossSectionKey, DefinitionKey};

/// Where an edited definition lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionTarget {
    /// Owned by a cross-section
    Local(CrossSectionKey),
    /// In the shared pool
    Shared(DefinitionKey),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    DefinitionChanged {
        target: DefinitionTarget,
        /// Set when reconciliation resized a section
        section_change: Option<SectionWidthChange>,
    },
    ProxyInnerChanged {
        cross_section: CrossSectionKey,
        inner: DefinitionKey,
    },
    LevelShiftChanged {
        cross_section: CrossSectionKey,
        level_shift: f64,
    },
    DefinitionShared {
        cross_section: CrossSectionKey,
        definition: DefinitionKey,
    },
    DefinitionLocalized {
        cross_section: CrossSectionKey,
    },
    SharedDefinitionAdded(DefinitionKey),
    SharedDefinitionRemoved(DefinitionKey),
    DefaultDefinitionChanged(Option<DefinitionKey>),
    CrossSectionAdded(CrossSectionKey),
    CrossSectionRemoved(CrossSectionKey),
}

/// Boxed change listener.
pub type Listener = Box<dyn FnMut(&NetworkEvent)>;

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # XSection Network
//!
//! Hosts cross-sections on the branches of a 1-D network.
//!
//! Entities are stored in slot maps keyed by generational indices. A
//! cross-section either owns its definition or holds a [`Proxy`]: a key
//! into the network's shared pool plus a level shift. Proxies are
//! transparent: a [`DefinitionView`] shows the shared profile raised by the
//! shift, and [`Network::make_definition_local`] turns it into an owned
//! copy with the same profile.
//!
//! Mutations go through [`Network`] methods, which keep sections and cached
//! world geometry consistent and notify subscribers with one
//! [`NetworkEvent`] per call.

pub mod branch;
pub mod cross_section;
pub mod error;
pub mod events;
pub mod keys;
pub mod network;
mod sharing;
mod transfer;
pub mod validation;

pub use branch::{Branch, BranchKind};
pub use cross_section::{CrossSection, DefinitionRef, DefinitionView, Proxy};
pub use error::{Error, Result};
pub use events::{DefinitionTarget, Listener, NetworkEvent};
pub use keys::{BranchKey, CrossSectionKey, DefinitionKey, ListenerKey};
pub use network::Network;
pub use validation::{Severity, ValidationIssue};

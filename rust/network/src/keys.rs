// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and stay valid while other
//! entries are inserted or removed (generational indices). A cloned
//! network keeps the keys of the original, so a proxy pointing into the
//! shared pool resolves against whichever network holds it.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a branch.
    pub struct BranchKey;

    /// Key for a definition in the shared pool.
    pub struct DefinitionKey;

    /// Key for a cross-section.
    pub struct CrossSectionKey;

    /// Key for a registered change listener.
    pub struct ListenerKey;
}

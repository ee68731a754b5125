// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(feature = "serde")]

use xsection_core::{CrossSectionDefinition, Definition, SectionType, YzDefinition};

#[test]
fn yz_profile_cache_is_rebuilt_after_deserializing() {
    let mut yz = YzDefinition::from_coordinates("yz", [(10.0, 0.0), (0.0, 2.0)]).unwrap();
    yz.add_section(SectionType::main(), 10.0).unwrap();
    // populate the cache before serializing
    assert_eq!(yz.profile()[0].offset, 0.0);

    let def: Definition = yz.into();
    let json = serde_json::to_string(&def).unwrap();
    assert!(!json.contains("sorted"));

    let back: Definition = serde_json::from_str(&json).unwrap();
    assert_eq!(back.profile(), def.profile());
    assert_eq!(back.sections(), def.sections());
}

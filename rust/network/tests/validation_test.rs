// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nalgebra::Point2;
use xsection_core::{
    CrossSectionDefinition, Definition, SectionType, StandardDefinition, StandardShape,
    YzDefinition,
};
use xsection_geometry::BranchGeometry;
use xsection_network::validation::NOT_ALLOWED_ON_ENCLOSED_BRANCH;
use xsection_network::{BranchKind, Network, Proxy, Severity};

fn straight() -> BranchGeometry {
    BranchGeometry::straight(Point2::new(0.0, 0.0), Point2::new(50.0, 0.0)).unwrap()
}

#[test]
fn open_channel_profile_on_a_sewer_is_reported() {
    let mut network = Network::new();
    let sewer = network.add_branch("sewer", straight(), BranchKind::Enclosed);
    let def: Definition = YzDefinition::create_default("yz", 10.0).into();
    let cs = network.add_cross_section("cs", sewer, 10.0, def.into()).unwrap();
    let pipe = StandardDefinition::new("pipe", StandardShape::Circle { diameter: 0.8 }).unwrap();
    let ok = network
        .add_cross_section("pipe", sewer, 20.0, Definition::from(pipe).into())
        .unwrap();

    let issues = network.validate_cross_section(cs).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].message, NOT_ALLOWED_ON_ENCLOSED_BRANCH);

    assert!(network.validate_cross_section(ok).unwrap().is_empty());
}

#[test]
fn proxies_are_validated_through_their_shared_definition() {
    let mut network = Network::new();
    let branch = network.add_branch("river", straight(), BranchKind::Open);
    let mut yz = YzDefinition::create_default("yz", 100.0);
    yz.add_section(SectionType::main(), 60.0).unwrap();
    let shared = network.add_shared_definition(yz.into()).unwrap();
    let first = network
        .add_cross_section("cs1", branch, 10.0, Proxy::with_level_shift(shared, 2.0).into())
        .unwrap();
    network.add_shared_cross_section("cs2", branch, 30.0, shared).unwrap();

    let issues = network.validate_cross_section(first).unwrap();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("does not match its maximum flow width"));
    assert_eq!(network.validate().len(), 2);

    network
        .edit_shared_definition(shared, |def| {
            def.adjust_section_widths();
            Ok(())
        })
        .unwrap();
    assert!(network.validate().is_empty());
}

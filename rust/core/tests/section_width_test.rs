// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use xsection_core::{
    CrossSectionDefinition, Definition, Section, SectionRejection, SectionType,
    StandardDefinition, YzDefinition, ZwDefinition, ZwRow,
};

fn yz_100() -> YzDefinition {
    YzDefinition::create_default("myCrossSectionDefinition", 100.0)
}

fn push(def: &mut impl CrossSectionDefinition, name: &str, min: f64, max: f64) {
    def.header_mut()
        .sections
        .push(Section::new(SectionType::new(name), min, max));
}

#[test]
fn main_section_not_first_is_still_the_one_resized() {
    let mut def = yz_100();
    push(&mut def, "Custom", 10.0, 20.0);
    push(&mut def, "Main", 25.0, 75.0);

    let change = def.adjust_section_widths().expect("main section resized");
    assert_eq!(change.section_type, "Main");
    assert_relative_eq!(change.old_width, 50.0);
    assert_relative_eq!(change.new_width, 90.0);

    let sections = def.sections();
    assert_relative_eq!(sections[0].min_offset, 0.0);
    assert_relative_eq!(sections[0].max_offset, 10.0);
    assert_relative_eq!(sections[1].min_offset, 10.0);
    assert_relative_eq!(sections[1].max_offset, 100.0);
}

#[test]
fn main_section_widens_with_the_profile() {
    let mut def = YzDefinition::create_default("profile", 100.0);
    def.add_section(SectionType::floodplain1(), 20.0).unwrap();
    def.add_section(SectionType::main(), 60.0).unwrap();
    def.add_section(SectionType::floodplain2(), 20.0).unwrap();
    assert!(def.adjust_section_widths().is_none());

    // widen the profile by moving the right bank out
    let last = def.rows().len() - 1;
    def.set_offset(last, 150.0).unwrap();

    let change = def.adjust_section_widths().unwrap();
    assert_eq!(change.section_type, "Main");
    assert_relative_eq!(change.new_width, 110.0);
    assert_relative_eq!(def.sections()[2].max_offset, 150.0);
    assert!(def.adjust_section_widths().is_none());
}

#[test]
fn first_section_resized_without_main() {
    let mut def = yz_100();
    push(&mut def, "FloodPlain1", 10.0, 20.0);
    push(&mut def, "FloodPlain2", 20.0, 80.0);
    push(&mut def, "Custom", 80.0, 90.0);

    let change = def.adjust_section_widths().unwrap();
    assert_eq!(
        change.to_string(),
        "The FloodPlain1 section width of cross section myCrossSectionDefinition has been changed from 10m to 30m"
    );
}

#[test]
fn zw_sections_cover_the_deflated_half_width() {
    let mut def = ZwDefinition::new("zw");
    def.add_row(10.0, 100.0, 40.0).unwrap();
    def.add_row(6.0, 50.0, 40.0).unwrap();
    def.add_row(0.0, 0.0, 0.0).unwrap();

    def.add_section(SectionType::main(), 60.0).unwrap();
    assert!(def.adjust_section_widths().is_none());
    assert_relative_eq!(def.sections_total_width(), def.flow_width());
}

#[test]
fn add_section_rejections_leave_sections_untouched() {
    let mut def = yz_100();
    def.add_section(SectionType::new("section1"), 10.0).unwrap();

    let negative = def
        .add_section(SectionType::new("section2"), -2.0)
        .unwrap_err();
    assert_eq!(
        negative.to_string(),
        "Could not add CrossSectionSection with negative length -2 to cross section definition 'myCrossSectionDefinition'"
    );

    let duplicate = def
        .add_section(SectionType::new("section1"), 2.0)
        .unwrap_err();
    assert_eq!(
        duplicate,
        SectionRejection::DuplicateName {
            name: "section1".into()
        }
    );
    assert_eq!(def.sections().len(), 1);

    // names compare case-insensitively, as in section refitting
    assert!(def.add_section(SectionType::new("SECTION1"), 2.0).is_err());
    assert_eq!(def.sections().len(), 1);
}

#[test]
fn sections_start_at_the_lower_bound() {
    let mut def = ZwDefinition::from_rows(
        "zw",
        [ZwRow::new(0.0, 40.0, 0.0), ZwRow::new(-5.0, 20.0, 0.0)],
    )
    .unwrap();
    let first = def.add_section(SectionType::main(), 20.0).unwrap().clone();
    assert_eq!((first.min_offset, first.max_offset), (0.0, 10.0));
    let second = def.add_section(SectionType::floodplain1(), 20.0).unwrap();
    assert_eq!((second.min_offset, second.max_offset), (10.0, 20.0));
}

#[test]
fn definition_enum_dispatches_to_variant() {
    let mut def: Definition = StandardDefinition::create_default("std").into();
    push(&mut def, "Main", -0.35, 0.35);
    let change = def.adjust_section_widths().unwrap();
    assert_relative_eq!(change.old_width, 0.7, epsilon = 1e-12);
    assert_relative_eq!(change.new_width, 1.0);

    let mut zw: Definition = ZwDefinition::create_default("zw", 100.0).into();
    assert_eq!(zw.section_width_factor(), 2.0);
    zw.add_section(SectionType::main(), 100.0).unwrap();
    assert_relative_eq!(zw.sections()[0].max_offset, 50.0);
}

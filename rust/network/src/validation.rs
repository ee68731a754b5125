// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model checks run before a network is handed to a solver.
//!
//! Unlike edit-time cell validation these never block a mutation; they
//! collect [`ValidationIssue`]s for the caller to report.

use std::fmt;

use xsection_core::{Definition, FLOODPLAIN1_SECTION_TYPE_NAME, FLOODPLAIN2_SECTION_TYPE_NAME};

use crate::branch::BranchKind;
use crate::cross_section::DefinitionView;
use crate::error::{Error, Result};
use crate::keys::CrossSectionKey;
use crate::network::Network;

pub const NOT_ALLOWED_ON_ENCLOSED_BRANCH: &str =
    "Cross-sections on enclosed branches are not supported.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub cross_section: CrossSectionKey,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.severity, self.message)
    }
}

/// The sections together span the flow width. A definition without
/// sections always passes.
pub fn sections_match_flow_width(view: &DefinitionView<'_>, tolerance: f64) -> bool {
    if view.sections().is_empty() {
        return true;
    }
    (view.sections_total_width() - view.flow_width()).abs() <= tolerance
}

/// With three or more sections, the second floodplain may only carry width
/// when the first one does.
pub fn floodplains_valid(view: &DefinitionView<'_>) -> bool {
    let sections = view.sections();
    if sections.len() < 3 {
        return true;
    }
    let width_of = |name: &str| {
        sections
            .iter()
            .find(|s| s.is_named(name))
            .map(|s| s.width())
    };
    match (
        width_of(FLOODPLAIN1_SECTION_TYPE_NAME),
        width_of(FLOODPLAIN2_SECTION_TYPE_NAME),
    ) {
        (Some(fp1), Some(fp2)) => !(fp1 == 0.0 && fp2 > 0.0),
        _ => true,
    }
}

/// Only tabulated level/width definitions can have a degenerate flow
/// profile; everything else passes.
pub fn flow_profile_valid(definition: &Definition) -> bool {
    match definition {
        Definition::Zw(zw) => zw.is_flow_profile_valid(),
        Definition::Standard(standard) => standard
            .tabulated()
            .map_or(false, |zw| zw.is_flow_profile_valid()),
        _ => true,
    }
}

/// Enclosed branches (pipes, sewers) accept only closed standard shapes.
pub fn allowed_on_branch(definition: &Definition, kind: BranchKind) -> Result<()> {
    match (kind, definition) {
        (BranchKind::Open, _) => Ok(()),
        (BranchKind::Enclosed, Definition::Standard(standard))
            if standard.allowed_on_enclosed_branch() =>
        {
            Ok(())
        }
        (BranchKind::Enclosed, _) => Err(Error::invalid_operation(NOT_ALLOWED_ON_ENCLOSED_BRANCH)),
    }
}

impl Network {
    /// Runs every check against one cross-section.
    pub fn validate_cross_section(&self, key: CrossSectionKey) -> Result<Vec<ValidationIssue>> {
        let cs = self
            .cross_sections
            .get(key)
            .ok_or(Error::CrossSectionNotFound(key))?;
        let branch = self
            .branches
            .get(cs.branch)
            .ok_or(Error::BranchNotFound(cs.branch))?;
        let view = self.definition_view(key)?;
        let definition = view.definition();

        let mut issues = Vec::new();
        let mut report = |severity, message: String| {
            issues.push(ValidationIssue {
                cross_section: key,
                severity,
                message,
            })
        };

        if allowed_on_branch(definition, branch.kind).is_err() {
            report(Severity::Error, NOT_ALLOWED_ON_ENCLOSED_BRANCH.to_string());
        }
        if view.profile().is_empty() {
            report(
                Severity::Error,
                format!("Cross section '{}' has no geometry.", cs.name),
            );
        }
        if !flow_profile_valid(definition) {
            report(
                Severity::Error,
                format!(
                    "Tabulated cross section '{}' cannot have 0 flow width above its deepest point.",
                    cs.name
                ),
            );
        }
        if !sections_match_flow_width(&view, self.settings.width_tolerance) {
            report(
                Severity::Error,
                format!(
                    "Total width of the sections of cross section '{}' ({}m) does not match its maximum flow width ({}m).",
                    cs.name,
                    view.sections_total_width(),
                    view.flow_width()
                ),
            );
        }
        if !floodplains_valid(&view) {
            report(
                Severity::Error,
                format!(
                    "Cross section '{}' has a {} section without width followed by a {} section with width.",
                    cs.name, FLOODPLAIN1_SECTION_TYPE_NAME, FLOODPLAIN2_SECTION_TYPE_NAME
                ),
            );
        }
        Ok(issues)
    }

    /// Runs every check against every cross-section.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.cross_sections
            .keys()
            .filter_map(|key| self.validate_cross_section(key).ok())
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xsection_core::{
        CrossSectionDefinition, SectionType, StandardDefinition, StandardShape, YzDefinition,
        ZwDefinition,
    };

    fn zw_with_sections(widths: &[(&str, f64)]) -> Definition {
        // flow width 45
        let mut zw = ZwDefinition::from_rows(
            "zw",
            [(0.0, 45.0, 0.0), (-5.0, 20.0, 0.0)]
                .into_iter()
                .map(|(l, t, s)| xsection_core::ZwRow::new(l, t, s)),
        )
        .unwrap();
        for (name, width) in widths {
            zw.add_section(SectionType::new(*name), *width).unwrap();
        }
        zw.into()
    }

    fn check(def: &Definition) -> (bool, bool) {
        let view = DefinitionView::new(def, 0.0, false);
        (sections_match_flow_width(&view, 1e-5), floodplains_valid(&view))
    }

    #[test]
    fn no_sections_is_valid() {
        assert_eq!(check(&zw_with_sections(&[])), (true, true));
    }

    #[test]
    fn section_widths_must_sum_to_flow_width() {
        assert!(check(&zw_with_sections(&[("Main", 45.0)])).0);
        assert!(!check(&zw_with_sections(&[("Main", 20.0)])).0);
        assert!(check(&zw_with_sections(&[("Main", 30.0), ("FloodPlain1", 15.0)])).0);
        assert!(!check(&zw_with_sections(&[("Main", 45.0), ("FloodPlain1", 5.0)])).0);
    }

    #[test]
    fn empty_first_floodplain_before_wide_second() {
        let def = zw_with_sections(&[("Main", 10.0), ("FloodPlain1", 0.0), ("FloodPlain2", 3.0)]);
        assert!(!check(&def).1);
        let def = zw_with_sections(&[("Main", 10.0), ("FloodPlain1", 3.0), ("FloodPlain2", 0.0)]);
        assert!(check(&def).1);
        let def = zw_with_sections(&[("Main", 10.0), ("FloodPlain1", 1.0), ("FloodPlain2", 3.0)]);
        assert!(check(&def).1);
    }

    #[test]
    fn enclosed_branches_need_closed_shapes() {
        let yz: Definition = YzDefinition::create_default("yz", 10.0).into();
        assert!(allowed_on_branch(&yz, BranchKind::Open).is_ok());
        let err = allowed_on_branch(&yz, BranchKind::Enclosed).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Invalid operation: {}", NOT_ALLOWED_ON_ENCLOSED_BRANCH)
        );

        let pipe: Definition = StandardDefinition::new("pipe", StandardShape::Circle { diameter: 1.0 })
            .unwrap()
            .into();
        assert!(allowed_on_branch(&pipe, BranchKind::Enclosed).is_ok());

        let ditch: Definition = StandardDefinition::new(
            "ditch",
            StandardShape::Trapezium {
                slope: 2.0,
                bottom_width: 1.0,
                top_width: 5.0,
            },
        )
        .unwrap()
        .into();
        assert!(allowed_on_branch(&ditch, BranchKind::Enclosed).is_err());
    }
}

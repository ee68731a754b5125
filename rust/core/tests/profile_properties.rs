// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based invariants of cross-section definitions.
//!
//! Verifies:
//! 1. Width is max(offset) - min(offset) and survives a level shift
//! 2. Adding a duplicate-named section never grows the section list
//! 3. The flow profile of a shifted definition is the shifted flow profile
//! 4. Section reconciliation is idempotent

use approx::assert_relative_eq;
use proptest::prelude::*;
use xsection_core::{
    CrossSectionDefinition, SectionType, YzDefinition, YzRow, ZwDefinition, ZwRow,
};

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_yz() -> impl Strategy<Value = YzDefinition> {
    prop::collection::vec((-100.0..100.0f64, -50.0..50.0f64, 0.0..5.0f64), 2..20).prop_map(
        |rows| {
            let mut def = YzDefinition::new("yz");
            for (i, (offset, elevation, storage)) in rows.into_iter().enumerate() {
                def.insert_row(i, YzRow::new(offset, elevation, storage))
                    .expect("generated rows are valid");
            }
            def
        },
    )
}

fn arb_zw() -> impl Strategy<Value = ZwDefinition> {
    prop::collection::btree_map(-50i32..50, (0.0..100.0f64, 0.0..1.0f64), 1..12).prop_map(
        |rows| {
            ZwDefinition::from_rows(
                "zw",
                rows.into_iter().map(|(level, (total, fraction))| {
                    ZwRow::new(level as f64, total, total * fraction)
                }),
            )
            .expect("generated levels are unique")
        },
    )
}

fn arb_section_widths() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..60.0f64, 1..5)
}

fn offset_span<D: CrossSectionDefinition>(def: &D) -> f64 {
    let offsets: Vec<f64> = def.profile().iter().map(|p| p.offset).collect();
    let max = offsets.iter().cloned().fold(f64::MIN, f64::max);
    let min = offsets.iter().cloned().fold(f64::MAX, f64::min);
    max - min
}

proptest! {
    #[test]
    fn yz_width_is_offset_span_and_shift_invariant(def in arb_yz(), delta in -100.0..100.0f64) {
        let width = def.width();
        prop_assert_eq!(width, offset_span(&def));

        let mut shifted = def.clone();
        shifted.shift_level(delta).unwrap();
        prop_assert_eq!(shifted.width(), width);
    }

    #[test]
    fn zw_width_is_offset_span_and_shift_invariant(def in arb_zw(), delta in -100.0..100.0f64) {
        let width = def.width();
        prop_assert_eq!(width, offset_span(&def));

        let mut shifted = def.clone();
        shifted.shift_level(delta).unwrap();
        prop_assert_eq!(shifted.width(), width);
    }

    #[test]
    fn yz_flow_profile_follows_shift(def in arb_yz(), delta in -100.0..100.0f64) {
        let before = def.flow_profile();
        let mut shifted = def.clone();
        shifted.shift_level(delta).unwrap();
        let after = shifted.flow_profile();

        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            prop_assert_eq!(b.offset, a.offset);
            assert_relative_eq!(b.elevation + delta, a.elevation, epsilon = 1e-9);
        }
    }

    #[test]
    fn zw_flow_profile_follows_shift(def in arb_zw(), delta in -100.0..100.0f64) {
        let before = def.flow_profile();
        let mut shifted = def.clone();
        shifted.shift_level(delta).unwrap();
        let after = shifted.flow_profile();

        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            prop_assert_eq!(b.offset, a.offset);
            assert_relative_eq!(b.elevation + delta, a.elevation, epsilon = 1e-9);
        }
    }

    #[test]
    fn duplicate_section_never_added(def in arb_yz(), widths in arb_section_widths()) {
        let mut def = def;
        for (i, w) in widths.iter().enumerate() {
            def.add_section(SectionType::new(format!("section{i}")), *w).unwrap();
        }
        let count = def.sections().len();
        prop_assert!(def.add_section(SectionType::new("section0"), 1.0).is_err());
        prop_assert_eq!(def.sections().len(), count);
    }

    #[test]
    fn reconciliation_is_idempotent(def in arb_zw(), widths in arb_section_widths()) {
        let mut def = def;
        for (i, w) in widths.iter().enumerate() {
            def.add_section(SectionType::new(format!("section{i}")), *w).unwrap();
        }
        def.adjust_section_widths();
        let sections = def.sections().to_vec();

        prop_assert!(def.adjust_section_widths().is_none());
        prop_assert_eq!(def.sections().len(), sections.len());
        for (after, before) in def.sections().iter().zip(&sections) {
            prop_assert_eq!(after.name(), before.name());
            assert_relative_eq!(after.min_offset, before.min_offset, epsilon = 1e-9);
            assert_relative_eq!(after.max_offset, before.max_offset, epsilon = 1e-9);
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section reconciliation.
//!
//! After a profile changes width, its sections no longer tile the section
//! bounds. [`reconcile_sections`] resizes one designated section (the one
//! named like the main section type, otherwise the first) so that the
//! partition spans the bounds again, and repacks every section contiguously
//! in list order starting at the lower bound.

use crate::section::{Section, SectionBounds};

/// Outcome of a reconciliation: the designated section and its widths
/// expressed in definition units (range length times width factor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resize {
    pub index: usize,
    pub old_width: f64,
    pub new_width: f64,
}

/// Index of the section that absorbs width changes.
pub fn designated_section(sections: &[Section], main_name: &str) -> Option<usize> {
    if sections.is_empty() {
        return None;
    }
    Some(
        sections
            .iter()
            .position(|s| s.is_named(main_name))
            .unwrap_or(0),
    )
}

/// Restores a gap-free, order-preserving partition of `bounds`.
///
/// Returns `Some` only when the designated section's width changed by more
/// than `tolerance`, so a second call without an intervening profile change
/// returns `None` and leaves the boundaries untouched.
pub fn reconcile_sections(
    sections: &mut [Section],
    bounds: SectionBounds,
    width_factor: f64,
    main_name: &str,
    tolerance: f64,
) -> Option<Resize> {
    let index = designated_section(sections, main_name)?;

    let others: f64 = sections
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, s)| s.width())
        .sum();

    let old_range = sections[index].width();
    let new_range = (bounds.range() - others).max(0.0);

    let mut cursor = bounds.min;
    for (i, section) in sections.iter_mut().enumerate() {
        let range = if i == index { new_range } else { section.width() };
        section.min_offset = cursor;
        section.max_offset = cursor + range;
        cursor += range;
    }

    let old_width = old_range * width_factor;
    let new_width = new_range * width_factor;
    if (new_width - old_width).abs() > tolerance {
        Some(Resize {
            index,
            old_width,
            new_width,
        })
    } else {
        None
    }
}

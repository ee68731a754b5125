// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable defaults, optionally loaded from environment variables.

use crate::section::{
    FLOODPLAIN1_SECTION_TYPE_NAME, FLOODPLAIN2_SECTION_TYPE_NAME, MAIN_SECTION_TYPE_NAME,
};

/// Width of the profiles produced by the `create_default` constructors.
pub const DEFAULT_PROFILE_WIDTH: f64 = 100.0;

/// Two widths closer than this are considered equal.
pub const DEFAULT_WIDTH_TOLERANCE: f64 = 1e-5;

/// Cross-section settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Width used for newly created default profiles.
    pub default_width: f64,
    /// Tolerance for width comparisons (section fitting, validation).
    pub width_tolerance: f64,
    /// Name of the section type that absorbs width changes.
    pub main_section_name: String,
    /// Section types registered on a fresh network, in order.
    pub default_section_types: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables, falling back to the defaults.
    ///
    /// - `XSECTION_DEFAULT_WIDTH`
    /// - `XSECTION_WIDTH_TOLERANCE`
    /// - `XSECTION_MAIN_SECTION`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`], reading values through `lookup`.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_width: lookup("XSECTION_DEFAULT_WIDTH")
                .and_then(|v| v.trim().parse().ok())
                .filter(|w: &f64| w.is_finite() && *w > 0.0)
                .unwrap_or(defaults.default_width),
            width_tolerance: lookup("XSECTION_WIDTH_TOLERANCE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                .unwrap_or(defaults.width_tolerance),
            main_section_name: lookup("XSECTION_MAIN_SECTION")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.main_section_name),
            default_section_types: defaults.default_section_types,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_PROFILE_WIDTH,
            width_tolerance: DEFAULT_WIDTH_TOLERANCE,
            main_section_name: MAIN_SECTION_TYPE_NAME.to_string(),
            default_section_types: vec![
                MAIN_SECTION_TYPE_NAME.to_string(),
                FLOODPLAIN1_SECTION_TYPE_NAME.to_string(),
                FLOODPLAIN2_SECTION_TYPE_NAME.to_string(),
            ],
        }
    }
}

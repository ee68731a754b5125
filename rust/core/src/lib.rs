// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # XSection Core
//!
//! Hydraulic cross-section definitions: the transverse profile (lateral
//! offset against bed elevation) of a channel or sewer at one location,
//! partitioned into named sections.
//!
//! ## Overview
//!
//! - **Representations**: tabulated offset/elevation ([`YzDefinition`]),
//!   tabulated level/width ([`ZwDefinition`]), surveyed 3-D points
//!   ([`XyzDefinition`]) and parametric shapes ([`StandardDefinition`]),
//!   unified by [`CrossSectionDefinition`] and the [`Definition`] enum
//! - **Sections**: named sub-ranges of the profile, refitted by
//!   [`CrossSectionDefinition::adjust_section_widths`] whenever the profile
//!   changes width
//! - **Cell validation**: typed per-column checks used by table editors
//!   before committing an edit
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use xsection_core::{CrossSectionDefinition, SectionType, ZwDefinition};
//!
//! let mut def = ZwDefinition::new("culvert");
//! def.add_row(10.0, 100.0, 40.0)?;
//! def.add_row(6.0, 50.0, 40.0)?;
//! def.add_row(0.0, 0.0, 0.0)?;
//!
//! assert_eq!(def.width(), 100.0);
//! def.add_section(SectionType::main(), 60.0).ok();
//! ```
//!
//! ## Diagnostics
//!
//! Rejected sections and section resizes are reported through
//! [`tracing`](https://docs.rs/tracing) and also returned to the caller.
//! The crate never installs a subscriber.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for definitions and sections

pub mod config;
pub mod definition;
pub mod error;
pub mod point;
pub mod reconcile;
pub mod section;
pub mod validation;

pub use config::{Settings, DEFAULT_PROFILE_WIDTH, DEFAULT_WIDTH_TOLERANCE};
pub use definition::{
    create_default, CrossSectionDefinition, Definition, DefinitionHeader, DefinitionKind,
    StandardDefinition, StandardShape, XyzColumn, XyzDefinition, YzColumn, YzDefinition, YzRow,
    ZwColumn, ZwDefinition, ZwRow,
};
pub use error::{DataError, Error, Result};
pub use point::ProfilePoint;
pub use section::{
    Section, SectionBounds, SectionRejection, SectionType, SectionWidthChange,
    FLOODPLAIN1_SECTION_TYPE_NAME, FLOODPLAIN2_SECTION_TYPE_NAME, MAIN_SECTION_TYPE_NAME,
};
pub use validation::{CellFailure, CellValidation, CellValue};

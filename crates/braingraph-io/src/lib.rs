// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! # Braingraph I/O
//!
//! Streaming access to the per-subject input files of a connectome build:
//! - MRI Studio fiber-track files (`FiberReader` / `FiberWriter`)
//! - Labeled atlas and boolean brain-mask volumes with bounded lookups
//! - The fixed Desikan region-name table and label translation
//!
//! The fiber reader is lazy and single-pass: exactly one record's header and
//! payload are read per step, so multi-gigabyte track files never have to fit
//! in memory.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
mod fiber;
pub mod regions;
mod volume;

pub use error::{FiberError, VolumeError};
pub use fiber::{
    FiberFileHeader, FiberReader, FiberWriter, FIBER_DATA_OFFSET, FIBER_FILE_TAG,
    FIBER_RECORD_HEADER_LEN, PLACEHOLDER_PAYLOAD_LEN,
};
pub use volume::{read_shape, AtlasSource, AtlasVolume, MaskSource, MaskVolume, VolumeShape};

// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! # Braingraph Structures
//!
//! Foundation types for connectome generation:
//! - Morton (Z-order) spatial index over a 21-bit-per-axis voxel lattice
//! - Integer voxel coordinates with fallible conversion from streamline points
//! - Fiber (streamline) representation with voxel-path derivation

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod coordinate;
mod error;
mod fiber;
pub mod zindex;

pub use coordinate::VoxelCoordinate;
pub use error::StructureError;
pub use fiber::Fiber;
pub use zindex::{morton_decode, morton_encode, MORTON_AXIS_BITS, MORTON_AXIS_MAX};

/// Result type for structure operations
pub type Result<T> = std::result::Result<T, StructureError>;

// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! # Braingraph Connectome
//!
//! The sparse, weighted connectivity graph at the center of a build, in two
//! deliberate phases:
//!
//! - [`EdgeAccumulator`]: mutable, insertion-efficient associative storage
//!   used while streaming millions of edge-weight increments. The nominal
//!   dimension can reach the full voxel lattice (millions of vertices), so
//!   nothing dense or statically compressed is ever allocated.
//! - [`SparseConnectome`]: the immutable, compact row/column/weight triplet
//!   artifact produced exactly once by finalization and serialized to disk.
//!
//! [`GraphBuilder`] drives a whole build: fiber stream in, mask/atlas
//! filtering, vertex mapping (Morton voxel codes or logical region indices),
//! consecutive-pair edge derivation, accumulation, finalization, artifact out.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod accumulator;
mod artifact;
mod builder;
mod error;

pub use accumulator::EdgeAccumulator;
pub use artifact::SparseConnectome;
pub use builder::{voxel_dimension, BuildReport, BuildState, GraphBuilder};
pub use error::ConnectomeError;

/// Result type for connectome operations
pub type Result<T> = std::result::Result<T, ConnectomeError>;

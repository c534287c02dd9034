// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! # Braingraph
//!
//! Builds sparse weighted connectomes from diffusion-MRI fiber tractography.
//! One pass over an MRI Studio fiber-track file, filtered through a labeled
//! atlas and a brain mask, produces either a voxel-space ("big") or a
//! 70-region ("small") undirected weighted graph, serialized as a compact
//! binary artifact.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! braingraph = "0.1"
//! ```
//!
//! ```rust,no_run
//! use braingraph::config::load_config;
//! use braingraph::connectome::GraphBuilder;
//!
//! let config = load_config(None)?;
//! let report = GraphBuilder::run(&config)?;
//! println!("{} edges from {} fibers",
//!     report.connectome.edge_count(), report.fiber_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`compression`** (default): LZ4-compress the serialized artifact
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: braingraph-structures                      │
//! │  (Morton index, voxel coordinates, fiber paths)         │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: braingraph-io                                     │
//! │  (Fiber streaming, atlas/mask volumes, region table)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Graph: braingraph-connectome                           │
//! │  (Edge accumulation, finalization, artifact I/O)        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration (`braingraph-config`) sits beside the stack and feeds
//! [`connectome::GraphBuilder::run`].
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export foundation
pub use braingraph_structures as structures;

// Re-export I/O layer
pub use braingraph_io as io;

// Re-export graph layer
pub use braingraph_connectome as connectome;

// Re-export configuration
pub use braingraph_config as config;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::config::{load_config, validate_config, BuildConfig, GraphVariant};
    pub use crate::connectome::{BuildReport, GraphBuilder, SparseConnectome};
    pub use crate::io::{AtlasVolume, FiberReader, FiberWriter, MaskVolume};
    pub use crate::structures::{morton_encode, Fiber, VoxelCoordinate};
}

// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which connectome variant a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphVariant {
    /// Voxel-space graph: vertex ids are Morton codes over the padded
    /// voxel lattice (dimension can reach several million).
    Big,
    /// Region-space graph: vertex ids are the 70 logical atlas regions.
    Small,
}

impl FromStr for GraphVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "big" => Ok(GraphVariant::Big),
            "small" => Ok(GraphVariant::Small),
            other => Err(format!("unknown graph variant '{other}' (big | small)")),
        }
    }
}

impl std::fmt::Display for GraphVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphVariant::Big => write!(f, "big"),
            GraphVariant::Small => write!(f, "small"),
        }
    }
}

/// Per-subject input and output paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// MRI Studio fiber-track file.
    pub fiber_path: PathBuf,
    /// Atlas raw data file (big-endian i32 labels).
    pub atlas_data: PathBuf,
    /// Atlas TOML metadata sidecar.
    pub atlas_meta: PathBuf,
    /// Brain-mask raw data file (single-byte flags).
    pub mask_data: PathBuf,
    /// Brain-mask TOML metadata sidecar.
    pub mask_meta: PathBuf,
    /// Destination for the serialized connectome artifact.
    pub output_path: PathBuf,
}

/// Graph construction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Graph variant to build.
    pub variant: GraphVariant,
    /// Cap on distinct accumulated edges; pathological growth past the cap
    /// aborts the build visibly instead of exhausting memory.
    pub max_edges: Option<u64>,
    /// Log a progress line every this many fibers.
    pub progress_interval: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            variant: GraphVariant::Small,
            max_edges: None,
            progress_interval: 10_000,
        }
    }
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Log level filter (trace | debug | info | warn | error).
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Complete build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub subject: SubjectConfig,
    pub graph: GraphConfig,
    pub system: SystemConfig,
}

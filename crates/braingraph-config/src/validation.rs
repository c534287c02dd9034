// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation, run once before a build starts.

use crate::BuildConfig;
use thiserror::Error;

/// Validation failures for a build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("subject.{0} is empty; a build needs every input path")]
    EmptyPath(&'static str),

    #[error("graph.progress_interval must be at least 1")]
    ZeroProgressInterval,

    #[error("graph.max_edges of 0 would reject every edge")]
    ZeroEdgeCap,
}

/// Validate a build configuration.
///
/// Checks the structural invariants a build relies on; whether the paths
/// actually exist is checked at build start, where missing inputs are
/// reported before streaming begins.
pub fn validate_config(config: &BuildConfig) -> Result<(), ConfigValidationError> {
    let paths = [
        ("fiber_path", &config.subject.fiber_path),
        ("atlas_data", &config.subject.atlas_data),
        ("atlas_meta", &config.subject.atlas_meta),
        ("mask_data", &config.subject.mask_data),
        ("mask_meta", &config.subject.mask_meta),
        ("output_path", &config.subject.output_path),
    ];
    for (name, path) in paths {
        if path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyPath(name));
        }
    }

    if config.graph.progress_interval == 0 {
        return Err(ConfigValidationError::ZeroProgressInterval);
    }
    if config.graph.max_edges == Some(0) {
        return Err(ConfigValidationError::ZeroEdgeCap);
    }

    Ok(())
}

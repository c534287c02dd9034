// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised by the foundation types.
///
/// A coordinate outside the Morton domain is a data-contract violation: the
/// build that hits one must abort, so these propagate rather than being
/// silently clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    /// A coordinate component falls outside [0, 2^21 - 1].
    #[error("coordinate component {axis} = {value} outside the 21-bit Morton range [0, 2097151]")]
    CoordinateOutOfRange { axis: char, value: f64 },
}

// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Integer voxel coordinates.

use crate::error::StructureError;
use crate::zindex::{morton_decode, morton_encode, MORTON_AXIS_MAX};

/// An integer voxel coordinate, each component in [0, 2^21 - 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoordinate {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl VoxelCoordinate {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Convert a floating streamline point to the voxel containing it.
    ///
    /// Components are truncated toward zero, matching how tractography
    /// points are binned to the voxel lattice. A negative or over-range
    /// component is a data-contract violation.
    pub fn from_point(point: [f32; 3]) -> Result<Self, StructureError> {
        let mut components = [0u32; 3];
        for (axis, (slot, raw)) in ['x', 'y', 'z']
            .into_iter()
            .zip(components.iter_mut().zip(point))
        {
            let truncated = raw.trunc();
            if !(0.0..=MORTON_AXIS_MAX as f32).contains(&truncated) {
                return Err(StructureError::CoordinateOutOfRange {
                    axis,
                    value: truncated as f64,
                });
            }
            *slot = truncated as u32;
        }
        Ok(Self {
            x: components[0],
            y: components[1],
            z: components[2],
        })
    }

    /// The Morton code identifying this voxel.
    pub fn morton(&self) -> Result<u64, StructureError> {
        morton_encode(self.x, self.y, self.z)
    }

    /// The voxel identified by a Morton code.
    pub fn from_morton(code: u64) -> Self {
        let (x, y, z) = morton_decode(code);
        Self { x, y, z }
    }
}

impl From<VoxelCoordinate> for [u32; 3] {
    fn from(coordinate: VoxelCoordinate) -> Self {
        [coordinate.x, coordinate.y, coordinate.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_point_truncates() {
        let voxel = VoxelCoordinate::from_point([1.9, 2.1, 3.5]).unwrap();
        assert_eq!(voxel, VoxelCoordinate::new(1, 2, 3));
    }

    #[test]
    fn test_from_point_rejects_negative() {
        let result = VoxelCoordinate::from_point([-1.2, 0.0, 0.0]);
        assert!(matches!(
            result,
            Err(StructureError::CoordinateOutOfRange { axis: 'x', .. })
        ));
        // -0.9 truncates to -0.0, which is still inside the lattice.
        assert!(VoxelCoordinate::from_point([0.0, -0.9, 0.0]).is_ok());
    }

    #[test]
    fn test_morton_roundtrip() {
        let voxel = VoxelCoordinate::new(12, 34, 56);
        let code = voxel.morton().unwrap();
        assert_eq!(VoxelCoordinate::from_morton(code), voxel);
    }
}

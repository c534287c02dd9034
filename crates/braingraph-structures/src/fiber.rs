// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Fiber (streamline) representation.

use crate::coordinate::VoxelCoordinate;
use crate::error::StructureError;

/// An ordered sequence of floating 3-D points approximating one
/// white-matter tract.
///
/// Well-formed fibers have at least two points; single-point records in the
/// wire format are placeholders and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Fiber {
    points: Vec<[f32; 3]>,
}

impl Fiber {
    pub fn new(points: Vec<[f32; 3]>) -> Self {
        Self { points }
    }

    /// Number of points along the streamline.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    /// The ordered voxel path visited by this fiber.
    ///
    /// Points are truncated to the voxel lattice and runs of consecutive
    /// duplicates collapse to a single entry, so the result is the fiber's
    /// path through distinct successive voxels. Path order is preserved for
    /// consecutive-pair edge derivation.
    pub fn voxel_path(&self) -> Result<Vec<VoxelCoordinate>, StructureError> {
        let mut path: Vec<VoxelCoordinate> = Vec::with_capacity(self.points.len());
        for &point in &self.points {
            let voxel = VoxelCoordinate::from_point(point)?;
            if path.last() != Some(&voxel) {
                path.push(voxel);
            }
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_path_collapses_consecutive_duplicates() {
        let fiber = Fiber::new(vec![
            [1.1, 2.2, 3.3],
            [1.9, 2.8, 3.0],
            [2.0, 2.0, 3.0],
            [2.5, 2.5, 3.5],
            [3.0, 2.0, 3.0],
        ]);
        let path = fiber.voxel_path().unwrap();
        assert_eq!(
            path,
            vec![
                VoxelCoordinate::new(1, 2, 3),
                VoxelCoordinate::new(2, 2, 3),
                VoxelCoordinate::new(3, 2, 3),
            ]
        );
    }

    #[test]
    fn test_voxel_path_keeps_revisits() {
        // A fiber that leaves and re-enters a voxel keeps both visits;
        // only immediate repeats collapse.
        let fiber = Fiber::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0; 3]]);
        let path = fiber.voxel_path().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], path[2]);
    }

    #[test]
    fn test_voxel_path_propagates_range_error() {
        let fiber = Fiber::new(vec![[0.0; 3], [-3.0, 0.0, 0.0]]);
        assert!(fiber.voxel_path().is_err());
    }
}

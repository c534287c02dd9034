// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Dense labeled (atlas) and boolean (mask) volumes with bounded lookups.
//!
//! A volume is a flat binary data file paired with a TOML metadata sidecar
//! declaring its three extents:
//!
//! ```toml
//! extents = [182, 218, 182]
//! ```
//!
//! Atlas payloads are big-endian `i32` labels; mask payloads are single-byte
//! flags. Both are laid out in Fortran (column-major) axis order, matching
//! the legacy raw exports. Queries at or beyond any extent return the
//! "outside" sentinel (0 / false) by contract; they are not errors.

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array3, ShapeBuilder};
use serde::Deserialize;

use braingraph_structures::VoxelCoordinate;

use crate::error::VolumeError;

/// Declared extents of a dense volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeShape {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl VolumeShape {
    pub fn len(&self) -> usize {
        self.x * self.y * self.z
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, voxel: VoxelCoordinate) -> bool {
        (voxel.x as usize) < self.x && (voxel.y as usize) < self.y && (voxel.z as usize) < self.z
    }
}

#[derive(Debug, Deserialize)]
struct VolumeMeta {
    extents: [usize; 3],
}

/// Read a volume's declared shape from its TOML metadata sidecar.
pub fn read_shape<P: AsRef<Path>>(meta_path: P) -> Result<VolumeShape, VolumeError> {
    let text = fs::read_to_string(meta_path)?;
    let meta: VolumeMeta = toml::from_str(&text).map_err(|e| VolumeError::Meta(e.to_string()))?;
    Ok(VolumeShape {
        x: meta.extents[0],
        y: meta.extents[1],
        z: meta.extents[2],
    })
}

/// A dense volume of signed integer anatomical labels.
#[derive(Debug, Clone)]
pub struct AtlasVolume {
    data: Array3<i32>,
    shape: VolumeShape,
}

impl AtlasVolume {
    /// Build an atlas from big-endian `i32` payload bytes in Fortran order.
    pub fn from_bytes(shape: VolumeShape, bytes: &[u8]) -> Result<Self, VolumeError> {
        let expected = shape.len();
        if bytes.len() != expected * 4 {
            return Err(VolumeError::ShapeMismatch {
                shape: (shape.x, shape.y, shape.z),
                expected,
                actual: bytes.len() / 4,
            });
        }
        let labels: Vec<i32> = bytes
            .chunks_exact(4)
            .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let data = Array3::from_shape_vec((shape.x, shape.y, shape.z).f(), labels)
            .map_err(|e| VolumeError::Meta(e.to_string()))?;
        Ok(Self { data, shape })
    }

    /// Load an atlas from its raw data file and metadata sidecar.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        data_path: P,
        meta_path: Q,
    ) -> Result<Self, VolumeError> {
        let shape = read_shape(meta_path)?;
        let bytes = fs::read(data_path)?;
        Self::from_bytes(shape, &bytes)
    }

    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    /// The label at a voxel, or 0 for any coordinate at or beyond an extent.
    pub fn get(&self, voxel: VoxelCoordinate) -> i32 {
        if self.shape.contains(voxel) {
            self.data[[voxel.x as usize, voxel.y as usize, voxel.z as usize]]
        } else {
            0
        }
    }

    /// Largest label present. Useful for sanity-checking against the
    /// region table.
    pub fn max_label(&self) -> i32 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

/// A dense boolean brain-mask volume.
#[derive(Debug, Clone)]
pub struct MaskVolume {
    data: Array3<u8>,
    shape: VolumeShape,
}

impl MaskVolume {
    /// Build a mask from single-byte payload flags in Fortran order.
    pub fn from_bytes(shape: VolumeShape, bytes: &[u8]) -> Result<Self, VolumeError> {
        let expected = shape.len();
        if bytes.len() != expected {
            return Err(VolumeError::ShapeMismatch {
                shape: (shape.x, shape.y, shape.z),
                expected,
                actual: bytes.len(),
            });
        }
        let data = Array3::from_shape_vec((shape.x, shape.y, shape.z).f(), bytes.to_vec())
            .map_err(|e| VolumeError::Meta(e.to_string()))?;
        Ok(Self { data, shape })
    }

    /// Load a mask from its raw data file and metadata sidecar.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        data_path: P,
        meta_path: Q,
    ) -> Result<Self, VolumeError> {
        let shape = read_shape(meta_path)?;
        let bytes = fs::read(data_path)?;
        Self::from_bytes(shape, &bytes)
    }

    pub fn shape(&self) -> VolumeShape {
        self.shape
    }

    /// Whether a voxel lies inside brain tissue; false outside the volume.
    pub fn get(&self, voxel: VoxelCoordinate) -> bool {
        self.shape.contains(voxel)
            && self.data[[voxel.x as usize, voxel.y as usize, voxel.z as usize]] != 0
    }
}

/// Atlas input, either file paths or an already-loaded volume.
///
/// Resolved exactly once at the build boundary.
#[derive(Debug)]
pub enum AtlasSource {
    Paths { data: PathBuf, meta: PathBuf },
    Loaded(AtlasVolume),
}

impl AtlasSource {
    pub fn resolve(self) -> Result<AtlasVolume, VolumeError> {
        match self {
            AtlasSource::Paths { data, meta } => AtlasVolume::load(data, meta),
            AtlasSource::Loaded(volume) => Ok(volume),
        }
    }
}

/// Mask input, either file paths or an already-loaded volume.
#[derive(Debug)]
pub enum MaskSource {
    Paths { data: PathBuf, meta: PathBuf },
    Loaded(MaskVolume),
}

impl MaskSource {
    pub fn resolve(self) -> Result<MaskVolume, VolumeError> {
        match self {
            MaskSource::Paths { data, meta } => MaskVolume::load(data, meta),
            MaskSource::Loaded(volume) => Ok(volume),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn shape_2x3x2() -> VolumeShape {
        VolumeShape { x: 2, y: 3, z: 2 }
    }

    fn atlas_bytes(labels: &[i32]) -> Vec<u8> {
        labels.iter().flat_map(|l| l.to_be_bytes()).collect()
    }

    #[test]
    fn test_atlas_fortran_order_indexing() {
        // Column-major: index (x, y, z) maps to x + y*X + z*X*Y.
        let labels: Vec<i32> = (0..12).collect();
        let atlas = AtlasVolume::from_bytes(shape_2x3x2(), &atlas_bytes(&labels)).unwrap();

        assert_eq!(atlas.get(VoxelCoordinate::new(0, 0, 0)), 0);
        assert_eq!(atlas.get(VoxelCoordinate::new(1, 0, 0)), 1);
        assert_eq!(atlas.get(VoxelCoordinate::new(0, 1, 0)), 2);
        assert_eq!(atlas.get(VoxelCoordinate::new(0, 0, 1)), 6);
        assert_eq!(atlas.get(VoxelCoordinate::new(1, 2, 1)), 11);
        assert_eq!(atlas.max_label(), 11);
    }

    #[test]
    fn test_atlas_outside_sentinel() {
        let labels = vec![7i32; 12];
        let atlas = AtlasVolume::from_bytes(shape_2x3x2(), &atlas_bytes(&labels)).unwrap();

        // At the extent, not past it: still outside.
        assert_eq!(atlas.get(VoxelCoordinate::new(2, 0, 0)), 0);
        assert_eq!(atlas.get(VoxelCoordinate::new(0, 3, 0)), 0);
        assert_eq!(atlas.get(VoxelCoordinate::new(0, 0, 2)), 0);
        assert_eq!(atlas.get(VoxelCoordinate::new(1_000_000, 0, 0)), 0);
    }

    #[test]
    fn test_atlas_shape_mismatch() {
        let result = AtlasVolume::from_bytes(shape_2x3x2(), &atlas_bytes(&[1, 2, 3]));
        assert!(matches!(result, Err(VolumeError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_mask_outside_sentinel() {
        let mask = MaskVolume::from_bytes(shape_2x3x2(), &[1u8; 12]).unwrap();
        assert!(mask.get(VoxelCoordinate::new(1, 2, 1)));
        assert!(!mask.get(VoxelCoordinate::new(2, 0, 0)));
    }

    #[test]
    fn test_mask_zero_flag_outside_brain() {
        let mut flags = [1u8; 12];
        flags[0] = 0;
        let mask = MaskVolume::from_bytes(shape_2x3x2(), &flags).unwrap();
        assert!(!mask.get(VoxelCoordinate::new(0, 0, 0)));
        assert!(mask.get(VoxelCoordinate::new(1, 0, 0)));
    }

    #[test]
    fn test_load_from_sidecar() {
        let dir = tempdir().unwrap();
        let meta = dir.path().join("subject_atlas.toml");
        let data = dir.path().join("subject_atlas.raw");
        fs::write(&meta, "extents = [2, 3, 2]\n").unwrap();
        fs::write(&data, atlas_bytes(&vec![5i32; 12])).unwrap();

        let atlas = AtlasSource::Paths {
            data: data.clone(),
            meta: meta.clone(),
        }
        .resolve()
        .unwrap();
        assert_eq!(atlas.shape(), shape_2x3x2());
        assert_eq!(atlas.get(VoxelCoordinate::new(1, 1, 1)), 5);
    }

    #[test]
    fn test_bad_sidecar_rejected() {
        let dir = tempdir().unwrap();
        let meta = dir.path().join("subject_atlas.toml");
        fs::write(&meta, "extents = \"not a triple\"\n").unwrap();
        assert!(matches!(read_shape(&meta), Err(VolumeError::Meta(_))));
    }
}

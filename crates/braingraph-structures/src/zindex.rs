// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Morton (Z-order) spatial index.
//!
//! Bit-interleaves three 21-bit axis values into a single 63-bit code. The
//! encoding is a total bijection over the valid domain and clusters spatially
//! adjacent coordinates in code space, which later chunked storage of the
//! voxel-space graph relies on. No monotonicity along any single axis is
//! guaranteed.

use crate::error::StructureError;

/// Bits interleaved per axis.
pub const MORTON_AXIS_BITS: u32 = 21;

/// Largest encodable value per axis (2^21 - 1).
pub const MORTON_AXIS_MAX: u32 = (1 << MORTON_AXIS_BITS) - 1;

/// Encode a voxel coordinate as a 63-bit Morton code.
///
/// Interleaves the low 21 bits of each axis, 3 bits per iteration, so that
/// bit `i` of `x`, `y`, `z` lands at positions `3i`, `3i + 1`, `3i + 2`.
///
/// # Errors
///
/// Returns [`StructureError::CoordinateOutOfRange`] if any component exceeds
/// [`MORTON_AXIS_MAX`]. This is a caller contract violation and fatal to the
/// enclosing build.
pub fn morton_encode(x: u32, y: u32, z: u32) -> Result<u64, StructureError> {
    for (axis, value) in [('x', x), ('y', y), ('z', z)] {
        if value > MORTON_AXIS_MAX {
            return Err(StructureError::CoordinateOutOfRange {
                axis,
                value: value as f64,
            });
        }
    }

    let mut morton: u64 = 0;
    let mut mask: u64 = 1;
    for i in 0..MORTON_AXIS_BITS {
        morton |= (x as u64 & mask) << (2 * i);
        morton |= (y as u64 & mask) << (2 * i + 1);
        morton |= (z as u64 & mask) << (2 * i + 2);
        mask <<= 1;
    }
    Ok(morton)
}

/// Decode a Morton code back into its (x, y, z) components.
///
/// Exact inverse of [`morton_encode`]; total over every 63-bit code.
pub fn morton_decode(morton: u64) -> (u32, u32, u32) {
    let mut x: u64 = 0;
    let mut y: u64 = 0;
    let mut z: u64 = 0;

    let mut rest = morton;
    for i in 0..MORTON_AXIS_BITS {
        x |= (rest & 0x1) << i;
        y |= ((rest & 0x2) << i) >> 1;
        z |= ((rest & 0x4) << i) >> 2;
        rest >>= 3;
    }
    (x as u32, y as u32, z as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(morton_encode(0, 0, 0).unwrap(), 0);
        assert_eq!(morton_encode(1, 0, 0).unwrap(), 1);
        assert_eq!(morton_encode(0, 1, 0).unwrap(), 2);
        assert_eq!(morton_encode(0, 0, 1).unwrap(), 4);
        assert_eq!(morton_encode(1, 1, 1).unwrap(), 7);
        // Second bit of each axis lands three positions higher.
        assert_eq!(morton_encode(2, 0, 0).unwrap(), 8);
    }

    #[test]
    fn test_roundtrip_bijection() {
        let samples = [
            (0, 0, 0),
            (1, 2, 3),
            (255, 255, 255),
            (1024, 512, 2048),
            (123_456, 654_321, 7),
            (MORTON_AXIS_MAX, MORTON_AXIS_MAX, MORTON_AXIS_MAX),
            (MORTON_AXIS_MAX, 0, 0),
            (0, MORTON_AXIS_MAX, 0),
            (0, 0, MORTON_AXIS_MAX),
        ];
        for (x, y, z) in samples {
            let code = morton_encode(x, y, z).unwrap();
            assert_eq!(morton_decode(code), (x, y, z));
        }
    }

    #[test]
    fn test_roundtrip_exhaustive_small_cube() {
        for x in 0..16u32 {
            for y in 0..16u32 {
                for z in 0..16u32 {
                    let code = morton_encode(x, y, z).unwrap();
                    assert_eq!(morton_decode(code), (x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(morton_encode(MORTON_AXIS_MAX + 1, 0, 0).is_err());
        assert!(morton_encode(0, MORTON_AXIS_MAX + 1, 0).is_err());
        assert!(morton_encode(0, 0, u32::MAX).is_err());
    }

    #[test]
    fn test_locality_unit_step_bound() {
        // Regression guard: a unit step along one axis moves the code by at
        // most the fully-interleaved carry bound, 2^(3*21) / 4. Typical steps
        // are far smaller; this only pins the worst case.
        let bound: u64 = 1 << (3 * MORTON_AXIS_BITS - 2);
        for (x, y, z) in [(10u32, 20u32, 30u32), (511, 511, 511), (4095, 1, 0)] {
            let here = morton_encode(x, y, z).unwrap();
            let step = morton_encode(x + 1, y, z).unwrap();
            assert!(step.abs_diff(here) <= bound);
        }
        // Within an aligned 2x2x2 block the codes are consecutive.
        let base = morton_encode(10, 20, 30).unwrap() & !0x7;
        for offset in 0..8u64 {
            let (x, y, z) = morton_decode(base + offset);
            assert_eq!(morton_encode(x, y, z).unwrap(), base + offset);
        }
    }
}

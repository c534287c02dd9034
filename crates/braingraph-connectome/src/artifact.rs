// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! The finalized connectome artifact and its on-disk format.
//!
//! # Format
//! ```text
//! [Header]
//! - Magic: "BGRAPH" (6 bytes)
//! - Version: u32 (4 bytes)
//! - Flags: u8 (1 byte) - bit 0: LZ4-compressed
//! - Uncompressed size: u64 (8 bytes, original size before compression)
//! - Checksum: u64 (8 bytes, FNV-1a of the stored data)
//! [Data]
//! - Bincode-serialized SparseConnectome (optionally LZ4 compressed)
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConnectomeError;

/// Magic number for connectome artifacts
const MAGIC: &[u8; 6] = b"BGRAPH";

/// Current format version (increment when the format changes)
const FORMAT_VERSION: u32 = 1;

/// Immutable, finalized sparse connectome.
///
/// Row/column/weight triplets sorted by (row, col), stored upper-triangular
/// (`row < col`); absent entries are implicitly zero and the graph is
/// undirected. All indices fall in `[0, dimension)`. Produced exactly once
/// per build by `EdgeAccumulator::complete`; a partially built graph is
/// never representable as this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseConnectome {
    /// Nominal vertex count (padded voxel lattice, or region count).
    pub dimension: u64,
    /// Well-formed fibers consumed by the build, backfilled at completion.
    pub fiber_count: u64,
    pub rows: Vec<u64>,
    pub cols: Vec<u64>,
    pub weights: Vec<u64>,
}

impl SparseConnectome {
    /// Number of stored (nonzero) edges.
    pub fn edge_count(&self) -> usize {
        self.rows.len()
    }

    /// Weight of the undirected edge (u, v); 0 if absent or u == v.
    pub fn weight(&self, u: u64, v: u64) -> u64 {
        if u == v {
            return 0;
        }
        let key = if u < v { (u, v) } else { (v, u) };
        let mut lo = 0usize;
        let mut hi = self.rows.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if (self.rows[mid], self.cols[mid]) < key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo < self.rows.len() && (self.rows[lo], self.cols[lo]) == key {
            self.weights[lo]
        } else {
            0
        }
    }

    /// Iterate stored triplets in (row, col) order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64, u64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.weights)
            .map(|((&row, &col), &weight)| (row, col, weight))
    }

    /// Write the artifact to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConnectomeError> {
        let mut file = File::create(path)?;

        file.write_all(MAGIC)?;
        file.write_all(&FORMAT_VERSION.to_le_bytes())?;

        let data =
            bincode::serialize(self).map_err(|e| ConnectomeError::Serialization(e.to_string()))?;

        #[cfg(feature = "compression")]
        let (final_data, flags, uncompressed_size) = {
            let original_size = data.len() as u64;
            let compressed = lz4::block::compress(&data, None, false)
                .map_err(|e| ConnectomeError::Compression(e.to_string()))?;
            (compressed, 1u8, original_size)
        };

        #[cfg(not(feature = "compression"))]
        let (final_data, flags, uncompressed_size) = (data, 0u8, 0u64);

        file.write_all(&[flags])?;
        file.write_all(&uncompressed_size.to_le_bytes())?;

        let checksum = calculate_checksum(&final_data);
        file.write_all(&checksum.to_le_bytes())?;

        file.write_all(&final_data)?;

        Ok(())
    }

    /// Read an artifact back from disk, verifying magic, version and
    /// checksum.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConnectomeError> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 6];
        file.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(ConnectomeError::InvalidMagic(magic));
        }

        let mut version_bytes = [0u8; 4];
        file.read_exact(&mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != FORMAT_VERSION {
            return Err(ConnectomeError::VersionMismatch {
                file_version: version,
                expected_version: FORMAT_VERSION,
            });
        }

        let mut flags = [0u8; 1];
        file.read_exact(&mut flags)?;
        let is_compressed = (flags[0] & 1) != 0;

        let mut size_bytes = [0u8; 8];
        file.read_exact(&mut size_bytes)?;
        let uncompressed_size = u64::from_le_bytes(size_bytes);

        let mut checksum_bytes = [0u8; 8];
        file.read_exact(&mut checksum_bytes)?;
        let expected_checksum = u64::from_le_bytes(checksum_bytes);

        let mut stored_data = Vec::new();
        file.read_to_end(&mut stored_data)?;

        let actual_checksum = calculate_checksum(&stored_data);
        if actual_checksum != expected_checksum {
            return Err(ConnectomeError::ChecksumMismatch);
        }

        let data = if is_compressed {
            #[cfg(feature = "compression")]
            {
                lz4::block::decompress(&stored_data, Some(uncompressed_size as i32))
                    .map_err(|e| ConnectomeError::Compression(format!("decompression failed: {e}")))?
            }
            #[cfg(not(feature = "compression"))]
            {
                return Err(ConnectomeError::Compression(
                    "file is compressed but the compression feature is not enabled".to_string(),
                ));
            }
        } else {
            stored_data
        };

        let connectome: SparseConnectome = bincode::deserialize(&data)
            .map_err(|e| ConnectomeError::Deserialization(e.to_string()))?;

        Ok(connectome)
    }
}

/// FNV-1a checksum over the stored payload.
fn calculate_checksum(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

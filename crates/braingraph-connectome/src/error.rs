// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use thiserror::Error;

/// Connectome build and artifact I/O errors
#[derive(Debug, Error)]
pub enum ConnectomeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Structure(#[from] braingraph_structures::StructureError),

    #[error(transparent)]
    Fiber(#[from] braingraph_io::FiberError),

    #[error(transparent)]
    Volume(#[from] braingraph_io::VolumeError),

    #[error("missing input file: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("vertex id {id} outside graph dimension {dimension}")]
    VertexOutOfRange { id: u64, dimension: u64 },

    #[error("distinct edge count exceeded the configured cap of {cap}")]
    EdgeCapacityExceeded { cap: u64 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("invalid magic number: expected BGRAPH, got {0:?}")]
    InvalidMagic([u8; 6]),

    #[error("version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: u32,
        expected_version: u32,
    },

    #[error("checksum mismatch: file may be corrupted")]
    ChecksumMismatch,

    #[error("compression error: {0}")]
    Compression(String),
}

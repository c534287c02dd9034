// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Fiber-track file errors.
///
/// Malformed headers are an expected operating condition while streaming
/// third-party tractography output, so they surface as explicit variants
/// rather than assertions.
#[derive(Debug, Error)]
pub enum FiberError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fiber file tag: expected \"FiberDat\", got {0:?}")]
    InvalidTag([u8; 8]),

    #[error("fiber file is {len} bytes, shorter than its 128-byte header")]
    ShortFile { len: u64 },

    #[error("corrupt fiber record header at byte {offset}: declared length {length}")]
    CorruptHeader { offset: u64, length: i32 },

    #[error(
        "truncated stream: record at byte {offset} needs {needed} more bytes, {remaining} remain"
    )]
    TruncatedStream {
        offset: u64,
        needed: u64,
        remaining: u64,
    },

    #[error("refusing to write a degenerate fiber of {length} points")]
    DegenerateFiber { length: usize },
}

/// Atlas/mask volume errors.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse volume metadata: {0}")]
    Meta(String),

    #[error(
        "volume data holds {actual} elements but declared shape {shape:?} needs {expected}"
    )]
    ShapeMismatch {
        shape: (usize, usize, usize),
        expected: usize,
        actual: usize,
    },
}

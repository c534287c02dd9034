// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Streaming reader and writer for MRI Studio fiber-track files.
//!
//! File layout (fixed little-endian):
//!
//! ```text
//! [File header, 128 bytes]
//! - Tag: "FiberDat" (8 bytes)
//! - Fiber count: i32 (advisory; freshly written files hold a placeholder)
//! - Max fiber length: i32
//! - Mean fiber length: f32
//! - Image extents: 3 x i32
//! - Voxel sizes: 3 x f32
//! - Slice orientation, slice sequencing: 2 x u8
//! - Version: 8 bytes
//! - Zero padding to byte 128
//! [Fiber records, back to back until EOF]
//! - Record header (16 bytes): point count i32, reserved u8, RGB 3 x u8,
//!   select start i32, select end i32
//! - Payload: point count x (x, y, z) f32 triples (12 bytes each)
//! ```
//!
//! A record declaring exactly one point is a non-fiber placeholder whose
//! 12-byte payload is skipped verbatim. A declared count of zero or less is
//! corruption. The stream is EOF-delimited: the final record must end exactly
//! at the file's byte size.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use braingraph_structures::Fiber;
use tracing::debug;

use crate::error::FiberError;

/// File tag at byte 0.
pub const FIBER_FILE_TAG: &[u8; 8] = b"FiberDat";

/// Byte offset of the first fiber record.
pub const FIBER_DATA_OFFSET: u64 = 128;

/// Size of a per-record header.
pub const FIBER_RECORD_HEADER_LEN: u64 = 16;

/// Payload size of a length-1 placeholder record (one point slot).
pub const PLACEHOLDER_PAYLOAD_LEN: u64 = 12;

/// Bytes per streamline point (3 x f32).
const POINT_LEN: u64 = 12;

/// Byte offset of the fiber-count field inside the file header.
const FIBER_COUNT_OFFSET: u64 = 8;

/// Parsed 128-byte file header.
#[derive(Debug, Clone)]
pub struct FiberFileHeader {
    /// Declared fiber count. Advisory only: the writer backfills it after
    /// the fact and legacy files carry -1 placeholders, so the reader
    /// trusts EOF instead.
    pub fiber_count: i32,
    pub max_fiber_length: i32,
    pub mean_fiber_length: f32,
    /// Image extents (width, height, slices).
    pub shape: [i32; 3],
    pub voxel_size: [f32; 3],
    pub slice_orientation: u8,
    pub slice_sequencing: u8,
    pub version: [u8; 8],
}

impl FiberFileHeader {
    fn parse(bytes: &[u8; 54]) -> Result<Self, FiberError> {
        let mut tag = [0u8; 8];
        tag.copy_from_slice(&bytes[0..8]);
        if &tag != FIBER_FILE_TAG {
            return Err(FiberError::InvalidTag(tag));
        }

        let i32_at = |offset: usize| {
            i32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        let f32_at = |offset: usize| {
            f32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        let mut version = [0u8; 8];
        version.copy_from_slice(&bytes[46..54]);

        Ok(Self {
            fiber_count: i32_at(8),
            max_fiber_length: i32_at(12),
            mean_fiber_length: f32_at(16),
            shape: [i32_at(20), i32_at(24), i32_at(28)],
            voxel_size: [f32_at(32), f32_at(36), f32_at(40)],
            slice_orientation: bytes[44],
            slice_sequencing: bytes[45],
            version,
        })
    }
}

/// Lazy, single-pass reader over a fiber-track file.
///
/// Yields well-formed fibers (declared length > 1) one at a time without
/// ever materializing the whole file. Restart requires reopening.
pub struct FiberReader {
    reader: BufReader<File>,
    header: FiberFileHeader,
    file_len: u64,
    pos: u64,
    fibers_seen: u64,
    placeholders_skipped: u64,
    finished: bool,
}

impl FiberReader {
    /// Open a fiber file, validate its tag, and position at the first record.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FiberError> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        if file_len < FIBER_DATA_OFFSET {
            return Err(FiberError::ShortFile { len: file_len });
        }

        let mut reader = BufReader::new(file);
        let mut header_bytes = [0u8; 54];
        reader.read_exact(&mut header_bytes)?;
        let header = FiberFileHeader::parse(&header_bytes)?;

        reader.seek(SeekFrom::Start(FIBER_DATA_OFFSET))?;
        debug!(
            declared_fibers = header.fiber_count,
            shape = ?header.shape,
            bytes = file_len,
            "opened fiber file"
        );

        Ok(Self {
            reader,
            header,
            file_len,
            pos: FIBER_DATA_OFFSET,
            fibers_seen: 0,
            placeholders_skipped: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> &FiberFileHeader {
        &self.header
    }

    /// Running count of well-formed fibers (length > 1) yielded so far.
    /// After the stream is exhausted this backfills the artifact's
    /// fiber-count field.
    pub fn fibers_seen(&self) -> u64 {
        self.fibers_seen
    }

    /// Total payload bytes skipped for length-1 placeholder records.
    pub fn placeholder_bytes_skipped(&self) -> u64 {
        self.placeholders_skipped * PLACEHOLDER_PAYLOAD_LEN
    }

    fn remaining(&self) -> u64 {
        self.file_len - self.pos
    }

    /// Read the next well-formed fiber, skipping placeholder records.
    ///
    /// Returns `Ok(None)` exactly when the previous record ended at the
    /// file's byte size; any other terminal alignment is corruption.
    fn next_fiber(&mut self) -> Result<Option<Fiber>, FiberError> {
        loop {
            if self.finished {
                return Ok(None);
            }
            if self.remaining() == 0 {
                self.finished = true;
                return Ok(None);
            }
            if self.remaining() < FIBER_RECORD_HEADER_LEN {
                return Err(FiberError::TruncatedStream {
                    offset: self.pos,
                    needed: FIBER_RECORD_HEADER_LEN,
                    remaining: self.remaining(),
                });
            }

            let record_offset = self.pos;
            let mut record_header = [0u8; FIBER_RECORD_HEADER_LEN as usize];
            self.reader.read_exact(&mut record_header)?;
            self.pos += FIBER_RECORD_HEADER_LEN;

            let length = i32::from_le_bytes([
                record_header[0],
                record_header[1],
                record_header[2],
                record_header[3],
            ]);

            match length {
                l if l <= 0 => {
                    return Err(FiberError::CorruptHeader {
                        offset: record_offset,
                        length: l,
                    });
                }
                1 => {
                    // Placeholder: skip its fixed payload verbatim, never
                    // interpreting the bytes as a point.
                    if self.remaining() < PLACEHOLDER_PAYLOAD_LEN {
                        return Err(FiberError::TruncatedStream {
                            offset: record_offset,
                            needed: PLACEHOLDER_PAYLOAD_LEN,
                            remaining: self.remaining(),
                        });
                    }
                    self.reader.seek_relative(PLACEHOLDER_PAYLOAD_LEN as i64)?;
                    self.pos += PLACEHOLDER_PAYLOAD_LEN;
                    self.placeholders_skipped += 1;
                }
                l => {
                    let payload_len = l as u64 * POINT_LEN;
                    if self.remaining() < payload_len {
                        return Err(FiberError::TruncatedStream {
                            offset: record_offset,
                            needed: payload_len,
                            remaining: self.remaining(),
                        });
                    }

                    let mut payload = vec![0u8; payload_len as usize];
                    self.reader.read_exact(&mut payload)?;
                    self.pos += payload_len;

                    let points = payload
                        .chunks_exact(POINT_LEN as usize)
                        .map(|chunk| {
                            [
                                f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                                f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
                                f32::from_le_bytes([chunk[8], chunk[9], chunk[10], chunk[11]]),
                            ]
                        })
                        .collect();

                    self.fibers_seen += 1;
                    return Ok(Some(Fiber::new(points)));
                }
            }
        }
    }
}

impl Iterator for FiberReader {
    type Item = Result<Fiber, FiberError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_fiber().transpose()
    }
}

/// Writer for MRI Studio fiber files.
///
/// Writes a placeholder file header up front and backfills the fiber count,
/// max length, and mean length on [`FiberWriter::finish`], since those are
/// only known once every record has been appended.
pub struct FiberWriter {
    writer: BufWriter<File>,
    fibers_written: u64,
    max_length: i32,
    total_points: u64,
}

impl FiberWriter {
    /// Create a fiber file with the given image extents.
    pub fn create<P: AsRef<Path>>(path: P, shape: [i32; 3]) -> Result<Self, FiberError> {
        let mut header = [0u8; FIBER_DATA_OFFSET as usize];
        header[0..8].copy_from_slice(FIBER_FILE_TAG);
        // Placeholder count/max/mean, backfilled by finish().
        header[8..12].copy_from_slice(&(-1i32).to_le_bytes());
        header[12..16].copy_from_slice(&(-1i32).to_le_bytes());
        header[16..20].copy_from_slice(&(-1.0f32).to_le_bytes());
        for (i, extent) in shape.into_iter().enumerate() {
            let offset = 20 + 4 * i;
            header[offset..offset + 4].copy_from_slice(&extent.to_le_bytes());
        }
        for i in 0..3 {
            let offset = 32 + 4 * i;
            header[offset..offset + 4].copy_from_slice(&1.0f32.to_le_bytes());
        }
        header[46..54].copy_from_slice(b"0.3     ");

        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&header)?;

        Ok(Self {
            writer,
            fibers_written: 0,
            max_length: 0,
            total_points: 0,
        })
    }

    fn write_record_header(&mut self, length: i32) -> Result<(), FiberError> {
        let mut record_header = [0u8; FIBER_RECORD_HEADER_LEN as usize];
        record_header[0..4].copy_from_slice(&length.to_le_bytes());
        // reserved = 0, color = red, matching the legacy writer
        record_header[5] = 255;
        record_header[8..12].copy_from_slice(&0i32.to_le_bytes());
        record_header[12..16].copy_from_slice(&(length - 1).to_le_bytes());
        self.writer.write_all(&record_header)?;
        Ok(())
    }

    /// Append a well-formed fiber record.
    pub fn write_fiber(&mut self, points: &[[f32; 3]]) -> Result<(), FiberError> {
        if points.len() < 2 {
            return Err(FiberError::DegenerateFiber {
                length: points.len(),
            });
        }
        let length = points.len() as i32;
        self.write_record_header(length)?;
        for point in points {
            for component in point {
                self.writer.write_all(&component.to_le_bytes())?;
            }
        }
        self.fibers_written += 1;
        self.max_length = self.max_length.max(length);
        self.total_points += points.len() as u64;
        Ok(())
    }

    /// Append a length-1 placeholder record with a zeroed 12-byte payload.
    pub fn write_placeholder(&mut self) -> Result<(), FiberError> {
        self.write_record_header(1)?;
        self.writer
            .write_all(&[0u8; PLACEHOLDER_PAYLOAD_LEN as usize])?;
        Ok(())
    }

    /// Flush, seek back, and backfill the header's count fields.
    /// Returns the number of well-formed fibers written.
    pub fn finish(self) -> Result<u64, FiberError> {
        let fibers_written = self.fibers_written;
        let mean = if fibers_written > 0 {
            self.total_points as f32 / fibers_written as f32
        } else {
            0.0
        };
        let max_length = self.max_length;

        let mut file = self
            .writer
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)?;
        file.seek(SeekFrom::Start(FIBER_COUNT_OFFSET))?;
        file.write_all(&(fibers_written as i32).to_le_bytes())?;
        file.write_all(&max_length.to_le_bytes())?;
        file.write_all(&mean.to_le_bytes())?;
        file.sync_all()?;
        Ok(fibers_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::tempdir;

    fn write_fixture(path: &Path, fibers: &[Vec<[f32; 3]>], placeholders_before: usize) -> u64 {
        let mut writer = FiberWriter::create(path, [64, 64, 16]).unwrap();
        for _ in 0..placeholders_before {
            writer.write_placeholder().unwrap();
        }
        for fiber in fibers {
            writer.write_fiber(fiber).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_roundtrip_single_fiber() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        let points = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        write_fixture(&path, &[points.clone()], 0);

        let mut reader = FiberReader::open(&path).unwrap();
        assert_eq!(reader.header().shape, [64, 64, 16]);
        assert_eq!(reader.header().fiber_count, 1);

        let fiber = reader.next().unwrap().unwrap();
        assert_eq!(fiber.points(), points.as_slice());
        assert!(reader.next().is_none());
        assert_eq!(reader.fibers_seen(), 1);
    }

    #[test]
    fn test_placeholder_skip_and_count() {
        // Records with declared lengths [1, 2, 3]: the placeholder is
        // skipped (12 bytes) and exactly 2 fibers are reported.
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        write_fixture(
            &path,
            &[
                vec![[0.0; 3], [1.0, 1.0, 1.0]],
                vec![[2.0; 3], [3.0; 3], [4.0; 3]],
            ],
            1,
        );

        let mut reader = FiberReader::open(&path).unwrap();
        let mut lengths = Vec::new();
        while let Some(fiber) = reader.next() {
            lengths.push(fiber.unwrap().len());
        }
        assert_eq!(lengths, vec![2, 3]);
        assert_eq!(reader.fibers_seen(), 2);
        assert_eq!(reader.placeholder_bytes_skipped(), 12);
    }

    #[test]
    fn test_writer_backfills_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        let written = write_fixture(
            &path,
            &[vec![[0.0; 3], [1.0; 3]], vec![[0.0; 3], [1.0; 3], [2.0; 3]]],
            2,
        );
        assert_eq!(written, 2);

        let reader = FiberReader::open(&path).unwrap();
        // Placeholders are excluded from the backfilled count.
        assert_eq!(reader.header().fiber_count, 2);
        assert_eq!(reader.header().max_fiber_length, 3);
        assert!((reader.header().mean_fiber_length - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bogus.dat");
        std::fs::write(&path, [0u8; 128]).unwrap();
        assert!(matches!(
            FiberReader::open(&path),
            Err(FiberError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_short_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stub.dat");
        std::fs::write(&path, b"FiberDat").unwrap();
        assert!(matches!(
            FiberReader::open(&path),
            Err(FiberError::ShortFile { len: 8 })
        ));
    }

    #[test]
    fn test_zero_length_header_is_corruption() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        write_fixture(&path, &[vec![[0.0; 3], [1.0; 3]]], 0);

        // Append a record whose header declares zero points.
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0u8; FIBER_RECORD_HEADER_LEN as usize])
            .unwrap();

        let mut reader = FiberReader::open(&path).unwrap();
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(FiberError::CorruptHeader { length: 0, .. }))
        ));
    }

    #[test]
    fn test_truncated_payload_is_corruption() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        write_fixture(&path, &[], 0);

        // Header declares 3 points but only one point of payload follows.
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        let mut record_header = [0u8; FIBER_RECORD_HEADER_LEN as usize];
        record_header[0..4].copy_from_slice(&3i32.to_le_bytes());
        file.write_all(&record_header).unwrap();
        file.write_all(&[0u8; 12]).unwrap();

        let mut reader = FiberReader::open(&path).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(FiberError::TruncatedStream { .. }))
        ));
    }

    #[test]
    fn test_dangling_record_header_is_corruption() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        write_fixture(&path, &[], 0);

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0u8; 5]).unwrap();

        let mut reader = FiberReader::open(&path).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(FiberError::TruncatedStream { remaining: 5, .. }))
        ));
    }

    #[test]
    fn test_degenerate_write_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subject_fiber.dat");
        let mut writer = FiberWriter::create(&path, [4, 4, 4]).unwrap();
        assert!(matches!(
            writer.write_fiber(&[[0.0; 3]]),
            Err(FiberError::DegenerateFiber { length: 1 })
        ));
    }
}

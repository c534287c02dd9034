// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Build orchestration: fiber stream to serialized connectome.
//!
//! A build moves through `Init -> Streaming -> Completing -> Serialized` and
//! the transitions are enforced by ownership: [`GraphBuilder::complete`]
//! consumes the builder, so nothing can keep accumulating after
//! finalization, and only the completed [`SparseConnectome`] can be
//! serialized. There is no path from streaming straight to a serialized
//! artifact; an error mid-stream drops the builder and leaves nothing on
//! disk.
//!
//! Edge derivation is consecutive-point pairing: along each fiber's
//! mask/atlas-filtered voxel path, every pair of successive distinct vertex
//! ids contributes one increment. This is the most locally faithful policy;
//! the alternative (all pairs within a fiber, making each fiber a clique)
//! weighs long fibers quadratically and is deliberately not used.

use braingraph_config::{BuildConfig, GraphVariant};
use braingraph_io::regions;
use braingraph_io::{AtlasSource, AtlasVolume, FiberReader, MaskSource, MaskVolume};
use braingraph_structures::{morton_encode, Fiber};
use tracing::info;

use crate::accumulator::EdgeAccumulator;
use crate::artifact::SparseConnectome;
use crate::error::ConnectomeError;

/// Phases of a single build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Init,
    Streaming,
    Completing,
    Serialized,
}

/// Nominal vertex count of the big (voxel-space) graph.
///
/// Each image extent is rounded up to the next power of two and the axes
/// equalized so the lattice corner has an all-ones Morton mask; every voxel
/// inside the image then encodes strictly below the returned dimension.
pub fn voxel_dimension(shape: [i32; 3]) -> Result<u64, ConnectomeError> {
    let side = shape
        .iter()
        .map(|&extent| (extent.max(1) as u64).next_power_of_two())
        .max()
        .unwrap_or(1);
    // Oversized lattices fail the Morton range check below.
    let corner = u32::try_from(side - 1).unwrap_or(u32::MAX);
    let code = morton_encode(corner, corner, corner)?;
    Ok(code + 1)
}

/// Outcome of a completed build.
#[derive(Debug)]
pub struct BuildReport {
    pub connectome: SparseConnectome,
    pub fiber_count: u64,
    pub final_state: BuildState,
}

/// Streams fibers into an [`EdgeAccumulator`] against a fixed atlas and
/// brain mask.
pub struct GraphBuilder {
    variant: GraphVariant,
    atlas: AtlasVolume,
    mask: MaskVolume,
    accumulator: EdgeAccumulator,
    state: BuildState,
    progress_interval: u64,
    fibers_processed: u64,
}

impl GraphBuilder {
    /// Create a builder for one subject.
    ///
    /// `image_shape` comes from the fiber file header and fixes the big
    /// variant's dimension; the small variant always spans the 70 logical
    /// atlas regions.
    pub fn new(
        variant: GraphVariant,
        image_shape: [i32; 3],
        atlas: AtlasVolume,
        mask: MaskVolume,
        max_edges: Option<u64>,
        progress_interval: u64,
    ) -> Result<Self, ConnectomeError> {
        let dimension = match variant {
            GraphVariant::Small => regions::REGION_COUNT as u64,
            GraphVariant::Big => voxel_dimension(image_shape)?,
        };
        Ok(Self {
            variant,
            atlas,
            mask,
            accumulator: EdgeAccumulator::new(dimension, max_edges),
            state: BuildState::Init,
            progress_interval: progress_interval.max(1),
            fibers_processed: 0,
        })
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn dimension(&self) -> u64 {
        self.accumulator.dimension()
    }

    pub fn fibers_processed(&self) -> u64 {
        self.fibers_processed
    }

    /// Current weight of an undirected edge; exposed for inspection while
    /// streaming.
    pub fn edge_weight(&self, u: u64, v: u64) -> u64 {
        self.accumulator.weight(u, v)
    }

    /// Map one voxel of a fiber path to its vertex id, or `None` if the
    /// voxel is filtered out (outside the brain mask, unlabeled, or not a
    /// recognized region).
    fn vertex_id(&self, voxel: braingraph_structures::VoxelCoordinate) -> Result<Option<u64>, ConnectomeError> {
        if !self.mask.get(voxel) {
            return Ok(None);
        }
        let label = self.atlas.get(voxel);
        match self.variant {
            GraphVariant::Big => {
                if label == 0 {
                    Ok(None)
                } else {
                    Ok(Some(voxel.morton()?))
                }
            }
            GraphVariant::Small => {
                Ok(regions::translate_label(label).map(|region| region as u64))
            }
        }
    }

    /// Accumulate one fiber's edges.
    ///
    /// The fiber was already read atomically (header + payload) by the
    /// reader; nothing here suspends mid-fiber.
    pub fn process_fiber(&mut self, fiber: &Fiber) -> Result<(), ConnectomeError> {
        if self.state == BuildState::Init {
            self.state = BuildState::Streaming;
        }

        let mut previous: Option<u64> = None;
        for voxel in fiber.voxel_path()? {
            let Some(id) = self.vertex_id(voxel)? else {
                continue;
            };
            if let Some(prev) = previous {
                if prev != id {
                    self.accumulator.add_edge(prev, id)?;
                }
            }
            previous = Some(id);
        }

        self.fibers_processed += 1;
        if self.fibers_processed % self.progress_interval == 0 {
            info!(
                fibers = self.fibers_processed,
                edges = self.accumulator.edge_count(),
                "processed fibers"
            );
        }
        Ok(())
    }

    /// Finalize the accumulator into the immutable artifact, backfilling
    /// the true fiber count known only after the stream was exhausted.
    ///
    /// Consumes the builder: the state machine has no way back to
    /// streaming.
    pub fn complete(mut self, fiber_count: u64) -> SparseConnectome {
        self.state = BuildState::Completing;
        info!(
            fibers = fiber_count,
            edges = self.accumulator.edge_count(),
            "completing graph"
        );
        self.accumulator.complete(fiber_count)
    }

    /// Run a full build from configuration: open inputs, stream every
    /// fiber, finalize, and serialize the artifact.
    ///
    /// Missing inputs are reported before streaming begins. Any failure
    /// during streaming aborts the build; no artifact is written unless the
    /// input was fully consumed.
    pub fn run(config: &BuildConfig) -> Result<BuildReport, ConnectomeError> {
        for path in [
            &config.subject.fiber_path,
            &config.subject.atlas_data,
            &config.subject.atlas_meta,
            &config.subject.mask_data,
            &config.subject.mask_meta,
        ] {
            if !path.exists() {
                return Err(ConnectomeError::MissingInput(path.clone()));
            }
        }

        let atlas = AtlasSource::Paths {
            data: config.subject.atlas_data.clone(),
            meta: config.subject.atlas_meta.clone(),
        }
        .resolve()?;
        let mask = MaskSource::Paths {
            data: config.subject.mask_data.clone(),
            meta: config.subject.mask_meta.clone(),
        }
        .resolve()?;

        let mut reader = FiberReader::open(&config.subject.fiber_path)?;
        let mut builder = GraphBuilder::new(
            config.graph.variant,
            reader.header().shape,
            atlas,
            mask,
            config.graph.max_edges,
            config.graph.progress_interval,
        )?;
        info!(
            variant = %config.graph.variant,
            dimension = builder.dimension(),
            fiber_file = %config.subject.fiber_path.display(),
            "starting streaming pass"
        );

        for result in reader.by_ref() {
            let fiber = result?;
            builder.process_fiber(&fiber)?;
        }

        let fiber_count = reader.fibers_seen();
        let connectome = builder.complete(fiber_count);
        connectome.save(&config.subject.output_path)?;
        info!(
            output = %config.subject.output_path.display(),
            fibers = fiber_count,
            edges = connectome.edge_count(),
            "serialized connectome"
        );

        Ok(BuildReport {
            connectome,
            fiber_count,
            final_state: BuildState::Serialized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braingraph_io::VolumeShape;
    use braingraph_structures::VoxelCoordinate;

    const SHAPE: VolumeShape = VolumeShape { x: 4, y: 4, z: 4 };

    /// Atlas where every in-brain voxel of plane x=0 is label 1 and plane
    /// x=1 is label 101; the rest is unlabeled.
    fn two_region_atlas() -> AtlasVolume {
        let mut labels = vec![0i32; SHAPE.len()];
        for z in 0..SHAPE.z {
            for y in 0..SHAPE.y {
                labels[z * SHAPE.x * SHAPE.y + y * SHAPE.x] = 1;
                labels[z * SHAPE.x * SHAPE.y + y * SHAPE.x + 1] = 101;
            }
        }
        let bytes: Vec<u8> = labels.iter().flat_map(|l| l.to_be_bytes()).collect();
        AtlasVolume::from_bytes(SHAPE, &bytes).unwrap()
    }

    fn full_mask() -> MaskVolume {
        MaskVolume::from_bytes(SHAPE, &vec![1u8; SHAPE.len()]).unwrap()
    }

    fn small_builder() -> GraphBuilder {
        GraphBuilder::new(
            GraphVariant::Small,
            [4, 4, 4],
            two_region_atlas(),
            full_mask(),
            None,
            10_000,
        )
        .unwrap()
    }

    #[test]
    fn test_small_variant_region_edges() {
        let mut builder = small_builder();
        assert_eq!(builder.state(), BuildState::Init);
        assert_eq!(builder.dimension(), 70);

        // Crosses from label 1 (region 0) into label 101 (region 35).
        let fiber = Fiber::new(vec![[0.2, 0.0, 0.0], [1.4, 0.0, 0.0]]);
        builder.process_fiber(&fiber).unwrap();
        assert_eq!(builder.state(), BuildState::Streaming);
        assert_eq!(builder.edge_weight(0, 35), 1);

        let connectome = builder.complete(1);
        assert_eq!(connectome.fiber_count, 1);
        assert_eq!(connectome.edge_count(), 1);
        assert_eq!(connectome.weight(0, 35), 1);
    }

    #[test]
    fn test_fiber_within_one_region_yields_no_edges() {
        let mut builder = small_builder();
        // Both points sit in label 1; the collapsed path maps to one vertex.
        let fiber = Fiber::new(vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        builder.process_fiber(&fiber).unwrap();
        let connectome = builder.complete(1);
        assert_eq!(connectome.edge_count(), 0);
    }

    #[test]
    fn test_unlabeled_voxels_dropped() {
        let mut builder = small_builder();
        // Middle point is at x=2 (label 0); the edge still forms between
        // the surviving endpoints.
        let fiber = Fiber::new(vec![
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ]);
        builder.process_fiber(&fiber).unwrap();
        assert_eq!(builder.edge_weight(0, 35), 1);
    }

    #[test]
    fn test_mask_rejects_points() {
        // Mask out plane x=1 entirely: the crossing fiber has one
        // surviving vertex and no edge.
        let mut flags = vec![1u8; SHAPE.len()];
        for z in 0..SHAPE.z {
            for y in 0..SHAPE.y {
                flags[z * SHAPE.x * SHAPE.y + y * SHAPE.x + 1] = 0;
            }
        }
        let mask = MaskVolume::from_bytes(SHAPE, &flags).unwrap();
        let mut builder = GraphBuilder::new(
            GraphVariant::Small,
            [4, 4, 4],
            two_region_atlas(),
            mask,
            None,
            10_000,
        )
        .unwrap();

        let fiber = Fiber::new(vec![[0.2, 0.0, 0.0], [1.4, 0.0, 0.0]]);
        builder.process_fiber(&fiber).unwrap();
        let connectome = builder.complete(1);
        assert_eq!(connectome.edge_count(), 0);
    }

    #[test]
    fn test_big_variant_morton_vertices() {
        let mut builder = GraphBuilder::new(
            GraphVariant::Big,
            [4, 4, 4],
            two_region_atlas(),
            full_mask(),
            None,
            10_000,
        )
        .unwrap();
        // 4 is already a power of two: corner (3,3,3) -> code 63.
        assert_eq!(builder.dimension(), 64);

        let fiber = Fiber::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        builder.process_fiber(&fiber).unwrap();

        let u = VoxelCoordinate::new(0, 0, 0).morton().unwrap();
        let v = VoxelCoordinate::new(1, 0, 0).morton().unwrap();
        let connectome = builder.complete(1);
        assert_eq!(connectome.weight(u, v), 1);
    }

    #[test]
    fn test_voxel_dimension_pads_to_power_of_two() {
        // Real subject extents: padded to 256^3.
        assert_eq!(
            voxel_dimension([182, 218, 182]).unwrap(),
            morton_encode(255, 255, 255).unwrap() + 1
        );
        // Degenerate extents fall back to a single-voxel lattice.
        assert_eq!(voxel_dimension([-1, -1, -1]).unwrap(), 1);
    }

    #[test]
    fn test_non_idempotent_reprocessing() {
        let mut builder = small_builder();
        let fiber = Fiber::new(vec![[0.2, 0.0, 0.0], [1.4, 0.0, 0.0]]);
        builder.process_fiber(&fiber).unwrap();
        builder.process_fiber(&fiber).unwrap();
        // The same physical streamline twice doubles its evidence.
        assert_eq!(builder.edge_weight(0, 35), 2);
        assert_eq!(builder.fibers_processed(), 2);
    }
}

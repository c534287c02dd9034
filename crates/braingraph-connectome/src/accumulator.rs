// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Streaming-phase sparse edge accumulation.

use ahash::AHashMap;

use crate::artifact::SparseConnectome;
use crate::error::ConnectomeError;

/// Mutable sparse weighted graph used during streaming.
///
/// Keys are vertex-id pairs normalized to `(min, max)`, so the undirected
/// edge (u, v) and (v, u) share one entry. `add_edge` accumulates and is
/// deliberately non-idempotent: one physical streamline observed twice
/// doubles its evidence.
///
/// The nominal dimension can be the full padded voxel lattice, so storage
/// is purely associative; conversion to a compact form happens exactly once
/// in [`EdgeAccumulator::complete`].
#[derive(Debug)]
pub struct EdgeAccumulator {
    dimension: u64,
    max_edges: Option<u64>,
    edges: AHashMap<(u64, u64), u64>,
}

impl EdgeAccumulator {
    /// Create an empty graph of the given fixed dimension.
    pub fn new(dimension: u64, max_edges: Option<u64>) -> Self {
        Self {
            dimension,
            max_edges,
            edges: AHashMap::new(),
        }
    }

    pub fn dimension(&self) -> u64 {
        self.dimension
    }

    /// Number of distinct edges accumulated so far.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Accumulated weight of the undirected edge (u, v); 0 if absent.
    pub fn weight(&self, u: u64, v: u64) -> u64 {
        if u == v {
            return 0;
        }
        let key = if u < v { (u, v) } else { (v, u) };
        self.edges.get(&key).copied().unwrap_or(0)
    }

    /// Increment the weight of the undirected edge (u, v) by 1.
    ///
    /// Self-pairs are ignored: a fiber lingering inside one voxel or region
    /// carries no connectivity evidence. Vertex ids outside the dimension
    /// are a contract violation; exceeding the configured edge cap is
    /// reported as resource exhaustion, distinct from corruption.
    pub fn add_edge(&mut self, u: u64, v: u64) -> Result<(), ConnectomeError> {
        if u >= self.dimension || v >= self.dimension {
            return Err(ConnectomeError::VertexOutOfRange {
                id: u.max(v),
                dimension: self.dimension,
            });
        }
        if u == v {
            return Ok(());
        }
        let key = if u < v { (u, v) } else { (v, u) };
        if let Some(cap) = self.max_edges {
            if !self.edges.contains_key(&key) && self.edges.len() as u64 >= cap {
                return Err(ConnectomeError::EdgeCapacityExceeded { cap });
            }
        }
        *self.edges.entry(key).or_insert(0) += 1;
        Ok(())
    }

    /// Finalize into the immutable compact artifact.
    ///
    /// Consumes the accumulator: after completion nothing can mutate the
    /// graph, and only the completed form can be serialized. Triplets are
    /// sorted by (row, col) so the artifact is deterministic regardless of
    /// accumulation order.
    pub fn complete(self, fiber_count: u64) -> SparseConnectome {
        let mut triplets: Vec<((u64, u64), u64)> = self.edges.into_iter().collect();
        triplets.sort_unstable_by_key(|&(key, _)| key);

        let mut rows = Vec::with_capacity(triplets.len());
        let mut cols = Vec::with_capacity(triplets.len());
        let mut weights = Vec::with_capacity(triplets.len());
        for ((row, col), weight) in triplets {
            rows.push(row);
            cols.push(col);
            weights.push(weight);
        }

        SparseConnectome {
            dimension: self.dimension,
            fiber_count,
            rows,
            cols,
            weights,
        }
    }
}

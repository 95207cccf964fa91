//! Per-vertex optimization state.

use std::collections::BTreeSet;

use crate::score::{CachePosition, SCORE_PRECISION};
use crate::topology::face::FaceId;

/// State of one vertex of a [`MeshGraph`](crate::topology::mesh_graph::MeshGraph).
///
/// Only faces that have *not* been emitted yet are listed in `undrawn`; its
/// size is the vertex's valence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexState {
    pub(crate) cache_position: CachePosition,
    pub(crate) score: i32,
    pub(crate) undrawn: BTreeSet<FaceId>,
}

impl Default for VertexState {
    fn default() -> Self {
        Self {
            cache_position: CachePosition::NotCached,
            score: -SCORE_PRECISION,
            undrawn: BTreeSet::new(),
        }
    }
}

impl VertexState {
    #[inline]
    pub fn cache_position(&self) -> CachePosition {
        self.cache_position
    }

    /// Score as of the last rescoring of this vertex.
    #[inline]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Number of undrawn faces using this vertex.
    #[inline]
    pub fn valence(&self) -> usize {
        self.undrawn.len()
    }

    /// Undrawn faces using this vertex, in insertion order.
    pub fn undrawn_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.undrawn.iter().copied()
    }
}

//! Face↔vertex adjacency for vertex-cache optimization.
//!
//! `MeshGraph` keeps faces and vertices in dense arrays and expresses
//! adjacency as sets of integer handles:
//! - every vertex lists the faces that use it and have not been emitted yet;
//! - every face stores its three corners in input order plus its canonical
//!   [`FaceKey`], which also serves as the deduplication key.
//!
//! Removing a face tombstones its entry and erases it from the adjacency sets
//! of its corners, so [`FaceId`] handles stay stable for the lifetime of the
//! graph.
//!
//! # Invariants
//!
//! - A face is live if and only if all three of its corners list it as undrawn.
//! - Vertices only list live faces that actually use them.
//! - `lookup` maps every face's key to its handle.
//!
//! The full set is checked after every removal when the `check-invariants`
//! feature is enabled; debug builds check the removed face locally.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::score::{CachePosition, VertexScore, SCORE_PRECISION};
use crate::topology::face::{FaceId, FaceKey, Triangle};
use crate::topology::validation::{self, DegenerateFacePolicy};
use crate::topology::vertex::VertexState;

#[derive(Clone, Debug)]
struct FaceEntry {
    corners: Triangle,
    key: FaceKey,
    score: i32,
    drawn: bool,
}

/// Bidirectional face↔vertex adjacency with cached vertex and face scores.
#[derive(Clone, Debug, Default)]
pub struct MeshGraph {
    vertices: Vec<VertexState>,
    faces: Vec<FaceEntry>,
    lookup: HashMap<FaceKey, FaceId>,
    live: usize,
}

impl MeshGraph {
    /// Empty graph over a fixed array of `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertices: vec![VertexState::default(); vertex_count],
            ..Default::default()
        }
    }

    /// Build a graph from a caller-supplied face list.
    ///
    /// The vertex array is sized `max index + 1`. Rotated duplicates collapse
    /// onto their first occurrence.
    ///
    /// # Errors
    /// See [`validate_faces`](validation::validate_faces). No graph is
    /// produced on failure.
    pub fn from_faces<F>(faces: &[F], policy: DegenerateFacePolicy) -> Result<Self, MeshError>
    where
        F: AsRef<[u32]>,
    {
        let triangles = validation::validate_faces(faces, policy)?;
        let mut graph = Self::new(validation::vertex_count(&triangles));
        for [a, b, c] in triangles {
            graph.add_face(a, b, c)?;
        }
        Ok(graph)
    }

    /// Insert the face `(v0, v1, v2)`, or return the existing handle if a
    /// rotation of it is already present.
    ///
    /// # Errors
    /// Returns `Err(DegenerateFace)` if two indices coincide and
    /// `Err(VertexOutOfRange)` if an index is beyond the vertex array.
    pub fn add_face(&mut self, v0: u32, v1: u32, v2: u32) -> Result<FaceId, MeshError> {
        let corners = [v0, v1, v2];
        let key = FaceKey::new(corners).ok_or(MeshError::DegenerateFace {
            face: self.faces.len(),
            vertices: corners,
        })?;
        if let Some(&existing) = self.lookup.get(&key) {
            return Ok(existing);
        }
        if let Some(&vertex) = corners.iter().find(|&&v| v as usize >= self.vertices.len()) {
            return Err(MeshError::VertexOutOfRange {
                vertex,
                vertex_count: self.vertices.len(),
            });
        }

        let id = FaceId::new(self.faces.len());
        self.faces.push(FaceEntry {
            corners,
            key,
            score: -3 * SCORE_PRECISION,
            drawn: false,
        });
        self.lookup.insert(key, id);
        for v in corners {
            self.vertices[v as usize].undrawn.insert(id);
        }
        self.live += 1;
        Ok(id)
    }

    /// Size of the vertex array.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces ever inserted, including removed ones.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of faces not yet removed.
    #[inline]
    pub fn live_face_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Corners of face `id` in their input order.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this graph.
    #[inline]
    pub fn face(&self, id: FaceId) -> Triangle {
        self.faces[id.index()].corners
    }

    /// Canonical key of face `id`.
    #[inline]
    pub fn face_key(&self, id: FaceId) -> FaceKey {
        self.faces[id.index()].key
    }

    /// Score of face `id` as of its last rescoring.
    #[inline]
    pub fn face_score(&self, id: FaceId) -> i32 {
        self.faces[id.index()].score
    }

    /// True if face `id` has not been removed.
    #[inline]
    pub fn is_live(&self, id: FaceId) -> bool {
        !self.faces[id.index()].drawn
    }

    /// Handle of the face with the same canonical key as `t`, if any.
    pub fn find_face(&self, t: Triangle) -> Option<FaceId> {
        FaceKey::new(t).and_then(|key| self.lookup.get(&key).copied())
    }

    /// State of vertex `v`, or `None` if out of range.
    #[inline]
    pub fn vertex(&self, v: u32) -> Option<&VertexState> {
        self.vertices.get(v as usize)
    }

    /// All faces in insertion order, including removed ones.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|f| f.corners)
    }

    /// Handles of the faces not yet removed, in insertion order.
    pub fn live_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.drawn)
            .map(|(i, _)| FaceId::new(i))
    }

    /// Record where vertex `v` now sits in the simulated cache. Its score is
    /// not refreshed until the next [`update_score`](Self::update_score).
    ///
    /// # Panics
    /// Panics if `v` is out of range.
    #[inline]
    pub fn set_cache_position(&mut self, v: u32, position: CachePosition) {
        self.vertices[v as usize].cache_position = position;
    }

    /// Rescore exactly the given vertices from their cache position and
    /// valence, then rescore and return every live face touching them.
    ///
    /// The returned set is the candidate pool for the next selection. Cost is
    /// proportional to the number of vertices times their average valence.
    ///
    /// # Errors
    /// Returns `Err(VertexOutOfRange)` for an unknown vertex and propagates
    /// `Err(InvalidCachePosition)` if a vertex sits past the scorer's cache.
    pub fn update_score<I>(&mut self, vertices: I, vertex_score: &VertexScore) -> Result<BTreeSet<FaceId>, MeshError>
    where
        I: IntoIterator<Item = u32>,
    {
        let vertex_count = self.vertices.len();
        let mut dirty = BTreeSet::new();
        for v in vertices {
            let state = self
                .vertices
                .get_mut(v as usize)
                .ok_or(MeshError::VertexOutOfRange {
                    vertex: v,
                    vertex_count,
                })?;
            state.score = vertex_score.get(state.cache_position, state.undrawn.len())?;
            dirty.extend(state.undrawn.iter().copied());
        }
        for &id in &dirty {
            let face = &self.faces[id.index()];
            let score = face
                .corners
                .iter()
                .map(|&v| self.vertices[v as usize].score)
                .sum::<i32>();
            self.faces[id.index()].score = score;
        }
        Ok(dirty)
    }

    /// Remove and return the highest-scoring live face among `candidates`.
    ///
    /// Ties go to the face with the smallest canonical key, so results do not
    /// depend on set iteration order. Removed candidates are ignored.
    ///
    /// # Errors
    /// Returns `Err(EmptyCandidates)` if no live candidate remains.
    pub fn select_and_remove_best<'a, I>(&mut self, candidates: I) -> Result<FaceId, MeshError>
    where
        I: IntoIterator<Item = &'a FaceId>,
    {
        let best = candidates
            .into_iter()
            .copied()
            .filter(|&id| self.is_live(id))
            .max_by(|&a, &b| {
                let (fa, fb) = (&self.faces[a.index()], &self.faces[b.index()]);
                fa.score.cmp(&fb.score).then_with(|| fb.key.cmp(&fa.key))
            })
            .ok_or(MeshError::EmptyCandidates)?;
        self.remove_face(best);
        Ok(best)
    }

    fn remove_face(&mut self, id: FaceId) {
        let face = &mut self.faces[id.index()];
        face.drawn = true;
        let corners = face.corners;
        for v in corners {
            self.vertices[v as usize].undrawn.remove(&id);
        }
        self.live -= 1;
        debug_assert!(
            corners
                .iter()
                .all(|&v| !self.vertices[v as usize].undrawn.contains(&id))
        );
        // The full check is O(faces + vertices); only run it per removal on request.
        #[cfg(feature = "check-invariants")]
        self.debug_assert_invariants();
    }
}

impl DebugInvariants for MeshGraph {
    fn validate_invariants(&self) -> Result<(), MeshError> {
        let violation = |msg: String| Err(MeshError::InvariantViolation(msg));

        // 1) live faces are listed by all corners, removed ones by none
        let mut live = 0usize;
        for (i, face) in self.faces.iter().enumerate() {
            let id = FaceId::new(i);
            for v in face.corners {
                let Some(vertex) = self.vertices.get(v as usize) else {
                    return violation(format!("face {} uses missing vertex {v}", face.key));
                };
                if vertex.undrawn.contains(&id) == face.drawn {
                    return violation(format!(
                        "face {} (drawn={}) inconsistent with vertex {v}",
                        face.key, face.drawn
                    ));
                }
            }
            if self.lookup.get(&face.key) != Some(&id) {
                return violation(format!("face {} missing from lookup", face.key));
            }
            if !face.drawn {
                live += 1;
            }
        }
        if live != self.live || self.lookup.len() != self.faces.len() {
            return violation(format!(
                "live count {} (expected {live}), lookup size {} (expected {})",
                self.live,
                self.lookup.len(),
                self.faces.len()
            ));
        }

        // 2) vertices only list faces that use them
        for (v, vertex) in self.vertices.iter().enumerate() {
            for id in &vertex.undrawn {
                let uses = self
                    .faces
                    .get(id.index())
                    .is_some_and(|f| f.corners.contains(&(v as u32)));
                if !uses {
                    return violation(format!("vertex {v} lists foreign face #{}", id.index()));
                }
            }
        }
        Ok(())
    }
}

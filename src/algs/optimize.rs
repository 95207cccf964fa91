//! Greedy vertex-cache optimization of a face list.
//!
//! Faces are emitted one at a time, always choosing the highest-scoring
//! candidate, while a simulated FIFO cache tracks which vertices would still
//! be resident on the GPU. After each emission only the vertices whose inputs
//! changed are rescored:
//!
//! 1. the three corners of the emitted face (their valence dropped),
//! 2. any vertex evicted from the cache (its cache term vanished),
//! 3. every vertex still in the cache (its slot shifted).
//!
//! The faces touching those vertices form the candidate pool of the next
//! step. When the pool comes up empty (the cache holds no vertex with work
//! left) the search falls back to all remaining faces. Restricting the search
//! this way occasionally picks a locally rather than globally best face, in
//! exchange for near-linear running time instead of O(faces²).
//!
//! Ties between equal scores go to the face with the smallest canonical key,
//! so the output is fully deterministic.

use std::collections::BTreeSet;

use crate::algs::acmr::{self, CacheStats};
use crate::algs::fifo::{FifoCache, Touch};
use crate::mesh_error::MeshError;
use crate::score::{CachePosition, DEFAULT_CACHE_SIZE, VertexScore, VertexScoreParams};
use crate::topology::face::{FaceId, Triangle};
use crate::topology::mesh_graph::MeshGraph;
use crate::topology::validation::DegenerateFacePolicy;

/// Configuration of one optimization run.
///
/// There is no `Default`: the degenerate-face policy must be chosen
/// explicitly, see [`OptimizerConfig::new`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptimizerConfig {
    /// Scoring heuristic parameters.
    #[serde(default)]
    pub score: VertexScoreParams,
    /// Capacity of the simulated vertex cache.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    /// What to do with faces that repeat a vertex.
    pub degenerate: DegenerateFacePolicy,
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

impl OptimizerConfig {
    /// Default scoring and cache size with the given degenerate-face policy.
    pub fn new(degenerate: DegenerateFacePolicy) -> Self {
        Self {
            score: VertexScoreParams::default(),
            cache_size: DEFAULT_CACHE_SIZE,
            degenerate,
        }
    }

    /// Build the scoring tables for this configuration.
    pub fn vertex_score(&self) -> Result<VertexScore, MeshError> {
        VertexScore::new(self.score, self.cache_size)
    }
}

/// Loop-carried state between two greedy steps.
#[derive(Clone, Debug)]
pub struct OptimizerState {
    cache: FifoCache,
    dirty: BTreeSet<u32>,
}

impl OptimizerState {
    /// Cold-start state: empty cache, every vertex needs scoring.
    pub fn new(graph: &MeshGraph, vertex_score: &VertexScore) -> Self {
        Self {
            cache: FifoCache::new(vertex_score.cache_size()),
            dirty: (0..graph.vertex_count())
                .filter_map(|v| u32::try_from(v).ok())
                .collect(),
        }
    }

    /// Simulated cache contents, front first.
    pub fn cached_vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.cache.iter()
    }

    /// Vertices to rescore at the start of the next step.
    pub fn dirty_vertices(&self) -> &BTreeSet<u32> {
        &self.dirty
    }
}

/// Outcome of one greedy step.
#[derive(Clone, Debug)]
pub struct Step {
    /// Emitted face, in its input vertex order.
    pub face: Triangle,
    /// Handle of the emitted face in the graph.
    pub id: FaceId,
    /// True if the candidate pool was empty and all remaining faces were searched.
    pub global_search: bool,
    /// State to hand to the next step.
    pub next: OptimizerState,
}

/// Emit the next face.
///
/// # Errors
/// Returns `Err(EmptyCandidates)` if the graph has no live face left, and
/// propagates scoring errors if `state` was built for a larger cache than
/// `vertex_score` describes.
pub fn step(
    graph: &mut MeshGraph,
    vertex_score: &VertexScore,
    state: OptimizerState,
) -> Result<Step, MeshError> {
    let OptimizerState { mut cache, dirty } = state;

    let candidates = graph.update_score(dirty, vertex_score)?;
    let global_search = candidates.is_empty();
    let id = if global_search {
        log::debug!(
            "No rescored candidates; searching all {} remaining faces",
            graph.live_face_count()
        );
        let all: Vec<FaceId> = graph.live_faces().collect();
        graph.select_and_remove_best(&all)?
    } else {
        graph.select_and_remove_best(&candidates)?
    };

    let face = graph.face(id);
    log::trace!("Emitting face {face:?} (score {})", graph.face_score(id));

    let mut dirty: BTreeSet<u32> = face.into_iter().collect();
    for v in face {
        if let Touch::Miss {
            evicted: Some(evicted),
        } = cache.touch(v)
        {
            graph.set_cache_position(evicted, CachePosition::NotCached);
            dirty.insert(evicted);
        }
    }
    for (slot, v) in cache.iter().enumerate() {
        graph.set_cache_position(v, CachePosition::Slot(slot));
        dirty.insert(v);
    }

    Ok(Step {
        face,
        id,
        global_search,
        next: OptimizerState { cache, dirty },
    })
}

/// Drain `graph` into a cache-optimized face order.
///
/// Returns every face of the graph exactly once, each in its input vertex
/// order.
pub fn optimize(graph: MeshGraph, vertex_score: &VertexScore) -> Result<Vec<Triangle>, MeshError> {
    optimize_counting(graph, vertex_score).map(|(faces, _)| faces)
}

fn optimize_counting(
    mut graph: MeshGraph,
    vertex_score: &VertexScore,
) -> Result<(Vec<Triangle>, usize), MeshError> {
    let mut ordered = Vec::with_capacity(graph.live_face_count());
    let mut global_searches = 0usize;
    let mut state = OptimizerState::new(&graph, vertex_score);
    while !graph.is_empty() {
        let Step {
            face,
            global_search,
            next,
            ..
        } = step(&mut graph, vertex_score, state)?;
        ordered.push(face);
        global_searches += usize::from(global_search);
        state = next;
    }
    log::debug!(
        "Optimized {} faces over {} vertices ({} global searches)",
        ordered.len(),
        graph.vertex_count(),
        global_searches
    );
    Ok((ordered, global_searches))
}

/// Validate `faces`, build the mesh graph, and optimize it.
///
/// ```rust
/// use mesh_vcache::algs::optimize::{optimize_faces, OptimizerConfig};
/// use mesh_vcache::topology::validation::DegenerateFacePolicy;
///
/// let faces = [[0u32, 1, 2], [7, 8, 9], [2, 3, 4]];
/// let config = OptimizerConfig::new(DegenerateFacePolicy::Reject);
/// let ordered = optimize_faces(&faces, &config).unwrap();
/// assert_eq!(ordered, vec![[7, 8, 9], [0, 1, 2], [2, 3, 4]]);
/// ```
///
/// # Errors
/// Fails on malformed faces (see
/// [`validate_faces`](crate::topology::validation::validate_faces)) or an
/// invalid configuration. No partial ordering is returned.
pub fn optimize_faces<F>(faces: &[F], config: &OptimizerConfig) -> Result<Vec<Triangle>, MeshError>
where
    F: AsRef<[u32]>,
{
    let vertex_score = config.vertex_score()?;
    let graph = MeshGraph::from_faces(faces, config.degenerate)?;
    optimize(graph, &vertex_score)
}

/// Ordered faces together with cache statistics before and after.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptimizationReport {
    /// Cache-optimized face order.
    pub faces: Vec<Triangle>,
    /// Statistics of the validated, deduplicated input order.
    pub before: CacheStats,
    /// Statistics of the optimized order.
    pub after: CacheStats,
    /// Steps that fell back to searching every remaining face.
    pub global_searches: usize,
}

/// Like [`optimize_faces`], also measuring both orderings at the configured
/// cache size.
pub fn optimize_with_report<F>(faces: &[F], config: &OptimizerConfig) -> Result<OptimizationReport, MeshError>
where
    F: AsRef<[u32]>,
{
    let vertex_score = config.vertex_score()?;
    let graph = MeshGraph::from_faces(faces, config.degenerate)?;
    let input: Vec<Triangle> = graph.triangles().collect();
    let before = acmr::evaluate(&input, config.cache_size);
    let (faces, global_searches) = optimize_counting(graph, &vertex_score)?;
    let after = acmr::evaluate(&faces, config.cache_size);
    Ok(OptimizationReport {
        faces,
        before,
        after,
        global_searches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(faces: &[Triangle]) -> MeshGraph {
        MeshGraph::from_faces(faces, DegenerateFacePolicy::Reject).unwrap()
    }

    #[test]
    fn disjoint_triangle_is_drawn_first() {
        let faces = [[0, 1, 2], [7, 8, 9], [2, 3, 4]];
        let out = optimize(graph(&faces), &VertexScore::default()).unwrap();
        assert_eq!(out, vec![[7, 8, 9], [0, 1, 2], [2, 3, 4]]);
    }

    #[test]
    fn steps_thread_cache_and_dirty_set() {
        let faces = [[0, 1, 2], [7, 8, 9], [2, 3, 4]];
        let score = VertexScore::default();
        let mut g = graph(&faces);
        let state = OptimizerState::new(&g, &score);
        assert_eq!(
            state.dirty_vertices().iter().copied().collect::<Vec<_>>(),
            (0..10).collect::<Vec<u32>>()
        );

        let first = step(&mut g, &score, state).unwrap();
        assert_eq!(first.face, [7, 8, 9]);
        assert!(!first.global_search);
        assert_eq!(
            first.next.cached_vertices().collect::<Vec<_>>(),
            vec![9, 8, 7]
        );
        assert_eq!(
            first.next.dirty_vertices().iter().copied().collect::<Vec<_>>(),
            vec![7, 8, 9]
        );
        assert_eq!(
            g.vertex(9).unwrap().cache_position(),
            CachePosition::Slot(0)
        );

        // 7, 8, 9 have no faces left, so the pool is empty
        let second = step(&mut g, &score, first.next).unwrap();
        assert!(second.global_search);
        assert_eq!(second.face, [0, 1, 2]);

        let third = step(&mut g, &score, second.next).unwrap();
        assert!(!third.global_search);
        assert_eq!(third.face, [2, 3, 4]);
        assert!(g.is_empty());
        assert_eq!(
            step(&mut g, &score, third.next).unwrap_err(),
            MeshError::EmptyCandidates
        );
    }

    #[test]
    fn evicted_vertices_leave_the_cache() {
        // a strip of 4 faces over 6 vertices through a 3-slot cache
        let faces = [[0, 1, 2], [1, 3, 2], [2, 3, 4], [3, 5, 4]];
        let score = VertexScore::new(VertexScoreParams::default(), 3).unwrap();
        let mut g = graph(&faces);
        let mut state = OptimizerState::new(&g, &score);
        while !g.is_empty() {
            let s = step(&mut g, &score, state).unwrap();
            state = s.next;
            let cached: Vec<u32> = state.cached_vertices().collect();
            assert!(cached.len() <= 3);
            for v in 0..6u32 {
                let pos = g.vertex(v).unwrap().cache_position();
                match cached.iter().position(|&c| c == v) {
                    Some(slot) => assert_eq!(pos, CachePosition::Slot(slot)),
                    None => assert_eq!(pos, CachePosition::NotCached),
                }
            }
        }
    }

    #[test]
    fn single_triangle_is_unchanged() {
        let faces = [[4, 2, 9]];
        let out = optimize(graph(&faces), &VertexScore::default()).unwrap();
        assert_eq!(out, vec![[4, 2, 9]]);
        for capacity in 3..=64 {
            assert_eq!(acmr::acmr(&out, capacity), 1.0, "capacity {capacity}");
        }
    }

    #[test]
    fn empty_input_yields_empty_order() {
        let faces: [[u32; 3]; 0] = [];
        let config = OptimizerConfig::new(DegenerateFacePolicy::Reject);
        assert!(optimize_faces(&faces, &config).unwrap().is_empty());
        let report = optimize_with_report(&faces, &config).unwrap();
        assert_eq!(report.before.acmr(), 1.0);
        assert_eq!(report.global_searches, 0);
    }

    #[test]
    fn duplicates_keep_first_winding() {
        let faces = [[1u32, 2, 0], [0, 1, 2], [2, 1, 0]];
        let config = OptimizerConfig::new(DegenerateFacePolicy::Reject);
        let out = optimize_faces(&faces, &config).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.contains(&[1, 2, 0]));
        assert!(out.contains(&[2, 1, 0]));
    }

    #[test]
    fn failures_return_no_ordering() {
        let config = OptimizerConfig::new(DegenerateFacePolicy::Reject);
        let faces = [vec![0u32, 1, 2], vec![2, 2, 3]];
        assert!(optimize_faces(&faces, &config).unwrap_err().is_invalid_input());

        let bad = OptimizerConfig {
            cache_size: 1,
            ..OptimizerConfig::new(DegenerateFacePolicy::Skip)
        };
        assert_eq!(
            optimize_faces(&faces, &bad),
            Err(MeshError::InvalidCacheSize(1))
        );
    }

    #[test]
    fn config_loads_from_json() {
        let config: OptimizerConfig = serde_json::from_str(
            r#"{ "degenerate": "Skip", "cache_size": 16, "score": { "last_tri_score": 0.8 } }"#,
        )
        .unwrap();
        assert_eq!(config.degenerate, DegenerateFacePolicy::Skip);
        assert_eq!(config.cache_size, 16);
        assert_eq!(config.score.last_tri_score, 0.8);
        assert_eq!(config.score.valence_boost_scale, 2.0);

        let minimal: OptimizerConfig =
            serde_json::from_str(r#"{ "degenerate": "Reject" }"#).unwrap();
        assert_eq!(minimal, OptimizerConfig::new(DegenerateFacePolicy::Reject));

        assert!(serde_json::from_str::<OptimizerConfig>("{}").is_err());
    }
}

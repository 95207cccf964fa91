//! Average cache miss ratio (ACMR) of a face ordering.
//!
//! Replays an index sequence through a FIFO cache of a given capacity and
//! counts misses (vertex transforms). ACMR is misses per distinct vertex; 1.0
//! means every vertex was transformed exactly once. See
//! <http://castano.ludicon.com/blog/2009/01/29/acmr/>.
//!
//! The evaluator does not depend on the optimizer or the mesh graph and works
//! on any sequence of index groups, so triangle lists and strips can both be
//! measured.

use hashbrown::HashSet;

use crate::algs::fifo::{FifoCache, Touch};

/// Cache misses and distinct vertices of one ordering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    /// Number of vertex references that missed the cache.
    pub misses: usize,
    /// Number of distinct vertices referenced.
    pub distinct_vertices: usize,
}

impl CacheStats {
    /// Misses per distinct vertex. An ordering with no vertices scores 1.0.
    pub fn acmr(&self) -> f64 {
        if self.distinct_vertices == 0 {
            1.0
        } else {
            self.misses as f64 / self.distinct_vertices as f64
        }
    }
}

/// Count cache misses of `faces` replayed through a FIFO cache of
/// `cache_capacity` vertices.
///
/// ```rust
/// use mesh_vcache::algs::acmr::evaluate;
/// let faces = [[0u32, 1, 2], [2, 1, 3]];
/// let stats = evaluate(&faces, 8);
/// assert_eq!((stats.misses, stats.distinct_vertices), (4, 4));
/// assert_eq!(stats.acmr(), 1.0);
/// ```
pub fn evaluate<F>(faces: &[F], cache_capacity: usize) -> CacheStats
where
    F: AsRef<[u32]>,
{
    let mut cache = FifoCache::new(cache_capacity);
    let mut seen = HashSet::new();
    let mut misses = 0;
    for &v in faces.iter().flat_map(|f| f.as_ref()) {
        seen.insert(v);
        if let Touch::Miss { .. } = cache.touch(v) {
            misses += 1;
        }
    }
    CacheStats {
        misses,
        distinct_vertices: seen.len(),
    }
}

/// Shorthand for `evaluate(faces, cache_capacity).acmr()`.
pub fn acmr<F>(faces: &[F], cache_capacity: usize) -> f64
where
    F: AsRef<[u32]>,
{
    evaluate(faces, cache_capacity).acmr()
}

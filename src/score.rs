//! Vertex scoring for greedy vertex-cache optimization.
//!
//! A vertex's score combines two terms, both precomputed into integer lookup
//! tables scaled by [`SCORE_PRECISION`]:
//! - a *cache* term that rewards vertices already sitting in the simulated
//!   cache (flat for the three most recent slots, then decaying towards the
//!   tail), and
//! - a *valence* term that boosts vertices with few remaining faces so that
//!   lone triangles are not left behind.
//!
//! Integer scores keep comparisons and tie detection identical across
//! platforms.

use crate::mesh_error::MeshError;

/// Fixed-point scale applied to every score.
pub const SCORE_PRECISION: i32 = 1000;

/// Number of entries in the valence lookup table.
pub const VALENCE_TABLE_SIZE: usize = 64;

/// Default simulated cache capacity, approximating a typical hardware vertex cache.
pub const DEFAULT_CACHE_SIZE: usize = 32;

/// Largest magnitude of a single table entry. A face sums three vertices of
/// at most two entries each, so face scores stay within `i32`.
pub const MAX_TABLE_SCORE: i32 = i32::MAX / 6;

/// The most recently used slots all score as "part of the last triangle".
const LAST_TRIANGLE_SLOTS: usize = 3;

/// Tunable parameters of the scoring heuristic.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VertexScoreParams {
    /// Exponent of the decay of the cache term towards the tail of the cache.
    pub cache_decay_power: f64,
    /// Cache term for the three most recently used slots.
    pub last_tri_score: f64,
    /// Scale of the valence boost.
    pub valence_boost_scale: f64,
    /// Exponent of the valence boost (applied as `valence^-power`).
    pub valence_boost_power: f64,
}

impl Default for VertexScoreParams {
    fn default() -> Self {
        Self {
            cache_decay_power: 1.5,
            last_tri_score: 0.75,
            valence_boost_scale: 2.0,
            valence_boost_power: 0.5,
        }
    }
}

impl VertexScoreParams {
    fn validate(&self) -> Result<(), MeshError> {
        let named = [
            ("cache_decay_power", self.cache_decay_power),
            ("last_tri_score", self.last_tri_score),
            ("valence_boost_scale", self.valence_boost_scale),
            ("valence_boost_power", self.valence_boost_power),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(MeshError::InvalidScoreParameter {
                    name,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Where a vertex sits in the simulated cache.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize,
    serde::Deserialize,
)]
pub enum CachePosition {
    /// Distance from the front of the cache (0 = most recently added).
    Slot(usize),
    /// Not currently in the cache.
    #[default]
    NotCached,
}

impl CachePosition {
    /// Slot index, if cached.
    #[inline]
    pub fn slot(self) -> Option<usize> {
        match self {
            CachePosition::Slot(pos) => Some(pos),
            CachePosition::NotCached => None,
        }
    }

    #[inline]
    pub fn is_cached(self) -> bool {
        matches!(self, CachePosition::Slot(_))
    }
}

/// Immutable scoring function over `(cache position, valence)`.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexScore {
    params: VertexScoreParams,
    cache_scores: Vec<i32>,
    valence_scores: [i32; VALENCE_TABLE_SIZE],
}

impl Default for VertexScore {
    fn default() -> Self {
        Self::build(VertexScoreParams::default(), DEFAULT_CACHE_SIZE)
    }
}

impl VertexScore {
    /// Precompute the score tables for a cache of `cache_size` slots.
    ///
    /// # Errors
    /// Returns `Err(InvalidCacheSize)` if `cache_size < 3`, or
    /// `Err(InvalidScoreParameter)` if any parameter is NaN or infinite or
    /// drives a table entry beyond [`MAX_TABLE_SCORE`] in magnitude.
    ///
    /// # Example
    /// ```rust
    /// use mesh_vcache::score::{CachePosition, VertexScore, VertexScoreParams};
    /// let score = VertexScore::new(VertexScoreParams::default(), 32).unwrap();
    /// assert_eq!(score.get(CachePosition::NotCached, 1).unwrap(), 2000);
    /// assert_eq!(score.get(CachePosition::Slot(0), 1).unwrap(), 2750);
    /// ```
    pub fn new(params: VertexScoreParams, cache_size: usize) -> Result<Self, MeshError> {
        if cache_size < LAST_TRIANGLE_SLOTS {
            return Err(MeshError::InvalidCacheSize(cache_size));
        }
        params.validate()?;
        let score = Self::build(params, cache_size);
        score.check_bounds()?;
        Ok(score)
    }

    fn check_bounds(&self) -> Result<(), MeshError> {
        let out_of_range = |s: &i32| s.unsigned_abs() > MAX_TABLE_SCORE.unsigned_abs();
        let p = &self.params;
        let culprit = if let Some(pos) = self.cache_scores.iter().position(out_of_range) {
            if pos < LAST_TRIANGLE_SLOTS {
                ("last_tri_score", p.last_tri_score)
            } else {
                ("cache_decay_power", p.cache_decay_power)
            }
        } else if self.valence_scores.iter().any(out_of_range) {
            // entry 1 is scale * precision regardless of the power
            if out_of_range(&self.valence_scores[1]) {
                ("valence_boost_scale", p.valence_boost_scale)
            } else {
                ("valence_boost_power", p.valence_boost_power)
            }
        } else {
            return Ok(());
        };
        Err(MeshError::InvalidScoreParameter {
            name: culprit.0,
            value: culprit.1.to_string(),
        })
    }

    fn build(params: VertexScoreParams, cache_size: usize) -> Self {
        let precision = f64::from(SCORE_PRECISION);
        // Float-to-int `as` truncates, so adding 0.5 rounds positive scores.
        let cache_scores = (0..cache_size)
            .map(|pos| {
                if pos < LAST_TRIANGLE_SLOTS {
                    (0.5 + precision * params.last_tri_score) as i32
                } else {
                    let ratio = (cache_size - pos) as f64 / (cache_size - LAST_TRIANGLE_SLOTS) as f64;
                    (0.5 + precision * ratio.powf(params.cache_decay_power)) as i32
                }
            })
            .collect();

        let mut valence_scores = [0i32; VALENCE_TABLE_SIZE];
        for (valence, slot) in valence_scores.iter_mut().enumerate().skip(1) {
            *slot = (0.5
                + precision
                    * params.valence_boost_scale
                    * (valence as f64).powf(-params.valence_boost_power))
                as i32;
        }

        Self {
            params,
            cache_scores,
            valence_scores,
        }
    }

    /// Parameters the tables were built from.
    pub fn params(&self) -> &VertexScoreParams {
        &self.params
    }

    /// Capacity of the cache these tables describe.
    pub fn cache_size(&self) -> usize {
        self.cache_scores.len()
    }

    /// Cache term for `slot`, or `None` past the end of the cache.
    pub fn cache_score(&self, slot: usize) -> Option<i32> {
        self.cache_scores.get(slot).copied()
    }

    /// Valence term, clamped to the last table entry for very large valences.
    pub fn valence_score(&self, valence: usize) -> i32 {
        self.valence_scores[valence.min(VALENCE_TABLE_SIZE - 1)]
    }

    /// Score of a vertex at `position` with `valence` undrawn faces.
    ///
    /// - valence 0 scores `-SCORE_PRECISION`: the vertex has no remaining work.
    /// - not cached: valence term only.
    /// - cached with valence beyond the table: cache term only.
    /// - otherwise: cache term plus valence term.
    ///
    /// # Errors
    /// Returns `Err(InvalidCachePosition)` for a `Slot` outside `[0, cache_size)`.
    pub fn get(&self, position: CachePosition, valence: usize) -> Result<i32, MeshError> {
        if valence == 0 {
            return Ok(-SCORE_PRECISION);
        }
        match position {
            CachePosition::NotCached => Ok(self.valence_score(valence)),
            CachePosition::Slot(pos) => {
                let cache = self
                    .cache_score(pos)
                    .ok_or(MeshError::InvalidCachePosition {
                        position: pos as i64,
                        cache_size: self.cache_size(),
                    })?;
                if valence >= VALENCE_TABLE_SIZE {
                    Ok(cache)
                } else {
                    Ok(cache + self.valence_scores[valence])
                }
            }
        }
    }

    /// Same as [`get`](Self::get) using the legacy integer encoding, where
    /// `-1` means "not in cache".
    ///
    /// # Errors
    /// Returns `Err(NegativeValence)` if `valence < 0` and
    /// `Err(InvalidCachePosition)` if `cache_position < -1` or past the cache.
    pub fn get_encoded(&self, cache_position: i64, valence: i64) -> Result<i32, MeshError> {
        let valence = usize::try_from(valence).map_err(|_| MeshError::NegativeValence(valence))?;
        let position = match cache_position {
            -1 => CachePosition::NotCached,
            pos if pos >= 0 => CachePosition::Slot(pos as usize),
            pos => {
                return Err(MeshError::InvalidCachePosition {
                    position: pos,
                    cache_size: self.cache_size(),
                });
            }
        };
        self.get(position, valence)
    }
}

//! MeshError: Unified error type for mesh-vcache public APIs
//!
//! Every fallible operation in the crate returns this error type. Variants fall
//! into two caller-visible categories:
//! - *invalid input*: the face list handed to the crate is malformed;
//! - *invalid argument*: a scoring or configuration value is outside its
//!   documented domain (an internal programming error in normal operation).

use thiserror::Error;

/// Unified error type for mesh-vcache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A face did not have exactly three vertex indices.
    #[error("Invalid input: face #{face} has {found} indices, expected 3")]
    FaceArity { face: usize, found: usize },
    /// A face repeats a vertex index.
    #[error("Invalid input: face #{face} is degenerate ({vertices:?})")]
    DegenerateFace { face: usize, vertices: [u32; 3] },
    /// A face references a vertex beyond the mesh's vertex array.
    #[error("Invalid input: vertex {vertex} out of range (mesh has {vertex_count} vertices)")]
    VertexOutOfRange { vertex: u32, vertex_count: usize },
    /// A negative valence was passed to the vertex scorer.
    #[error("Invalid argument: valence must be non-negative, got {0}")]
    NegativeValence(i64),
    /// A cache position outside `[0, cache_size)` that is not the "not cached" encoding.
    #[error("Invalid argument: cache position {position} outside [0, {cache_size})")]
    InvalidCachePosition { position: i64, cache_size: usize },
    /// The simulated cache must be able to hold at least one triangle.
    #[error("Invalid argument: cache size must be at least 3, got {0}")]
    InvalidCacheSize(usize),
    /// A scoring parameter was NaN, infinite, or large enough to overflow scores.
    #[error("Invalid argument: score parameter `{name}` must be finite and keep scores in range, got {value}")]
    InvalidScoreParameter { name: &'static str, value: String },
    /// Best-face selection was asked to choose from an empty candidate set.
    #[error("Internal error: no candidate faces to select from")]
    EmptyCandidates,
    /// A structural invariant of the mesh graph does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl MeshError {
    /// True for errors caused by a malformed face list.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MeshError::FaceArity { .. }
                | MeshError::DegenerateFace { .. }
                | MeshError::VertexOutOfRange { .. }
        )
    }

    /// True for errors caused by an out-of-domain scoring or configuration value.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            MeshError::NegativeValence(_)
                | MeshError::InvalidCachePosition { .. }
                | MeshError::InvalidCacheSize(_)
                | MeshError::InvalidScoreParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_disjoint() {
        let input = MeshError::FaceArity { face: 0, found: 4 };
        assert!(input.is_invalid_input());
        assert!(!input.is_invalid_argument());

        let arg = MeshError::NegativeValence(-1);
        assert!(arg.is_invalid_argument());
        assert!(!arg.is_invalid_input());

        assert!(!MeshError::EmptyCandidates.is_invalid_input());
        assert!(!MeshError::EmptyCandidates.is_invalid_argument());
    }

    #[test]
    fn messages_name_the_offending_face() {
        let err = MeshError::DegenerateFace {
            face: 7,
            vertices: [3, 3, 1],
        };
        assert_eq!(
            err.to_string(),
            "Invalid input: face #7 is degenerate ([3, 3, 1])"
        );
    }
}

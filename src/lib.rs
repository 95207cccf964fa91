#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-vcache
//!
//! mesh-vcache reorders the faces of a triangle mesh so that a GPU's small
//! post-transform vertex cache is reused as much as possible. It implements
//! Forsyth-style greedy optimization with incremental rescoring, and measures
//! the result as an average cache miss ratio (ACMR).
//!
//! ## Features
//! - Integer vertex scoring from cache position and remaining valence
//! - Index-based face↔vertex adjacency with rotation-aware face deduplication
//! - Greedy optimizer with a simulated FIFO cache and a "dirty vertex" set
//! - ACMR evaluation of any index sequence (triangle lists or strips)
//! - `serde` configuration and reports, `log` diagnostics
//!
//! ## Determinism
//!
//! Ties between equally scored faces go to the smallest canonical face key,
//! so the same input always yields the same output on every platform.
//!
//! ## Usage
//!
//! ```rust
//! use mesh_vcache::prelude::*;
//!
//! let faces = [[0u32, 1, 2], [7, 8, 9], [2, 3, 4]];
//! let config = OptimizerConfig::new(DegenerateFacePolicy::Reject);
//! let report = optimize_with_report(&faces, &config).unwrap();
//! assert_eq!(report.faces, vec![[7, 8, 9], [0, 1, 2], [2, 3, 4]]);
//! assert!(report.after.acmr() <= report.before.acmr());
//! let index_buffer: &[u32] = flatten_indices(&report.faces);
//! assert_eq!(index_buffer.len(), 9);
//! ```
//!
//! ## Invariant checks
//! Enable the `check-invariants` feature to validate the full mesh graph after
//! every face removal, also in release builds.

pub mod algs;
pub mod debug_invariants;
pub mod mesh_error;
pub mod score;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use mesh_error::MeshError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::acmr::{CacheStats, acmr, evaluate};
    pub use crate::algs::optimize::{
        OptimizationReport, OptimizerConfig, optimize, optimize_faces, optimize_with_report,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshError;
    pub use crate::score::{CachePosition, VertexScore, VertexScoreParams};
    pub use crate::topology::face::{FaceKey, Triangle, flatten_indices, unique_faces};
    pub use crate::topology::mesh_graph::MeshGraph;
    pub use crate::topology::validation::DegenerateFacePolicy;
}

//! Mesh connectivity for vertex-cache optimization.
//!
//! This module provides the face and vertex types and the adjacency graph the
//! optimizer drains. It includes:
//! - Oriented triangle faces and their canonical keys
//! - Per-vertex cache and scoring state
//! - Validation of caller-supplied face lists
//!
//! Most users only build a [`MeshGraph`] through
//! [`MeshGraph::from_faces`] or skip straight to
//! [`optimize_faces`](crate::algs::optimize::optimize_faces).

pub mod face;
pub mod mesh_graph;
pub mod validation;
pub mod vertex;

pub use face::{FaceId, FaceKey, Triangle};
pub use mesh_graph::MeshGraph;
pub use validation::DegenerateFacePolicy;

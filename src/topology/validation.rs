//! Boundary validation of caller-supplied face lists.

use crate::mesh_error::MeshError;
use crate::topology::face::{Triangle, is_degenerate};

/// Behavior for faces that repeat a vertex index.
///
/// There is no default: callers must decide whether degenerate input is an
/// error or noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DegenerateFacePolicy {
    /// Return an error on the first degenerate face.
    Reject,
    /// Log a warning and drop the face.
    Skip,
}

/// Check arity and degeneracy of every face and return the usable triangles in
/// input order.
///
/// All faces are checked for arity before any degeneracy handling, so a
/// malformed list never yields a partial result.
///
/// # Errors
/// Returns `Err(FaceArity)` for a face with other than three indices, and
/// `Err(DegenerateFace)` for a degenerate face under
/// [`DegenerateFacePolicy::Reject`].
pub fn validate_faces<F>(faces: &[F], policy: DegenerateFacePolicy) -> Result<Vec<Triangle>, MeshError>
where
    F: AsRef<[u32]>,
{
    let mut triangles = Vec::with_capacity(faces.len());
    for (face, indices) in faces.iter().enumerate() {
        match *indices.as_ref() {
            [a, b, c] => triangles.push([a, b, c]),
            ref other => {
                return Err(MeshError::FaceArity {
                    face,
                    found: other.len(),
                });
            }
        }
    }

    let mut out = Vec::with_capacity(triangles.len());
    for (face, t) in triangles.into_iter().enumerate() {
        if !is_degenerate(&t) {
            out.push(t);
            continue;
        }
        match policy {
            DegenerateFacePolicy::Reject => {
                return Err(MeshError::DegenerateFace { face, vertices: t });
            }
            DegenerateFacePolicy::Skip => {
                log::warn!("Skipping degenerate face #{face}: {t:?}");
            }
        }
    }
    Ok(out)
}

/// Size of the dense vertex array implied by `faces` (`max index + 1`).
pub fn vertex_count(faces: &[Triangle]) -> usize {
    faces
        .iter()
        .flatten()
        .max()
        .map_or(0, |&max| max as usize + 1)
}

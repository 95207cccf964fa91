//! Triangle faces, their canonical keys, and handles into a [`MeshGraph`].
//!
//! Faces are oriented: `(a, b, c)` and its rotations `(b, c, a)`, `(c, a, b)`
//! describe the same face, while the reflection `(a, c, b)` has the opposite
//! winding and is a distinct face. [`FaceKey`] captures exactly this identity
//! by rotating the smallest index to the front, never reflecting.
//!
//! [`MeshGraph`]: crate::topology::mesh_graph::MeshGraph

use std::fmt;

use hashbrown::HashSet;

/// Three vertex indices in drawing order.
pub type Triangle = [u32; 3];

/// True if any two corners of `t` coincide.
#[inline]
pub fn is_degenerate(t: &Triangle) -> bool {
    t[0] == t[1] || t[1] == t[2] || t[0] == t[2]
}

/// Canonical, winding-preserving identity of a non-degenerate face.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct FaceKey([u32; 3]);

impl FaceKey {
    /// Canonical key of `t`, or `None` if `t` is degenerate.
    ///
    /// # Example
    /// ```rust
    /// use mesh_vcache::topology::face::FaceKey;
    /// let k = FaceKey::new([6, 2, 5]).unwrap();
    /// assert_eq!(k.vertices(), [2, 5, 6]);
    /// assert_eq!(k, FaceKey::new([5, 6, 2]).unwrap());
    /// assert_ne!(k, FaceKey::new([2, 6, 5]).unwrap());
    /// assert!(FaceKey::new([7, 7, 1]).is_none());
    /// ```
    pub fn new(mut t: Triangle) -> Option<Self> {
        if is_degenerate(&t) {
            return None;
        }
        let first = if t[0] < t[1] && t[0] < t[2] {
            0
        } else if t[1] < t[2] {
            1
        } else {
            2
        };
        t.rotate_left(first);
        Some(FaceKey(t))
    }

    /// Vertex indices, smallest first.
    #[inline]
    pub fn vertices(&self) -> Triangle {
        self.0
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "({a}, {b}, {c})")
    }
}

/// Dense handle of a face inside a [`MeshGraph`](crate::topology::mesh_graph::MeshGraph).
///
/// Handles are assigned in insertion order and stay valid after the face is
/// removed (removal tombstones the face rather than compacting the array).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FaceId(u32);

impl FaceId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        FaceId(index as u32)
    }

    /// Position of the face in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Yield each face once, in input order, dropping degenerate faces and
/// rotations of faces already seen. Reflections are kept.
///
/// ```rust
/// use mesh_vcache::topology::face::unique_faces;
/// let faces = [[0, 1, 2], [1, 1, 0], [2, 1, 0], [1, 0, 0], [2, 0, 1]];
/// assert_eq!(unique_faces(faces), vec![[0, 1, 2], [2, 1, 0]]);
/// ```
pub fn unique_faces(faces: impl IntoIterator<Item = Triangle>) -> Vec<Triangle> {
    let mut seen = HashSet::new();
    faces
        .into_iter()
        .filter(|&t| FaceKey::new(t).is_some_and(|key| seen.insert(key)))
        .collect()
}

/// View an ordered face list as a flat index buffer, without copying.
#[inline]
pub fn flatten_indices(faces: &[Triangle]) -> &[u32] {
    bytemuck::cast_slice(faces)
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(FaceId, u32);
    assert_eq_size!(Triangle, [u32; 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_rotation_keeps_winding() {
        for t in [[6, 2, 5], [2, 5, 6], [5, 6, 2]] {
            assert_eq!(FaceKey::new(t).unwrap().vertices(), [2, 5, 6]);
        }
        for t in [[6, 5, 2], [2, 6, 5], [5, 2, 6]] {
            assert_eq!(FaceKey::new(t).unwrap().vertices(), [2, 6, 5]);
        }
    }

    #[test]
    fn degenerate_faces_have_no_key() {
        for t in [[30, 0, 30], [0, 40, 40], [50, 50, 0], [7, 7, 7]] {
            assert!(is_degenerate(&t));
            assert_eq!(FaceKey::new(t), None);
        }
    }

    #[test]
    fn keys_order_lexicographically() {
        let a = FaceKey::new([0, 1, 2]).unwrap();
        let b = FaceKey::new([0, 2, 1]).unwrap();
        let c = FaceKey::new([1, 2, 3]).unwrap();
        assert!(a < b && b < c);
        assert_eq!(a.to_string(), "(0, 1, 2)");
    }

    #[test]
    fn unique_faces_keeps_first_occurrence() {
        let faces = [[0, 1, 2], [1, 1, 0], [2, 0, 1]];
        assert_eq!(unique_faces(faces), vec![[0, 1, 2]]);
        let faces = [[1, 2, 0], [0, 1, 2], [3, 4, 5]];
        assert_eq!(unique_faces(faces), vec![[1, 2, 0], [3, 4, 5]]);
    }

    #[test]
    fn flatten_is_row_major() {
        let faces = [[7, 8, 9], [0, 1, 2]];
        assert_eq!(flatten_indices(&faces), &[7, 8, 9, 0, 1, 2]);
        assert!(flatten_indices(&[]).is_empty());
    }
}

#![allow(dead_code)]
use mesh_vcache::topology::face::{FaceKey, Triangle};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Quad `(i, j)` of a `w`-wide vertex grid split along its main diagonal.
fn quad(w: u32, i: u32, j: u32) -> [Triangle; 2] {
    let a = i * w + j;
    let b = a + 1;
    let c = a + w;
    let d = c + 1;
    [[a, c, d], [a, d, b]]
}

/// Triangulated `w x h` vertex grid, quads in row-major order.
pub fn grid_faces(w: u32, h: u32) -> Vec<Triangle> {
    (0..h.saturating_sub(1))
        .flat_map(|i| (0..w.saturating_sub(1)).map(move |j| (i, j)))
        .flat_map(|(i, j)| quad(w, i, j))
        .collect()
}

/// Like [`grid_faces`], but odd quad rows run right to left.
pub fn serpentine_grid_faces(w: u32, h: u32) -> Vec<Triangle> {
    let mut faces = Vec::new();
    for i in 0..h.saturating_sub(1) {
        let cols: Vec<u32> = if i % 2 == 0 {
            (0..w.saturating_sub(1)).collect()
        } else {
            (0..w.saturating_sub(1)).rev().collect()
        };
        for j in cols {
            faces.extend(quad(w, i, j));
        }
    }
    faces
}

/// [`grid_faces`] in a seeded random order.
pub fn shuffled_grid_faces(w: u32, h: u32, seed: u64) -> Vec<Triangle> {
    let mut faces = grid_faces(w, h);
    faces.shuffle(&mut SmallRng::seed_from_u64(seed));
    faces
}

/// 4x4 vertex grid with column-major quads, each split along its anti-diagonal.
pub fn simple_grid_faces() -> Vec<Triangle> {
    vec![
        [1, 5, 2],
        [5, 2, 6],
        [5, 9, 6],
        [9, 6, 10],
        [9, 13, 10],
        [13, 10, 14],
        [0, 4, 1],
        [4, 1, 5],
        [4, 8, 5],
        [8, 5, 9],
        [8, 12, 9],
        [12, 9, 13],
        [2, 6, 3],
        [6, 3, 7],
        [6, 10, 7],
        [10, 7, 11],
        [10, 14, 11],
        [14, 11, 15],
    ]
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// Canonical keys of `faces`, so rotations compare equal.
pub fn keys(faces: &[Triangle]) -> Vec<FaceKey> {
    faces
        .iter()
        .map(|&t| FaceKey::new(t).expect("non-degenerate face"))
        .collect()
}

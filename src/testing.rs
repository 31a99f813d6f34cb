//! Fixtures shared by unit tests.
#![allow(clippy::unwrap_used)]

use crate::math::Point3;
use crate::topology::{CellId, FaceId, MeshStore, VertexData, VertexId};

/// Axis-aligned box surface, faces ordered x-min, x-max, y-min, y-max,
/// z-min, z-max. Normals point outward unless `inverted`.
pub fn box_surface(store: &mut MeshStore, min: [f64; 3], max: [f64; 3], inverted: bool) -> Vec<FaceId> {
    let v = |store: &mut MeshStore, i: usize, j: usize, k: usize| {
        let pick = |axis: usize, hi: usize| if hi == 0 { min[axis] } else { max[axis] };
        store.add_vertex(VertexData::new(Point3::new(pick(0, i), pick(1, j), pick(2, k))))
    };
    let mut c = [[[VertexId::default(); 2]; 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                c[i][j][k] = v(store, i, j, k);
            }
        }
    }
    let loops = [
        [c[0][0][0], c[0][0][1], c[0][1][1], c[0][1][0]],
        [c[1][0][0], c[1][1][0], c[1][1][1], c[1][0][1]],
        [c[0][0][0], c[1][0][0], c[1][0][1], c[0][0][1]],
        [c[0][1][0], c[0][1][1], c[1][1][1], c[1][1][0]],
        [c[0][0][0], c[0][1][0], c[1][1][0], c[1][0][0]],
        [c[0][0][1], c[1][0][1], c[1][1][1], c[0][1][1]],
    ];
    loops
        .iter()
        .map(|lp| {
            let mut lp = lp.to_vec();
            if inverted {
                lp.reverse();
            }
            store.add_face(lp).unwrap()
        })
        .collect()
}

/// Flips the faces at the given positions behind the guards' back.
pub fn flip_some(store: &mut MeshStore, faces: &[FaceId], which: &[usize]) {
    for &i in which {
        store.flip_face(faces[i]).unwrap();
    }
}

/// Structured hexahedral grid of `n[0] x n[1] x n[2]` unit-step cells
/// scaled by `step`, with face adjacency filled in.
///
/// Interior faces have normals along +x, +y or +z, so the lower-index cell is
/// on their left.
pub fn cuboid_grid(store: &mut MeshStore, origin: [f64; 3], step: f64, n: [usize; 3]) -> Vec<CellId> {
    let [nx, ny, nz] = n;
    let vid = |i: usize, j: usize, k: usize| (i * (ny + 1) + j) * (nz + 1) + k;
    let mut verts = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for i in 0..=nx {
        for j in 0..=ny {
            for k in 0..=nz {
                #[allow(clippy::cast_precision_loss)]
                let p = Point3::new(
                    origin[0] + step * i as f64,
                    origin[1] + step * j as f64,
                    origin[2] + step * k as f64,
                );
                verts.push(store.add_vertex(VertexData::new(p)));
            }
        }
    }
    let cid = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;

    // (face, left cell index, right cell index)
    let mut faces: Vec<(FaceId, Option<usize>, Option<usize>)> = Vec::new();
    let mut cell_faces: Vec<Vec<FaceId>> = vec![Vec::new(); nx * ny * nz];
    let mut push = |store: &mut MeshStore, lp: [usize; 4], left: Option<usize>, right: Option<usize>| {
        let f = store.add_face(lp.iter().map(|&i| verts[i]).collect()).unwrap();
        for c in [left, right].into_iter().flatten() {
            cell_faces[c].push(f);
        }
        faces.push((f, left, right));
    };

    for i in 0..=nx {
        for j in 0..ny {
            for k in 0..nz {
                let left = (i > 0).then(|| cid(i - 1, j, k));
                let right = (i < nx).then(|| cid(i, j, k));
                let lp = [vid(i, j, k), vid(i, j + 1, k), vid(i, j + 1, k + 1), vid(i, j, k + 1)];
                push(store, lp, left, right);
            }
        }
    }
    for i in 0..nx {
        for j in 0..=ny {
            for k in 0..nz {
                let left = (j > 0).then(|| cid(i, j - 1, k));
                let right = (j < ny).then(|| cid(i, j, k));
                let lp = [vid(i, j, k), vid(i, j, k + 1), vid(i + 1, j, k + 1), vid(i + 1, j, k)];
                push(store, lp, left, right);
            }
        }
    }
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..=nz {
                let left = (k > 0).then(|| cid(i, j, k - 1));
                let right = (k < nz).then(|| cid(i, j, k));
                let lp = [vid(i, j, k), vid(i + 1, j, k), vid(i + 1, j + 1, k), vid(i, j + 1, k)];
                push(store, lp, left, right);
            }
        }
    }

    let cells: Vec<CellId> = cell_faces
        .into_iter()
        .map(|fs| store.add_cell(fs).unwrap())
        .collect();
    for (f, left, right) in faces {
        store
            .set_face_cells(f, left.map(|c| cells[c]), right.map(|c| cells[c]))
            .unwrap();
    }
    cells
}

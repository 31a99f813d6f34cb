//! Mesh builders shared by the integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use meshtree::math::Point3;
use meshtree::topology::{CellId, FaceId, MeshStore, VertexData, VertexId};

/// Installs a test subscriber honouring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Axis-aligned box surface with faces ordered x-min, x-max, y-min, y-max,
/// z-min, z-max. Normals point outward unless `inward`.
pub fn add_box(store: &mut MeshStore, min: [f64; 3], max: [f64; 3], inward: bool) -> Vec<FaceId> {
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
            if inward {
                lp.reverse();
            }
            store.add_face(lp).unwrap()
        })
        .collect()
}

/// Structured grid of `n` cells of edge `step`; interior faces point along
/// +x, +y or +z with the lower-index cell on their left.
pub fn add_grid(store: &mut MeshStore, origin: [f64; 3], step: f64, n: [usize; 3]) -> Vec<CellId> {
    let [nx, ny, nz] = n;
    let vid = |i: usize, j: usize, k: usize| (i * (ny + 1) + j) * (nz + 1) + k;
    let cid = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;
    let mut verts = Vec::new();
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

    let mut faces = Vec::new();
    let mut cell_faces = vec![Vec::new(); nx * ny * nz];
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
                let lp = [vid(i, j, k), vid(i, j + 1, k), vid(i, j + 1, k + 1), vid(i, j, k + 1)];
                push(store, lp, (i > 0).then(|| cid(i - 1, j, k)), (i < nx).then(|| cid(i, j, k)));
            }
        }
    }
    for i in 0..nx {
        for j in 0..=ny {
            for k in 0..nz {
                let lp = [vid(i, j, k), vid(i, j, k + 1), vid(i + 1, j, k + 1), vid(i + 1, j, k)];
                push(store, lp, (j > 0).then(|| cid(i, j - 1, k)), (j < ny).then(|| cid(i, j, k)));
            }
        }
    }
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..=nz {
                let lp = [vid(i, j, k), vid(i + 1, j, k), vid(i + 1, j + 1, k), vid(i, j + 1, k)];
                push(store, lp, (k > 0).then(|| cid(i, j, k - 1)), (k < nz).then(|| cid(i, j, k)));
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

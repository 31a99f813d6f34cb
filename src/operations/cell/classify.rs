use std::collections::BTreeSet;

use tracing::trace;

use crate::error::ClassifyError;
use crate::operations::orient::consistent_plan;

use super::shape::{CellExpression, CellShape};

/// Classifies the faces bounding one cell.
///
/// `faces` holds one vertex-index loop per face, in any order and with any
/// starting vertex. Loops are first brought to the direction of `faces[0]`
/// when the set is orientable; a set that is not is classified as given.
/// Rules are tried in a fixed order and the first match wins: tetrahedron,
/// hexahedron, wedge, pyramid, polygon, general polyhedron.
///
/// # Errors
///
/// Returns [`ClassifyError::UnclassifiableCell`] when no rule matches, which
/// happens for two or three faces and for an empty set.
///
/// # Examples
///
/// ```
/// use meshtree::operations::cell::{classify_cell, CellShape};
///
/// let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
/// let cell = classify_cell(&faces).unwrap();
/// assert_eq!(cell.shape, CellShape::Tetrahedron);
/// assert_eq!(cell.points, vec![0, 1, 2, 3]);
/// ```
pub fn classify_cell(faces: &[Vec<usize>]) -> Result<CellExpression, ClassifyError> {
    let data = harmonized(faces);
    let found = try_tetrahedron(&data)
        .or_else(|| try_hexahedron(&data))
        .or_else(|| try_wedge(&data))
        .or_else(|| try_pyramid(&data))
        .or_else(|| try_polygon(&data))
        .or_else(|| try_polyhedron(&data));
    match found {
        Some(cell) => {
            trace!(shape = ?cell.shape, faces = data.len(), "cell classified");
            Ok(cell)
        }
        None => Err(ClassifyError::UnclassifiableCell {
            face_count: faces.len(),
        }),
    }
}

fn harmonized(faces: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut out = faces.to_vec();
    let loops: Vec<&[usize]> = faces.iter().map(Vec::as_slice).collect();
    if let Ok(plan) = consistent_plan(&loops) {
        for (lp, flip) in out.iter_mut().zip(plan) {
            if flip {
                lp.reverse();
            }
        }
    }
    out
}

/// Vertex joined by an edge to `data[face][pos]` that is not on `data[face]`.
fn find_opposite(data: &[Vec<usize>], face: usize, pos: usize) -> Option<usize> {
    let base = data.get(face)?;
    let v = *base.get(pos)?;
    for (i, lp) in data.iter().enumerate() {
        if i == face {
            continue;
        }
        let Some(at) = lp.iter().position(|&x| x == v) else {
            continue;
        };
        let n = lp.len();
        let next = lp[(at + 1) % n];
        if !base.contains(&next) {
            return Some(next);
        }
        let prev = lp[(at + n - 1) % n];
        if !base.contains(&prev) {
            return Some(prev);
        }
    }
    None
}

/// Position in `data[other]` of the vertex opposite to `data[face][0]`.
fn is_opposite(data: &[Vec<usize>], face: usize, other: usize) -> Option<usize> {
    let p = find_opposite(data, face, 0)?;
    data.get(other)?.iter().position(|&x| x == p)
}

/// The face sharing no vertex with `data[face]`, of equal size, through the
/// vertex opposite to `data[face][0]`; returns its index and that vertex's
/// position in it.
fn get_opposite(data: &[Vec<usize>], face: usize) -> Option<(usize, usize)> {
    let p = find_opposite(data, face, 0)?;
    let base = &data[face];
    data.iter().enumerate().find_map(|(i, lp)| {
        if i == face || lp.len() != base.len() {
            return None;
        }
        let union: BTreeSet<usize> = lp.iter().chain(base).copied().collect();
        if union.len() != lp.len() + base.len() {
            return None;
        }
        lp.iter().position(|&x| x == p).map(|at| (i, at))
    })
}

fn sizes_are(data: &[Vec<usize>], count: usize, size: usize) -> bool {
    data.len() == count && data.iter().all(|d| d.len() == size)
}

fn try_tetrahedron(data: &[Vec<usize>]) -> Option<CellExpression> {
    if !sizes_are(data, 4, 3) {
        return None;
    }
    let d0 = &data[0];
    let mut points = vec![d0[0], d0[2], d0[1]];
    let apex = data[1].iter().copied().find(|p| !points.contains(p))?;
    points.push(apex);
    Some(CellExpression {
        shape: CellShape::Tetrahedron,
        points,
    })
}

fn try_hexahedron(data: &[Vec<usize>]) -> Option<CellExpression> {
    if !sizes_are(data, 6, 4) {
        return None;
    }
    let (op, at) = get_opposite(data, 0)?;
    let lower = &data[0];
    let mut upper = data[op].clone();
    upper.rotate_left(at);
    let mut points = vec![lower[0], lower[3], lower[2], lower[1]];
    points.extend_from_slice(&upper);
    Some(CellExpression {
        shape: CellShape::Hexahedron,
        points,
    })
}

fn try_wedge(data: &[Vec<usize>]) -> Option<CellExpression> {
    if data.len() != 5 || data.iter().any(|d| d.len() < 3 || d.len() > 4) {
        return None;
    }
    let triangles: Vec<usize> = (0..data.len()).filter(|&i| data[i].len() == 3).collect();
    let &[f1, f2] = triangles.as_slice() else {
        return None;
    };
    let at = is_opposite(data, f1, f2)?;
    let lower = &data[f1];
    let mut upper = data[f2].clone();
    upper.rotate_left(at);
    Some(CellExpression {
        shape: CellShape::Wedge,
        points: vec![lower[0], lower[1], lower[2], upper[0], upper[2], upper[1]],
    })
}

fn try_pyramid(data: &[Vec<usize>]) -> Option<CellExpression> {
    if data.len() != 5 {
        return None;
    }
    let quads: Vec<usize> = (0..data.len()).filter(|&i| data[i].len() == 4).collect();
    let &[q] = quads.as_slice() else {
        return None;
    };
    if data.iter().enumerate().any(|(i, d)| i != q && d.len() != 3) {
        return None;
    }
    let quad = &data[q];
    let side = usize::from(q == 0);
    let apex = data[side].iter().copied().find(|p| !quad.contains(p))?;
    Some(CellExpression {
        shape: CellShape::Pyramid,
        points: vec![quad[0], quad[3], quad[2], quad[1], apex],
    })
}

fn try_polygon(data: &[Vec<usize>]) -> Option<CellExpression> {
    let [face] = data else {
        return None;
    };
    Some(CellExpression {
        shape: CellShape::Polygon,
        points: face.clone(),
    })
}

fn try_polyhedron(data: &[Vec<usize>]) -> Option<CellExpression> {
    if data.len() < 4 {
        return None;
    }
    let mut points = Vec::with_capacity(1 + data.iter().map(|d| d.len() + 1).sum::<usize>());
    points.push(data.len());
    for d in data {
        points.push(d.len());
        points.extend_from_slice(d);
    }
    Some(CellExpression {
        shape: CellShape::Polyhedron,
        points,
    })
}

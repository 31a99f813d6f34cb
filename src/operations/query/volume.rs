use std::collections::HashSet;

use crate::error::{OperationError, Result};
use crate::math::polygon_3d::{area_vector, vertex_centroid};
use crate::math::Point3;
use crate::operations::orient::consistent_plan;
use crate::operations::surface::{GridSurface, SurfaceTree};
use crate::topology::{CellId, FaceId, MeshStore};

/// Divergence-theorem contribution of one polygon:
/// `(1/3) * (area vector . centroid)`.
///
/// Reversing the loop negates the contribution.
#[must_use]
pub fn face_volume_term(points: &[Point3]) -> f64 {
    area_vector(points).dot(&vertex_centroid(points).coords) / 3.0
}

/// Signed volume of `faces` as if the faces marked in `flips` were reversed.
pub(crate) fn planned_signed_volume(
    store: &MeshStore,
    faces: &[FaceId],
    flips: &[bool],
) -> Result<f64> {
    let mut total = 0.0;
    for (i, &f) in faces.iter().enumerate() {
        let term = face_volume_term(&store.face_points(f)?);
        if flips.get(i).copied().unwrap_or(false) {
            total -= term;
        } else {
            total += term;
        }
    }
    Ok(total)
}

enum VolumeSource {
    Faces(Vec<FaceId>),
    /// Shell faces with a cavity flag per tree node.
    Tree(Vec<(Vec<FaceId>, bool)>),
}

/// Computes the volume enclosed by oriented faces.
///
/// For a face set the value uses the faces' current directions: outward
/// normals give a positive volume, and reversing any face flips the sign of
/// its contribution. For a [`SurfaceTree`] the value is the material volume:
/// every node is integrated with a consistent orientation and added at even
/// levels, subtracted at odd levels, whatever the current directions are.
pub struct SignedVolume {
    source: VolumeSource,
}

impl SignedVolume {
    /// Volume of a face set with its current directions.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self {
            source: VolumeSource::Faces(faces),
        }
    }

    /// Material volume of an assembled tree.
    #[must_use]
    pub fn of_tree(tree: &SurfaceTree) -> Self {
        Self {
            source: VolumeSource::Tree(
                tree.nodes()
                    .iter()
                    .map(|n| (n.faces().to_vec(), n.is_cavity()))
                    .collect(),
            ),
        }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if a face is missing, or for a tree, if a node is
    /// no longer orientable.
    pub fn execute(&self, store: &MeshStore) -> Result<f64> {
        match &self.source {
            VolumeSource::Faces(faces) => planned_signed_volume(store, faces, &[]),
            VolumeSource::Tree(shells) => {
                let mut total = 0.0;
                for (faces, cavity) in shells {
                    let loops = faces
                        .iter()
                        .map(|&f| store.face(f).map(|d| d.vertices()))
                        .collect::<std::result::Result<Vec<_>, _>>()?;
                    let flips = consistent_plan(&loops)?;
                    let v = planned_signed_volume(store, faces, &flips)?.abs();
                    total += if *cavity { -v } else { v };
                }
                Ok(total)
            }
        }
    }
}

/// Computes the volume of individual cells.
///
/// Each bounding face is counted with the cell on its left, so the result
/// does not depend on face directions.
pub struct CellVolume {
    cells: Vec<CellId>,
}

impl CellVolume {
    /// Creates a new `CellVolume` query.
    #[must_use]
    pub fn new(cells: Vec<CellId>) -> Self {
        Self { cells }
    }

    /// Executes the query, returning one volume per requested cell.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell or face is missing, or if a bounding face
    /// does not reference the cell on either side.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<f64>> {
        self.cells
            .iter()
            .map(|&cell| {
                let mut total = 0.0;
                for &f in &store.cell(cell)?.faces {
                    let face = store.face(f)?;
                    let term = face_volume_term(&store.face_points(f)?);
                    if face.left_cell() == Some(cell) {
                        total += term;
                    } else if face.right_cell() == Some(cell) {
                        total -= term;
                    } else {
                        return Err(OperationError::InvalidInput(
                            "cell face is not adjacent to its cell".into(),
                        )
                        .into());
                    }
                }
                Ok(total)
            })
            .collect()
    }
}

/// Computes the volume of a set of cells from its boundary surface.
///
/// Each boundary face counts with the selected cells on its left, whatever
/// its current direction, so faces cut out of a larger grid are handled too.
pub struct GridVolume {
    cells: Option<Vec<CellId>>,
}

impl GridVolume {
    /// Volume of the given cells.
    #[must_use]
    pub fn new(cells: Vec<CellId>) -> Self {
        Self { cells: Some(cells) }
    }

    /// Volume of every cell in the store.
    #[must_use]
    pub fn all() -> Self {
        Self { cells: None }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell or face is missing.
    pub fn execute(&self, store: &MeshStore) -> Result<f64> {
        let (surface, members): (GridSurface, HashSet<CellId>) = match &self.cells {
            Some(c) => (GridSurface::new(c.clone()), c.iter().copied().collect()),
            None => (GridSurface::all(), store.cells().map(|(id, _)| id).collect()),
        };
        let faces = surface.execute(store)?;
        let flips = faces
            .iter()
            .map(|&f| {
                store
                    .face(f)
                    .map(|d| !d.left_cell().is_some_and(|c| members.contains(&c)))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        planned_signed_volume(store, &faces, &flips)
    }
}

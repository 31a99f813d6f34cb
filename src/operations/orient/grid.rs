use tracing::debug;

use crate::error::Result;
use crate::topology::{FaceId, MeshStore};

use super::reversion::Reversion;

/// The side of a face loop on which grid cells must end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSide {
    /// Cells behind the face: normals point out of the grid.
    Left,
    /// Cells in front of the face: normals point into the grid.
    Right,
}

impl<'a> Reversion<'a> {
    /// Orients grid boundary faces by cell adjacency: a face is flipped when
    /// it has no cell on the requested side, including faces with no
    /// adjacent cell at all.
    ///
    /// # Errors
    ///
    /// Returns an error if a face is missing or listed twice.
    pub fn for_grid_surface(
        store: &'a mut MeshStore,
        faces: &[FaceId],
        cells_on: CellSide,
    ) -> Result<Self> {
        let mut flips = Vec::with_capacity(faces.len());
        let mut detached = 0usize;
        for &f in faces {
            let face = store.face(f)?;
            let (wanted, other) = match cells_on {
                CellSide::Left => (face.left_cell(), face.right_cell()),
                CellSide::Right => (face.right_cell(), face.left_cell()),
            };
            if wanted.is_none() && other.is_none() {
                detached += 1;
            }
            flips.push(wanted.is_none());
        }
        if detached > 0 {
            debug!(detached, "faces without adjacent cells flipped");
        }
        Self::with_plan(store, faces.to_vec(), flips)
    }

    /// [`Reversion::for_grid_surface`] on top of this guard.
    ///
    /// # Errors
    ///
    /// Same as [`Reversion::for_grid_surface`].
    pub fn nested_for_grid_surface(
        &mut self,
        faces: &[FaceId],
        cells_on: CellSide,
    ) -> Result<Reversion<'_>> {
        Reversion::for_grid_surface(self.store_mut(), faces, cells_on)
    }
}

/// Orients a grid boundary so cells lie on `cells_on`; the returned guard
/// restores the previous directions unless made permanent.
///
/// # Errors
///
/// Returns an error if a face is missing or listed twice.
pub fn orient_grid_surface<'a>(
    store: &'a mut MeshStore,
    faces: &[FaceId],
    cells_on: CellSide,
) -> Result<Reversion<'a>> {
    Reversion::for_grid_surface(store, faces, cells_on)
}

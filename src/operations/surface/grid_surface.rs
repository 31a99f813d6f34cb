use std::collections::HashMap;

use crate::error::Result;
use crate::topology::{CellId, FaceId, MeshStore};

use super::components::{SurfaceComponent, SurfaceComponents};

/// Extracts the boundary surface of a set of cells: the faces bounding
/// exactly one of them.
pub struct GridSurface {
    cells: Option<Vec<CellId>>,
}

impl GridSurface {
    /// Boundary of the given cells.
    #[must_use]
    pub fn new(cells: Vec<CellId>) -> Self {
        Self { cells: Some(cells) }
    }

    /// Boundary of every cell in the store.
    #[must_use]
    pub fn all() -> Self {
        Self { cells: None }
    }

    /// Executes the query, returning boundary faces sorted by id.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell is missing.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<FaceId>> {
        let cells: Vec<CellId> = match &self.cells {
            Some(c) => c.clone(),
            None => store.cells().map(|(id, _)| id).collect(),
        };
        let mut uses: HashMap<FaceId, usize> = HashMap::new();
        for c in cells {
            for &f in &store.cell(c)?.faces {
                *uses.entry(f).or_default() += 1;
            }
        }
        let mut faces: Vec<FaceId> = uses
            .into_iter()
            .filter(|&(_, n)| n == 1)
            .map(|(f, _)| f)
            .collect();
        faces.sort_unstable();
        Ok(faces)
    }

    /// Executes the query and splits the boundary into connected pieces.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell is missing or the boundary is non-manifold.
    pub fn execute_separated(&self, store: &MeshStore) -> Result<Vec<SurfaceComponent>> {
        SurfaceComponents::new(self.execute(store)?).execute(store)
    }
}

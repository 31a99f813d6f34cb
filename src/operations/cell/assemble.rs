use tracing::{info, warn};

use crate::error::{Result, TopologyError};
use crate::progress::{report, ProgressCallback};
use crate::topology::{CellId, MeshStore};

use super::classify::classify_cell;
use super::shape::CellExpression;

/// Classifies every cell of a grid into exporter-ready expressions.
///
/// Vertices are addressed by [`MeshStore::vertex_numbering`]. A face whose
/// left cell is not the cell being assembled has its loop reversed, so every
/// cell sees its faces with outward normals.
pub struct CellAssembler {
    cells: Option<Vec<CellId>>,
    ignore_errors: bool,
    progress: Option<ProgressCallback>,
}

const PHASES: u64 = 2;

impl CellAssembler {
    /// Assembles the given cells, in order.
    #[must_use]
    pub fn new(cells: Vec<CellId>) -> Self {
        Self {
            cells: Some(cells),
            ignore_errors: false,
            progress: None,
        }
    }

    /// Assembles every cell of the store in arena order.
    #[must_use]
    pub fn all() -> Self {
        Self {
            cells: None,
            ignore_errors: false,
            progress: None,
        }
    }

    /// When set, cells that cannot be classified become
    /// [`CellExpression::invalid`] placeholders instead of failing the batch.
    #[must_use]
    pub fn ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    /// Reports each finished phase; a `false` return cancels assembly.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Executes the assembly, returning one expression per cell.
    ///
    /// # Errors
    ///
    /// Returns an error if an entity is missing, if a cell cannot be
    /// classified and errors are not ignored, or if the progress callback
    /// cancels.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<CellExpression>> {
        let progress = self.progress.as_ref();
        let numbering = store.vertex_numbering();
        let cells: Vec<CellId> = match &self.cells {
            Some(c) => c.clone(),
            None => store.cells().map(|(id, _)| id).collect(),
        };
        report(progress, 1, PHASES, "face numbering")?;

        let mut out = Vec::with_capacity(cells.len());
        let mut invalid = 0usize;
        for (index, &cell) in cells.iter().enumerate() {
            let data = store.cell(cell)?;
            let mut loops = Vec::with_capacity(data.faces.len());
            for &f in &data.faces {
                let face = store.face(f)?;
                let mut lp = face
                    .vertices()
                    .iter()
                    .map(|&v| {
                        numbering
                            .get(v)
                            .copied()
                            .ok_or(TopologyError::EntityNotFound("vertex"))
                    })
                    .collect::<std::result::Result<Vec<usize>, _>>()?;
                if face.left_cell() != Some(cell) {
                    lp.reverse();
                }
                loops.push(lp);
            }
            match classify_cell(&loops) {
                Ok(expr) => out.push(expr),
                Err(e) if self.ignore_errors => {
                    warn!(cell = index, error = %e, "cell replaced by placeholder");
                    invalid += 1;
                    out.push(CellExpression::invalid());
                }
                Err(e) => return Err(e.into()),
            }
        }
        report(progress, 2, PHASES, "cell classification")?;

        info!(cells = out.len(), invalid, "cells assembled");
        Ok(out)
    }
}

pub mod cell;
pub mod edge;
pub mod face;
pub mod vertex;

pub use cell::{CellData, CellId};
pub use edge::{loop_edges, EdgeKey, EdgeMap, EdgeUse};
pub use face::{FaceData, FaceId};
pub use vertex::{VertexData, VertexId};

use std::collections::HashSet;

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::{SecondaryMap, SlotMap};

/// Central arena that owns all mesh entities.
///
/// Entities reference each other via typed IDs (generational indices), so
/// face-to-cell and cell-to-face links never form ownership cycles. The only
/// mutation after construction is a face's loop direction, which is reachable
/// solely through the reversion guards in [`crate::operations::orient`].
#[derive(Debug, Default)]
pub struct MeshStore {
    vertices: SlotMap<VertexId, VertexData>,
    faces: SlotMap<FaceId, FaceData>,
    cells: SlotMap<CellId, CellData>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    /// Iterates over all vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Number of vertices in the store.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Face operations ---

    /// Inserts a face built from a vertex loop and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop has fewer than three vertices, repeats a
    /// vertex, or references a vertex that is not in the store.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> Result<FaceId, TopologyError> {
        if vertices.len() < 3 {
            return Err(TopologyError::InvalidFace(format!(
                "loop has {} vertices, at least 3 required",
                vertices.len()
            )));
        }
        let mut seen = HashSet::with_capacity(vertices.len());
        for &v in &vertices {
            self.vertex(v)?;
            if !seen.insert(v) {
                return Err(TopologyError::InvalidFace("loop repeats a vertex".into()));
            }
        }
        Ok(self.faces.insert(FaceData::new(vertices)))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Iterates over all faces in arena order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Number of faces in the store.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Positions of a face's loop in its current direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices is missing.
    pub fn face_points(&self, id: FaceId) -> Result<Vec<Point3>, TopologyError> {
        self.face(id)?
            .vertices()
            .iter()
            .map(|&v| self.vertex(v).map(|d| d.point))
            .collect()
    }

    /// Sets the cells on either side of a face, relative to its current
    /// loop direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or either cell is missing.
    pub fn set_face_cells(
        &mut self,
        face: FaceId,
        left: Option<CellId>,
        right: Option<CellId>,
    ) -> Result<(), TopologyError> {
        for cell in [left, right].into_iter().flatten() {
            self.cell(cell)?;
        }
        self.faces
            .get_mut(face)
            .ok_or(TopologyError::EntityNotFound("face"))?
            .set_cells(left, right);
        Ok(())
    }

    /// Flips one face's loop. Crate-private: callers go through a guard.
    pub(crate) fn flip_face(&mut self, id: FaceId) -> Result<(), TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("face"))?
            .flip();
        Ok(())
    }

    // --- Cell operations ---

    /// Inserts a cell bounded by the given faces and returns its ID.
    ///
    /// Face adjacency is not touched; use [`MeshStore::set_face_cells`].
    ///
    /// # Errors
    ///
    /// Returns an error if any face is not in the store.
    pub fn add_cell(&mut self, faces: Vec<FaceId>) -> Result<CellId, TopologyError> {
        for &f in &faces {
            self.face(f)?;
        }
        Ok(self.cells.insert(CellData { faces }))
    }

    /// Returns a reference to the cell data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn cell(&self, id: CellId) -> Result<&CellData, TopologyError> {
        self.cells
            .get(id)
            .ok_or(TopologyError::EntityNotFound("cell"))
    }

    /// Iterates over all cells in arena order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &CellData)> {
        self.cells.iter()
    }

    /// Number of cells in the store.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Dense `0..n` numbering of vertices in arena order, as exporters
    /// address them.
    #[must_use]
    pub fn vertex_numbering(&self) -> SecondaryMap<VertexId, usize> {
        self.vertices
            .keys()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect()
    }
}

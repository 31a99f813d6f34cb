use super::cell::CellId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the mesh store.
    pub struct FaceId;
}

/// Data associated with a polygonal face.
///
/// A face is a cyclic loop of vertices. Its right-hand normal is the outward
/// direction: the cell on the *left* is the one the normal points away from.
/// Reversing the loop swaps the left and right cells, so both are always
/// reported relative to the current loop direction.
#[derive(Debug, Clone)]
pub struct FaceData {
    vertices: Vec<VertexId>,
    left: Option<CellId>,
    right: Option<CellId>,
    reversed: bool,
}

impl FaceData {
    pub(crate) fn new(vertices: Vec<VertexId>) -> Self {
        Self {
            vertices,
            left: None,
            right: None,
            reversed: false,
        }
    }

    /// The vertex loop in its current direction.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Number of vertices in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false` for faces built through the store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The cell behind the face (the side its normal points away from).
    #[must_use]
    pub fn left_cell(&self) -> Option<CellId> {
        self.left
    }

    /// The cell in front of the face (the side its normal points into).
    #[must_use]
    pub fn right_cell(&self) -> Option<CellId> {
        self.right
    }

    /// Whether the loop is currently flipped relative to how it was built.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// A face with at most one adjacent cell.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        self.left.is_none() || self.right.is_none()
    }

    pub(crate) fn set_cells(&mut self, left: Option<CellId>, right: Option<CellId>) {
        self.left = left;
        self.right = right;
    }

    /// Flips the loop direction. Applying it twice restores the exact loop.
    pub(crate) fn flip(&mut self) {
        self.vertices.reverse();
        std::mem::swap(&mut self.left, &mut self.right);
        self.reversed = !self.reversed;
    }
}

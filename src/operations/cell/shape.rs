/// Canonical shape of a volumetric cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellShape {
    Tetrahedron,
    Hexahedron,
    Wedge,
    Pyramid,
    /// A single face standing in for a degenerate 2D cell.
    Polygon,
    /// Any closed face set with at least four faces.
    Polyhedron,
    /// Placeholder for a cell that could not be classified.
    Invalid,
}

impl CellShape {
    /// Integer cell type code used by VTK-style exporters.
    #[must_use]
    pub fn vtk_code(self) -> u8 {
        match self {
            Self::Tetrahedron => 10,
            Self::Hexahedron => 12,
            Self::Wedge => 13,
            Self::Pyramid => 14,
            Self::Polygon => 7,
            Self::Polyhedron => 42,
            Self::Invalid => 0,
        }
    }
}

/// A classified cell: shape tag plus its vertex list in exporter order.
///
/// For [`CellShape::Polyhedron`] the list is self-describing:
/// `[face_count, (face_len, v0, v1, ...)+]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellExpression {
    pub shape: CellShape,
    pub points: Vec<usize>,
}

impl CellExpression {
    /// Empty placeholder substituted for cells that failed classification.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            shape: CellShape::Invalid,
            points: Vec::new(),
        }
    }

    /// Number of integers the cell occupies in a connectivity list: the
    /// length prefix plus its points.
    #[must_use]
    pub fn word_size(&self) -> usize {
        1 + self.points.len()
    }

    /// Whether this is the placeholder shape.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.shape == CellShape::Invalid
    }
}

/// Total connectivity length of a batch of cells.
#[must_use]
pub fn total_word_size(cells: &[CellExpression]) -> usize {
    cells.iter().map(CellExpression::word_size).sum()
}

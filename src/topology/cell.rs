use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a volumetric cell in the mesh store.
    pub struct CellId;
}

/// Data associated with a volumetric cell.
///
/// A cell is the unordered set of faces bounding one volumetric region.
/// Faces are shared with the neighbouring cell and are not owned here.
#[derive(Debug, Clone)]
pub struct CellData {
    /// The bounding faces, in no particular order.
    pub faces: Vec<FaceId>,
}

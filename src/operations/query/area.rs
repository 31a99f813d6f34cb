use crate::error::Result;
use crate::math::polygon_3d::polygon_area_3d;
use crate::topology::{FaceId, MeshStore};

/// Computes the total area of a face set.
///
/// Each face contributes the length of its area-weighted normal, which is
/// exact for planar polygons and a best-fit value for warped ones.
pub struct SurfaceArea {
    faces: Vec<FaceId>,
}

impl SurfaceArea {
    /// Creates a new `SurfaceArea` query.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }

    /// Executes the query, returning the total area.
    ///
    /// # Errors
    ///
    /// Returns an error if a face or vertex is missing.
    pub fn execute(&self, store: &MeshStore) -> Result<f64> {
        let mut total = 0.0;
        for &f in &self.faces {
            total += polygon_area_3d(&store.face_points(f)?);
        }
        Ok(total)
    }
}

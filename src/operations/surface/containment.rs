use tracing::warn;

use crate::error::Result;
use crate::math::intersect_3d::{ray_triangle_intersect, RayTriangleRelation};
use crate::math::polygon_3d::fan_triangles;
use crate::math::{Aabb, Point3, Vector3};
use crate::topology::{FaceId, MeshStore};

use super::NestingParams;

/// Classification of a point relative to a closed shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
    OnBoundary,
}

/// Skewed ray directions; none is parallel to a coordinate plane, so rays
/// rarely run along the edges of axis-aligned grids.
const RAY_DIRECTIONS: [[f64; 3]; 7] = [
    [0.577_215_66, 0.318_309_89, 0.751_988_97],
    [-0.267_949_19, 0.845_299_46, 0.462_350_78],
    [0.707_106_78, -0.618_033_99, 0.343_145_75],
    [-0.523_598_78, -0.414_213_56, -0.745_355_99],
    [0.229_441_53, 0.912_345_67, -0.338_095_24],
    [-0.866_025_40, 0.141_421_36, 0.478_945_12],
    [0.381_966_01, -0.275_682_20, 0.882_147_53],
];

/// A closed face set prepared for point-in-volume queries.
///
/// Faces are fan-triangulated around their centroids so that non-planar
/// quadrilaterals are handled as well as planar polygons.
#[derive(Debug, Clone)]
pub struct ClosedShell {
    triangles: Vec<[Point3; 3]>,
    bounds: Aabb,
}

impl ClosedShell {
    /// Collects the geometry of `faces`.
    ///
    /// # Errors
    ///
    /// Returns an error if a face or vertex is missing.
    pub fn from_faces(store: &MeshStore, faces: &[FaceId]) -> Result<Self> {
        let mut triangles = Vec::new();
        let mut points = Vec::new();
        for &f in faces {
            let pts = store.face_points(f)?;
            triangles.extend(fan_triangles(&pts));
            points.extend(pts);
        }
        let bounds = Aabb::from_points(&points).unwrap_or(Aabb {
            min: Point3::origin(),
            max: Point3::origin(),
        });
        Ok(Self { triangles, bounds })
    }

    /// Bounding box of the shell.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Classifies a point by ray-crossing parity.
    ///
    /// A ray that grazes an edge or vertex, or runs inside a triangle's
    /// plane, is discarded and the next direction is tried.
    #[must_use]
    pub fn classify(&self, point: &Point3, params: &NestingParams) -> PointClassification {
        let on_tol = params.boundary_tolerance * self.bounds.diagonal().max(1.0);
        if !self.bounds.contains(point, on_tol) {
            return PointClassification::Outside;
        }

        for dir in &RAY_DIRECTIONS {
            let dir = Vector3::new(dir[0], dir[1], dir[2]);
            match self.cast(point, &dir, params.edge_tolerance, on_tol) {
                RayCastResult::Clear(c) => return c,
                RayCastResult::Degenerate => {}
            }
        }

        warn!(?point, "every ray direction was degenerate, treating point as outside");
        PointClassification::Outside
    }

    fn cast(&self, point: &Point3, dir: &Vector3, margin: f64, on_tol: f64) -> RayCastResult {
        let mut crossings = 0u32;
        let mut grazing = false;
        for tri in &self.triangles {
            match ray_triangle_intersect(point, dir, tri, margin, on_tol) {
                RayTriangleRelation::Crossing { .. } => crossings += 1,
                RayTriangleRelation::Touching => {
                    return RayCastResult::Clear(PointClassification::OnBoundary)
                }
                RayTriangleRelation::Grazing => grazing = true,
                RayTriangleRelation::Miss => {}
            }
        }
        // Touching wins over grazing, so the whole shell is scanned first.
        if grazing {
            return RayCastResult::Degenerate;
        }
        if crossings % 2 == 1 {
            RayCastResult::Clear(PointClassification::Inside)
        } else {
            RayCastResult::Clear(PointClassification::Outside)
        }
    }
}

enum RayCastResult {
    Clear(PointClassification),
    Degenerate,
}

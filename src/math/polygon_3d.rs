use super::{Point3, Vector3};

/// Area-weighted normal of a polygon loop (Newell's method).
///
/// The result points along the right-hand normal of the loop and its length
/// equals the polygon area. Works for non-planar loops, where it yields the
/// area vector of the best-fit projection.
#[must_use]
pub fn area_vector(points: &[Point3]) -> Vector3 {
    let n = points.len();
    if n < 3 {
        return Vector3::zeros();
    }
    let mut sum = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        sum.x += (a.y - b.y) * (a.z + b.z);
        sum.y += (a.z - b.z) * (a.x + b.x);
        sum.z += (a.x - b.x) * (a.y + b.y);
    }
    sum * 0.5
}

/// Vertex-average centroid of a polygon loop.
#[must_use]
pub fn vertex_centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::origin();
    }
    #[allow(clippy::cast_precision_loss)]
    let inv = 1.0 / points.len() as f64;
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum * inv)
}

/// Unsigned area of a polygon loop.
#[must_use]
pub fn polygon_area_3d(points: &[Point3]) -> f64 {
    area_vector(points).norm()
}

/// Fan-triangulates a loop around its centroid.
///
/// Triangles keep the loop orientation. A triangle loop is returned as-is.
#[must_use]
pub fn fan_triangles(points: &[Point3]) -> Vec<[Point3; 3]> {
    match points.len() {
        0..=2 => Vec::new(),
        3 => vec![[points[0], points[1], points[2]]],
        n => {
            let c = vertex_centroid(points);
            (0..n)
                .map(|i| [c, points[i], points[(i + 1) % n]])
                .collect()
        }
    }
}

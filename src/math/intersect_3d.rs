use super::{Point3, Vector3, TOLERANCE};

/// Relationship of a ray `origin + t * dir` (with `t > 0`) to a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayTriangleRelation {
    /// The ray passes through the triangle interior at parameter `t`.
    Crossing { t: f64 },
    /// The ray hits the triangle within `margin` of an edge or vertex, or
    /// lies in its plane; the parity count would be unreliable.
    Grazing,
    /// The ray origin lies on the triangle.
    Touching,
    /// No intersection for `t > 0`.
    Miss,
}

/// Intersects a ray with a triangle (Möller–Trumbore).
///
/// `margin` is the barycentric band around the triangle border inside which a
/// hit is reported as [`Grazing`](RayTriangleRelation::Grazing). `on_tol` is
/// the distance along the ray under which the origin is considered to lie on
/// the triangle.
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3,
    dir: &Vector3,
    tri: &[Point3; 3],
    margin: f64,
    on_tol: f64,
) -> RayTriangleRelation {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let pvec = dir.cross(&e2);
    let det = e1.dot(&pvec);

    let scale = e1.norm() * e2.norm() * dir.norm();
    if scale < TOLERANCE {
        return RayTriangleRelation::Miss;
    }

    if det.abs() < TOLERANCE * scale {
        // Ray parallel to the triangle plane: only a problem if it lies in it.
        let normal = e1.cross(&e2);
        let dist = normal.dot(&(origin - tri[0])) / normal.norm().max(TOLERANCE);
        if dist.abs() < on_tol && in_triangle_plane_hits(origin, dir, tri) {
            return RayTriangleRelation::Grazing;
        }
        return RayTriangleRelation::Miss;
    }

    let inv_det = 1.0 / det;
    let tvec = origin - tri[0];
    let u = tvec.dot(&pvec) * inv_det;
    let qvec = tvec.cross(&e1);
    let v = dir.dot(&qvec) * inv_det;
    let t = e2.dot(&qvec) * inv_det;

    if u < -margin || v < -margin || u + v > 1.0 + margin {
        return RayTriangleRelation::Miss;
    }

    let t_dist = t * dir.norm();
    if t_dist.abs() <= on_tol {
        return RayTriangleRelation::Touching;
    }
    if t < 0.0 {
        return RayTriangleRelation::Miss;
    }

    if u < margin || v < margin || u + v > 1.0 - margin {
        return RayTriangleRelation::Grazing;
    }
    RayTriangleRelation::Crossing { t }
}

/// Coarse check for a ray lying in a triangle's plane: does it pass within
/// the triangle's bounding sphere?
fn in_triangle_plane_hits(origin: &Point3, dir: &Vector3, tri: &[Point3; 3]) -> bool {
    let center = Point3::from((tri[0].coords + tri[1].coords + tri[2].coords) / 3.0);
    let radius = tri
        .iter()
        .map(|p| (p - center).norm())
        .fold(0.0_f64, f64::max);
    let d = dir.normalize();
    let to_center = center - origin;
    let along = to_center.dot(&d);
    if along < -radius {
        return false;
    }
    (to_center - d * along).norm() <= radius
}

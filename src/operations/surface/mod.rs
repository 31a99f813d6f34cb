mod components;
mod containment;
mod grid_surface;
mod tree;

pub use components::{SurfaceComponent, SurfaceComponents};
pub use containment::{ClosedShell, PointClassification};
pub use grid_surface::GridSurface;
pub use tree::{AssembleTree, OpenComponent, SurfaceTree, TreeNode};

/// Numerical tolerances used while nesting closed components.
#[derive(Debug, Clone, Copy)]
pub struct NestingParams {
    /// Distance, relative to a shell's bounding-box diagonal, under which a
    /// sample point counts as lying on that shell.
    pub boundary_tolerance: f64,
    /// Barycentric band around triangle borders inside which a ray hit is
    /// treated as grazing and the ray is recast in another direction.
    pub edge_tolerance: f64,
    /// Enclosed volume under which a closed shell is considered flat.
    pub volume_tolerance: f64,
}

impl Default for NestingParams {
    fn default() -> Self {
        Self {
            boundary_tolerance: 1e-9,
            edge_tolerance: 1e-9,
            volume_tolerance: 1e-12,
        }
    }
}

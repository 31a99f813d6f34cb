//! Scoped, reversible flipping of face loop directions.
//!
//! Every flip goes through a [`Reversion`] guard. The guard is built from a
//! per-face plan: the consistent plan of a face collection, the level-parity
//! plan of a [`SurfaceTree`](crate::operations::surface::SurfaceTree), or the
//! cell-side plan of a grid boundary.

mod grid;
mod plan;
mod reversion;
mod tree;

pub use grid::{orient_grid_surface, CellSide};
pub use plan::consistent_plan;
pub use reversion::Reversion;

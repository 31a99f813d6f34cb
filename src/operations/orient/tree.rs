use crate::error::Result;
use crate::operations::surface::SurfaceTree;
use crate::topology::MeshStore;

use super::reversion::Reversion;

impl<'a> Reversion<'a> {
    /// Applies the level-parity convention of an assembled tree: closed
    /// nodes at even levels get positive signed volume, odd levels negative,
    /// and open components are made internally consistent.
    ///
    /// The tree must have been assembled from the store's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if a tree face is missing or listed twice.
    pub fn for_tree(store: &'a mut MeshStore, tree: &SurfaceTree) -> Result<Self> {
        let (faces, flips) = tree.flip_plan();
        Self::with_plan(store, faces, flips)
    }

    /// [`Reversion::for_tree`] on top of this guard.
    ///
    /// # Errors
    ///
    /// Same as [`Reversion::for_tree`].
    pub fn nested_for_tree(&mut self, tree: &SurfaceTree) -> Result<Reversion<'_>> {
        Reversion::for_tree(self.store_mut(), tree)
    }
}

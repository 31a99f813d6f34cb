use std::collections::HashSet;
use std::ops::Deref;

use tracing::{debug, trace, warn};

use crate::error::{OperationError, Result};
use crate::topology::{FaceId, MeshStore};

use super::plan::consistent_plan;

/// Scoped flip of face loop directions.
///
/// Construction flips the faces selected by a plan and records them; dropping
/// the guard flips exactly those faces back, unless it was made permanent.
/// The guard holds the store's exclusive borrow and dereferences to it for
/// read queries only. Nested guards borrow the outer guard mutably:
///
/// ```
/// # use meshtree::topology::{MeshStore, FaceId};
/// # use meshtree::operations::orient::Reversion;
/// # fn demo(store: &mut MeshStore, faces: &[FaceId]) -> meshtree::Result<()> {
/// let mut outer = Reversion::new(store, faces)?;
/// {
///     let mut inner = outer.nested(faces)?;
///     inner.reverse_all()?;
/// } // inner restored here
/// # Ok(())
/// # }
/// ```
///
/// The borrow checker enforces stack-ordered release, so overlapping guards
/// can never unwind out of order. The store itself cannot be changed through
/// a guard:
///
/// ```compile_fail
/// # use meshtree::topology::{MeshStore, FaceId};
/// # use meshtree::operations::orient::Reversion;
/// # fn demo(store: &mut MeshStore, faces: &[FaceId]) -> meshtree::Result<()> {
/// let mut rev = Reversion::new(store, faces)?;
/// rev.set_face_cells(faces[0], None, None)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Reversion<'a> {
    store: &'a mut MeshStore,
    faces: Vec<FaceId>,
    plan: Vec<bool>,
    applied: Vec<bool>,
    permanent: bool,
}

impl<'a> Reversion<'a> {
    /// Orients `faces` so that every pair sharing an edge walks it in
    /// opposite directions. The overall sign of each connected piece follows
    /// its first face in `faces`.
    ///
    /// # Errors
    ///
    /// Returns an error if a face is missing or repeated, if an edge is shared
    /// by more than two faces, or if a piece is non-orientable.
    pub fn new(store: &'a mut MeshStore, faces: &[FaceId]) -> Result<Self> {
        check_distinct(faces)?;
        let plan = {
            let loops = faces
                .iter()
                .map(|&f| store.face(f).map(|d| d.vertices()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            consistent_plan(&loops)?
        };
        Self::with_plan(store, faces.to_vec(), plan)
    }

    /// Applies an explicit per-face flip plan.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::PreconditionViolation`] if the plan length
    /// differs from the face count or a face is listed twice, and an entity
    /// error if a face is missing.
    pub(crate) fn with_plan(
        store: &'a mut MeshStore,
        faces: Vec<FaceId>,
        plan: Vec<bool>,
    ) -> Result<Self> {
        if plan.len() != faces.len() {
            return Err(OperationError::PreconditionViolation(format!(
                "flip plan covers {} faces, collection has {}",
                plan.len(),
                faces.len()
            ))
            .into());
        }
        check_distinct(&faces)?;
        for &f in &faces {
            store.face(f)?;
        }

        let applied = vec![false; faces.len()];
        let mut rev = Self {
            store,
            faces,
            plan,
            applied,
            permanent: false,
        };
        rev.reapply()?;
        debug!(
            faces = rev.faces.len(),
            flipped = rev.flipped_count(),
            "reversion applied"
        );
        Ok(rev)
    }

    /// Orients `faces` consistently and leaves them that way.
    ///
    /// # Errors
    ///
    /// Same as [`Reversion::new`].
    pub fn permanent(store: &mut MeshStore, faces: &[FaceId]) -> Result<()> {
        Reversion::new(store, faces)?.make_permanent();
        Ok(())
    }

    /// Builds a guard over `faces` on top of this one. This guard is
    /// unusable until the nested one is released.
    ///
    /// # Errors
    ///
    /// Same as [`Reversion::new`].
    pub fn nested(&mut self, faces: &[FaceId]) -> Result<Reversion<'_>> {
        Reversion::new(&mut *self.store, faces)
    }

    pub(super) fn store_mut(&mut self) -> &mut MeshStore {
        &mut *self.store
    }

    /// The faces under this guard, in the order given at construction.
    #[must_use]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Faces currently flipped by this guard.
    pub fn flipped(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .zip(&self.applied)
            .filter(|(_, &a)| a)
            .map(|(&f, _)| f)
    }

    /// Number of faces currently flipped by this guard.
    #[must_use]
    pub fn flipped_count(&self) -> usize {
        self.applied.iter().filter(|&&a| a).count()
    }

    /// Inverts the overall direction of every face under the guard.
    ///
    /// # Errors
    ///
    /// Returns an error if a face vanished from the store.
    pub fn reverse_all(&mut self) -> Result<()> {
        for p in &mut self.plan {
            *p = !*p;
        }
        self.reapply()
    }

    /// Puts every face back to its pre-construction direction while keeping
    /// the guard alive; [`Reversion::reapply`] brings the plan back.
    ///
    /// # Errors
    ///
    /// Returns an error if a face vanished from the store.
    pub fn revert_back(&mut self) -> Result<()> {
        let original = vec![false; self.faces.len()];
        self.apply(&original)
    }

    /// Re-applies the guard's current plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a face vanished from the store.
    pub fn reapply(&mut self) -> Result<()> {
        let plan = self.plan.clone();
        self.apply(&plan)
    }

    /// Keeps the current directions when the guard is released.
    pub fn make_permanent(&mut self) {
        self.permanent = true;
    }

    /// Whether release will leave the faces as they are.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// Releases the guard now, restoring unless permanent.
    pub fn restore(self) {}

    fn apply(&mut self, target: &[bool]) -> Result<()> {
        for (i, &want) in target.iter().enumerate() {
            if self.applied[i] != want {
                self.store.flip_face(self.faces[i])?;
                self.applied[i] = want;
                trace!(face = ?self.faces[i], flipped = want, "face loop flipped");
            }
        }
        Ok(())
    }
}

fn check_distinct(faces: &[FaceId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(faces.len());
    if faces.iter().all(|&f| seen.insert(f)) {
        Ok(())
    } else {
        Err(OperationError::PreconditionViolation("face listed twice in one reversion".into()).into())
    }
}

impl Deref for Reversion<'_> {
    type Target = MeshStore;

    fn deref(&self) -> &MeshStore {
        self.store
    }
}

impl Drop for Reversion<'_> {
    fn drop(&mut self) {
        if self.permanent {
            return;
        }
        let original = vec![false; self.faces.len()];
        if let Err(e) = self.apply(&original) {
            warn!(error = %e, "reversion restore incomplete");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MeshTreeError;
    use crate::operations::query::SignedVolume;
    use crate::testing::{box_surface, flip_some};
    use approx::assert_relative_eq;

    fn volume(store: &MeshStore, faces: &[FaceId]) -> f64 {
        SignedVolume::new(faces.to_vec()).execute(store).unwrap()
    }

    #[test]
    fn mixed_box_becomes_consistent_then_restores() {
        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0, 2.0, 3.0], false);
        flip_some(&mut store, &faces, &[1, 4]);
        let before = volume(&store, &faces);
        assert!((before.abs() - 6.0).abs() > 1.0);

        {
            let rev = Reversion::new(&mut store, &faces).unwrap();
            assert_eq!(rev.flipped_count(), 2);
            assert_relative_eq!(volume(&rev, &faces), 6.0, epsilon = 1e-12);
        }
        assert_relative_eq!(volume(&store, &faces), before, epsilon = 1e-12);
    }

    #[test]
    fn reverse_revert_reapply_cycle() {
        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0, 1.0, 2.0], true);
        let v1 = volume(&store, &faces);
        assert_relative_eq!(v1, -2.0, epsilon = 1e-12);

        let mut rev = Reversion::new(&mut store, &faces).unwrap();
        assert_relative_eq!(volume(&rev, &faces), -2.0, epsilon = 1e-12);
        rev.reverse_all().unwrap();
        assert_relative_eq!(volume(&rev, &faces), 2.0, epsilon = 1e-12);
        rev.revert_back().unwrap();
        assert_relative_eq!(volume(&rev, &faces), v1, epsilon = 1e-12);
        rev.reapply().unwrap();
        assert_relative_eq!(volume(&rev, &faces), 2.0, epsilon = 1e-12);
        rev.restore();

        assert_relative_eq!(volume(&store, &faces), v1, epsilon = 1e-12);
        assert!(store.faces().all(|(_, f)| !f.is_reversed()));
    }

    #[test]
    fn permanent_guard_keeps_flips() {
        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0; 3], false);
        {
            let mut rev = Reversion::new(&mut store, &faces).unwrap();
            rev.reverse_all().unwrap();
            rev.make_permanent();
            assert!(rev.is_permanent());
        }
        assert_relative_eq!(volume(&store, &faces), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn permanent_helper_orients_in_place() {
        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0; 3], false);
        flip_some(&mut store, &faces, &[3]);
        Reversion::permanent(&mut store, &faces).unwrap();
        assert_relative_eq!(volume(&store, &faces), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn nested_overlapping_guards_unwind_exactly() {
        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0; 3], false);
        let half: Vec<FaceId> = faces[..3].to_vec();

        {
            let mut outer = Reversion::new(&mut store, &faces).unwrap();
            outer.reverse_all().unwrap();
            assert_relative_eq!(volume(&outer, &faces), -1.0, epsilon = 1e-12);
            {
                let mut inner = outer.nested(&half).unwrap();
                assert_eq!(inner.flipped_count(), 0);
                inner.reverse_all().unwrap();
                assert_eq!(inner.flipped().collect::<Vec<_>>(), half);
                // x-min, x-max, y-min back outward; y-max, z-min, z-max inward.
                assert_relative_eq!(volume(&inner, &faces), -1.0 / 3.0, epsilon = 1e-12);
            }
            assert_relative_eq!(volume(&outer, &faces), -1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(volume(&store, &faces), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn duplicate_face_is_a_precondition_violation() {
        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0; 3], false);
        let dup = vec![faces[0], faces[1], faces[0]];
        let err = Reversion::new(&mut store, &dup).unwrap_err();
        assert!(matches!(
            err,
            MeshTreeError::Operation(OperationError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn restores_when_scope_fails() {
        fn failing(store: &mut MeshStore, faces: &[FaceId]) -> Result<()> {
            let mut rev = Reversion::new(store, faces)?;
            rev.reverse_all()?;
            Err(OperationError::InvalidInput("abort".into()).into())
        }

        let mut store = MeshStore::new();
        let faces = box_surface(&mut store, [0.0; 3], [1.0; 3], false);
        assert!(failing(&mut store, &faces).is_err());
        assert_relative_eq!(volume(&store, &faces), 1.0, epsilon = 1e-12);
    }
}

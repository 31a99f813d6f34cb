use std::collections::VecDeque;

use tracing::debug;

use crate::error::Result;
use crate::topology::{loop_edges, EdgeMap, FaceId, MeshStore};

/// One edge-connected piece of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceComponent {
    /// Member faces, sorted by id.
    pub faces: Vec<FaceId>,
    /// `true` if every edge of the piece is shared by exactly two of its faces.
    pub closed: bool,
}

/// Splits a face set into edge-connected components and classifies each as
/// open or closed.
///
/// The result does not depend on the order of the input faces: faces are
/// deduplicated and sorted by id, and components are ordered by their
/// smallest face id.
pub struct SurfaceComponents {
    faces: Vec<FaceId>,
}

impl SurfaceComponents {
    /// Creates a new `SurfaceComponents` query.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if a face is missing or an edge is shared by more
    /// than two faces.
    pub fn execute(&self, store: &MeshStore) -> Result<Vec<SurfaceComponent>> {
        let mut faces = self.faces.clone();
        faces.sort_unstable();
        faces.dedup();

        let loops = faces
            .iter()
            .map(|&f| store.face(f).map(|d| d.vertices()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let edges = EdgeMap::build(loops.iter().copied());
        edges.check_manifold()?;

        let mut comp_of = vec![usize::MAX; faces.len()];
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut queue = VecDeque::new();
        for start in 0..faces.len() {
            if comp_of[start] != usize::MAX {
                continue;
            }
            let id = members.len();
            comp_of[start] = id;
            queue.push_back(start);
            let mut list = Vec::new();
            while let Some(cur) = queue.pop_front() {
                list.push(cur);
                for (key, _) in loop_edges(loops[cur]) {
                    for u in edges.uses(&key) {
                        if comp_of[u.face] == usize::MAX {
                            comp_of[u.face] = id;
                            queue.push_back(u.face);
                        }
                    }
                }
            }
            list.sort_unstable();
            members.push(list);
        }

        let mut closed = vec![true; members.len()];
        for (_, uses) in edges.iter() {
            if uses.len() < 2 {
                closed[comp_of[uses[0].face]] = false;
            }
        }

        let result: Vec<SurfaceComponent> = members
            .into_iter()
            .zip(closed)
            .map(|(list, closed)| SurfaceComponent {
                faces: list.into_iter().map(|i| faces[i]).collect(),
                closed,
            })
            .collect();
        debug!(
            faces = faces.len(),
            components = result.len(),
            closed = result.iter().filter(|c| c.closed).count(),
            "surface split into components"
        );
        Ok(result)
    }
}

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::TopologyError;

use super::vertex::VertexId;

/// An unordered pair of vertices, derived from face loops.
///
/// Edges are not stored in the arena; two faces are neighbours iff their
/// loops produce the same key. The pair is normalised so that the smaller
/// vertex comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey<V = VertexId>(V, V);

impl<V: Copy + Ord> EdgeKey<V> {
    /// Creates the key of the edge between `a` and `b`.
    #[must_use]
    pub fn new(a: V, b: V) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// The two end vertices, smaller first.
    #[must_use]
    pub fn vertices(&self) -> (V, V) {
        (self.0, self.1)
    }
}

/// One traversal of an edge by a face loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeUse {
    /// Position of the face in the collection the map was built from.
    pub face: usize,
    /// `true` if the loop walks the edge from its smaller vertex to its larger.
    pub forward: bool,
}

/// Edges of a cyclic loop paired with their traversal direction.
pub fn loop_edges<V: Copy + Ord>(lp: &[V]) -> impl Iterator<Item = (EdgeKey<V>, bool)> + '_ {
    let n = lp.len();
    (0..n).map(move |i| {
        let a = lp[i];
        let b = lp[(i + 1) % n];
        (EdgeKey::new(a, b), a < b)
    })
}

/// Maps every edge of a face collection to the faces that traverse it.
#[derive(Debug, Clone)]
pub struct EdgeMap<V = VertexId> {
    uses: HashMap<EdgeKey<V>, Vec<EdgeUse>>,
}

impl<V: Copy + Ord + Hash> EdgeMap<V> {
    /// Builds the map from loops given in collection order.
    pub fn build<'a, I>(loops: I) -> Self
    where
        I: IntoIterator<Item = &'a [V]>,
        V: 'a,
    {
        let mut uses: HashMap<EdgeKey<V>, Vec<EdgeUse>> = HashMap::new();
        for (face, lp) in loops.into_iter().enumerate() {
            for (key, forward) in loop_edges(lp) {
                uses.entry(key).or_default().push(EdgeUse { face, forward });
            }
        }
        Self { uses }
    }

    /// Faces traversing `key`, empty if the edge is unknown.
    #[must_use]
    pub fn uses(&self, key: &EdgeKey<V>) -> &[EdgeUse] {
        self.uses.get(key).map_or(&[], Vec::as_slice)
    }

    /// Iterates over all edges and their uses.
    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey<V>, &[EdgeUse])> {
        self.uses.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uses.len()
    }

    /// Whether the collection had no edges at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }

    /// Fails if any edge is traversed by more than two faces.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NonManifoldInput`] with the offending degree.
    pub fn check_manifold(&self) -> Result<(), TopologyError> {
        match self.uses.values().map(Vec::len).max() {
            Some(degree) if degree > 2 => {
                Err(TopologyError::NonManifoldInput { edge_faces: degree })
            }
            _ => Ok(()),
        }
    }

    /// `true` if every edge is used by exactly two faces.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.uses.is_empty() && self.uses.values().all(|u| u.len() == 2)
    }
}

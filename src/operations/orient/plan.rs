use std::collections::VecDeque;
use std::hash::Hash;

use crate::error::TopologyError;
use crate::topology::{loop_edges, EdgeMap};

/// Computes which loops must be flipped so that every pair of loops sharing
/// an edge walks it in opposite directions.
///
/// Loops are visited breadth-first in collection order; the first loop of each
/// connected piece keeps its direction, so the overall sign of each piece is
/// that of its first loop. Works on any vertex key, which lets the same
/// routine serve arena faces and index loops handed to the cell classifier.
///
/// # Errors
///
/// Returns [`TopologyError::NonManifoldInput`] if an edge is shared by more
/// than two loops and [`TopologyError::NonOrientable`] if the edge
/// constraints contradict each other.
pub fn consistent_plan<V>(loops: &[&[V]]) -> Result<Vec<bool>, TopologyError>
where
    V: Copy + Ord + Hash,
{
    let edges = EdgeMap::build(loops.iter().copied());
    edges.check_manifold()?;

    let n = loops.len();
    let mut flip = vec![false; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        while let Some(cur) = queue.pop_front() {
            for (key, forward) in loop_edges(loops[cur]) {
                let cur_dir = forward ^ flip[cur];
                for u in edges.uses(&key) {
                    if u.face == cur {
                        continue;
                    }
                    if visited[u.face] {
                        if u.forward ^ flip[u.face] == cur_dir {
                            return Err(TopologyError::NonOrientable { face: u.face });
                        }
                    } else {
                        visited[u.face] = true;
                        flip[u.face] = u.forward == cur_dir;
                        queue.push_back(u.face);
                    }
                }
            }
        }
    }
    Ok(flip)
}

use tracing::{debug, info};

use crate::error::{OperationError, Result};
use crate::math::polygon_3d::vertex_centroid;
use crate::math::Point3;
use crate::operations::orient::consistent_plan;
use crate::operations::query::planned_signed_volume;
use crate::progress::{report, ProgressCallback};
use crate::topology::{FaceId, MeshStore};

use super::components::{SurfaceComponent, SurfaceComponents};
use super::containment::{ClosedShell, PointClassification};
use super::NestingParams;

/// A closed component placed in the nesting forest.
#[derive(Debug, Clone)]
pub struct TreeNode {
    faces: Vec<FaceId>,
    level: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    open: Vec<usize>,
    flips: Vec<bool>,
    volume: f64,
}

impl TreeNode {
    /// Member faces, sorted by id.
    #[must_use]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Nesting depth; 0 for components not enclosed by any other.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// `true` for odd levels, i.e. the boundary of a void in the material.
    #[must_use]
    pub fn is_cavity(&self) -> bool {
        self.level % 2 == 1
    }

    /// Index of the directly enclosing node.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Indices of the nodes directly enclosed by this one.
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Indices of the open components attached to this node.
    #[must_use]
    pub fn open_components(&self) -> &[usize] {
        &self.open
    }

    /// Per-face flips, aligned with [`TreeNode::faces`], that bring the node
    /// to the level-parity convention.
    #[must_use]
    pub fn flips(&self) -> &[bool] {
        &self.flips
    }

    /// Whether the faces' directions at assembly time break the convention.
    #[must_use]
    pub fn need_revert(&self) -> bool {
        self.flips.iter().any(|&f| f)
    }

    /// Unsigned volume enclosed by this shell alone.
    #[must_use]
    pub fn enclosed_volume(&self) -> f64 {
        self.volume
    }
}

/// An open component, attached to the innermost closed node enclosing it.
#[derive(Debug, Clone)]
pub struct OpenComponent {
    faces: Vec<FaceId>,
    parent: Option<usize>,
    flips: Vec<bool>,
}

impl OpenComponent {
    /// Member faces, sorted by id.
    #[must_use]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Enclosing node, or `None` when attached to the synthetic root.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Per-face flips that make the sheet consistently directed.
    #[must_use]
    pub fn flips(&self) -> &[bool] {
        &self.flips
    }
}

/// Nesting forest of the closed components of a surface.
///
/// Nodes are ordered by level, then by smallest face id, so the structure
/// is identical for any permutation of the input faces.
#[derive(Debug, Clone, Default)]
pub struct SurfaceTree {
    nodes: Vec<TreeNode>,
    open: Vec<OpenComponent>,
}

impl SurfaceTree {
    /// All closed nodes.
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// All open components.
    #[must_use]
    pub fn open_components(&self) -> &[OpenComponent] {
        &self.open
    }

    /// Level-0 nodes.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Open components attached to the synthetic root.
    pub fn root_open_components(&self) -> impl Iterator<Item = usize> + '_ {
        self.open
            .iter()
            .enumerate()
            .filter(|(_, o)| o.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Deepest nesting level, `None` without closed components.
    #[must_use]
    pub fn max_level(&self) -> Option<usize> {
        self.nodes.iter().map(|n| n.level).max()
    }

    /// Material volume: even levels add, odd levels subtract.
    #[must_use]
    pub fn material_volume(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| if n.is_cavity() { -n.volume } else { n.volume })
            .sum()
    }

    /// Every face of the tree with the flip it needs, closed nodes first.
    #[must_use]
    pub fn flip_plan(&self) -> (Vec<FaceId>, Vec<bool>) {
        let mut faces = Vec::new();
        let mut flips = Vec::new();
        for (f, fl) in self
            .nodes
            .iter()
            .map(|n| (&n.faces, &n.flips))
            .chain(self.open.iter().map(|o| (&o.faces, &o.flips)))
        {
            faces.extend_from_slice(f);
            flips.extend_from_slice(fl);
        }
        (faces, flips)
    }
}

/// Assembles a [`SurfaceTree`] from an unordered face set.
///
/// 1. Split into edge-connected components; classify open/closed.
/// 2. Test a sample point of every closed component against every other
///    closed component by ray parity.
/// 3. Build the nesting forest; level = number of enclosing components.
/// 4. Orient each node consistently and decide its overall sign from the
///    signed volume: even levels positive, odd levels negative.
/// 5. Attach open components to their innermost enclosing node.
pub struct AssembleTree {
    faces: Vec<FaceId>,
    params: NestingParams,
    progress: Option<ProgressCallback>,
}

const PHASES: u64 = 4;

impl AssembleTree {
    /// Creates a new `AssembleTree` operation with default tolerances.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self {
            faces,
            params: NestingParams::default(),
            progress: None,
        }
    }

    /// Sets custom nesting tolerances.
    #[must_use]
    pub fn with_params(mut self, params: NestingParams) -> Self {
        self.params = params;
        self
    }

    /// Reports each finished phase; a `false` return cancels assembly.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Executes the assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge is shared by more than two faces, a
    /// component is non-orientable, two closed components touch, overlap or
    /// enclose no volume, or the progress callback cancels.
    pub fn execute(&self, store: &MeshStore) -> Result<SurfaceTree> {
        let progress = self.progress.as_ref();

        let components = SurfaceComponents::new(self.faces.clone()).execute(store)?;
        let (closed, open): (Vec<SurfaceComponent>, Vec<SurfaceComponent>) =
            components.into_iter().partition(|c| c.closed);
        report(progress, 1, PHASES, "components")?;

        let shells = closed
            .iter()
            .map(|c| ClosedShell::from_faces(store, &c.faces))
            .collect::<Result<Vec<_>>>()?;
        let samples = closed
            .iter()
            .map(|c| sample_point(store, &c.faces))
            .collect::<Result<Vec<_>>>()?;
        let containers = self.containment(&shells, &samples)?;
        report(progress, 2, PHASES, "nesting")?;

        let (mut nodes, order) = build_forest(closed, &containers)?;
        for node in &mut nodes {
            self.orient_node(store, node)?;
        }
        report(progress, 3, PHASES, "orientation")?;

        let mut open_components = Vec::with_capacity(open.len());
        for comp in open {
            let sample = sample_point(store, &comp.faces)?;
            let parent = (0..nodes.len())
                .filter(|&i| {
                    shells[order[i]].classify(&sample, &self.params) == PointClassification::Inside
                })
                .max_by_key(|&i| nodes[i].level);
            let flips = plan_for(store, &comp.faces)?;
            if let Some(p) = parent {
                nodes[p].open.push(open_components.len());
            }
            open_components.push(OpenComponent {
                faces: comp.faces,
                parent,
                flips,
            });
        }
        report(progress, 4, PHASES, "open components")?;

        let tree = SurfaceTree {
            nodes,
            open: open_components,
        };
        info!(
            nodes = tree.nodes.len(),
            open = tree.open.len(),
            max_level = ?tree.max_level(),
            "surface tree assembled"
        );
        Ok(tree)
    }

    /// `containers[b]` lists every closed component enclosing component `b`.
    fn containment(&self, shells: &[ClosedShell], samples: &[Point3]) -> Result<Vec<Vec<usize>>> {
        let n = shells.len();
        let mut containers = vec![Vec::new(); n];
        for (a, shell) in shells.iter().enumerate() {
            for (b, sample) in samples.iter().enumerate() {
                if a == b {
                    continue;
                }
                match shell.classify(sample, &self.params) {
                    PointClassification::Inside => containers[b].push(a),
                    PointClassification::OnBoundary => {
                        return Err(OperationError::DegenerateNesting(format!(
                            "closed components {a} and {b} touch"
                        ))
                        .into());
                    }
                    PointClassification::Outside => {}
                }
            }
        }
        for (b, list) in containers.iter().enumerate() {
            if let Some(&a) = list.iter().find(|&&a| containers[a].contains(&b)) {
                return Err(OperationError::DegenerateNesting(format!(
                    "closed components {a} and {b} enclose each other"
                ))
                .into());
            }
        }
        Ok(containers)
    }

    fn orient_node(&self, store: &MeshStore, node: &mut TreeNode) -> Result<()> {
        let mut flips = plan_for(store, &node.faces)?;
        let volume = planned_signed_volume(store, &node.faces, &flips)?;
        if volume.abs() < self.params.volume_tolerance {
            return Err(OperationError::DegenerateNesting(format!(
                "closed component of {} faces encloses no volume",
                node.faces.len()
            ))
            .into());
        }
        let want_positive = node.level % 2 == 0;
        if (volume > 0.0) != want_positive {
            for f in &mut flips {
                *f = !*f;
            }
        }
        debug!(
            level = node.level,
            faces = node.faces.len(),
            volume = volume.abs(),
            flipped = flips.iter().filter(|&&f| f).count(),
            "tree node oriented"
        );
        node.flips = flips;
        node.volume = volume.abs();
        Ok(())
    }
}

/// Builds nodes sorted by (level, smallest face id) with parent/child links.
///
/// Also returns, for every node, the index of the component it came from.
fn build_forest(
    closed: Vec<SurfaceComponent>,
    containers: &[Vec<usize>],
) -> Result<(Vec<TreeNode>, Vec<usize>)> {
    let n = closed.len();
    let depth: Vec<usize> = containers.iter().map(Vec::len).collect();

    let mut parent_of = vec![None; n];
    for b in 0..n {
        let Some(&p) = containers[b].iter().max_by_key(|&&a| depth[a]) else {
            continue;
        };
        // Every other container of b must also enclose its direct parent.
        if depth[p] + 1 != depth[b]
            || containers[b]
                .iter()
                .any(|&a| a != p && !containers[p].contains(&a))
        {
            return Err(OperationError::DegenerateNesting(format!(
                "closed component {b} is not properly nested"
            ))
            .into());
        }
        parent_of[b] = Some(p);
    }

    // `closed` is already ordered by smallest face id.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| depth[i]);
    let mut new_index = vec![0; n];
    for (new, &old) in order.iter().enumerate() {
        new_index[old] = new;
    }

    let mut slots: Vec<Option<SurfaceComponent>> = closed.into_iter().map(Some).collect();
    let mut nodes: Vec<TreeNode> = order
        .iter()
        .map(|&old| TreeNode {
            faces: slots[old].take().map(|c| c.faces).unwrap_or_default(),
            level: depth[old],
            parent: parent_of[old].map(|p| new_index[p]),
            children: Vec::new(),
            open: Vec::new(),
            flips: Vec::new(),
            volume: 0.0,
        })
        .collect();
    for i in 0..nodes.len() {
        if let Some(p) = nodes[i].parent {
            nodes[p].children.push(i);
        }
    }
    Ok((nodes, order))
}

/// Centroid of the smallest-id face.
fn sample_point(store: &MeshStore, faces: &[FaceId]) -> Result<Point3> {
    let Some(&first) = faces.first() else {
        return Err(OperationError::InvalidInput("empty surface component".into()).into());
    };
    Ok(vertex_centroid(&store.face_points(first)?))
}

fn plan_for(store: &MeshStore, faces: &[FaceId]) -> Result<Vec<bool>> {
    let loops = faces
        .iter()
        .map(|&f| store.face(f).map(|d| d.vertices()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(consistent_plan(&loops)?)
}

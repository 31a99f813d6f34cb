use thiserror::Error;

/// Top-level error type for the mesh topology engine.
#[derive(Debug, Error)]
pub enum MeshTreeError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Errors related to the mesh arena and its connectivity.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid face: {0}")]
    InvalidFace(String),

    #[error("non-manifold input: an edge is shared by {edge_faces} faces")]
    NonManifoldInput { edge_faces: usize },

    #[error("non-orientable surface: direction conflict at face {face} of the collection")]
    NonOrientable { face: usize },
}

/// Errors related to surface operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("degenerate nesting: {0}")]
    DegenerateNesting(String),

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation cancelled during {phase}")]
    Cancelled { phase: &'static str },
}

/// Errors related to cell shape classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("cannot treat 3D cell with {face_count} faces as a valid cell")]
    UnclassifiableCell { face_count: usize },
}

/// Convenience type alias for results using [`MeshTreeError`].
pub type Result<T> = std::result::Result<T, MeshTreeError>;

use thiserror::Error;

/// Top-level error type for the kinfield engine.
#[derive(Debug, Error)]
pub enum KinfieldError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while reading point clouds, metadata or configuration.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed PLY: {0}")]
    MalformedPly(String),

    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("malformed configuration: {0}")]
    MalformedConfig(String),
}

/// Errors related to the robot geometry catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("robot id {robot_id} not found")]
    NotFound { robot_id: u32 },

    #[error("invalid robot geometry {robot_id}: {reason}")]
    InvalidGeometry { robot_id: u32, reason: String },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate")]
    NonFinite,
}

/// Errors related to engine operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`KinfieldError`].
pub type Result<T> = std::result::Result<T, KinfieldError>;

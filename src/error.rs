use thiserror::Error;

/// Everything that can go wrong while loading or saving puzzles and poses.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vertices.length differs: figure has {expected}, pose has {found}")]
    VertexCountMismatch { expected: usize, found: usize },

    #[error("edge {edge} refers to vertex {index}, but the figure has {vertex_count} vertices")]
    EdgeIndexOutOfRange {
        edge: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("hole polygon has no points")]
    EmptyHole,

    #[error("coordinate {value} is outside ±{limit}")]
    CoordinateOutOfRange { value: i64, limit: i64 },
}

pub type Result<T> = std::result::Result<T, EditorError>;

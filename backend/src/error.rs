use thiserror::Error;

/// Failures raised by the geometry core.
///
/// These are programmer errors caused by bad input data. Camera clamping is
/// never reported here: out-of-range pan and zoom requests are corrected and
/// the applied amount is returned instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    #[error("matrix is not invertible (determinant {determinant})")]
    DegenerateMatrix { determinant: f32 },

    #[error("rectangle has zero width or height")]
    EmptyRect,

    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("a polygon needs at least 3 sides, got {0}")]
    TooFewSides(usize),

    #[error("{0} vertices cannot be addressed by 16-bit indices")]
    IndexOverflow(usize),

    #[error("index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: usize, vertices: usize },

    #[error("malformed mesh specification: {0}")]
    MalformedSpec(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;

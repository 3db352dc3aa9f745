/// All errors that can occur within stoat.
///
/// One enum for the whole workspace: shape mismatches from the math kernels,
/// the backward-before-forward state error from the layer protocol, and the
/// format/IO failures from the checkpoint codec. A single error type keeps
/// `?` propagation uniform from kernel to training loop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two operands of an elementwise or broadcast operation disagree in shape.
    #[error("{op} shape mismatch: ({}, {}) vs ({}, {})", .lhs.0, .lhs.1, .rhs.0, .rhs.1)]
    ShapeMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },

    /// Matrix multiplication inner-dimension mismatch.
    #[error("matmul shape mismatch: [{m}x{k1}] @ [{k2}x{n}] — inner dims must match")]
    MatmulShapeMismatch {
        m: usize,
        k1: usize,
        k2: usize,
        n: usize,
    },

    /// Buffer length does not match `rows * cols` when building a tensor.
    #[error("element count mismatch: shape ({rows}, {cols}) cannot hold {got} elements")]
    ElementCountMismatch {
        rows: usize,
        cols: usize,
        got: usize,
    },

    /// `backward` was called without a preceding matching `forward`.
    ///
    /// Layers consume their forward cache during backward, so a second
    /// backward (or one before any forward) has no valid cached state.
    #[error("{layer}: backward called without a preceding forward")]
    BackwardBeforeForward { layer: &'static str },

    /// A checkpoint stream is malformed: wrong magic, unsupported version,
    /// unknown parameter name, or a shape that disagrees with the live model.
    #[error("invalid checkpoint: {0}")]
    InvalidCheckpoint(String),

    /// Underlying IO failure (file open, short read, write error).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout stoat.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}

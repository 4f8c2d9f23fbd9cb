//! Error types for slice construction, bounded access and text parsing.

/// Errors raised by the grid engine.
///
/// Invariant violations inside the traversal loop are not represented here;
/// they are programming errors and trip `debug_assert!`s instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A slot, vertex, axis or grid index was past the end of its range.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A space or digit array had the wrong number of axes.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A slice was asked for zero cells.
    #[error("resolution must be at least 1")]
    ZeroResolution,

    /// The bounding space has a zero, negative or non-finite measure.
    #[error("degenerate space: measure = {measure}")]
    DegenerateSpace { measure: f64 },

    /// The fitted sub-resolutions do not fit in a `usize` grid index.
    #[error("resolution overflow: fitted grid does not fit in usize")]
    ResolutionOverflow,

    /// Malformed bracketed text.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors produced while reading the bracketed coordinate format.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Brackets did not balance, or a list was expected and an atom found.
    #[error("malformed input at byte {offset}")]
    Malformed { offset: usize },

    /// A bracketed list held the wrong number of elements.
    #[error("wrong element count: expected {expected}, got {got}")]
    WrongElementCount { expected: usize, got: usize },

    /// An atom could not be read as a number.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// Non-whitespace input followed the closing bracket.
    #[error("trailing input after byte {offset}")]
    TrailingInput { offset: usize },
}

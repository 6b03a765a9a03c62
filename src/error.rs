/// Crate-level error type for the scoralign note alignment library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Paired constructor inputs have different lengths.
    #[error("length mismatch for `{name}`: got {left} and {right}")]
    LengthMismatch {
        name: &'static str,
        left: usize,
        right: usize,
    },

    /// A required input is empty.
    #[error("`{name}` must not be empty")]
    EmptyInput { name: &'static str },
}

/// Convenience Result type for scoralign operations.
pub type Result<T> = std::result::Result<T, Error>;

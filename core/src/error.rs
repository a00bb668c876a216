/// Errors surfaced by the core. None of them are recovered locally; the
/// caller (CLI or serving layer) decides the user-visible behavior.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The weight matrix handed to the index builder is invalid.
    #[error("malformed matrix: {0}")]
    MalformedMatrix(String),
    /// A persisted index blob failed to decode or validate.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),
    /// The index contains no terms at all; querying it is meaningless.
    #[error("empty index: no terms")]
    EmptyIndex,
    /// A caller-supplied parameter is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

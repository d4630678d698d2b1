use thiserror::Error;

/// Result type for sketch completion.
pub type SketchResult<T> = Result<T, SketchError>;

/// Errors that can occur while encoding, generating or reconstructing a sketch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SketchError {
    /// A path could not be flattened. Document flattening skips the path.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// The model broke its contract (bad distribution or out-of-range token).
    #[error("model protocol violation: {0}")]
    ModelProtocol(String),

    #[error("prefix already contains an end-of-sequence token at index {0}")]
    PrefixTerminated(usize),

    #[error("cannot append to a finished stroke sequence")]
    SequenceFinished,

    #[error("invalid stroke token: {0}")]
    InvalidToken(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

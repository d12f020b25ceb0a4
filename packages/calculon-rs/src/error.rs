use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    /// Lookup failure inside a parameter table. Kernels translate this into
    /// `MissingParameter` before it reaches a caller.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("{0}")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Output length {output} does not match input length {input}")]
    LengthMismatch { input: usize, output: usize },

    #[error("Worker for block {block} panicked")]
    WorkerPanicked { block: usize },

    #[error("Could not start worker for block {block}: {source}")]
    SpawnFailed {
        block: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to parse signal: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;

//! Error types and handling for hostpool

/// Result type alias for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors surfaced by the memory pool
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The underlying allocator could not satisfy a request, even after a sweep
    #[error("Out of memory: failed to acquire {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Element size times element count does not fit in `usize`
    #[error("Size overflow: {count} elements of {element_size} bytes")]
    SizeOverflow { element_size: usize, count: usize },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PoolError {
    /// Create an out-of-memory error
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create a size overflow error
    pub fn size_overflow(element_size: usize, count: usize) -> Self {
        Self::SizeOverflow {
            element_size,
            count,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error reports memory exhaustion
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }
}

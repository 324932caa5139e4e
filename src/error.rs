//! Error types and handling for shmring

/// Result type alias for shmring operations
pub type Result<T> = std::result::Result<T, ShmRingError>;

/// Error types for the shared ring buffer and its backing regions
#[derive(Debug, thiserror::Error)]
pub enum ShmRingError {
    /// Structurally invalid construction parameters
    #[error("invalid configuration: {parameter} - {message}")]
    InvalidConfiguration { parameter: String, message: String },

    /// A region with this name is already allocated
    #[error("buffer already exists: {name}")]
    BufferAlreadyExists { name: String },

    /// No region with this name exists
    #[error("buffer not found: {name}")]
    BufferNotFound { name: String },

    /// Push attempted on a reader-role instance
    #[error("write operations forbidden: {name} was attached as a reader")]
    WriteForbidden { name: String },

    /// Pop attempted on a writer-role instance
    #[error("read operations forbidden: {name} was created as the writer")]
    ReadForbidden { name: String },

    /// Pushed item does not fit in one slot
    #[error("value {value} does not fit in an item of {item_size} byte(s)")]
    ValueOutOfRange { value: u64, item_size: usize },

    /// I/O related errors (file operations, mmap, etc.)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Platform-specific errors (shm_open, shm_unlink, etc.)
    #[error("platform error: {message}")]
    Platform { message: String },
}

impl ShmRingError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a buffer exists error
    pub fn buffer_already_exists(name: impl Into<String>) -> Self {
        Self::BufferAlreadyExists { name: name.into() }
    }

    /// Create a buffer not found error
    pub fn buffer_not_found(name: impl Into<String>) -> Self {
        Self::BufferNotFound { name: name.into() }
    }

    /// Create a write forbidden error
    pub fn write_forbidden(name: impl Into<String>) -> Self {
        Self::WriteForbidden { name: name.into() }
    }

    /// Create a read forbidden error
    pub fn read_forbidden(name: impl Into<String>) -> Self {
        Self::ReadForbidden { name: name.into() }
    }

    /// Create a value out of range error
    pub fn value_out_of_range(value: u64, item_size: usize) -> Self {
        Self::ValueOutOfRange { value, item_size }
    }

    /// Create an I/O error from a standard I/O error
    pub fn from_io(source: std::io::Error, context: &str) -> Self {
        Self::Io {
            message: format!("{}: {}", context, source),
            source: Some(source),
        }
    }

    /// Create a platform error
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ShmRingError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io(err, "I/O operation failed")
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn allocation_failed(requested: u64, allocated: u64, limit: u64) -> Error {
        Error(
            ErrorKind::AllocationFailed {
                requested,
                allocated,
                limit,
            }
            .into(),
        )
    }

    pub fn unsupported_value_kind(
        vector: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Error {
        Error(
            ErrorKind::UnsupportedValueKind {
                vector: vector.into(),
                expected,
                actual,
            }
            .into(),
        )
    }

    pub fn out_of_bounds(name: impl Into<String>, index: usize, len: usize) -> Error {
        Error(
            ErrorKind::OutOfBounds {
                name: name.into(),
                index,
                len,
            }
            .into(),
        )
    }

    pub fn null_value(name: impl Into<String>, index: usize) -> Error {
        Error(
            ErrorKind::NullValue {
                name: name.into(),
                index,
            }
            .into(),
        )
    }

    /// Returns `true` if this error was raised because the memory provider
    /// refused an allocation.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::AllocationFailed { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error(
        "failed to allocate {requested} bytes ({allocated} of {limit} bytes already allocated)"
    )]
    AllocationFailed {
        requested: u64,
        allocated: u64,
        limit: u64,
    },

    #[error("unsupported value kind for vector '{vector}': expected {expected}, got {actual}")]
    UnsupportedValueKind {
        vector: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("index {index} out of bounds for '{name}' (length {len})")]
    OutOfBounds {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("value at index {index} of '{name}' is null")]
    NullValue { name: String, index: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(_: std::convert::Infallible) -> Self {
        Error::invalid_operation("conversion")
    }
}

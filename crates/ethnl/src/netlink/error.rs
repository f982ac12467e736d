//! Error types for ethtool netlink operations.
//!
//! Failures reported by the [`Transport`](super::transport::Transport) arrive
//! as [`TransportError`] and are translated into the caller-facing [`Error`]
//! by [`translate`]. Every [`Error`] can be classified with [`Error::kind`].

use std::io;

/// Result type for ethtool netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by a transport implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The kernel answered the request with an `NLMSG_ERROR`.
    #[error("kernel error: errno {errno}")]
    Kernel {
        /// The errno value from the kernel (positive).
        errno: i32,
        /// Extended acknowledgement message, if the kernel supplied one.
        message: Option<String>,
    },

    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Any other transport failure.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Create a kernel error from an errno value.
    ///
    /// Accepts either sign, as found in `nlmsgerr.error` or in `errno`.
    pub fn kernel(errno: i32) -> Self {
        Self::Kernel {
            errno: errno.unsigned_abs() as i32,
            message: None,
        }
    }

    /// Create a kernel error carrying an extended acknowledgement message.
    pub fn kernel_with_message(errno: i32, message: impl Into<String>) -> Self {
        Self::Kernel {
            errno: errno.unsigned_abs() as i32,
            message: Some(message.into()),
        }
    }
}

/// Caller-visible error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was rejected before any I/O took place.
    MalformedRequest,
    /// The device does not exist or does not support the operation.
    NotFound,
    /// The caller lacks the privilege to perform the operation.
    PermissionDenied,
    /// The kernel rejected the request, or its reply could not be decoded.
    Protocol,
    /// The transport failed for a reason unrelated to the kernel reply.
    Transport,
}

/// Errors that can occur during ethtool operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A targeted request named neither an interface index nor a name.
    #[error("request must have an interface index and/or name set")]
    MalformedRequest,

    /// The device does not exist (`ENODEV`) or the operation is not
    /// supported on it (`EOPNOTSUPP`).
    #[error("{operation}: device not found or not supported: {message} (errno {errno})")]
    NotFound {
        /// The operation that failed.
        operation: &'static str,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// The kernel refused the operation with `EPERM`.
    #[error("{operation}: permission denied: {message}")]
    PermissionDenied {
        /// The operation that failed.
        operation: &'static str,
        /// Human-readable error message.
        message: String,
    },

    /// Any other kernel error.
    #[error("{operation}: {message} (errno {errno})")]
    Kernel {
        /// The operation that failed.
        operation: &'static str,
        /// The errno value from the kernel.
        errno: i32,
        /// Extended acknowledgement text, or the errno description.
        message: String,
    },

    /// Attribute payload could not be decoded.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Message body could not be decoded.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Payload was shorter than its declared layout.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected length.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },

    /// Transport failure passed through unchanged.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest => ErrorKind::MalformedRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Kernel { .. }
            | Self::InvalidAttribute(_)
            | Self::InvalidMessage(_)
            | Self::Truncated { .. } => ErrorKind::Protocol,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Check if this is a "not found" error (ENODEV, EOPNOTSUPP).
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a permission error (EPERM).
    pub fn is_permission_denied(&self) -> bool {
        self.kind() == ErrorKind::PermissionDenied
    }

    /// Get the errno value if this error came from the kernel.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::NotFound { errno, .. } | Self::Kernel { errno, .. } => Some(*errno),
            Self::PermissionDenied { .. } => Some(libc::EPERM),
            _ => None,
        }
    }
}

/// Translate a transport failure into a caller-visible [`Error`].
///
/// | errno | result |
/// |---|---|
/// | `EOPNOTSUPP`, `ENODEV` | [`Error::NotFound`] |
/// | `EPERM` | [`Error::PermissionDenied`] |
/// | anything else | [`Error::Kernel`] |
///
/// Non-kernel failures are wrapped in [`Error::Transport`] untouched.
pub fn translate(operation: &'static str, err: TransportError) -> Error {
    let (errno, ext_ack) = match err {
        TransportError::Kernel { errno, message } => (errno, message),
        other => return Error::Transport(other),
    };

    let message = ext_ack.unwrap_or_else(|| io::Error::from_raw_os_error(errno).to_string());

    match errno {
        libc::EOPNOTSUPP | libc::ENODEV => Error::NotFound {
            operation,
            errno,
            message,
        },
        libc::EPERM => Error::PermissionDenied { operation, message },
        _ => Error::Kernel {
            operation,
            errno,
            message,
        },
    }
}

//! Error types for the bindery container.
//!
//! This module defines a lightweight error model used across the container to
//! describe failures during service registration and resolution.
//!
//! # Design
//!
//! - `ErrorKind` captures the error category.
//! - `Error` stores the category and a human-readable message.
//!
//! The helpers in `Error` keep call sites concise and error messages
//! consistent. Binding validity itself (the implementation type actually
//! implementing the service type) is checked by the compiler at registration,
//! so no runtime kind exists for it beyond the registry-slot downcast guard.
//!
//! # Feature Flags
//!
//! - `tracing`: logs errors when they are created.
//! - `debug`: enables extra diagnostic formatting in `Display`.
//!
//! # Examples
//!
//! ```
//! use bindery::Error;
//!
//! let err = Error::unregistered_type("MyService");
//! assert!(err.message.contains("MyService"));
//! ```

use core::fmt;

#[cfg(feature = "tracing")]
use tracing::{error, warn};

/// Error categories for the container.
///
/// The variants are intentionally coarse-grained to keep error handling
/// straightforward while still expressive enough for diagnostics.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub enum ErrorKind {
    /// No binding registered for the requested service type.
    UnregisteredType,
    /// A constructor dependency had no registered binding.
    UnresolvedDependency,
    /// Binding has neither a cached instance nor a construction recipe.
    NoConstructor,
    /// Registry slot does not hold bindings for the requested service type.
    InvalidBinding,
}

/// Container error structure.
///
/// `kind` enables programmatic handling, while `message` is human-readable.
#[derive(Clone)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// If the `tracing` feature is enabled, the error is logged on creation:
    /// lookup misses as warnings, everything else as errors.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let error = Self {
            kind,
            message: message.into(),
        };

        #[cfg(feature = "tracing")]
        {
            if matches!(error.kind, ErrorKind::UnregisteredType) {
                warn!("{}", error);
            } else {
                error!("{}", error);
            }
        }

        error
    }

    /// No binding registered for the requested service type.
    pub fn unregistered_type(type_name: &str) -> Self {
        Self::new(
            ErrorKind::UnregisteredType,
            format!("no binding registered for type: {}", type_name),
        )
    }

    /// A constructor dependency of `constructing` could not be resolved.
    ///
    /// `cause` carries the inner lookup failure, naming the missing type.
    pub fn unresolved_dependency(constructing: &str, cause: &str) -> Self {
        Self::new(
            ErrorKind::UnresolvedDependency,
            format!("cannot construct {}: {}", constructing, cause),
        )
    }

    /// Binding for `type_name` has no construction recipe to invoke.
    pub fn no_constructor(type_name: &str) -> Self {
        Self::new(
            ErrorKind::NoConstructor,
            format!("no constructor available for type: {}", type_name),
        )
    }

    /// The registry slot for `type_name` holds a foreign binding sequence.
    pub fn invalid_binding(type_name: &str) -> Self {
        Self::new(
            ErrorKind::InvalidBinding,
            format!("registered bindings do not produce type: {}", type_name),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(feature = "debug")]
        {
            write!(f, "({:?}) - {}", self.kind, self.message)
        }
        #[cfg(not(feature = "debug"))]
        {
            write!(f, "{}", self.message)
        }
    }
}

#[cfg(feature = "debug")]
impl std::error::Error for Error {}

//! Error taxonomy shared by every operation in the crate.
//!
//! Failures fall into three groups:
//! - caller mistakes caught before any OS call ([`Error::InvalidArgument`]),
//! - failures the operating system reported ([`Error::Os`]),
//! - transient failures that survived every permitted attempt
//!   ([`Error::RetriesExhausted`]).
//!
//! The OS cause is always captured at the point of failure and carried
//! in the error itself, so no call in this crate leaves meaning behind
//! in global `errno` state.

use std::io;

use thiserror::Error;

/// Specialized result type for descriptor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type reported by descriptor operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A precondition on the arguments failed.
    ///
    /// Nothing was asked of the operating system; these are never
    /// retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operating system reported a failure that is not worth
    /// retrying.
    #[error("{op} failed")]
    Os {
        /// The operation that failed.
        op: &'static str,

        /// Cause captured from the operating system.
        #[source]
        source: io::Error,
    },

    /// Every permitted attempt failed with a transient cause.
    #[error("{op} still failing after {attempts} attempts")]
    RetriesExhausted {
        /// The operation that failed.
        op: &'static str,

        /// How many attempts the policy allowed.
        attempts: u32,

        /// Cause reported by the final attempt.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns the cause captured from the operating system, if any.
    pub fn os_cause(&self) -> Option<&io::Error> {
        match self {
            Self::InvalidArgument(_) => None,
            Self::Os { source, .. } | Self::RetriesExhausted { source, .. } => Some(source),
        }
    }

    /// Returns the raw OS error code behind this failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.os_cause().and_then(io::Error::raw_os_error)
    }
}

//! The attempt bound shared by the retrying wrappers.
//!
//! Every retrying operation in the crate funnels through [`run`], so
//! the loop shape is defined once: attempts are immediate, only causes
//! the operation's classifier accepts are retried, and exhausting the
//! bound escalates the last transient cause into a fatal error.

use crate::error::{Error, Result};

use log::{debug, trace};
use std::io;

/// Total attempts an operation is given by default.
pub const MAX_ATTEMPTS: u32 = 3;

/// Bound on the retry loop wrapped around a fallible operation.
///
/// The bound counts total attempts, not retries: the default of
/// [`MAX_ATTEMPTS`] performs the initial attempt plus at most two
/// more. There is no delay between attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
}

impl RetryPolicy {
    /// Returns a policy allowing up to `attempts` total attempts.
    ///
    /// Zero is treated as one: every operation is attempted at least
    /// once.
    pub const fn new(attempts: u32) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
        }
    }

    /// Returns the number of attempts this policy permits.
    pub const fn attempts(self) -> u32 {
        self.attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS)
    }
}

/// Accepts interruption by a signal, the one cause retried for blocking
/// opens.
pub fn interrupted(cause: &io::Error) -> bool {
    cause.kind() == io::ErrorKind::Interrupted
}

/// Accepts signal interruption plus the would-block pair reported by
/// descriptors with nothing to transfer yet.
pub fn interrupted_or_would_block(cause: &io::Error) -> bool {
    matches!(
        cause.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

/// Runs `attempt` under the policy's bound.
///
/// Failures accepted by `is_transient` are retried immediately until
/// an attempt succeeds or the bound is reached; any other failure
/// aborts the loop at once as [`Error::Os`]. Exhausting the bound
/// yields [`Error::RetriesExhausted`] carrying the final cause.
///
/// `op` names the operation in errors and log records.
pub fn run<T, F>(
    policy: RetryPolicy,
    op: &'static str,
    is_transient: fn(&io::Error) -> bool,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    let mut remaining = policy.attempts();

    loop {
        match attempt() {
            Ok(value) => return Ok(value),

            Err(cause) if is_transient(&cause) => {
                remaining -= 1;

                if remaining == 0 {
                    debug!("{op}: giving up after {} attempts: {cause}", policy.attempts());

                    return Err(Error::RetriesExhausted {
                        op,
                        attempts: policy.attempts(),
                        source: cause,
                    });
                }

                trace!("{op}: retrying after transient failure: {cause}");
            }

            Err(cause) => return Err(Error::Os { op, source: cause }),
        }
    }
}

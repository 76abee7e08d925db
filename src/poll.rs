//! Readiness sets and the callback-driven wait loop.
//!
//! The loop blocks in `ppoll(2)` over a caller-owned set of monitored
//! descriptors and hands control to a caller callback once per
//! completed cycle. The OS primitive's own behavior is preserved:
//!
//! - the signal mask, when given, is installed atomically for the
//!   duration of each wait and restored afterwards;
//! - interruption by a signal discards the cycle silently instead of
//!   surfacing an error or a phantom callback invocation;
//! - readiness is reported in the set itself, in the OS's own flag
//!   vocabulary, with no translation layer on top.

use crate::error::{Error, Result};
use crate::fd::Fd;
use crate::sys;

use libc::{
    POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT, POLLPRI, c_int, c_long, c_short, nfds_t, pollfd,
    sigset_t, time_t, timespec,
};
use log::debug;
use std::io;
use std::ops::BitOr;
use std::time::Duration;

/// Readiness a descriptor is monitored for.
///
/// The values are the `poll(2)` event bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interest(c_short);

impl Interest {
    /// Readable data (`POLLIN`).
    pub const IN: Self = Self(POLLIN);

    /// Writability (`POLLOUT`).
    pub const OUT: Self = Self(POLLOUT);

    /// Priority data (`POLLPRI`).
    pub const PRI: Self = Self(POLLPRI);
}

impl BitOr for Interest {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Readiness observed for a descriptor in the most recent cycle.
///
/// Wraps the bits the kernel reported. The error conditions
/// (`POLLERR`, `POLLHUP`, `POLLNVAL`) can be observed whether or not
/// they were asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ready(c_short);

impl Ready {
    /// Data can be read without blocking (`POLLIN`).
    pub const fn is_readable(self) -> bool {
        self.0 & POLLIN != 0
    }

    /// Writing will not block (`POLLOUT`).
    pub const fn is_writable(self) -> bool {
        self.0 & POLLOUT != 0
    }

    /// Priority data is pending (`POLLPRI`).
    pub const fn is_priority(self) -> bool {
        self.0 & POLLPRI != 0
    }

    /// An error condition was reported (`POLLERR`).
    pub const fn is_error(self) -> bool {
        self.0 & POLLERR != 0
    }

    /// The peer hung up (`POLLHUP`).
    pub const fn is_hangup(self) -> bool {
        self.0 & POLLHUP != 0
    }

    /// The descriptor was not open (`POLLNVAL`).
    pub const fn is_invalid(self) -> bool {
        self.0 & POLLNVAL != 0
    }

    /// Returns `true` when no readiness was observed, as after a cycle
    /// that ended by timeout.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One monitored descriptor in a readiness set.
///
/// Transparent over the OS `pollfd`, so a `&mut [PollFd]` is handed to
/// `ppoll(2)` directly and the observed readiness is overwritten in
/// place on every cycle.
#[repr(transparent)]
pub struct PollFd(pollfd);

impl PollFd {
    /// Monitors `handle` for `interest`.
    pub fn new(handle: Fd, interest: Interest) -> Self {
        Self(pollfd {
            fd: handle.as_raw(),
            events: interest.0,
            revents: 0,
        })
    }

    /// The monitored handle.
    pub fn handle(&self) -> Fd {
        Fd::from_raw(self.0.fd)
    }

    /// The interest this entry is monitored for.
    pub fn interest(&self) -> Interest {
        Interest(self.0.events)
    }

    /// The readiness observed in the most recent cycle.
    pub fn ready(&self) -> Ready {
        Ready(self.0.revents)
    }
}

/// A set of signals, used as the mask installed atomically for each
/// wait.
#[derive(Clone, Copy)]
pub struct SigSet(sigset_t);

impl SigSet {
    /// Returns the empty set.
    pub fn empty() -> Self {
        Self(sys::sys_sigemptyset())
    }

    /// Returns the set containing every signal.
    pub fn filled() -> Self {
        Self(sys::sys_sigfillset())
    }

    /// Returns a snapshot of the calling thread's current mask.
    ///
    /// The usual starting point for waits that should wake on one
    /// specific signal: take the current mask and [`remove`](Self::remove)
    /// the wake-up signal from it.
    pub fn thread_blocked() -> Self {
        Self(sys::sys_thread_sigmask())
    }

    /// Adds `signal` to the set.
    pub fn add(&mut self, signal: c_int) -> &mut Self {
        sys::sys_sigaddset(&mut self.0, signal);
        self
    }

    /// Removes `signal` from the set.
    pub fn remove(&mut self, signal: c_int) -> &mut Self {
        sys::sys_sigdelset(&mut self.0, signal);
        self
    }

    /// Returns `true` when the set contains `signal`.
    pub fn contains(&self, signal: c_int) -> bool {
        sys::sys_sigismember(&self.0, signal)
    }

    pub(crate) fn as_raw(&self) -> &sigset_t {
        &self.0
    }
}

/// Waits for readiness on `set`, invoking `callback` after every
/// completed cycle until the callback clears the continue flag.
///
/// Each cycle blocks in `ppoll(2)` over the whole set, with `sigmask`
/// (when given) installed for the duration of the wait. A cycle ends
/// one of three ways:
///
/// - the wait was interrupted by a signal: the cycle is discarded and
///   the loop waits again, without invoking the callback;
/// - the wait failed for any other reason: the loop stops and returns
///   the failure;
/// - descriptors became ready or the timeout elapsed: the observed
///   readiness is left in `set` and the callback is invoked exactly
///   once with the set and the continue flag, which is `true` on
///   entry.
///
/// The callback stops the loop by clearing the flag, or aborts it by
/// returning an error, which is handed back verbatim. `timeout`
/// applies per cycle; `None` waits indefinitely.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `set` is empty, [`Error::Os`] when
/// the wait fails, or whatever error the callback returned.
///
/// # Examples
///
/// ```rust,ignore
/// let mut set = [PollFd::new(fd, Interest::IN)];
///
/// poll::wait(&mut set, None, None, |set, keep_going| {
///     if set[0].ready().is_readable() {
///         *keep_going = false;
///     }
///     Ok(())
/// })?;
/// ```
pub fn wait<F>(
    set: &mut [PollFd],
    timeout: Option<Duration>,
    sigmask: Option<&SigSet>,
    mut callback: F,
) -> Result<()>
where
    F: FnMut(&mut [PollFd], &mut bool) -> Result<()>,
{
    if set.is_empty() {
        return Err(Error::InvalidArgument("readiness set is empty"));
    }

    let timeout = timeout.map(timespec_from);
    let mut keep_going = true;

    while keep_going {
        let n = sys::sys_ppoll(
            set.as_mut_ptr().cast(),
            set.len() as nfds_t,
            timeout.as_ref(),
            sigmask.map(SigSet::as_raw),
        );

        if n < 0 {
            let err = io::Error::last_os_error();

            if err.kind() == io::ErrorKind::Interrupted {
                debug!("wait interrupted by a signal, waiting again");
                continue;
            }

            return Err(Error::Os {
                op: "ppoll",
                source: err,
            });
        }

        callback(set, &mut keep_going)?;
    }

    Ok(())
}

/// Converts a timeout to the `timespec` handed to the OS.
///
/// Saturates on overflow rather than wrapping into a shorter wait.
fn timespec_from(timeout: Duration) -> timespec {
    timespec {
        tv_sec: time_t::try_from(timeout.as_secs()).unwrap_or(time_t::MAX),
        tv_nsec: timeout.subsec_nanos() as c_long,
    }
}

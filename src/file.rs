//! Retrying wrappers for `open(2)`, `read(2)` and `write(2)`, and the
//! never-retried `close`.
//!
//! Each wrapper issues the raw call, captures the OS cause on failure,
//! and retries only the causes that are transient for that operation:
//! signal interruption for `open`, interruption and the would-block
//! pair for `read` and `write`, nothing for `close`. Short transfers
//! are reported through the count, never through the error channel.

use crate::error::{Error, Result};
use crate::fd::Fd;
use crate::retry::{self, RetryPolicy};
use crate::sys;

use libc::{O_CREAT, O_RDONLY, O_TRUNC, O_WRONLY, mode_t};
use std::ffi::CString;
use std::fmt;
use std::io;

/// Flags for opening an existing file read-only.
pub const READ_FLAGS: i32 = O_RDONLY;

/// Flags for creating a file for writing, truncating it if it exists.
pub const CREATE_FLAGS: i32 = O_WRONLY | O_CREAT | O_TRUNC;

/// Opens `path` into `handle` under the default retry policy.
///
/// See [`open_with`].
pub fn open(path: &str, flags: i32, mode: mode_t, handle: &mut Fd) -> Result<()> {
    open_with(RetryPolicy::default(), path, flags, mode, handle)
}

/// Opens `path` into `handle`, retrying signal interruptions up to the
/// policy bound.
///
/// The handle must currently be invalid: binding over a live
/// descriptor would leak it. `flags` and `mode` are passed to
/// `open(2)` unchanged.
///
/// On success the handle is bound to the new descriptor; on failure it
/// is left invalid.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when the handle is already bound or the
/// path contains a NUL byte. [`Error::Os`] for non-retryable OS
/// failures, [`Error::RetriesExhausted`] when every attempt was
/// interrupted.
pub fn open_with(
    policy: RetryPolicy,
    path: &str,
    flags: i32,
    mode: mode_t,
    handle: &mut Fd,
) -> Result<()> {
    if handle.is_valid() {
        return Err(Error::InvalidArgument("handle is already bound"));
    }

    let c_path =
        CString::new(path).map_err(|_| Error::InvalidArgument("path contains a NUL byte"))?;

    let fd = retry::run(policy, "open", retry::interrupted, || {
        let fd = sys::sys_open(c_path.as_ptr(), flags, mode);

        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(fd)
    })?;

    handle.bind(fd);

    Ok(())
}

/// Reads into `buffer` under the default retry policy.
///
/// See [`read_with`].
pub fn read(handle: Fd, buffer: &mut [u8]) -> Result<usize> {
    read_with(RetryPolicy::default(), handle, buffer)
}

/// Reads up to `buffer.len()` bytes from `handle`.
///
/// Signal interruptions and would-block reports are retried up to the
/// policy bound; any other failure surfaces immediately. A count
/// shorter than the buffer is success, and `Ok(0)` on a non-empty
/// buffer means end of stream. On `Err`, nothing was read.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when the handle is not bound.
/// [`Error::Os`] and [`Error::RetriesExhausted`] as for [`open_with`].
pub fn read_with(policy: RetryPolicy, handle: Fd, buffer: &mut [u8]) -> Result<usize> {
    if !handle.is_valid() {
        return Err(Error::InvalidArgument("handle is not bound"));
    }

    retry::run(policy, "read", retry::interrupted_or_would_block, || {
        let n = sys::sys_read(handle.as_raw(), buffer);

        if n < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(n as usize)
    })
}

/// Writes from `buffer` under the default retry policy.
///
/// See [`write_with`].
pub fn write(handle: Fd, buffer: &[u8]) -> Result<usize> {
    write_with(RetryPolicy::default(), handle, buffer)
}

/// Writes up to `buffer.len()` bytes to `handle`.
///
/// Retry behavior matches [`read_with`]. The returned count may be
/// short; a caller that needs the whole buffer delivered loops over
/// the remainder itself. On `Err`, nothing was written by the failing
/// call.
///
/// # Errors
///
/// As for [`read_with`].
pub fn write_with(policy: RetryPolicy, handle: Fd, buffer: &[u8]) -> Result<usize> {
    if !handle.is_valid() {
        return Err(Error::InvalidArgument("handle is not bound"));
    }

    retry::run(policy, "write", retry::interrupted_or_would_block, || {
        let n = sys::sys_write(handle.as_raw(), buffer);

        if n < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(n as usize)
    })
}

/// Formats `args` and writes the result with a single retrying
/// [`write`].
///
/// The count may be short, exactly as for `write`.
///
/// # Examples
///
/// ```rust,ignore
/// file::write_fmt(fd, format_args!("{} connected\n", peer))?;
/// ```
pub fn write_fmt(handle: Fd, args: fmt::Arguments<'_>) -> Result<usize> {
    let text = fmt::format(args);

    write(handle, text.as_bytes())
}

/// Closes the descriptor behind `handle` and invalidates the handle.
///
/// The close is issued exactly once and never retried: after an
/// ambiguous failure the kernel may already have reused the
/// descriptor, and a second close could tear down an unrelated one.
/// The handle is reset to the invalid sentinel on every path, success
/// or failure, so a stale raw value can never be reused through it.
///
/// # Errors
///
/// [`Error::Os`] with whatever the OS reported. Closing a handle that
/// was already invalid reports the `EBADF` the OS raises for the
/// sentinel.
pub fn close(handle: &mut Fd) -> Result<()> {
    let raw = handle.as_raw();
    handle.invalidate();

    let rc = sys::sys_close(raw);

    if rc < 0 {
        return Err(Error::Os {
            op: "close",
            source: io::Error::last_os_error(),
        });
    }

    Ok(())
}

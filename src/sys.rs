//! Raw `libc` shims. Every unsafe block in the crate lives here;
//! results are returned untranslated for the callers to normalize.

use libc::{
    SIG_BLOCK, c_char, c_int, close, mode_t, nfds_t, open, pollfd, ppoll, pthread_sigmask, read,
    sigaddset, sigdelset, sigemptyset, sigfillset, sigismember, sigset_t, timespec, write,
};
use std::ffi::c_uint;
use std::os::fd::RawFd;
use std::{mem, ptr};

/// Opens a file using `open(2)`.
///
/// Returns the new descriptor, or a negative value on error.
pub(crate) fn sys_open(path: *const c_char, flags: i32, mode: mode_t) -> RawFd {
    unsafe { open(path, flags, mode as c_uint) }
}

/// Reads from a file descriptor into the given buffer.
///
/// Returns the number of bytes read, or a negative value on error.
pub(crate) fn sys_read(fd: RawFd, buffer: &mut [u8]) -> isize {
    unsafe { read(fd, buffer.as_mut_ptr() as *mut _, buffer.len()) }
}

/// Writes the buffer to a file descriptor.
///
/// Returns the number of bytes written, or a negative value on error.
pub(crate) fn sys_write(fd: RawFd, buffer: &[u8]) -> isize {
    unsafe { write(fd, buffer.as_ptr() as *const _, buffer.len()) }
}

/// Closes a file descriptor.
///
/// Returns zero on success, or a negative value on error.
pub(crate) fn sys_close(fd: RawFd) -> c_int {
    unsafe { close(fd) }
}

/// Waits for readiness using `ppoll(2)`.
///
/// A null `timeout` blocks indefinitely; a null `sigmask` leaves the
/// thread signal mask untouched for the wait. Returns the number of
/// descriptors with observed readiness, zero when the timeout elapsed,
/// or a negative value on error.
pub(crate) fn sys_ppoll(
    fds: *mut pollfd,
    nfds: nfds_t,
    timeout: Option<&timespec>,
    sigmask: Option<&sigset_t>,
) -> c_int {
    let timeout = timeout.map_or(ptr::null(), |t| t as *const _);
    let sigmask = sigmask.map_or(ptr::null(), |m| m as *const _);

    unsafe { ppoll(fds, nfds, timeout, sigmask) }
}

/// Returns a signal set containing no signals.
pub(crate) fn sys_sigemptyset() -> sigset_t {
    let mut set: sigset_t = unsafe { mem::zeroed() };
    unsafe { sigemptyset(&mut set) };
    set
}

/// Returns a signal set containing every signal.
pub(crate) fn sys_sigfillset() -> sigset_t {
    let mut set: sigset_t = unsafe { mem::zeroed() };
    unsafe { sigfillset(&mut set) };
    set
}

/// Adds a signal to the set.
pub(crate) fn sys_sigaddset(set: &mut sigset_t, signal: c_int) {
    unsafe { sigaddset(set, signal) };
}

/// Removes a signal from the set.
pub(crate) fn sys_sigdelset(set: &mut sigset_t, signal: c_int) {
    unsafe { sigdelset(set, signal) };
}

/// Returns `true` when the set contains the signal.
pub(crate) fn sys_sigismember(set: &sigset_t, signal: c_int) -> bool {
    (unsafe { sigismember(set, signal) }) == 1
}

/// Returns the calling thread's current signal mask.
pub(crate) fn sys_thread_sigmask() -> sigset_t {
    let mut set: sigset_t = unsafe { mem::zeroed() };
    unsafe { pthread_sigmask(SIG_BLOCK, ptr::null(), &mut set) };
    set
}

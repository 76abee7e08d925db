use tutela::error::Error;
use tutela::fd::Fd;
use tutela::file;
use tutela::retry::{self, MAX_ATTEMPTS, RetryPolicy};

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

fn eintr() -> io::Error {
    io::Error::from_raw_os_error(libc::EINTR)
}

/// Creates a pipe with a nonblocking read end, returning
/// (read end, write end).
fn nonblocking_pipe() -> (Fd, Fd) {
    let mut fds = [0; 2];
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(rc, 0, "pipe creation failed");

    let flags = unsafe { libc::fcntl(fds[0], libc::F_GETFL) };
    assert!(flags >= 0, "F_GETFL failed");
    let rc = unsafe { libc::fcntl(fds[0], libc::F_SETFL, flags | libc::O_NONBLOCK) };
    assert_eq!(rc, 0, "F_SETFL failed");

    (Fd::from_raw(fds[0]), Fd::from_raw(fds[1]))
}

#[test]
fn test_run_succeeds_before_limit() {
    let attempts = AtomicUsize::new(0);

    let result = retry::run(RetryPolicy::new(5), "probe", retry::interrupted, || {
        let n = attempts.fetch_add(1, Ordering::SeqCst);

        if n < 2 { Err(eintr()) } else { Ok(42) }
    });

    assert!(
        matches!(result, Ok(42)),
        "run should succeed before the bound"
    );
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        3,
        "should have attempted 3 times"
    );
}

#[test]
fn test_run_gives_up_at_the_bound() {
    let attempts = AtomicUsize::new(0);

    let result = retry::run(
        RetryPolicy::default(),
        "probe",
        retry::interrupted,
        || -> io::Result<()> {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(eintr())
        },
    );

    assert_eq!(
        attempts.load(Ordering::SeqCst),
        MAX_ATTEMPTS as usize,
        "the bound counts total attempts"
    );

    match result {
        Err(Error::RetriesExhausted {
            attempts: reported, ..
        }) => {
            assert_eq!(reported, MAX_ATTEMPTS);
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[test]
fn test_run_aborts_on_fatal_cause() {
    let attempts = AtomicUsize::new(0);

    let result = retry::run(
        RetryPolicy::default(),
        "probe",
        retry::interrupted,
        || -> io::Result<()> {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::from_raw_os_error(libc::ENOENT))
        },
    );

    assert_eq!(
        attempts.load(Ordering::SeqCst),
        1,
        "a fatal cause must not be retried"
    );
    assert!(matches!(result, Err(Error::Os { .. })));
}

#[test]
fn test_zero_attempt_policy_still_tries_once() {
    let attempts = AtomicUsize::new(0);

    let result = retry::run(RetryPolicy::new(0), "probe", retry::interrupted, || {
        attempts.fetch_add(1, Ordering::SeqCst);
        Ok(7)
    });

    assert!(matches!(result, Ok(7)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_default_policy_allows_three_attempts() {
    assert_eq!(RetryPolicy::default().attempts(), MAX_ATTEMPTS);
    assert_eq!(MAX_ATTEMPTS, 3);
}

#[test]
fn test_empty_nonblocking_read_exhausts_the_bound() {
    // The writer stays open, so every attempt reports would-block
    // rather than end of stream.
    let (mut reader, mut writer) = nonblocking_pipe();

    let mut buffer = [0u8; 8];
    let err = file::read(reader, &mut buffer).expect_err("nothing to read");

    match err {
        Error::RetriesExhausted {
            op,
            attempts,
            source,
        } => {
            assert_eq!(op, "read");
            assert_eq!(attempts, MAX_ATTEMPTS, "the bound is the policy's, exactly");
            assert_eq!(source.raw_os_error(), Some(libc::EAGAIN));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }

    file::close(&mut reader).expect("close reader");
    file::close(&mut writer).expect("close writer");
}

#[test]
fn test_transient_classifiers_split_by_operation() {
    let eagain = io::Error::from_raw_os_error(libc::EAGAIN);

    assert!(retry::interrupted(&eintr()));
    assert!(
        !retry::interrupted(&eagain),
        "open does not treat would-block as transient"
    );

    assert!(retry::interrupted_or_would_block(&eintr()));
    assert!(retry::interrupted_or_would_block(&eagain));
}

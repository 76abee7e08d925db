//! # Tutela
//!
//! **Tutela** is a defensive layer around low-level POSIX I/O, built as the
//! guarded descriptor plumbing for the **Nebula** ecosystem.
//!
//! Raw descriptor calls are easy to misuse: they fail transiently, transfer
//! less than asked, and get interrupted by signals. Tutela turns the
//! everyday syscall families into operations with explicit error semantics
//! and a bounded retry policy:
//!
//! - **Validity-checked handles** ([`Fd`]) with an unambiguous invalid
//!   sentinel, bound only by `open` and always unbound by `close`
//! - **Retrying wrappers** for `open(2)`, `read(2)` and `write(2)` that
//!   retry transient causes up to a bound and surface everything else
//!   immediately, cause attached
//! - **A never-retried `close`** that invalidates the handle on every path
//! - **A signal-mask-aware wait loop** over `ppoll(2)` that drives a caller
//!   callback once per completed readiness cycle
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tutela::Fd;
//! use tutela::file::{self, CREATE_FLAGS};
//!
//! fn main() -> tutela::Result<()> {
//!     let mut fd = Fd::invalid();
//!
//!     file::open("/tmp/greeting.txt", CREATE_FLAGS, 0o644, &mut fd)?;
//!     file::write(fd, b"hello")?;
//!     file::close(&mut fd)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`fd`] — descriptor handles and the invalid sentinel
//! - [`file`] — retrying open/read/write, formatted writes, and close
//! - [`poll`] — readiness sets and the callback-driven wait loop
//! - [`retry`] — the attempt bound shared by the wrappers
//! - [`error`] — the error taxonomy
//!
//! ## Getting Started
//!
//! Add Tutela to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tutela = { git = "https://github.com/Nebula-ecosystem/Tutela", package = "tutela" }
//! ```

mod sys;

pub mod error;
pub mod fd;
pub mod file;
pub mod poll;
pub mod retry;

pub use error::{Error, Result};
pub use fd::Fd;
pub use retry::RetryPolicy;

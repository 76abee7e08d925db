//! Descriptor handles and the invalid sentinel.

use std::fmt;
use std::os::fd::RawFd;

/// Sentinel stored by handles that are not bound to a descriptor.
const INVALID: RawFd = -1;

/// A caller-owned handle to an operating-system file descriptor.
///
/// A handle is either *valid* (bound to a descriptor) or *invalid*
/// (holding the sentinel). It is a plain value: copying it never
/// duplicates the descriptor and dropping it never closes one. Only
/// [`open`](crate::file::open) binds a handle and only
/// [`close`](crate::file::close) unbinds it, so validity tracks the
/// descriptor's lifecycle exactly as the caller drove it.
///
/// # Examples
///
/// ```
/// use tutela::Fd;
///
/// let fd = Fd::invalid();
/// assert!(!fd.is_valid());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fd {
    /// Raw descriptor, or the invalid sentinel.
    raw: RawFd,
}

impl Fd {
    /// The invalid handle.
    pub const INVALID: Self = Self { raw: INVALID };

    /// Returns an invalid handle, ready to be bound by `open`.
    pub const fn invalid() -> Self {
        Self::INVALID
    }

    /// Wraps a descriptor obtained elsewhere, such as a pipe end or an
    /// inherited descriptor.
    ///
    /// The handle does not take ownership: dropping it never closes
    /// the descriptor.
    pub const fn from_raw(raw: RawFd) -> Self {
        Self { raw }
    }

    /// Returns the raw descriptor value.
    pub const fn as_raw(self) -> RawFd {
        self.raw
    }

    /// Returns `true` when the handle is bound to a descriptor.
    ///
    /// Any negative value counts as unbound.
    pub const fn is_valid(self) -> bool {
        self.raw >= 0
    }

    /// Binds the handle to a freshly opened descriptor.
    pub(crate) fn bind(&mut self, raw: RawFd) {
        self.raw = raw;
    }

    /// Resets the handle to the invalid sentinel.
    pub(crate) fn invalidate(&mut self) {
        self.raw = INVALID;
    }
}

impl Default for Fd {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Fd({})", self.raw)
        } else {
            f.write_str("Fd(invalid)")
        }
    }
}

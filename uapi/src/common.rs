// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub use errno::Errno;
use std::os::unix::io::{IntoRawFd, OwnedFd};

/// The result returned by [`gpiosysfs_uapi`] functions.
///
/// [`gpiosysfs_uapi`]: crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`gpiosysfs_uapi`] functions.
///
/// [`gpiosysfs_uapi`]: crate
#[derive(Clone, Copy, Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    /// An error returned from an underlying system call.
    #[error(transparent)]
    Os(Errno),
}

impl Error {
    /// Create an error from the current errno value.
    #[inline]
    pub fn from_errno() -> Error {
        Error::Os(errno::errno())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        // errors synthesized by std, such as a short write, have no errno.
        Error::Os(Errno(err.raw_os_error().unwrap_or(libc::EIO)))
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Os(e) => std::io::Error::from_raw_os_error(e.0),
        }
    }
}

/// Close a file descriptor, returning any error reported by the kernel.
///
/// Dropping an [`OwnedFd`] also closes it, but silently discards any error.
pub fn close(fd: OwnedFd) -> Result<()> {
    // SAFETY: the fd is owned, so it is open and nothing else will close it.
    match unsafe { libc::close(fd.into_raw_fd()) } {
        0 => Ok(()),
        _ => Err(Error::from_errno()),
    }
}

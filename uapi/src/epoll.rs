// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{Error, Result};
use bitflags::bitflags;
use std::os::unix::io::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};
use std::time::Duration;

bitflags! {
    /// The readiness conditions an epoll instance watches for.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct EpollFlags: u32 {
        /// The file is readable.
        const IN = libc::EPOLLIN as u32;

        /// The file has an exceptional condition.
        ///
        /// This is how sysfs signals a change to an attribute.
        const PRI = libc::EPOLLPRI as u32;

        /// The file has an error condition.
        const ERR = libc::EPOLLERR as u32;

        /// Report each change in readiness once, rather than while it persists.
        const ET = libc::EPOLLET as u32;
    }
}

/// Create an epoll instance.
///
/// The instance is closed on exec.
pub fn epoll_create() -> Result<OwnedFd> {
    // SAFETY: no pointers are passed.
    match unsafe { libc::epoll_create1(libc::EPOLL_CLOEXEC) } {
        -1 => Err(Error::from_errno()),
        // SAFETY: the fd was just returned by the kernel and is owned by nothing else.
        fd => Ok(unsafe { OwnedFd::from_raw_fd(fd) }),
    }
}

/// Add a file to the set watched by an epoll instance.
///
/// * `epfd` - The epoll instance returned by [`epoll_create`].
/// * `fd` - The file to watch.
/// * `flags` - The conditions to watch for.
pub fn epoll_add(epfd: BorrowedFd<'_>, fd: BorrowedFd<'_>, flags: EpollFlags) -> Result<()> {
    let mut event = libc::epoll_event {
        events: flags.bits(),
        u64: fd.as_raw_fd() as u64,
    };
    // SAFETY: event is a valid epoll_event for the duration of the call.
    match unsafe {
        libc::epoll_ctl(
            epfd.as_raw_fd(),
            libc::EPOLL_CTL_ADD,
            fd.as_raw_fd(),
            std::ptr::addr_of_mut!(event),
        )
    } {
        0 => Ok(()),
        _ => Err(Error::from_errno()),
    }
}

/// Wait for a watched file to become ready.
///
/// Returns true if a watched file became ready, or false if the timeout expired.
///
/// Only one ready file is reported per call.
///
/// * `epfd` - The epoll instance returned by [`epoll_create`].
/// * `timeout` - The maximum time to wait, or `None` to wait indefinitely.
///
/// Timeouts are rounded up to the nearest millisecond.
/// Interruption by a signal is returned as an `EINTR` error rather than
/// being retried.
pub fn epoll_wait(epfd: BorrowedFd<'_>, timeout: Option<Duration>) -> Result<bool> {
    let timeout = match timeout {
        None => -1,
        Some(d) => {
            let ms = d.as_millis() + u128::from(d.subsec_nanos() % 1_000_000 != 0);
            ms.min(libc::c_int::MAX as u128) as libc::c_int
        }
    };
    let mut events = [libc::epoll_event { events: 0, u64: 0 }; 1];
    // SAFETY: events is valid for the length passed.
    match unsafe {
        libc::epoll_wait(
            epfd.as_raw_fd(),
            events.as_mut_ptr(),
            events.len() as libc::c_int,
            timeout,
        )
    } {
        -1 => Err(Error::from_errno()),
        0 => Ok(false),
        _ => Ok(true),
    }
}

/// Check if a watched file is ready, without blocking.
///
/// As with [`epoll_wait`], an edge triggered event is consumed by the check.
#[inline]
pub fn has_event(epfd: BorrowedFd<'_>) -> Result<bool> {
    epoll_wait(epfd, Some(Duration::ZERO))
}

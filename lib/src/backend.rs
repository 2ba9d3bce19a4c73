// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Number;
use gpiosysfs_uapi::{self as uapi, EpollFlags};
use std::fmt;
use std::fs::File;
use std::os::unix::io::{BorrowedFd, OwnedFd};
use std::path::Path;

/// The kernel calls used to export GPIOs and to open a [`Pin`].
///
/// Each method corresponds to a single call, and the provided implementations
/// make that call, so the [`Sysfs`] backend is simply the trait with no
/// overrides.
///
/// Alternate backends may override individual calls, e.g. to run against a
/// simulated sysfs tree.
///
/// [`Pin`]: crate::Pin
pub trait Backend: fmt::Debug + Send + Sync {
    /// Export a GPIO via the *export* attribute in the class directory.
    fn export(&self, class: &Path, number: Number) -> uapi::Result<()> {
        uapi::export(class, number)
    }

    /// Unexport a GPIO via the *unexport* attribute in the class directory.
    fn unexport(&self, class: &Path, number: Number) -> uapi::Result<()> {
        uapi::unexport(class, number)
    }

    /// Open the directory of an exported GPIO.
    fn open_dir(&self, path: &Path) -> uapi::Result<OwnedFd> {
        uapi::open_dir(path)
    }

    /// Open the *value* attribute within the GPIO directory.
    fn open_value(&self, dir: BorrowedFd<'_>) -> uapi::Result<File> {
        uapi::open_attr(dir, "value")
    }

    /// Create the notifier used to wait for edges.
    fn create_notifier(&self) -> uapi::Result<OwnedFd> {
        uapi::epoll_create()
    }

    /// Add the *value* attribute to the set watched by the notifier.
    fn watch_value(&self, notifier: BorrowedFd<'_>, value: BorrowedFd<'_>) -> uapi::Result<()> {
        uapi::epoll_add(
            notifier,
            value,
            EpollFlags::IN | EpollFlags::PRI | EpollFlags::ET,
        )
    }
}

/// The backend that accesses the kernel sysfs interface directly.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Sysfs;

impl Backend for Sysfs {}

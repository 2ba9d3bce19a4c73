// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A thin but safe Rust layer around the Linux GPIO sysfs interface, and the
//! epoll calls used to wait for edges on it.
//!
//! The GPIO sysfs interface is deprecated in favour of the GPIO character
//! device, but remains the only interface available on many older kernels.

pub(crate) mod common;

pub use common::{close, Errno, Error, Result};

mod epoll;
pub use epoll::{epoll_add, epoll_create, epoll_wait, has_event, EpollFlags};

mod sysfs;
pub use sysfs::{
    export, gpio_path, open_attr, open_dir, read_at, unexport, write_at, write_attr, CLASS_PATH,
};

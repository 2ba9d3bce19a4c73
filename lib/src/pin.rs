// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::{Direction, EdgeDetection, Level};
use crate::node::Node;
use crate::{Error, GpioPin, Number, Result, UapiCall};
use gpiosysfs_uapi::{self as uapi, Errno};
use log::{debug, warn};
use std::fs::File;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::time::Duration;

/// An open GPIO line.
///
/// Pins are opened from an exported [`Node`] using [`Node::open`].
///
/// The pin holds open the GPIO directory, the *value* attribute, and an
/// epoll instance watching the *value* attribute for edges.
/// These are released by [`close`], or silently if the pin is dropped.
///
/// # Concurrency
///
/// Reading the value uses a buffer within the pin, and so requires exclusive
/// access.  Pins perform no locking of their own, so sharing a pin between
/// threads requires external synchronization.
///
/// # Waiting for Edges
///
/// The edges reported by [`wait_for_edge`] are selected by
/// [`set_sensitivity`], and only apply to input lines.
/// The pin also provides its epoll instance via [`AsFd`], which is readable
/// while an edge is pending, so pins may be added to an external poll set.
///
/// [`close`]: #method.close
/// [`set_sensitivity`]: #method.set_sensitivity
/// [`wait_for_edge`]: #method.wait_for_edge
#[derive(Debug)]
pub struct Pin {
    /// The node the pin was opened from.
    node: Node,

    /// The GPIO directory, used to open the other attributes.
    dir: OwnedFd,

    /// The *value* attribute.
    value: File,

    /// The epoll instance watching `value`.
    notifier: OwnedFd,

    // the only buffer read into, so reads do not allocate.
    scratch: [u8; 1],
}

impl Pin {
    /// The GPIO number of the pin.
    #[inline]
    pub fn number(&self) -> Number {
        self.node.number()
    }

    /// The node the pin was opened from.
    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Set the direction of the line.
    ///
    /// Note that switching to output drives the line low.
    pub fn set_direction(&self, direction: Direction) -> Result<()> {
        uapi::write_attr(self.dir.as_fd(), "direction", direction.attr())
            .map_err(|e| Error::Uapi(UapiCall::WriteDirection, e))
    }

    /// Set the edges reported by [`wait_for_edge`](#method.wait_for_edge).
    ///
    /// The kernel rejects edge detection on lines that cannot generate
    /// interrupts, and on output lines.
    pub fn set_sensitivity(&self, edges: EdgeDetection) -> Result<()> {
        uapi::write_attr(self.dir.as_fd(), "edge", edges.attr())
            .map_err(|e| Error::Uapi(UapiCall::WriteEdge, e))
    }

    /// Set the level of an output line.
    pub fn set_value(&self, level: Level) -> Result<()> {
        uapi::write_at(&self.value, level.attr(), 0)
            .map(|_| ())
            .map_err(|e| Error::Uapi(UapiCall::WriteValue, e))
    }

    /// Get the level of the line.
    ///
    /// # Panics
    ///
    /// If the kernel returns something other than '0' or '1'.
    pub fn value(&mut self) -> Result<Level> {
        let n = uapi::read_at(&self.value, &mut self.scratch, 0)
            .map_err(|e| Error::Uapi(UapiCall::ReadValue, e))?;
        if n == 0 {
            return Err(Error::Uapi(
                UapiCall::ReadValue,
                uapi::Error::Os(Errno(libc::ENODATA)),
            ));
        }
        Ok(Level::from_attr(self.scratch[0]))
    }

    /// Block until an edge is detected on the line.
    ///
    /// There is no timeout, so this can block forever.
    /// Each call consumes one notification from the kernel.
    ///
    /// Depending on the kernel, the first wait after opening may return
    /// immediately as the initial state of the *value* attribute is reported.
    pub fn wait_for_edge(&self) -> Result<()> {
        uapi::epoll_wait(self.notifier.as_fd(), None)
            .map(|_| ())
            .map_err(|e| Error::Uapi(UapiCall::WaitEdge, e))
    }

    /// Wait for an edge to be detected on the line, or for the timeout to expire.
    ///
    /// Returns true if an edge was detected.
    pub fn wait_for_edge_timeout(&self, timeout: Duration) -> Result<bool> {
        uapi::epoll_wait(self.notifier.as_fd(), Some(timeout))
            .map_err(|e| Error::Uapi(UapiCall::WaitEdge, e))
    }

    /// Check if an edge has been detected, without blocking.
    ///
    /// A detected edge is consumed by the check.
    pub fn has_edge(&self) -> Result<bool> {
        uapi::has_event(self.notifier.as_fd()).map_err(|e| Error::Uapi(UapiCall::WaitEdge, e))
    }

    /// Release the resources held by the pin.
    ///
    /// All resources are released, even if releasing one fails, but only the
    /// first failure is returned - in the order directory, value, then
    /// notifier.
    pub fn close(self) -> Result<()> {
        let Pin {
            node,
            dir,
            value,
            notifier,
            ..
        } = self;
        let res = [
            uapi::close(dir).map_err(|e| Error::Uapi(UapiCall::CloseDir, e)),
            uapi::close(OwnedFd::from(value)).map_err(|e| Error::Uapi(UapiCall::CloseValue, e)),
            uapi::close(notifier).map_err(|e| Error::Uapi(UapiCall::CloseNotifier, e)),
        ];
        for e in res.iter().filter_map(|r| r.as_ref().err()) {
            warn!("gpio{}: {}", node.number(), e);
        }
        debug!("closed gpio{}", node.number());
        res.into_iter().collect()
    }
}

impl AsFd for Pin {
    /// The epoll instance, which is readable when an edge is pending.
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.notifier.as_fd()
    }
}

impl AsRawFd for Pin {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.notifier.as_raw_fd()
    }
}

impl AsRef<Pin> for Pin {
    #[inline]
    fn as_ref(&self) -> &Pin {
        self
    }
}

impl GpioPin for Pin {
    type Node = Node;

    fn number(&self) -> Number {
        Pin::number(self)
    }

    fn node(&self) -> &Node {
        Pin::node(self)
    }

    fn set_direction(&self, direction: Direction) -> Result<()> {
        Pin::set_direction(self, direction)
    }

    fn set_sensitivity(&self, edges: EdgeDetection) -> Result<()> {
        Pin::set_sensitivity(self, edges)
    }

    fn set_value(&self, level: Level) -> Result<()> {
        Pin::set_value(self, level)
    }

    fn value(&mut self) -> Result<Level> {
        Pin::value(self)
    }

    fn wait_for_edge(&self) -> Result<()> {
        Pin::wait_for_edge(self)
    }

    fn close(self) -> Result<()> {
        Pin::close(self)
    }
}

/// Open a pin, acquiring its resources in order.
///
/// Each stage of the acquisition owns the resources acquired so far, with
/// fields declared most recent first, so a stage dropped on failure releases
/// them in reverse order of acquisition.
pub(crate) fn open(node: &Node) -> Result<Pin> {
    DirOpened::open(node)?
        .open_value(node)?
        .create_notifier(node)?
        .watch_value(node)
}

struct DirOpened {
    dir: OwnedFd,
}

struct ValueOpened {
    value: File,
    dir: OwnedFd,
}

struct NotifierCreated {
    notifier: OwnedFd,
    value: File,
    dir: OwnedFd,
}

impl DirOpened {
    fn open(node: &Node) -> Result<DirOpened> {
        let dir = node
            .backend()
            .open_dir(node.path())
            .map_err(|e| Error::Uapi(UapiCall::OpenDir, e))?;
        Ok(DirOpened { dir })
    }

    fn open_value(self, node: &Node) -> Result<ValueOpened> {
        let value = node
            .backend()
            .open_value(self.dir.as_fd())
            .map_err(|e| rollback(node, UapiCall::OpenValue, e))?;
        Ok(ValueOpened {
            value,
            dir: self.dir,
        })
    }
}

impl ValueOpened {
    fn create_notifier(self, node: &Node) -> Result<NotifierCreated> {
        let notifier = node
            .backend()
            .create_notifier()
            .map_err(|e| rollback(node, UapiCall::CreateNotifier, e))?;
        Ok(NotifierCreated {
            notifier,
            value: self.value,
            dir: self.dir,
        })
    }
}

impl NotifierCreated {
    fn watch_value(self, node: &Node) -> Result<Pin> {
        node.backend()
            .watch_value(self.notifier.as_fd(), self.value.as_fd())
            .map_err(|e| rollback(node, UapiCall::WatchValue, e))?;
        Ok(Pin {
            node: node.clone(),
            dir: self.dir,
            value: self.value,
            notifier: self.notifier,
            scratch: [0],
        })
    }
}

fn rollback(node: &Node, call: UapiCall, e: uapi::Error) -> Error {
    warn!(
        "gpio{}: {} failed, releasing partially opened pin: {}",
        node.number(),
        call,
        e
    );
    Error::Uapi(call, e)
}

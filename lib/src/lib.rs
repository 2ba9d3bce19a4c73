// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library for accessing GPIO lines on Linux platforms
//! using the GPIO sysfs interface.
//!
//! A GPIO is identified by its kernel GPIO [`Number`] and is represented by a
//! [`Node`], which can export the GPIO to userspace and open it as a [`Pin`].
//! The [`Pin`] provides control of the direction and value of the line, and
//! can wait for edges on the line.
//!
//! To export and read a basic input line:
//! ```no_run
//! # use gpiosysfs::Result;
//! use gpiosysfs::line::Direction;
//! use gpiosysfs::Node;
//!
//! # fn main() -> Result<()> {
//! let node = Node::new(23);
//! node.export_if_necessary()?;
//! let mut pin = node.open()?;
//! pin.set_direction(Direction::Input)?;
//! let level = pin.value()?;
//! pin.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! The sysfs interface is deprecated by the kernel in favour of the GPIO
//! character device, and bias cannot be set through it.

use gpiosysfs_uapi as uapi;
use std::fmt;

/// Wrappers for various async reactors.
#[cfg(any(feature = "async_tokio", feature = "async_io"))]
mod r#async;
#[cfg(feature = "async_io")]
pub use r#async::async_io;
#[cfg(feature = "async_tokio")]
pub use r#async::tokio;

/// The seam between the library and the kernel.
pub mod backend;
pub use backend::{Backend, Sysfs};

/// Types describing the configuration and state of a line.
pub mod line;
pub use line::Number;

/// Types and functions related to GPIO nodes.
///
/// A [`Node`] identifies a GPIO and controls its export to userspace.
pub mod node;
pub use node::Node;

/// Types and functions related to open pins.
pub mod pin;
pub use pin::Pin;

use line::{Direction, EdgeDetection, Level};

/// A GPIO that may or may not be exported to userspace.
///
/// Implemented by [`Node`].
pub trait GpioNode {
    /// The type of pin returned by [`open`](GpioNode::open).
    type Pin: GpioPin;

    /// The GPIO number of the node.
    fn number(&self) -> Number;

    /// Check if the GPIO is exported, and so may be opened.
    fn exported(&self) -> bool;

    /// Export the GPIO to userspace.
    ///
    /// It is an error to export a GPIO that is already exported.
    fn export(&self) -> Result<()>;

    /// Export the GPIO if it is not already exported.
    ///
    /// Returns true if this call exported the GPIO.
    fn export_if_necessary(&self) -> Result<bool>;

    /// Remove the GPIO from userspace.
    ///
    /// It is an error to unexport a GPIO that is not exported.
    fn unexport(&self) -> Result<()>;

    /// Open the exported GPIO for control.
    fn open(&self) -> Result<Self::Pin>;
}

/// An open GPIO line.
///
/// Implemented by [`Pin`].
pub trait GpioPin {
    /// The type of node the pin was opened from.
    type Node: GpioNode;

    /// The GPIO number of the pin.
    fn number(&self) -> Number;

    /// The node the pin was opened from.
    fn node(&self) -> &Self::Node;

    /// Set the direction of the line.
    fn set_direction(&self, direction: Direction) -> Result<()>;

    /// Set which edges are reported by [`wait_for_edge`](GpioPin::wait_for_edge).
    fn set_sensitivity(&self, edges: EdgeDetection) -> Result<()>;

    /// Set the level of an output line.
    fn set_value(&self, level: Level) -> Result<()>;

    /// Get the level of the line.
    fn value(&mut self) -> Result<Level>;

    /// Block until an edge is detected on the line.
    fn wait_for_edge(&self) -> Result<()>;

    /// Release the pin.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Errors returned by [`gpiosysfs`] functions.
///
/// [`gpiosysfs`]: crate
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    /// An error returned when there is a problem with an argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// An error returned from an underlying uAPI call.
    #[error("uAPI {0} returned: {1}")]
    Uapi(UapiCall, #[source] uapi::Error),
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Uapi(_, e) => e.into(),
            Error::InvalidArgument(msg) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, msg)
            }
        }
    }
}

/// Identifiers for the underlying uAPI calls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UapiCall {
    CloseDir,
    CloseNotifier,
    CloseValue,
    CreateNotifier,
    Export,
    OpenDir,
    OpenValue,
    ReadValue,
    Unexport,
    WaitEdge,
    WatchValue,
    WriteDirection,
    WriteEdge,
    WriteValue,
}

impl fmt::Display for UapiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UapiCall::CloseDir => "close_dir",
            UapiCall::CloseNotifier => "close_notifier",
            UapiCall::CloseValue => "close_value",
            UapiCall::CreateNotifier => "create_notifier",
            UapiCall::Export => "export",
            UapiCall::OpenDir => "open_dir",
            UapiCall::OpenValue => "open_value",
            UapiCall::ReadValue => "read_value",
            UapiCall::Unexport => "unexport",
            UapiCall::WaitEdge => "wait_edge",
            UapiCall::WatchValue => "watch_value",
            UapiCall::WriteDirection => "write_direction",
            UapiCall::WriteEdge => "write_edge",
            UapiCall::WriteValue => "write_value",
        };
        write!(f, "{}", name)
    }
}

/// The result for [`gpiosysfs`] functions.
///
/// [`gpiosysfs`]: crate
pub type Result<T> = std::result::Result<T, Error>;

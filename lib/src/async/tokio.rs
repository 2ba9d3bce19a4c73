// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::wait_error;
use crate::line::Level;
use crate::{Pin, Result};
use futures::ready;
use futures::task::{Context, Poll};
use tokio::io::unix::AsyncFd;
use tokio_stream::Stream;

/// Async wrapper around [`Pin`] for the tokio reactor.
///
/// # Example
/// ```no_run
/// # use gpiosysfs::Result;
/// use gpiosysfs::line::EdgeDetection;
/// use gpiosysfs::tokio::AsyncPin;
/// use gpiosysfs::Node;
///
/// # async fn docfn() -> Result<()> {
/// let pin = Node::new(23).open()?;
/// pin.set_sensitivity(EdgeDetection::BothEdges)?;
/// let mut apin = AsyncPin::new(pin)?;
/// apin.wait_for_edge().await?;
/// println!("now {}", apin.value()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AsyncPin(AsyncFd<Pin>);

impl AsyncPin {
    /// Create a Tokio wrapper for a Pin.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(pin: Pin) -> Result<Self> {
        Ok(AsyncPin(AsyncFd::new(pin).map_err(wait_error)?))
    }

    /// Async form of [`Pin::wait_for_edge`].
    pub async fn wait_for_edge(&self) -> Result<()> {
        loop {
            let mut guard = self.0.readable().await.map_err(wait_error)?;
            if self.0.get_ref().has_edge()? {
                return Ok(());
            }
            guard.clear_ready();
        }
    }

    /// Get the level of the line.
    ///
    /// Equivalent to [`Pin::value`], as reading the value does not block.
    pub fn value(&mut self) -> Result<Level> {
        self.0.get_mut().value()
    }

    /// Set the level of an output line.
    pub fn set_value(&self, level: Level) -> Result<()> {
        self.0.get_ref().set_value(level)
    }

    /// A stream of the line level following each detected edge.
    pub fn edges(&mut self) -> EdgeStream<'_> {
        EdgeStream { pin: self }
    }
}

impl AsRef<Pin> for AsyncPin {
    fn as_ref(&self) -> &Pin {
        self.0.get_ref()
    }
}

impl From<AsyncPin> for Pin {
    fn from(p: AsyncPin) -> Pin {
        p.0.into_inner()
    }
}

/// A stream of line levels, one per detected edge.
///
/// Created by [`AsyncPin::edges`].
pub struct EdgeStream<'a> {
    pin: &'a mut AsyncPin,
}

impl Stream for EdgeStream<'_> {
    type Item = Result<Level>;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut Context,
    ) -> Poll<Option<Self::Item>> {
        loop {
            let mut guard = ready!(self.pin.0.poll_read_ready_mut(cx)).map_err(wait_error)?;
            let pin = guard.get_inner_mut();
            if pin.has_edge()? {
                return Poll::Ready(Some(pin.value()));
            }
            guard.clear_ready();
        }
    }
}

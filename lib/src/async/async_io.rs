// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::wait_error;
use crate::line::Level;
use crate::{Pin, Result};
use async_io::Async;
use futures::task::{Context, Poll};
use futures::{ready, Stream};

/// Async wrapper around [`Pin`] for the async-io reactor.
///
/// # Example
///  ```no_run
/// # use gpiosysfs::Result;
/// use gpiosysfs::async_io::AsyncPin;
/// use gpiosysfs::line::EdgeDetection;
/// use gpiosysfs::Node;
///
/// # async fn docfn() -> Result<()> {
/// let pin = Node::new(23).open()?;
/// pin.set_sensitivity(EdgeDetection::RisingEdge)?;
/// let apin = AsyncPin::new(pin)?;
/// apin.wait_for_edge().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AsyncPin(Async<Pin>);

impl AsyncPin {
    /// Create an async-io wrapper for a Pin.
    pub fn new(pin: Pin) -> Result<Self> {
        Ok(AsyncPin(Async::new(pin).map_err(wait_error)?))
    }

    /// Async form of [`Pin::wait_for_edge`].
    pub async fn wait_for_edge(&self) -> Result<()> {
        loop {
            self.0.readable().await.map_err(wait_error)?;
            if self.0.get_ref().has_edge()? {
                return Ok(());
            }
        }
    }

    /// Set the level of an output line.
    pub fn set_value(&self, level: Level) -> Result<()> {
        self.0.get_ref().set_value(level)
    }

    /// A stream that returns an item for each detected edge.
    ///
    /// # Example
    /// ```no_run
    /// # use gpiosysfs::Result;
    /// use futures::StreamExt;
    /// use gpiosysfs::async_io::AsyncPin;
    /// use gpiosysfs::Node;
    ///
    /// # async fn docfn() -> Result<()> {
    /// let apin = AsyncPin::new(Node::new(23).open()?)?;
    /// let mut edges = apin.edges();
    /// while let Some(edge) = edges.next().await {
    ///     edge?;
    ///     println!("edge on gpio{}", apin.as_ref().number());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn edges(&self) -> EdgeStream<'_> {
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
        // the pin is only registered with the reactor, so deregistration cannot fail.
        match p.0.into_inner() {
            Ok(pin) => pin,
            Err(e) => unreachable!("Pin can be unwrapped from AsyncPin: {}", e),
        }
    }
}

/// A stream that returns an item for each detected edge.
///
/// Created by [`AsyncPin::edges`].
pub struct EdgeStream<'a> {
    pin: &'a AsyncPin,
}

impl Stream for EdgeStream<'_> {
    type Item = Result<()>;

    fn poll_next(self: std::pin::Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        loop {
            ready!(self.pin.0.poll_readable(cx)).map_err(wait_error)?;
            if self.pin.0.get_ref().has_edge()? {
                return Poll::Ready(Some(Ok(())));
            }
        }
    }
}

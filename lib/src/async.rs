// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Error, UapiCall};

/// Wrappers around the Tokio reactor.
#[cfg(feature = "async_tokio")]
pub mod tokio;

/// Wrappers around the async-io reactor.
#[cfg(feature = "async_io")]
pub mod async_io;

// errors from the reactor all relate to waiting on the notifier.
fn wait_error(e: std::io::Error) -> Error {
    Error::Uapi(UapiCall::WaitEdge, e.into())
}

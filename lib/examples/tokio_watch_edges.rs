// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Example of asynchronously watching for edges on a single line using tokio.

use anyhow::Context;
use gpiosysfs::line::{Direction, EdgeDetection};
use gpiosysfs::tokio::AsyncPin;
use gpiosysfs::Node;
use tokio_stream::StreamExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let node = Node::new(22);
    node.export_if_necessary()
        .context("Failed to export GPIO")?;
    let pin = node.open().context("Failed to open GPIO")?;
    pin.set_direction(Direction::Input)?;
    pin.set_sensitivity(EdgeDetection::BothEdges)?;

    let mut apin = AsyncPin::new(pin)?;
    let mut edges = apin.edges();
    while let Some(level) = edges.next().await {
        println!("{}={}", node.number(), level?);
    }
    Ok(())
}

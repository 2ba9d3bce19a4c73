// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Example of asynchronously watching for edges on a single line using async_io.

use anyhow::Context;
use gpiosysfs::async_io::AsyncPin;
use gpiosysfs::line::{Direction, EdgeDetection};
use gpiosysfs::Node;
use std::result::Result;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let node = Node::new(23);
    node.export_if_necessary()
        .context("Failed to export GPIO")?;
    let pin = node.open().context("Failed to open GPIO")?;
    pin.set_direction(Direction::Input)?;
    pin.set_sensitivity(EdgeDetection::BothEdges)?;

    let apin = AsyncPin::new(pin)?;
    async_io::block_on(async {
        while apin.wait_for_edge().await.is_ok() {
            println!("edge on gpio{}", node.number());
        }
    });
    Ok(())
}

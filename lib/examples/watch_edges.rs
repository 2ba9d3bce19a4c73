// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Example of watching for edges on a single line.

use anyhow::Context;
use gpiosysfs::line::{Direction, EdgeDetection};
use gpiosysfs::Node;
use std::result::Result;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let node = Node::new(23);
    node.export_if_necessary()
        .context("Failed to export GPIO")?;
    let mut pin = node.open().context("Failed to open GPIO")?;
    pin.set_direction(Direction::Input)?;
    pin.set_sensitivity(EdgeDetection::BothEdges)
        .context("Failed to set edge detection")?;

    loop {
        pin.wait_for_edge()?;
        println!("{}={}", node.number(), pin.value()?);
    }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of reading the value of a single line.

use anyhow::Context;
use gpiosysfs::line::Direction;
use gpiosysfs::Node;
use std::result::Result;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let node = Node::new(22);
    let exported = node
        .export_if_necessary()
        .context("Failed to export GPIO")?;

    let mut pin = node.open().context("Failed to open GPIO")?;
    pin.set_direction(Direction::Input)
        .context("Failed to set direction")?;
    let value = pin.value().context("Failed to read value")?;
    println!("{}={}", node.number(), value);
    pin.close()?;

    if exported {
        node.unexport()?;
    }
    Ok(())
}

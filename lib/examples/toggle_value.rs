// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of toggling a single line.

use anyhow::Context;
use gpiosysfs::line::{Direction, Level};
use gpiosysfs::Node;
use std::result::Result;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let number = 22;
    let mut value = Level::High;

    let node = Node::new(number);
    node.export_if_necessary()
        .context("Failed to export GPIO")?;
    let pin = node.open().context("Failed to open GPIO")?;
    pin.set_direction(Direction::Output)
        .context("Failed to set direction")?;

    loop {
        pin.set_value(value).context("Failed to set value")?;
        println!("{}={}", number, value);
        thread::sleep(Duration::from_millis(500));
        value = value.not();
    }
}

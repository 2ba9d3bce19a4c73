// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gpiosysfs::line::EdgeDetection;
use gpiosysfs::{Node, Number, Pin};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
}

/// Parse a period given in microseconds, milliseconds or seconds.
///
/// A bare number is taken as milliseconds.
pub fn parse_duration(s: &str) -> Result<Duration, ParseDurationError> {
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if split == 0 {
        return Err(ParseDurationError::NoDigits(s.into()));
    }
    let (digits, units) = s.split_at(split);
    let count: u64 = digits
        .parse()
        .map_err(|e| ParseDurationError::ParseDigits(digits.into(), e))?;
    match units {
        "" | "ms" => Ok(Duration::from_millis(count)),
        "us" => Ok(Duration::from_micros(count)),
        "s" => Ok(Duration::from_secs(count)),
        _ => Err(ParseDurationError::Units(s.into())),
    }
}

#[derive(Clone, Debug, Default, Parser)]
/// Options selecting the sysfs GPIO class.
pub struct SysfsOpts {
    #[arg(from_global)]
    pub sysfs: PathBuf,
}

impl SysfsOpts {
    pub fn node(&self, number: Number) -> Node {
        Node::builder(number).under(&self.sysfs).build()
    }

    /// Export the GPIO if necessary and open it.
    ///
    /// The returned [`Claim`] should be released once the pin is no longer
    /// required.
    pub fn open(&self, number: Number) -> anyhow::Result<Claim> {
        let node = self.node(number);
        let exported = node
            .export_if_necessary()
            .with_context(|| format!("failed to export GPIO {number}"))?;
        match node.open() {
            Ok(pin) => Ok(Claim { pin, exported }),
            Err(e) => {
                if exported {
                    _ = node.unexport();
                }
                Err(e).with_context(|| format!("failed to open GPIO {number}"))
            }
        }
    }
}

/// A pin opened by a command, and whether the command exported it.
#[derive(Debug)]
pub struct Claim {
    pub pin: Pin,
    pub exported: bool,
}

impl Claim {
    /// Close the pin, and unexport the GPIO if it was exported by the command.
    ///
    /// GPIOs that were already exported are left exported.
    pub fn release(self) -> anyhow::Result<()> {
        let node = self.pin.node().clone();
        let number = node.number();
        self.pin
            .close()
            .with_context(|| format!("failed to close GPIO {number}"))?;
        if self.exported {
            node.unexport()
                .with_context(|| format!("failed to unexport GPIO {number}"))?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct EmitOpts {
    #[arg(from_global)]
    pub verbose: bool,

    /// Emit output in JSON format
    #[cfg(feature = "json")]
    #[arg(long, group = "emit")]
    pub json: bool,
}

impl EmitOpts {
    /// The error as text, including its causes when verbose.
    pub fn error_text(&self, e: &anyhow::Error) -> String {
        if self.verbose {
            format!("{e:#}")
        } else {
            e.to_string()
        }
    }

    /// Report an error that does not end the command.
    pub fn emit_error(&self, e: &anyhow::Error) {
        let text = self.error_text(e);
        #[cfg(feature = "json")]
        if self.json {
            println!("{}", error_json(&text));
            return;
        }
        eprintln!("{text}");
    }
}

#[cfg(feature = "json")]
fn error_json(text: &str) -> serde_json::Value {
    serde_json::json!({ "error": text })
}

#[derive(Clone, Copy, Debug, Default, Parser)]
/// Options to configure edge detection.
pub struct EdgeOpts {
    /// The edges to wait for
    #[arg(short = 'e', long = "edge", value_name = "edges", default_value = "both")]
    edges: EdgeFlags,
}

impl EdgeOpts {
    pub fn edges(self) -> EdgeDetection {
        self.edges.into()
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum EdgeFlags {
    Rising,
    Falling,
    #[default]
    Both,
}

impl From<EdgeFlags> for EdgeDetection {
    fn from(b: EdgeFlags) -> Self {
        match b {
            EdgeFlags::Rising => EdgeDetection::RisingEdge,
            EdgeFlags::Falling => EdgeDetection::FallingEdge,
            EdgeFlags::Both => EdgeDetection::BothEdges,
        }
    }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, EmitOpts};
use anyhow::Context;
use clap::Parser;
use gpiosysfs::line::{Direction, Level};
use gpiosysfs::Number;
#[cfg(feature = "serde")]
use serde_derive::Serialize;
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(alias("g"))]
pub struct Opts {
    /// The GPIOs to get, identified by kernel GPIO number
    ///
    /// GPIOs that are not already exported are exported, and are unexported
    /// again on exit.
    #[arg(value_name = "gpio", required = true)]
    gpios: Vec<Number>,

    /// Read the line as-is rather than as an input
    ///
    /// If not specified then the lines are explicitly switched to being input lines.
    ///
    /// If specified then the line direction is left as-is, making it
    /// possible to read back the values of output lines.
    #[arg(short, long)]
    as_is: bool,

    /// Wait between opening the lines and reading the values
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short = 'p', long, value_name = "period", value_parser = common::parse_duration)]
    hold_period: Option<Duration>,

    /// Display line values as '0' (low) or '1' (high)
    #[arg(long, group = "emit")]
    pub numeric: bool,

    #[command(flatten)]
    sysfs_opts: common::SysfsOpts,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> bool {
    let res = do_cmd(opts);
    res.emit(opts);
    res.errors.is_empty()
}

fn do_cmd(opts: &Opts) -> CmdResult {
    let mut res = CmdResult::default();
    let mut claims = Vec::new();
    for &number in &opts.gpios {
        match opts.sysfs_opts.open(number) {
            Ok(claim) => {
                if !opts.as_is {
                    if let Err(e) = claim
                        .pin
                        .set_direction(Direction::Input)
                        .with_context(|| format!("failed to set GPIO {number} as input"))
                    {
                        res.push_error(&opts.emit, &e);
                        release(claim);
                        continue;
                    }
                }
                claims.push(claim);
            }
            Err(e) => res.push_error(&opts.emit, &e),
        }
    }
    if let Some(period) = opts.hold_period {
        thread::sleep(period);
    }
    for mut claim in claims {
        let number = claim.pin.number();
        match claim
            .pin
            .value()
            .with_context(|| format!("failed to read GPIO {number}"))
        {
            Ok(value) => res.values.push(LineValue { number, value }),
            Err(e) => res.push_error(&opts.emit, &e),
        }
        release(claim);
    }
    res
}

fn release(claim: common::Claim) {
    if let Err(e) = claim.release() {
        log::warn!("{e:#}");
    }
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct CmdResult {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    values: Vec<LineValue>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    errors: Vec<String>,
}

impl CmdResult {
    fn emit(&self, opts: &Opts) {
        #[cfg(feature = "json")]
        if opts.emit.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("{e}"),
            }
            return;
        }
        self.print(opts);
    }

    fn push_error(&mut self, opts: &EmitOpts, e: &anyhow::Error) {
        self.errors.push(opts.error_text(e))
    }

    fn print(&self, opts: &Opts) {
        let print_values: Vec<String> = self
            .values
            .iter()
            .map(|lv| {
                if opts.numeric {
                    let v: u8 = lv.value.into();
                    format!("{v}")
                } else {
                    format!("{}={}", lv.number, lv.value)
                }
            })
            .collect();
        if !print_values.is_empty() {
            println!("{}", print_values.join(" "));
        }
        for e in &self.errors {
            eprintln!("{e}");
        }
    }
}

struct LineValue {
    number: Number,
    value: Level,
}

#[cfg(feature = "serde")]
impl serde::Serialize for LineValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut s = serializer.serialize_map(Some(1))?;
        s.serialize_entry(&self.number, &self.value)?;
        s.end()
    }
}

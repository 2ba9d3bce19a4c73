// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, Claim, EmitOpts};
use anyhow::{Context, Result};
use clap::Parser;
use gpiosysfs::line::{Direction, Level};
use gpiosysfs::Number;
use std::error::Error;
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(alias("s"))]
pub struct Opts {
    /// The line values.
    ///
    /// The values are specified in gpio=value format, where gpio is the
    /// kernel GPIO number.
    ///
    /// Values may be low/off/false/0 or high/on/true/1.
    /// e.g.
    ///     17=on 22=low
    #[arg(value_name = "gpio=value", required = true, value_parser = parse_line_value, verbatim_doc_comment)]
    line_values: Vec<(Number, Level)>,

    /// The minimum time period to hold lines at the requested values.
    ///
    /// GPIOs exported by the command are unexported on exit, which may
    /// release the line, so export them beforehand to retain the values.
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short = 'p', long, value_name = "period", value_parser = common::parse_duration)]
    hold_period: Option<Duration>,

    #[command(flatten)]
    sysfs_opts: common::SysfsOpts,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> bool {
    let mut ok = true;
    let mut claims = Vec::new();
    for &(number, level) in &opts.line_values {
        match opts.sysfs_opts.open(number) {
            Ok(claim) => {
                let res = set_line(&claim, level);
                claims.push(claim);
                if let Err(e) = res {
                    opts.emit.emit_error(&e);
                    ok = false;
                }
            }
            Err(e) => {
                opts.emit.emit_error(&e);
                ok = false;
            }
        }
    }
    if let Some(period) = opts.hold_period {
        thread::sleep(period);
    }
    for claim in claims {
        if let Err(e) = claim.release() {
            log::warn!("{e:#}");
        }
    }
    ok
}

fn set_line(claim: &Claim, level: Level) -> Result<()> {
    let number = claim.pin.number();
    claim
        .pin
        .set_direction(Direction::Output)
        .with_context(|| format!("failed to set GPIO {number} as output"))?;
    claim
        .pin
        .set_value(level)
        .with_context(|| format!("failed to set GPIO {number} {level}"))
}

/// Parse a single gpio=value pair
fn parse_line_value(
    s: &str,
) -> std::result::Result<(Number, Level), Box<dyn Error + Send + Sync + 'static>> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid gpio=value: no '=' found in '{}'", s))?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}

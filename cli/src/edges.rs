// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, Claim, EmitOpts};
use anyhow::{anyhow, Context};
use clap::Parser;
use gpiosysfs::line::{Direction, Level};
use gpiosysfs::{Error, Number};
#[cfg(feature = "serde")]
use serde_derive::Serialize;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(aliases(["e", "mon"]))]
pub struct Opts {
    /// The GPIO to monitor, identified by kernel GPIO number
    ///
    /// The GPIO is exported if it is not already exported, and is unexported
    /// again on exit.
    #[arg(value_name = "gpio")]
    gpio: Number,

    /// Display a banner on successful startup
    #[arg(long)]
    banner: bool,

    #[command(flatten)]
    edge_opts: common::EdgeOpts,

    /// Exit if no edges are detected for the specified period.
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(long, value_name = "period", value_parser = common::parse_duration)]
    idle_timeout: Option<Duration>,

    /// Exit after the specified number of edges
    ///
    /// If not specified then monitoring will continue indefinitely.
    #[arg(short, long, value_name = "num")]
    num_events: Option<u32>,

    /// Don't generate any output
    #[arg(short = 'q', long, group = "emit", alias = "silent")]
    quiet: bool,

    #[command(flatten)]
    sysfs_opts: common::SysfsOpts,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> bool {
    let res = do_cmd(opts);
    res.emit();
    res.errors.is_empty()
}

fn do_cmd(opts: &Opts) -> CmdResults {
    let mut res = CmdResults {
        opts: opts.emit,
        ..Default::default()
    };
    let mut claim = match open_pin(opts) {
        Ok(claim) => claim,
        Err(e) => {
            res.push_error(&e);
            return res;
        }
    };
    let pin = &mut claim.pin;
    // discard any notification of the initial state.
    _ = pin.has_edge();
    emit_banner(opts);

    let mut count = 0;
    loop {
        let detected = match opts.idle_timeout {
            Some(period) => pin.wait_for_edge_timeout(period),
            None => pin.wait_for_edge().map(|_| true),
        };
        match detected {
            Ok(false) => break,
            Ok(true) => match pin.value() {
                Ok(level) => {
                    emit_edge(opts, level);
                    if let Some(limit) = opts.num_events {
                        count += 1;
                        if count >= limit {
                            break;
                        }
                    }
                }
                Err(e) => opts
                    .emit
                    .emit_error(&anyhow!(e).context(format!("failed to read GPIO {}", opts.gpio))),
            },
            Err(e) if is_interrupted(&e) => {}
            Err(e) => {
                res.push_error(&anyhow!(e).context(format!("failed to wait on GPIO {}", opts.gpio)));
                break;
            }
        }
    }
    if let Err(e) = claim.release() {
        log::warn!("{e:#}");
    }
    res
}

fn open_pin(opts: &Opts) -> anyhow::Result<Claim> {
    let number = opts.gpio;
    let claim = opts.sysfs_opts.open(number)?;
    let res = claim
        .pin
        .set_direction(Direction::Input)
        .with_context(|| format!("failed to set GPIO {number} as input"))
        .and_then(|_| {
            claim
                .pin
                .set_sensitivity(opts.edge_opts.edges())
                .with_context(|| format!("failed to set edge detection on GPIO {number}"))
        });
    match res {
        Ok(()) => Ok(claim),
        Err(e) => {
            if let Err(re) = claim.release() {
                log::warn!("{re:#}");
            }
            Err(e)
        }
    }
}

fn is_interrupted(e: &Error) -> bool {
    std::io::Error::from(e.clone()).kind() == std::io::ErrorKind::Interrupted
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct CmdResults {
    #[cfg_attr(feature = "serde", serde(skip))]
    opts: EmitOpts,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    errors: Vec<String>,
}

impl CmdResults {
    fn emit(&self) {
        #[cfg(feature = "json")]
        if self.opts.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("{e}"),
            }
            return;
        }
        for e in &self.errors {
            eprintln!("{e}");
        }
    }

    fn push_error(&mut self, e: &anyhow::Error) {
        self.errors.push(self.opts.error_text(e))
    }
}

fn emit_banner(opts: &Opts) {
    if !opts.banner || opts.quiet {
        return;
    }
    println!("Monitoring GPIO {}...", opts.gpio);
    _ = std::io::stdout().flush();
}

fn emit_edge(opts: &Opts, level: Level) {
    if opts.quiet {
        return;
    }
    #[cfg(feature = "json")]
    if opts.emit.json {
        println!("{}", edge_json(opts.gpio, level));
        _ = std::io::stdout().flush();
        return;
    }
    println!("{}={}", opts.gpio, level);
    _ = std::io::stdout().flush();
}

#[cfg(feature = "json")]
fn edge_json(gpio: Number, level: Level) -> serde_json::Value {
    serde_json::json!({ "gpio": gpio, "level": level.to_string() })
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, EmitOpts};
use anyhow::Context;
use clap::Parser;
use gpiosysfs::Number;

#[derive(Debug, Parser)]
#[command(alias("x"))]
pub struct Opts {
    /// The GPIOs to export, identified by kernel GPIO number
    #[arg(value_name = "gpio", required = true)]
    gpios: Vec<Number>,

    /// Only export GPIOs that are not already exported
    ///
    /// If not specified then exporting a GPIO that is already exported is an
    /// error, as it may be in use by another process.
    #[arg(short = 'n', long)]
    if_necessary: bool,

    #[command(flatten)]
    sysfs_opts: common::SysfsOpts,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> bool {
    let mut ok = true;
    for &number in &opts.gpios {
        let node = opts.sysfs_opts.node(number);
        let res = if opts.if_necessary {
            node.export_if_necessary().map(|_| ())
        } else {
            node.export()
        };
        if let Err(e) = res.with_context(|| format!("failed to export GPIO {number}")) {
            opts.emit.emit_error(&e);
            ok = false;
        }
    }
    ok
}

#[derive(Debug, Parser)]
#[command(alias("u"))]
pub struct UnexportOpts {
    /// The GPIOs to unexport, identified by kernel GPIO number
    #[arg(value_name = "gpio", required = true)]
    gpios: Vec<Number>,

    #[command(flatten)]
    sysfs_opts: common::SysfsOpts,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn unexport_cmd(opts: &UnexportOpts) -> bool {
    let mut ok = true;
    for &number in &opts.gpios {
        if let Err(e) = opts
            .sysfs_opts
            .node(number)
            .unexport()
            .with_context(|| format!("failed to unexport GPIO {number}"))
        {
            opts.emit.emit_error(&e);
            ok = false;
        }
    }
    ok
}

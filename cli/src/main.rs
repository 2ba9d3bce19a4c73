// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for accessing GPIO lines via sysfs.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod common;
mod edges;
mod export;
mod get;
mod set;

fn main() -> ExitCode {
    match Opts::try_parse() {
        Ok(opt) => {
            let filter = if opt.verbose { "debug" } else { "warn" };
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
                .init();
            log::debug!("using GPIO class {}", opt.sysfs.display());

            let res = match opt.cmd {
                Command::Edges(cfg) => edges::cmd(&cfg),
                Command::Export(cfg) => export::cmd(&cfg),
                Command::Get(cfg) => get::cmd(&cfg),
                Command::Set(cfg) => set::cmd(&cfg),
                Command::Unexport(cfg) => export::unexport_cmd(&cfg),
            };
            return if res {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
        Err(e) => eprintln!("{e}"),
    }
    ExitCode::FAILURE
}

#[derive(Parser)]
#[command(
    name = "gpiosysfs",
    about = "A utility to control GPIO lines on Linux using the GPIO sysfs interface.",
    version,
    propagate_version = true
)]
struct Opts {
    /// Provide more detailed error messages, and enable debug logging.
    #[arg(short = 'v', long, global = true, display_order = 800)]
    pub verbose: bool,

    /// The GPIO class directory in sysfs.
    #[arg(
        long,
        global = true,
        value_name = "dir",
        env = "GPIOSYSFS_CLASS",
        default_value = "/sys/class/gpio",
        display_order = 801
    )]
    pub sysfs: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Wait for edges on a GPIO line.
    Edges(edges::Opts),

    /// Export GPIO lines to userspace.
    Export(export::Opts),

    /// Read the levels of GPIO lines.
    Get(get::Opts),

    /// Set the levels of GPIO lines.
    Set(set::Opts),

    /// Remove GPIO lines from userspace.
    Unexport(export::UnexportOpts),
}

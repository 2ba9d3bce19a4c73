// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Not every test binary uses every helper.
#![allow(dead_code)]

use gpiosysfs::{Backend, Node, Number};
use gpiosysfs_uapi::{self as uapi, Errno};
use std::fs;
use std::os::unix::io::BorrowedFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A simulated GPIO class directory, removed when dropped.
pub struct Sim {
    class: PathBuf,
}

impl Sim {
    pub fn new() -> Sim {
        global_counter!(SIM_COUNT, u32, 0);

        let class = std::env::temp_dir().join(format!(
            "gpiosysfs-eh-p{}-{}",
            std::process::id(),
            SIM_COUNT.inc_cloning()
        ));
        fs::create_dir_all(&class).unwrap();
        fs::write(class.join("export"), "").unwrap();
        fs::write(class.join("unexport"), "").unwrap();
        Sim { class }
    }

    pub fn node(&self, number: Number) -> Node {
        Node::builder(number)
            .under(&self.class)
            .with_backend(Arc::new(SimBackend))
            .build()
    }

    pub fn get_level(&self, number: Number) -> String {
        self.read_attr(number, "value")
    }

    pub fn set_level(&self, number: Number, level: &str) {
        fs::write(uapi::gpio_path(&self.class, number).join("value"), level).unwrap();
    }

    pub fn read_attr(&self, number: Number, name: &str) -> String {
        fs::read_to_string(uapi::gpio_path(&self.class, number).join(name)).unwrap()
    }
}

impl Drop for Sim {
    fn drop(&mut self) {
        _ = fs::remove_dir_all(&self.class);
    }
}

/// Simulates export, and skips watching the *value* attribute, as regular
/// files cannot be watched by epoll.
#[derive(Debug)]
struct SimBackend;

impl Backend for SimBackend {
    fn export(&self, class: &Path, number: Number) -> uapi::Result<()> {
        let path = uapi::gpio_path(class, number);
        if path.exists() {
            return Err(uapi::Error::Os(Errno(libc::EBUSY)));
        }
        uapi::export(class, number)?;
        fs::create_dir(&path)?;
        fs::write(path.join("direction"), "in\n")?;
        fs::write(path.join("edge"), "none\n")?;
        fs::write(path.join("value"), "0\n")?;
        Ok(())
    }

    fn watch_value(&self, _notifier: BorrowedFd<'_>, _value: BorrowedFd<'_>) -> uapi::Result<()> {
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Not every test binary uses every helper.
#![allow(dead_code)]

use gpiosysfs::{Backend, Node, Number};
use gpiosysfs_uapi::{self as uapi, EpollFlags, Errno};
use std::ffi::CString;
use std::fs;
use std::fs::File;
use std::os::unix::ffi::OsStringExt;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// max time to allow a ring to propagate to a waiting pin
const PROPAGATION_DELAY: Duration = Duration::from_millis(10);

pub fn wait_propagation_delay() {
    std::thread::sleep(PROPAGATION_DELAY);
}

/// The steps taken opening a pin that can be made to fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
    OpenDir,
    OpenValue,
    CreateNotifier,
    WatchValue,
}

/// The error returned by a failed step.
pub const INJECTED: uapi::Error = uapi::Error::Os(Errno(libc::EMFILE));

/// A simulated GPIO class directory.
///
/// The directory is created in the temp dir with a unique name, and is removed
/// when the sim is dropped.
#[derive(Debug)]
pub struct Sim {
    class: PathBuf,
    backend: Arc<TestBackend>,
}

impl Sim {
    pub fn new() -> Sim {
        global_counter!(SIM_COUNT, u32, 0);

        let class = std::env::temp_dir().join(format!(
            "gpiosysfs-p{}-{}",
            std::process::id(),
            SIM_COUNT.inc_cloning()
        ));
        fs::create_dir_all(&class).unwrap();
        fs::write(class.join("export"), "").unwrap();
        fs::write(class.join("unexport"), "").unwrap();
        Sim {
            class,
            backend: Arc::new(TestBackend::new()),
        }
    }

    pub fn class(&self) -> &Path {
        &self.class
    }

    pub fn backend(&self) -> Arc<TestBackend> {
        self.backend.clone()
    }

    /// A node on the sim for the given GPIO.
    pub fn node(&self, number: Number) -> Node {
        Node::builder(number)
            .under(&self.class)
            .with_backend(self.backend.clone())
            .build()
    }

    /// Export a GPIO without going through a node, as another process might.
    pub fn add_line(&self, number: Number) {
        create_line(&uapi::gpio_path(&self.class, number)).unwrap();
    }

    /// Export a GPIO with a FIFO as its *value* attribute.
    ///
    /// Unlike a regular file, a FIFO can be watched by epoll, so pins opened
    /// through the default backend see an edge when the FIFO is written.
    pub fn add_fifo_line(&self, number: Number) {
        let path = uapi::gpio_path(&self.class, number);
        fs::create_dir(&path).unwrap();
        fs::write(path.join("direction"), "in\n").unwrap();
        fs::write(path.join("edge"), "none\n").unwrap();
        let value = CString::new(path.join("value").into_os_string().into_vec()).unwrap();
        // SAFETY: value is a valid nul terminated path.
        assert_eq!(unsafe { libc::mkfifo(value.as_ptr(), 0o600) }, 0);
    }

    /// A node on the sim that uses the default backend.
    pub fn sysfs_node(&self, number: Number) -> Node {
        Node::builder(number).under(&self.class).build()
    }

    pub fn read_attr(&self, number: Number, name: &str) -> String {
        fs::read_to_string(uapi::gpio_path(&self.class, number).join(name)).unwrap()
    }

    pub fn write_attr(&self, number: Number, name: &str, value: &str) {
        fs::write(uapi::gpio_path(&self.class, number).join(name), value).unwrap();
    }

    /// The last GPIO number written to the named class attribute.
    pub fn last_written(&self, name: &str) -> String {
        fs::read_to_string(self.class.join(name)).unwrap()
    }
}

impl Drop for Sim {
    fn drop(&mut self) {
        _ = fs::remove_dir_all(&self.class);
    }
}

fn create_line(path: &Path) -> std::io::Result<()> {
    fs::create_dir(path)?;
    fs::write(path.join("direction"), "in\n")?;
    fs::write(path.join("edge"), "none\n")?;
    fs::write(path.join("value"), "0\n")?;
    Ok(())
}

/// A backend that simulates the kernel side of the class directory.
///
/// Regular files cannot be watched by epoll, so the notifier watches a
/// doorbell pipe instead of the *value* attribute, and edges are simulated
/// by ringing the doorbell.
#[derive(Debug)]
pub struct TestBackend {
    fail: Mutex<Option<Step>>,
    exports: AtomicUsize,
    acquired: Mutex<Vec<RawFd>>,
    bell_rx: OwnedFd,
    bell_tx: OwnedFd,
}

impl TestBackend {
    fn new() -> TestBackend {
        let mut fds = [0; 2];
        // SAFETY: fds is large enough for the pair.
        assert_eq!(
            unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC | libc::O_NONBLOCK) },
            0
        );
        // SAFETY: both fds were just created and are owned here.
        let (bell_rx, bell_tx) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
        TestBackend {
            fail: Mutex::new(None),
            exports: AtomicUsize::new(0),
            acquired: Mutex::new(Vec::new()),
            bell_rx,
            bell_tx,
        }
    }

    /// Make the given step fail, or no step if None.
    pub fn fail_at(&self, step: Option<Step>) {
        *self.fail.lock().unwrap() = step;
    }

    /// The number of exports performed through the backend.
    pub fn exports(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }

    /// Take the fds acquired by open steps since the last call.
    pub fn take_acquired(&self) -> Vec<RawFd> {
        std::mem::take(&mut *self.acquired.lock().unwrap())
    }

    /// Signal an edge to all watching pins.
    pub fn ring(&self) {
        self.drain();
        // SAFETY: the buffer is valid for the length passed.
        assert_eq!(
            unsafe { libc::write(self.bell_tx.as_raw_fd(), b"x".as_ptr().cast(), 1) },
            1
        );
    }

    /// Discard any rings not yet drained.
    pub fn drain(&self) {
        let mut buf = [0_u8; 16];
        // SAFETY: the buffer is valid for the length passed.
        while unsafe { libc::read(self.bell_rx.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len()) }
            > 0
        {}
    }

    fn check(&self, step: Step) -> uapi::Result<()> {
        if *self.fail.lock().unwrap() == Some(step) {
            return Err(INJECTED);
        }
        Ok(())
    }

    fn record(&self, fd: RawFd) {
        self.acquired.lock().unwrap().push(fd);
    }
}

impl Backend for TestBackend {
    fn export(&self, class: &Path, number: Number) -> uapi::Result<()> {
        let path = uapi::gpio_path(class, number);
        if path.exists() {
            return Err(uapi::Error::Os(Errno(libc::EBUSY)));
        }
        uapi::export(class, number)?;
        create_line(&path)?;
        self.exports.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn unexport(&self, class: &Path, number: Number) -> uapi::Result<()> {
        let path = uapi::gpio_path(class, number);
        if !path.exists() {
            return Err(uapi::Error::Os(Errno(libc::EINVAL)));
        }
        uapi::unexport(class, number)?;
        fs::remove_dir_all(path)?;
        Ok(())
    }

    fn open_dir(&self, path: &Path) -> uapi::Result<OwnedFd> {
        self.check(Step::OpenDir)?;
        let fd = uapi::open_dir(path)?;
        self.record(fd.as_raw_fd());
        Ok(fd)
    }

    fn open_value(&self, dir: BorrowedFd<'_>) -> uapi::Result<File> {
        self.check(Step::OpenValue)?;
        let f = uapi::open_attr(dir, "value")?;
        self.record(f.as_raw_fd());
        Ok(f)
    }

    fn create_notifier(&self) -> uapi::Result<OwnedFd> {
        self.check(Step::CreateNotifier)?;
        let fd = uapi::epoll_create()?;
        self.record(fd.as_raw_fd());
        Ok(fd)
    }

    fn watch_value(&self, notifier: BorrowedFd<'_>, _value: BorrowedFd<'_>) -> uapi::Result<()> {
        self.check(Step::WatchValue)?;
        uapi::epoll_add(
            notifier,
            self.bell_rx.as_fd(),
            EpollFlags::IN | EpollFlags::PRI | EpollFlags::ET,
        )
    }
}

/// Check if an fd is currently open.
pub fn is_open(fd: RawFd) -> bool {
    // SAFETY: F_GETFD takes no pointers and is harmless on closed fds.
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{Error, Result};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::{FileExt, OpenOptionsExt};
use std::os::unix::io::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd};
use std::path::{Path, PathBuf};

/// The path of the GPIO class directory in sysfs.
pub const CLASS_PATH: &str = "/sys/class/gpio";

/// The path of the directory for a GPIO within the class directory.
///
/// The directory only exists while the GPIO is exported.
///
/// * `class` - The GPIO class directory, typically [`CLASS_PATH`].
/// * `number` - The kernel GPIO number.
pub fn gpio_path(class: &Path, number: u32) -> PathBuf {
    class.join(format!("gpio{}", number))
}

/// Request the kernel export a GPIO to userspace.
///
/// It is an error to export a GPIO that is already exported or that does
/// not exist.
pub fn export(class: &Path, number: u32) -> Result<()> {
    write_class_attr(class, "export", number)
}

/// Request the kernel remove a GPIO from userspace.
///
/// It is an error to unexport a GPIO that is not exported.
pub fn unexport(class: &Path, number: u32) -> Result<()> {
    write_class_attr(class, "unexport", number)
}

fn write_class_attr(class: &Path, name: &str, number: u32) -> Result<()> {
    // the kernel parses the whole write, so it must be done in one call.
    let mut f = OpenOptions::new()
        .write(true)
        .truncate(true)
        .custom_flags(libc::O_CLOEXEC)
        .open(class.join(name))?;
    f.write_all(number.to_string().as_bytes())?;
    Ok(())
}

/// Open a GPIO directory to serve as the base for opening its attributes.
pub fn open_dir(path: &Path) -> Result<OwnedFd> {
    let f = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_DIRECTORY | libc::O_CLOEXEC)
        .open(path)?;
    Ok(OwnedFd::from(f))
}

/// Open a GPIO attribute for reading and writing.
///
/// * `dir` - The GPIO directory returned by [`open_dir`].
/// * `name` - The name of the attribute, such as "*value*".
pub fn open_attr(dir: BorrowedFd<'_>, name: &str) -> Result<File> {
    openat(dir, name, libc::O_RDWR)
}

/// Write a value to a GPIO attribute.
///
/// The attribute is opened for just the one write, which is performed in a
/// single call as the kernel parses the whole write.
///
/// * `dir` - The GPIO directory returned by [`open_dir`].
/// * `name` - The name of the attribute, such as "*direction*".
/// * `value` - The value to write, including any trailing newline.
pub fn write_attr(dir: BorrowedFd<'_>, name: &str, value: &[u8]) -> Result<()> {
    let mut f = openat(dir, name, libc::O_WRONLY | libc::O_TRUNC)?;
    f.write_all(value)?;
    Ok(())
}

fn openat(dir: BorrowedFd<'_>, name: &str, flags: libc::c_int) -> Result<File> {
    let name = CString::new(name).map_err(|_| Error::Os(super::Errno(libc::EINVAL)))?;
    // SAFETY: name is a valid C string that outlives the call.
    match unsafe { libc::openat(dir.as_raw_fd(), name.as_ptr(), flags | libc::O_CLOEXEC) } {
        -1 => Err(Error::from_errno()),
        // SAFETY: the fd was just returned by the kernel and is owned by nothing else.
        fd => Ok(unsafe { File::from_raw_fd(fd) }),
    }
}

/// Read from an open attribute at the given offset.
///
/// Returns the number of bytes read, which is zero at end of file.
#[inline]
pub fn read_at(f: &File, buf: &mut [u8], offset: u64) -> Result<usize> {
    Ok(f.read_at(buf, offset)?)
}

/// Write to an open attribute at the given offset.
///
/// Returns the number of bytes written.
#[inline]
pub fn write_at(f: &File, buf: &[u8], offset: u64) -> Result<usize> {
    Ok(f.write_at(buf, offset)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Errno;
    use std::fs;
    use std::os::unix::io::AsFd;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNT: AtomicUsize = AtomicUsize::new(0);

    // A scratch class directory, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new() -> Scratch {
            let path = std::env::temp_dir().join(format!(
                "gpiosysfs-uapi-{}-{}",
                std::process::id(),
                COUNT.fetch_add(1, Ordering::Relaxed)
            ));
            fs::create_dir_all(path.join("gpio7")).unwrap();
            fs::write(path.join("export"), "").unwrap();
            fs::write(path.join("gpio7").join("value"), "0\n").unwrap();
            fs::write(path.join("gpio7").join("edge"), "none\n").unwrap();
            Scratch(path)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn gpio_path() {
        assert_eq!(
            super::gpio_path(Path::new(CLASS_PATH), 42),
            PathBuf::from("/sys/class/gpio/gpio42")
        );
        assert_eq!(
            super::gpio_path(Path::new("/tmp/fake"), 0),
            PathBuf::from("/tmp/fake/gpio0")
        );
    }

    #[test]
    fn export_writes_number() {
        let s = Scratch::new();
        assert_eq!(export(&s.0, 17), Ok(()));
        assert_eq!(fs::read_to_string(s.0.join("export")).unwrap(), "17");
    }

    #[test]
    fn unexport_missing_class() {
        let s = Scratch::new();
        // no unexport attribute in the scratch class, and no O_CREAT.
        assert_eq!(unexport(&s.0, 3), Err(Error::Os(Errno(libc::ENOENT))));
    }

    #[test]
    fn open_dir_missing() {
        let s = Scratch::new();
        assert_eq!(
            open_dir(&s.0.join("gpio8")).unwrap_err(),
            Error::Os(Errno(libc::ENOENT))
        );
    }

    #[test]
    fn open_dir_not_a_dir() {
        let s = Scratch::new();
        assert_eq!(
            open_dir(&s.0.join("export")).unwrap_err(),
            Error::Os(Errno(libc::ENOTDIR))
        );
    }

    #[test]
    fn attr_read_write() {
        let s = Scratch::new();
        let dir = open_dir(&s.0.join("gpio7")).unwrap();
        let f = open_attr(dir.as_fd(), "value").unwrap();

        let mut buf = [0_u8; 1];
        assert_eq!(read_at(&f, &mut buf, 0), Ok(1));
        assert_eq!(buf[0], b'0');

        assert_eq!(write_at(&f, b"1\n", 0), Ok(2));
        assert_eq!(read_at(&f, &mut buf, 0), Ok(1));
        assert_eq!(buf[0], b'1');
        assert_eq!(read_at(&f, &mut buf, 2), Ok(0));
    }

    #[test]
    fn write_attr_replaces_content() {
        let s = Scratch::new();
        let dir = open_dir(&s.0.join("gpio7")).unwrap();
        assert_eq!(write_attr(dir.as_fd(), "edge", b"both\n"), Ok(()));
        assert_eq!(write_attr(dir.as_fd(), "edge", b"none\n"), Ok(()));
        assert_eq!(
            fs::read_to_string(s.0.join("gpio7").join("edge")).unwrap(),
            "none\n"
        );
        assert_eq!(
            write_attr(dir.as_fd(), "direction", b"in\n"),
            Err(Error::Os(Errno(libc::ENOENT)))
        );
    }

    #[test]
    fn open_attr_bad_name() {
        let s = Scratch::new();
        let dir = open_dir(&s.0.join("gpio7")).unwrap();
        assert_eq!(
            open_attr(dir.as_fd(), "val\0ue").unwrap_err(),
            Error::Os(Errno(libc::EINVAL))
        );
    }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[macro_use]
extern crate global_counter;

mod common;

use common::Sim;
use gpiosysfs::{Error, GpioNode, UapiCall};
use gpiosysfs_uapi::{self as uapi, Errno};

#[test]
fn export() {
    let s = Sim::new();
    let node = s.node(17);

    assert!(!node.exported());
    assert_eq!(node.export(), Ok(()));
    assert!(node.exported());
    assert_eq!(s.last_written("export"), "17");
    assert_eq!(s.read_attr(17, "direction"), "in\n");
}

#[test]
fn export_exported() {
    let s = Sim::new();
    let node = s.node(3);
    s.add_line(3);

    assert_eq!(
        node.export(),
        Err(Error::Uapi(
            UapiCall::Export,
            uapi::Error::Os(Errno(libc::EBUSY))
        ))
    );
    assert_eq!(s.backend().exports(), 0);
}

#[test]
fn export_if_necessary() {
    let s = Sim::new();
    let node = s.node(4);

    assert_eq!(node.export_if_necessary(), Ok(true));
    assert!(node.exported());
    assert_eq!(node.export_if_necessary(), Ok(false));
    assert!(node.exported());
    assert_eq!(s.backend().exports(), 1);
}

#[test]
fn export_if_necessary_by_other() {
    let s = Sim::new();
    let node = s.node(9);
    s.add_line(9);

    assert_eq!(node.export_if_necessary(), Ok(false));
    assert_eq!(s.backend().exports(), 0);
}

#[test]
fn unexport() {
    let s = Sim::new();
    let node = s.node(22);

    node.export().unwrap();
    assert_eq!(node.unexport(), Ok(()));
    assert!(!node.exported());
    assert_eq!(s.last_written("unexport"), "22");

    // and can be exported again
    assert_eq!(node.export(), Ok(()));
    assert!(node.exported());
}

#[test]
fn unexport_unexported() {
    let s = Sim::new();
    let node = s.node(5);

    assert_eq!(
        node.unexport(),
        Err(Error::Uapi(
            UapiCall::Unexport,
            uapi::Error::Os(Errno(libc::EINVAL))
        ))
    );
}

#[test]
fn open_unexported() {
    let s = Sim::new();
    let node = s.node(6);

    assert_eq!(
        node.open().unwrap_err(),
        Error::Uapi(UapiCall::OpenDir, uapi::Error::Os(Errno(libc::ENOENT)))
    );
}

#[test]
fn open() {
    let s = Sim::new();
    let node = s.node(8);
    node.export().unwrap();

    let pin = node.open().unwrap();
    assert_eq!(pin.number(), 8);
    assert_eq!(pin.node(), &node);
    assert_eq!(pin.close(), Ok(()));
}

#[test]
fn open_many() {
    let s = Sim::new();
    let node = s.node(11);
    node.export().unwrap();

    let p1 = node.open().unwrap();
    let p2 = node.open().unwrap();
    assert_eq!(p1.node(), p2.node());
    assert_eq!(p1.close(), Ok(()));
    assert_eq!(p2.close(), Ok(()));
}

#[test]
fn uses_class() {
    let s = Sim::new();
    let node = s.node(12);
    assert_eq!(node.class(), s.class());
    assert_eq!(node.path(), s.class().join("gpio12"));
}

#[test]
fn generic() {
    fn export_and_open<N: GpioNode>(node: &N) -> gpiosysfs::Result<N::Pin> {
        node.export_if_necessary()?;
        node.open()
    }

    let s = Sim::new();
    let node = s.node(13);
    let pin = export_and_open(&node).unwrap();
    assert_eq!(pin.number(), 13);
    assert!(node.exported());
}

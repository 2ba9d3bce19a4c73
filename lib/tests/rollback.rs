// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// A single test, as fd numbers are checked after release, and parallel tests
// would reuse them.

#[macro_use]
extern crate global_counter;

mod common;

use common::{is_open, Sim, Step, INJECTED};
use gpiosysfs::{Error, UapiCall};

#[test]
fn failed_open_releases_acquired() {
    let s = Sim::new();
    let node = s.node(21);
    node.export().unwrap();
    let backend = s.backend();

    for (step, call, acquired) in [
        (Step::OpenDir, UapiCall::OpenDir, 0),
        (Step::OpenValue, UapiCall::OpenValue, 1),
        (Step::CreateNotifier, UapiCall::CreateNotifier, 2),
        (Step::WatchValue, UapiCall::WatchValue, 3),
    ] {
        backend.fail_at(Some(step));
        assert_eq!(node.open().unwrap_err(), Error::Uapi(call, INJECTED));
        let fds = backend.take_acquired();
        assert_eq!(fds.len(), acquired, "{:?}", step);
        for fd in fds {
            assert!(!is_open(fd), "{:?} leaked fd {}", step, fd);
        }
    }

    // and recovers once the fault clears
    backend.fail_at(None);
    let pin = node.open().unwrap();
    let fds = backend.take_acquired();
    assert_eq!(fds.len(), 3);
    assert!(fds.iter().all(|fd| is_open(*fd)));
    assert_eq!(pin.close(), Ok(()));
    for fd in fds {
        assert!(!is_open(fd), "close leaked fd {}", fd);
    }
}

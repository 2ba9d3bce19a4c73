// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::backend::{Backend, Sysfs};
use crate::pin::{self, Pin};
use crate::{Error, GpioNode, Number, Result, UapiCall};
use gpiosysfs_uapi as uapi;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A GPIO identified by its kernel number.
///
/// A node is a pure descriptor - it holds no open resources and constructing
/// one involves no kernel interaction, so it cannot fail.
///
/// The GPIO it describes is either exported to userspace, in which case it
/// has a directory in sysfs and may be opened, or is not.
/// The export state belongs to the kernel, not the node, and may be changed
/// by other processes at any time.
///
/// # Examples
/// ```no_run
/// # fn example() -> gpiosysfs::Result<()> {
/// use gpiosysfs::line::Level;
/// use gpiosysfs::Node;
///
/// let node = Node::new(17);
/// node.export()?;
/// let pin = node.open()?;
/// pin.set_value(Level::High)?;
/// pin.close()?;
/// node.unexport()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Node {
    number: Number,

    /// The GPIO directory, which only exists while the GPIO is exported.
    path: PathBuf,

    /// The GPIO class directory containing the export attributes.
    class: PathBuf,

    backend: Arc<dyn Backend>,
}

impl Node {
    /// Construct a node for the GPIO with the given number.
    ///
    /// The node uses the standard sysfs location, `/sys/class/gpio`.
    pub fn new(number: Number) -> Node {
        Builder::new(number).build()
    }

    /// Start building a node with a non-standard configuration.
    ///
    /// # Examples
    /// ```
    /// # use std::path::Path;
    /// let node = gpiosysfs::Node::builder(4)
    ///     .under("/mnt/sys/class/gpio")
    ///     .build();
    /// assert_eq!(node.path(), Path::new("/mnt/sys/class/gpio/gpio4"));
    /// ```
    pub fn builder(number: Number) -> Builder {
        Builder::new(number)
    }

    /// The GPIO number of the node.
    #[inline]
    pub fn number(&self) -> Number {
        self.number
    }

    /// The path to the GPIO directory in sysfs.
    ///
    /// The directory only exists while the GPIO is exported.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path to the GPIO class directory.
    #[inline]
    pub fn class(&self) -> &Path {
        &self.class
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Check if the GPIO is currently exported.
    ///
    /// This only probes for the GPIO directory, so the result may be stale
    /// by the time it is returned if other processes are exporting or
    /// unexporting the GPIO.
    pub fn exported(&self) -> bool {
        self.path.exists()
    }

    /// Request the kernel export the GPIO to userspace.
    ///
    /// A GPIO must be exported before it can be opened.
    ///
    /// It is an error to export a GPIO that is already exported, which makes
    /// this the call to use to ensure the GPIO is not in use by some other
    /// process.
    pub fn export(&self) -> Result<()> {
        self.backend
            .export(&self.class, self.number)
            .map_err(|e| Error::Uapi(UapiCall::Export, e))?;
        debug!("exported gpio{}", self.number);
        Ok(())
    }

    /// Export the GPIO, unless it is already exported.
    ///
    /// Returns true if the GPIO was exported by this call, and false if it
    /// was already exported.  Applications may wish to only unexport those
    /// GPIOs they actually exported.
    ///
    /// The check and the export are not atomic, so this can still fail if
    /// another process exports the GPIO in the interim, and offers no
    /// protection from conflicting with other users of the GPIO.
    /// Use [`export`] to be sure the GPIO was not already in use.
    ///
    /// [`export`]: #method.export
    pub fn export_if_necessary(&self) -> Result<bool> {
        if self.exported() {
            return Ok(false);
        }
        self.export()?;
        Ok(true)
    }

    /// Request the kernel remove the GPIO from userspace.
    ///
    /// Any pins opened from the node are invalidated and subsequent
    /// operations on them will fail.
    ///
    /// It is an error to unexport a GPIO that is not exported.
    pub fn unexport(&self) -> Result<()> {
        self.backend
            .unexport(&self.class, self.number)
            .map_err(|e| Error::Uapi(UapiCall::Unexport, e))?;
        debug!("unexported gpio{}", self.number);
        Ok(())
    }

    /// Open the GPIO so that it can be controlled.
    ///
    /// The GPIO must already be exported.
    ///
    /// The pin either acquires all of its resources, or none - any acquired
    /// before a failure are released before the error is returned.
    pub fn open(&self) -> Result<Pin> {
        let p = pin::open(self)?;
        debug!("opened gpio{}", self.number);
        Ok(p)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("number", &self.number)
            .field("path", &self.path)
            .finish()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.path == other.path
    }
}

impl Eq for Node {}

impl GpioNode for Node {
    type Pin = Pin;

    fn number(&self) -> Number {
        Node::number(self)
    }

    fn exported(&self) -> bool {
        Node::exported(self)
    }

    fn export(&self) -> Result<()> {
        Node::export(self)
    }

    fn export_if_necessary(&self) -> Result<bool> {
        Node::export_if_necessary(self)
    }

    fn unexport(&self) -> Result<()> {
        Node::unexport(self)
    }

    fn open(&self) -> Result<Pin> {
        Node::open(self)
    }
}

/// A builder of [`Node`]s with non-standard configuration.
#[derive(Clone, Debug)]
pub struct Builder {
    number: Number,
    class: PathBuf,
    backend: Arc<dyn Backend>,
}

impl Builder {
    fn new(number: Number) -> Builder {
        Builder {
            number,
            class: PathBuf::from(uapi::CLASS_PATH),
            backend: Arc::new(Sysfs),
        }
    }

    /// Set the GPIO class directory.
    ///
    /// The default is `/sys/class/gpio`.
    pub fn under<P: AsRef<Path>>(&mut self, class: P) -> &mut Self {
        self.class = class.as_ref().to_path_buf();
        self
    }

    /// Set the backend used to access the kernel.
    ///
    /// The default is [`Sysfs`].
    pub fn with_backend(&mut self, backend: Arc<dyn Backend>) -> &mut Self {
        self.backend = backend;
        self
    }

    /// Build the node.
    pub fn build(&self) -> Node {
        Node {
            number: self.number,
            path: uapi::gpio_path(&self.class, self.number),
            class: self.class.clone(),
            backend: self.backend.clone(),
        }
    }
}

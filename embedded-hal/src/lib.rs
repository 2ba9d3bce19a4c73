// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library providing [`embedded_hal::digital`] traits for
//! [`gpiosysfs::Pin`] and therefore for any Linux platform supporting the
//! GPIO sysfs interface.
//!
//! The pins are exported if necessary, and configured as an input or output
//! when created.
//!
//! # Example Usage
//!
//! Reading an input pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::InputPin;
//!
//! let mut pin = gpiosysfs_embedded_hal::InputPin::new(4)?;
//! if pin.is_high()? {
//!     println!("Input is high.");
//! }
//! # Ok(())
//! # }
//! ```
//! Setting an output pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::{OutputPin, PinState};
//!
//! let mut led0 = gpiosysfs_embedded_hal::OutputPin::new(17, PinState::High)?;
//!
//! // change the level later
//! led0.set_low()?;
//! # Ok(())
//! # }
//! ```

use embedded_hal::digital::PinState;
use gpiosysfs::line::{Direction, Level};
use gpiosysfs::{Node, Number};

/// Core common class for InputPin and OutputPin.
#[derive(Debug)]
struct Pin {
    pin: gpiosysfs::Pin,

    /// The level last set, for output pins.
    value: Option<Level>,
}

impl Pin {
    fn open(node: &Node) -> Result<Pin, Error> {
        node.export_if_necessary()?;
        Ok(Pin {
            pin: node.open()?,
            value: None,
        })
    }

    fn as_input(mut self) -> Result<Pin, Error> {
        self.pin.set_direction(Direction::Input)?;
        self.value = None;
        Ok(self)
    }

    fn as_output(mut self, state: PinState) -> Result<Pin, Error> {
        self.pin.set_direction(Direction::Output)?;
        self.set_level(state_to_level(state))?;
        Ok(self)
    }

    #[inline]
    fn is_high(&mut self) -> Result<bool, Error> {
        Ok(self.pin.value()? == Level::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Error> {
        Ok(!self.is_high()?)
    }

    fn set_level(&mut self, level: Level) -> Result<(), Error> {
        self.pin.set_value(level)?;
        self.value = Some(level);
        Ok(())
    }
}

/// Provides [`embedded_hal::digital`] traits for a [`gpiosysfs::Pin`]
/// configured as an input.
///
/// The GPIO remains exported when the [`InputPin`] is dropped.
#[derive(Debug)]
pub struct InputPin(Pin);

impl InputPin {
    /// Creates a new input pin for the GPIO with the given `number`.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
    /// use embedded_hal::digital::InputPin;
    ///
    /// let mut pin = gpiosysfs_embedded_hal::InputPin::new(4)?;
    /// if pin.is_high()? {
    ///     println!("Input is high.");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(number: Number) -> Result<Self, Error> {
        Self::from_node(&Node::new(number))
    }

    /// Creates a new input pin for the GPIO identified by the [`Node`].
    ///
    /// This allows for non-standard configurations, such as a relocated
    /// sysfs.
    pub fn from_node(node: &Node) -> Result<Self, Error> {
        Ok(InputPin(Pin::open(node)?.as_input()?))
    }

    /// Set this pin to output mode.
    pub fn into_output_pin(self, state: PinState) -> Result<OutputPin, Error> {
        Ok(OutputPin(self.0.as_output(state)?))
    }
}

impl TryFrom<gpiosysfs::Pin> for InputPin {
    type Error = Error;

    /// Convert an open [`gpiosysfs::Pin`] into an [`InputPin`], switching it
    /// to input.
    fn try_from(pin: gpiosysfs::Pin) -> Result<Self, Self::Error> {
        let pin = Pin { pin, value: None };
        Ok(InputPin(pin.as_input()?))
    }
}

impl From<InputPin> for gpiosysfs::Pin {
    /// Convert the [`InputPin`] into the contained [`gpiosysfs::Pin`].
    fn from(pin: InputPin) -> Self {
        pin.0.pin
    }
}

impl embedded_hal::digital::InputPin for InputPin {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl embedded_hal::digital::ErrorType for InputPin {
    /// Errors returned by [`InputPin`].
    type Error = Error;
}

/// Provides [`embedded_hal::digital`] traits for a [`gpiosysfs::Pin`]
/// configured as an output.
///
/// The GPIO remains exported, and the line remains driven at the last level
/// set, when the [`OutputPin`] is dropped.
#[derive(Debug)]
pub struct OutputPin(Pin);

impl OutputPin {
    /// Creates a new output pin for the GPIO with the given `number`.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
    /// use embedded_hal::digital::{OutputPin, PinState};
    ///
    /// let mut pin = gpiosysfs_embedded_hal::OutputPin::new(17, PinState::Low)?;
    /// // later...
    /// pin.set_high()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(number: Number, state: PinState) -> Result<Self, Error> {
        Self::from_node(&Node::new(number), state)
    }

    /// Creates a new output pin for the GPIO identified by the [`Node`].
    pub fn from_node(node: &Node, state: PinState) -> Result<Self, Error> {
        Ok(OutputPin(Pin::open(node)?.as_output(state)?))
    }

    /// Set this pin to input mode.
    pub fn into_input_pin(self) -> Result<InputPin, Error> {
        Ok(InputPin(self.0.as_input()?))
    }
}

impl TryFrom<(gpiosysfs::Pin, PinState)> for OutputPin {
    type Error = Error;

    /// Convert an open [`gpiosysfs::Pin`] into an [`OutputPin`], switching it
    /// to output at the given state.
    fn try_from((pin, state): (gpiosysfs::Pin, PinState)) -> Result<Self, Self::Error> {
        let pin = Pin { pin, value: None };
        Ok(OutputPin(pin.as_output(state)?))
    }
}

impl From<OutputPin> for gpiosysfs::Pin {
    /// Convert the [`OutputPin`] into the contained [`gpiosysfs::Pin`].
    fn from(pin: OutputPin) -> Self {
        pin.0.pin
    }
}

impl embedded_hal::digital::InputPin for OutputPin {
    // Reads the level from the kernel, which for most hardware is the level
    // being driven.

    #[inline]
    /// Is the line high?
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    #[inline]
    /// Is the line low?
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl embedded_hal::digital::OutputPin for OutputPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Error> {
        let level = state_to_level(state);
        if self.0.value != Some(level) {
            self.0.set_level(level)?;
        }
        Ok(())
    }
}

impl embedded_hal::digital::StatefulOutputPin for OutputPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.value == Some(Level::High))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.value == Some(Level::Low))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let level = self.0.value.unwrap_or_default().not();
        self.0.set_level(level)
    }
}

impl embedded_hal::digital::ErrorType for OutputPin {
    /// Errors returned by [`OutputPin`].
    type Error = Error;
}

/// Converts a [`PinState`] to the gpiosysfs line [`Level`].
fn state_to_level(state: PinState) -> Level {
    match state {
        PinState::High => Level::High,
        PinState::Low => Level::Low,
    }
}

/// Errors returned by [`gpiosysfs_embedded_hal`](crate) types.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    /// An error returned from an underlying gpiosysfs call.
    #[error("gpiosysfs returned: {0}")]
    Sysfs(#[source] gpiosysfs::Error),
}

impl From<gpiosysfs::Error> for Error {
    fn from(err: gpiosysfs::Error) -> Self {
        Self::Sysfs(err)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kernel number identifying a GPIO.
///
/// The meaning of the number is platform specific - consult the documentation
/// for your hardware.
pub type Number = u32;

/// The direction of a line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// The line is an input.
    #[default]
    Input,

    /// The line is an output.
    Output,
}

impl Direction {
    /// The value written to the *direction* attribute to select this direction.
    pub(crate) fn attr(&self) -> &'static [u8] {
        match self {
            Direction::Input => b"in\n",
            Direction::Output => b"out\n",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Input => "input",
            Direction::Output => "output",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" | "input" => Ok(Direction::Input),
            "out" | "output" => Ok(Direction::Output),
            _ => Err(Error::InvalidArgument(format!(
                "'{}' is not a direction - use 'in' or 'out'.",
                s
            ))),
        }
    }
}

/// The edges that are reported by [`Pin::wait_for_edge`].
///
/// [`Pin::wait_for_edge`]: crate::Pin::wait_for_edge
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeDetection {
    /// No edges are reported.
    #[default]
    NoEdges,

    /// Transitions from low to high are reported.
    RisingEdge,

    /// Transitions from high to low are reported.
    FallingEdge,

    /// All transitions are reported.
    BothEdges,
}

impl EdgeDetection {
    /// The value written to the *edge* attribute to select these edges.
    pub(crate) fn attr(&self) -> &'static [u8] {
        match self {
            EdgeDetection::NoEdges => b"none\n",
            EdgeDetection::RisingEdge => b"rising\n",
            EdgeDetection::FallingEdge => b"falling\n",
            EdgeDetection::BothEdges => b"both\n",
        }
    }
}

impl fmt::Display for EdgeDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeDetection::NoEdges => "none",
            EdgeDetection::RisingEdge => "rising",
            EdgeDetection::FallingEdge => "falling",
            EdgeDetection::BothEdges => "both",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EdgeDetection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(EdgeDetection::NoEdges),
            "rising" => Ok(EdgeDetection::RisingEdge),
            "falling" => Ok(EdgeDetection::FallingEdge),
            "both" => Ok(EdgeDetection::BothEdges),
            _ => Err(Error::InvalidArgument(format!(
                "'{}' is not an edge - use 'none', 'rising', 'falling' or 'both'.",
                s
            ))),
        }
    }
}

/// The physical level of a line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Level {
    /// The line is low.
    #[default]
    Low,

    /// The line is high.
    High,
}

impl Level {
    /// The level opposite the current level.
    pub fn not(&self) -> Level {
        match self {
            Level::High => Level::Low,
            Level::Low => Level::High,
        }
    }

    /// The value written to the *value* attribute to set this level.
    pub(crate) fn attr(&self) -> &'static [u8] {
        match self {
            Level::Low => b"0\n",
            Level::High => b"1\n",
        }
    }

    /// Decode the first byte read from the *value* attribute.
    ///
    /// # Panics
    ///
    /// The kernel only ever reports '0' or '1', so anything else panics.
    pub(crate) fn from_attr(b: u8) -> Level {
        match b {
            b'0' => Level::Low,
            b'1' => Level::High,
            _ => panic!("kernel returned invalid data {:?} from 'value'", b as char),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::High => "high",
            Level::Low => "low",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "high" | "h" | "on" | "true" => Ok(Level::High),
            "0" | "low" | "l" | "off" | "false" => Ok(Level::Low),
            _ => Err(Error::InvalidArgument(format!(
                "'{}' is not a level - use 'high' or 'low'.",
                s
            ))),
        }
    }
}

impl From<Level> for bool {
    fn from(l: Level) -> bool {
        match l {
            Level::Low => false,
            Level::High => true,
        }
    }
}

impl From<bool> for Level {
    fn from(b: bool) -> Level {
        match b {
            false => Level::Low,
            true => Level::High,
        }
    }
}

impl From<Level> for u8 {
    fn from(l: Level) -> u8 {
        match l {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

//! Update modes and partial regions
//!
//! This module defines the [`UpdateMode`] values the flush coordinator
//! dispatches on and the [`Region`] rectangle partial updates target,
//! together with the textual forms (`"full"`/`"partial"`/`"base_map"`,
//! `"x,y,width,height"`) that control surfaces map onto them.

use core::fmt;
use core::str::FromStr;

use crate::config::Geometry;

/// Display update modes
///
/// Selecting a mode touches no hardware; it only decides which update
/// sequence the next [`flush`](crate::Epd::flush) runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Full screen refresh with best quality (slower, clears ghosting)
    #[default]
    Full,
    /// Fast partial update of the stored region (ghosting may accumulate)
    Partial,
    /// Write both controller RAM buffers identically, priming a ground
    /// image for subsequent partial updates
    BaseMap,
}

impl UpdateMode {
    /// Canonical name of the mode
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::BaseMap => "base_map",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full" => Ok(Self::Full),
            "partial" => Ok(Self::Partial),
            "base_map" => Ok(Self::BaseMap),
            _ => Err(ParseModeError),
        }
    }
}

/// Error returned when a mode name is not one of the three known values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseModeError;

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown update mode (expected full, partial or base_map)")
    }
}

impl core::error::Error for ParseModeError {}

/// Rectangular region for partial updates, in pixels
///
/// `x` and `width` must be byte-aligned (multiples of 8) because RAM
/// writes are byte-packed; see [`Region::fits`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// X coordinate of the top-left corner (multiple of 8)
    pub x: u16,
    /// Y coordinate of the top-left corner
    pub y: u16,
    /// Width in pixels (multiple of 8)
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Region {
    /// Create a new region
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole frame
    pub fn covering(geometry: Geometry) -> Self {
        Self {
            x: 0,
            y: 0,
            width: geometry.width,
            height: geometry.height,
        }
    }

    /// Whether this region is a valid update target for `geometry`
    ///
    /// Requires byte-aligned `x` and `width`, non-zero extent, and the
    /// rectangle inside the panel bounds.
    pub fn fits(&self, geometry: Geometry) -> bool {
        self.width > 0
            && self.height > 0
            && self.x % 8 == 0
            && self.width % 8 == 0
            && self.x.saturating_add(self.width) <= geometry.width
            && self.y.saturating_add(self.height) <= geometry.height
    }

    /// Number of packed bytes one update of this region streams
    pub fn buffer_size(&self) -> usize {
        (self.width as usize / 8) * self.height as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Region {
    type Err = ParseRegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split(',');
        let mut next = || -> Result<u16, ParseRegionError> {
            fields
                .next()
                .ok_or(ParseRegionError)?
                .trim()
                .parse()
                .map_err(|_| ParseRegionError)
        };
        let region = Self {
            x: next()?,
            y: next()?,
            width: next()?,
            height: next()?,
        };
        if fields.next().is_some() {
            return Err(ParseRegionError);
        }
        Ok(region)
    }
}

/// Error returned when a region string is not four comma-separated values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseRegionError;

impl fmt::Display for ParseRegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected \"x,y,width,height\"")
    }
}

impl core::error::Error for ParseRegionError {}

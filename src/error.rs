//! Error types for the protocol engine
//!
//! This module defines error types for configuration building
//! ([`BuilderError`]) and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during protocol operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! ## Example
//!
//! ```
//! use ssd1681::{Builder, BuilderError, Geometry};
//!
//! // Missing geometry
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingGeometry)));
//!
//! // Invalid geometry
//! let result = Geometry::new(1000, 500); // Too large
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Maximum gate outputs (rows) supported by the SSD1681 controller
///
/// NOTE: Some panels wire fewer gates; configure [`crate::Geometry`] accordingly.
pub const MAX_GATE_OUTPUTS: u16 = 200;

/// Maximum source outputs (columns) supported by the SSD1681 controller
///
/// NOTE: Some panels wire fewer sources; configure [`crate::Geometry`] accordingly.
pub const MAX_SOURCE_OUTPUTS: u16 = 200;

/// Errors that can occur when driving the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO write failure or busy timeout)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`]
    /// implementation. The sequence that hit it was aborted; no retry is
    /// attempted.
    Interface(I::Error),
    /// Invalid partial update region
    ///
    /// The region must satisfy: `x` and `width` multiples of 8, non-zero
    /// extent, and `x+width`/`y+height` within the panel geometry.
    /// Rejected before any hardware access; previously stored state is
    /// unchanged.
    InvalidRegion {
        /// X coordinate in pixels
        x: u16,
        /// Y coordinate in pixels
        y: u16,
        /// Width in pixels
        width: u16,
        /// Height in pixels
        height: u16,
    },
    /// Partial update attempted before a successful hardware init
    ///
    /// Run [`crate::Epd::initialize`] (or [`crate::Epd::recover`]) first.
    NotInitialized,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::InvalidRegion {
                x,
                y,
                width,
                height,
            } => {
                write!(f, "Invalid region: x={x}, y={y}, w={width}, h={height}")
            }
            Self::NotInitialized => write!(f, "Display not initialized"),
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the engine is created.
#[derive(Debug)]
pub enum BuilderError {
    /// Geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be called before building.
    MissingGeometry,
    /// Invalid geometry provided
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Width (columns) requested
        width: u16,
        /// Height (rows) requested
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Geometry must be specified"),
            Self::InvalidGeometry { width, height } => write!(
                f,
                "Invalid geometry {width}x{height} (max {MAX_SOURCE_OUTPUTS}x{MAX_GATE_OUTPUTS})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

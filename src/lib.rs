//! SSD1681 E-Paper Display Protocol Engine
//!
//! A driver engine for SSD1681 e-paper display controllers reachable over
//! SPI plus reset, data/command-select and busy lines.
//!
//! ## Features
//!
//! - `embedded-hal` v1.0 support
//! - Three update modes: full refresh, fast partial refresh of a stored
//!   region, and base-map priming of both controller RAM planes
//! - Thread-callable: one mutex per device serializes every hardware
//!   transaction; the shared [`FrameBuffer`] may be painted concurrently
//!   with a running update
//! - Recovery operations: hardware init, unstick-and-init, panel clear,
//!   deep sleep
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use ssd1681::{Builder, Color, Epd, Geometry, Interface, UpdateMode};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! let interface = Interface::new(spi, dc, rst, Some(busy));
//! let geometry = match Geometry::new(128, 128) {
//!     Ok(geometry) => geometry,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().geometry(geometry).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let epd = Epd::new(interface, MockDelay, config);
//! let _ = epd.initialize();
//! epd.frame().set_pixel(10, 10, Color::Black);
//! epd.set_mode(UpdateMode::Full);
//! let _ = epd.flush();
//! ```

/// SSD1681 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core protocol engine
pub mod epd;
/// Error types for the protocol engine
pub mod error;
/// Shared monochrome frame buffer
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Update modes and partial regions
pub mod mode;

pub use config::{
    BUSY_TIMEOUT_INIT_MS, BUSY_TIMEOUT_UPDATE_MS, Builder, Config, Geometry, MAX_GATE_OUTPUTS,
    MAX_SOURCE_OUTPUTS,
};
pub use epd::{DeepSleepMode, Epd};
pub use error::{BuilderError, Error};
pub use framebuffer::{Color, FrameBuffer};
pub use interface::{
    BUSY_POLL_INTERVAL_MS, DisplayInterface, Interface, InterfaceError, RESET_PULSE_MS,
};
pub use mode::{ParseModeError, ParseRegionError, Region, UpdateMode};

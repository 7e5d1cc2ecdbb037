//! SSD1681 command definitions
//!
//! This module defines the command bytes used to control the SSD1681
//! e-paper display controller. Commands are sent over SPI with the DC pin
//! low for commands and high for data.
//!
//! ## Command Structure
//!
//! All commands follow the pattern:
//! 1. Assert CS (Chip Select)
//! 2. Set DC low (command mode)
//! 3. Send command byte
//! 4. Set DC high (data mode)
//! 5. Send data bytes (if any)
//! 6. Deassert CS

// System control commands

/// Driver output control command (0x01)
///
/// Sets the number of gate outputs (rows) and scanning direction.
/// Requires 3 bytes: [rows-1 (LSB), rows-1 (MSB), scanning mode]
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Deep sleep command (0x10)
///
/// Enters ultra-low power mode. Only a hardware reset can wake the
/// controller afterwards.
/// Requires 1 byte: see [`crate::DeepSleepMode`] for the payload values.
pub const DEEP_SLEEP: u8 = 0x10;

/// Data entry mode command (0x11)
///
/// Controls the address counter auto-increment direction.
/// Requires 1 byte:
/// - Bit 0 (ID0): X direction (0=decrement, 1=increment)
/// - Bit 1 (ID1): Y direction (0=decrement, 1=increment)
/// - Bit 2 (AM): Address counter direction (0=X, 1=Y)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Soft reset command (0x12)
///
/// Resets the controller to default state. Must wait for BUSY low after issuing.
pub const SOFT_RESET: u8 = 0x12;

/// Temperature sensor control command (0x18)
///
/// Selects internal or external temperature sensor for refresh timing.
/// Requires 1 byte: 0x80 = internal, 0x48 = external
pub const TEMP_SENSOR_CONTROL: u8 = 0x18;

/// Border waveform control command (0x3C)
///
/// Controls the border color and transition behavior during an update.
/// Requires 1 byte of data.
pub const BORDER_WAVEFORM: u8 = 0x3C;

// RAM and data commands

/// Set RAM X address range command (0x44)
///
/// Sets the X (column) address range for RAM access, in byte units.
/// Requires 2 bytes: [start, end]
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address range command (0x45)
///
/// Sets the Y (row) address range for RAM access, in row units.
/// Requires 4 bytes: [start_LSB, start_MSB, end_LSB, end_MSB]
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter command (0x4E)
///
/// Sets the X address counter, in byte units.
/// Requires 1 byte.
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter command (0x4F)
///
/// Sets the Y address counter, in row units.
/// Requires 2 bytes: [address_LSB, address_MSB]
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

/// Write to BW RAM (current frame) command (0x24)
///
/// Writes black/white pixel data into the primary frame buffer.
/// Bit=0: Black, Bit=1: White
pub const WRITE_RAM_BW: u8 = 0x24;

/// Write to secondary RAM command (0x26)
///
/// Writes pixel data into the secondary frame buffer the controller
/// diffs against during partial updates.
pub const WRITE_RAM_RED: u8 = 0x26;

// Display update commands

/// Display update control 1 command (0x21)
///
/// Controls which RAM sources are used for display update.
/// Requires 2 bytes on the SSD1681.
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;

/// Display update control 2 command (0x22)
///
/// Selects the update sequence the next activation runs.
/// Requires 1 byte; see [`UPDATE_SEQUENCE_FULL`] and
/// [`UPDATE_SEQUENCE_PARTIAL`].
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Master activation command (0x20)
///
/// Triggers the display update sequence. BUSY goes high during update.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// Display update control 2 payload for a full refresh (0xF7)
///
/// Runs the complete OTP waveform: best quality, clears ghosting, slow.
pub const UPDATE_SEQUENCE_FULL: u8 = 0xF7;

/// Display update control 2 payload for a fast partial refresh (0xFF)
///
/// Diffs the primary RAM against the secondary RAM and only drives the
/// pixels that changed. Ghosting may accumulate.
pub const UPDATE_SEQUENCE_PARTIAL: u8 = 0xFF;

// Border waveform payloads

/// Normal border transition, used for full refreshes (0x05)
pub const BORDER_NORMAL: u8 = 0x05;

/// Locked border, prevents edge flashing during partial refreshes (0x80)
pub const BORDER_LOCKED: u8 = 0x80;

// Data entry mode payloads

/// X increment, Y decrement (0x01)
///
/// The crate's resident convention: Y windows are programmed high-to-low
/// while buffer rows stream top-to-bottom.
pub const ENTRY_X_INC_Y_DEC: u8 = 0x01;

/// X increment, Y increment (0x03)
///
/// Used only for the blanking sweep in [`crate::Epd::clear`].
pub const ENTRY_X_INC_Y_INC: u8 = 0x03;

/// Internal temperature sensor selector for [`TEMP_SENSOR_CONTROL`] (0x80)
pub const TEMP_SENSOR_INTERNAL: u8 = 0x80;

//! Display configuration types and builder

use crate::command::{
    BORDER_LOCKED, BORDER_NORMAL, ENTRY_X_INC_Y_DEC, TEMP_SENSOR_INTERNAL, UPDATE_SEQUENCE_FULL,
    UPDATE_SEQUENCE_PARTIAL,
};

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Busy deadline around resets and initialization, in milliseconds
pub const BUSY_TIMEOUT_INIT_MS: u32 = 2_000;

/// Busy deadline after triggering an update, in milliseconds
///
/// Waveform settle time dominates; full refreshes on large panels run
/// for several seconds.
pub const BUSY_TIMEOUT_UPDATE_MS: u32 = 10_000;

/// Panel geometry, fixed at attach time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Width in pixels (source outputs)
    pub width: u16,
    /// Height in pixels (gate outputs)
    pub height: u16,
}

impl Geometry {
    /// Create a validated geometry
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if either dimension is zero
    /// or exceeds what the SSD1681 can drive (200x200).
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_SOURCE_OUTPUTS || height == 0 || height > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of bytes backing one display row
    ///
    /// Rows are bit-packed 8 pixels per byte; a width that is not a
    /// multiple of 8 pads the final byte.
    pub fn bytes_per_line(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Size of a whole frame in bytes
    pub fn frame_size(&self) -> usize {
        self.bytes_per_line() * self.height as usize
    }
}

/// Display configuration
///
/// Holds the panel geometry and the controller register values the init
/// and update sequences program. Use [`Builder`] to create a `Config`;
/// the defaults suit common SSD1681 modules and each knob can be
/// overridden for panel-specific wiring.
#[derive(Clone, Debug)]
pub struct Config {
    /// Panel geometry
    pub geometry: Geometry,
    /// Gate scanning direction byte (third payload byte of driver output control)
    pub gate_scan: u8,
    /// Data entry mode byte the engine runs under
    pub data_entry_mode: u8,
    /// Border waveform payload for full refreshes
    pub border_normal: u8,
    /// Border waveform payload for partial refreshes
    pub border_locked: u8,
    /// Display update control 1 payload
    pub update_ctrl1: [u8; 2],
    /// Temperature sensor source selector
    pub temp_sensor: u8,
    /// Display update control 2 payload triggering a full refresh
    pub sequence_full: u8,
    /// Display update control 2 payload triggering a partial refresh
    pub sequence_partial: u8,
    /// Busy deadline around resets and initialization, in milliseconds
    pub busy_timeout_init_ms: u32,
    /// Busy deadline after triggering an update, in milliseconds
    pub busy_timeout_update_ms: u32,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use ssd1681::{Builder, Geometry};
///
/// let geometry = match Geometry::new(128, 128) {
///     Ok(geometry) => geometry,
///     Err(_) => return,
/// };
/// let config = match Builder::new().geometry(geometry).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Panel geometry (required)
    geometry: Option<Geometry>,
    /// Gate scanning direction byte
    gate_scan: u8,
    /// Data entry mode byte
    data_entry_mode: u8,
    /// Border waveform payload for full refreshes
    border_normal: u8,
    /// Border waveform payload for partial refreshes
    border_locked: u8,
    /// Display update control 1 payload
    update_ctrl1: [u8; 2],
    /// Temperature sensor source selector
    temp_sensor: u8,
    /// Full refresh trigger payload
    sequence_full: u8,
    /// Partial refresh trigger payload
    sequence_partial: u8,
    /// Busy deadline for init paths
    busy_timeout_init_ms: u32,
    /// Busy deadline for update paths
    busy_timeout_update_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            geometry: None,
            // Default gate scanning (panel-specific, override as needed)
            gate_scan: 0x00,
            // X increment, Y decrement: the crate's resident convention
            data_entry_mode: ENTRY_X_INC_Y_DEC,
            border_normal: BORDER_NORMAL,
            border_locked: BORDER_LOCKED,
            // Default display update control 1 (from datasheet examples)
            update_ctrl1: [0x00, 0x80],
            temp_sensor: TEMP_SENSOR_INTERNAL,
            sequence_full: UPDATE_SEQUENCE_FULL,
            sequence_partial: UPDATE_SEQUENCE_PARTIAL,
            busy_timeout_init_ms: BUSY_TIMEOUT_INIT_MS,
            busy_timeout_update_ms: BUSY_TIMEOUT_UPDATE_MS,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the gate scanning direction byte
    pub fn gate_scan(mut self, value: u8) -> Self {
        self.gate_scan = value;
        self
    }

    /// Set the data entry mode byte
    ///
    /// The RAM window programming convention follows this byte; see
    /// [`crate::Epd`] for the ordering contract.
    pub fn data_entry_mode(mut self, value: u8) -> Self {
        self.data_entry_mode = value;
        self
    }

    /// Set the border waveform payload for full refreshes
    pub fn border_normal(mut self, value: u8) -> Self {
        self.border_normal = value;
        self
    }

    /// Set the border waveform payload for partial refreshes
    pub fn border_locked(mut self, value: u8) -> Self {
        self.border_locked = value;
        self
    }

    /// Set the display update control 1 payload
    pub fn update_ctrl1(mut self, value: [u8; 2]) -> Self {
        self.update_ctrl1 = value;
        self
    }

    /// Set the temperature sensor source selector
    pub fn temp_sensor(mut self, value: u8) -> Self {
        self.temp_sensor = value;
        self
    }

    /// Set the display update control 2 payload for full refreshes
    pub fn sequence_full(mut self, value: u8) -> Self {
        self.sequence_full = value;
        self
    }

    /// Set the display update control 2 payload for partial refreshes
    pub fn sequence_partial(mut self, value: u8) -> Self {
        self.sequence_partial = value;
        self
    }

    /// Set the busy deadline used around resets and initialization
    pub fn busy_timeout_init_ms(mut self, value: u32) -> Self {
        self.busy_timeout_init_ms = value;
        self
    }

    /// Set the busy deadline used after triggering an update
    pub fn busy_timeout_update_ms(mut self, value: u32) -> Self {
        self.busy_timeout_update_ms = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingGeometry` if geometry was not set.
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            geometry: self.geometry.ok_or(BuilderError::MissingGeometry)?,
            gate_scan: self.gate_scan,
            data_entry_mode: self.data_entry_mode,
            border_normal: self.border_normal,
            border_locked: self.border_locked,
            update_ctrl1: self.update_ctrl1,
            temp_sensor: self.temp_sensor,
            sequence_full: self.sequence_full,
            sequence_partial: self.sequence_partial,
            busy_timeout_init_ms: self.busy_timeout_init_ms,
            busy_timeout_update_ms: self.busy_timeout_update_ms,
        })
    }
}

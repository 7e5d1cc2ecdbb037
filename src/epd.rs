//! Core protocol engine
//!
//! [`Epd`] owns one attached panel: its geometry, its shared
//! [`FrameBuffer`], and the mutex-serialized protocol state (update mode,
//! partial region, initialized flag, bus interface). Every hardware
//! transaction funnels through that mutex, so concurrent callers never
//! interleave bus traffic for the same panel.

use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::command::{
    BORDER_WAVEFORM, DATA_ENTRY_MODE, DEEP_SLEEP, DISPLAY_UPDATE_CTRL1, DISPLAY_UPDATE_CTRL2,
    DRIVER_OUTPUT_CONTROL, ENTRY_X_INC_Y_INC, MASTER_ACTIVATION, SET_RAM_X_COUNTER,
    SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, SOFT_RESET, TEMP_SENSOR_CONTROL,
    WRITE_RAM_BW, WRITE_RAM_RED,
};
use crate::config::{Config, Geometry};
use crate::error::Error;
use crate::framebuffer::{Color, FrameBuffer};
use crate::interface::DisplayInterface;
use crate::mode::{Region, UpdateMode};

/// Settle time after requesting deep sleep, in milliseconds
const DEEP_SLEEP_SETTLE_MS: u32 = 10;

type SequenceResult<I> = Result<(), Error<I>>;

/// Deep sleep mode configuration
///
/// Controls RAM preservation when entering deep sleep. Either way the
/// engine drops its initialized flag, so a hardware init is required
/// before the next partial update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DeepSleepMode {
    /// Deep sleep discarding RAM content
    ///
    /// Recovery requires a full [`Epd::initialize`] and a full refresh.
    Discard = 0x00,
    /// Deep sleep with RAM content preserved
    #[default]
    RetainRam = 0x01,
}

/// Protocol engine for one attached SSD1681 panel
///
/// All operations take `&self`; share the device between threads with an
/// [`Arc`](std::sync::Arc). Mode, region, the initialized flag and the
/// bus interface live behind one mutex: at most one update sequence or
/// recovery operation runs at a time, and a failed sequence releases the
/// lock with mode and region untouched. The [`FrameBuffer`] is outside
/// the mutex; see its docs for the tearing contract.
///
/// ## RAM window convention
///
/// The engine runs the controller in data entry mode 0x01 (X increment,
/// Y decrement) for its whole lifetime: Y windows are programmed
/// high-to-low while buffer rows stream top-to-bottom. Whether that maps
/// row 0 to the panel's top edge depends on gate wiring; confirm against
/// hardware before changing either side of the convention.
pub struct Epd<I, D>
where
    I: DisplayInterface,
{
    /// Panel geometry, fixed at attach
    geometry: Geometry,
    /// Pixel buffer shared with renderers
    frame: FrameBuffer,
    /// Serialized protocol state and bus access
    bus: Mutex<Protocol<I, D>>,
}

/// State guarded by the device mutex
struct Protocol<I, D> {
    interface: I,
    delay: D,
    config: Config,
    mode: UpdateMode,
    region: Option<Region>,
    initialized: bool,
}

impl<I, D> Epd<I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    /// Attach a panel
    ///
    /// Allocates an all-white frame for the configured geometry. The
    /// controller is untouched until [`initialize`](Self::initialize) or
    /// [`recover`](Self::recover) runs.
    pub fn new(interface: I, delay: D, config: Config) -> Self {
        let geometry = config.geometry;
        Self {
            geometry,
            frame: FrameBuffer::new(geometry),
            bus: Mutex::new(Protocol {
                interface,
                delay,
                config,
                mode: UpdateMode::default(),
                region: None,
                initialized: false,
            }),
        }
    }

    /// Panel geometry
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The shared pixel buffer
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Current update mode
    pub fn mode(&self) -> UpdateMode {
        self.lock().mode
    }

    /// Select the update mode the next [`flush`](Self::flush) runs
    ///
    /// Touches no hardware and never disturbs the stored partial region.
    pub fn set_mode(&self, mode: UpdateMode) {
        self.lock().mode = mode;
    }

    /// Currently stored partial region, if one has been set
    pub fn partial_region(&self) -> Option<Region> {
        self.lock().region
    }

    /// Store the region partial updates target
    ///
    /// The region may be set in any mode; it only takes effect when a
    /// partial update runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] when the region is misaligned or
    /// out of bounds; the previously stored region is kept.
    pub fn set_partial_region(&self, region: Region) -> Result<(), Error<I>> {
        if !region.fits(self.geometry) {
            error!(
                "rejected partial region {region} for {}x{} panel",
                self.geometry.width, self.geometry.height
            );
            return Err(Error::InvalidRegion {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            });
        }
        self.lock().region = Some(region);
        Ok(())
    }

    /// Whether a hardware init has completed since attach or deep sleep
    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Push the frame to the panel using the current update mode
    ///
    /// The single dispatch point every update trigger goes through.
    /// Serialized by the device mutex; the matching sequence's result is
    /// returned as-is.
    pub fn flush(&self) -> Result<(), Error<I>> {
        let mut bus = self.lock();
        match bus.mode {
            UpdateMode::Full => bus.full_update(&self.frame),
            UpdateMode::Partial => bus.partial_update(&self.frame),
            UpdateMode::BaseMap => bus.base_map_update(&self.frame),
        }
    }

    /// Run the hardware init sequence
    ///
    /// Re-establishes a known controller state. On success the engine is
    /// marked initialized, the mode falls back to [`UpdateMode::Full`]
    /// and any stored partial region is discarded.
    pub fn initialize(&self) -> Result<(), Error<I>> {
        self.lock().hw_init()
    }

    /// Unstick a wedged controller, then run the hardware init sequence
    ///
    /// Issues a best-effort deep-sleep request first; its outcome is
    /// deliberately ignored. Use after a busy timeout when the controller
    /// stops answering.
    pub fn recover(&self) -> Result<(), Error<I>> {
        let mut bus = self.lock();
        let _ = bus.deep_sleep_command(DeepSleepMode::RetainRam);
        bus.hw_init()
    }

    /// Blank the panel without disturbing the in-memory frame
    pub fn clear(&self) -> Result<(), Error<I>> {
        self.lock().clear_panel()
    }

    /// Put the controller into deep sleep
    ///
    /// Drops the initialized flag on success: partial updates are refused
    /// until the next [`initialize`](Self::initialize).
    pub fn deep_sleep(&self, mode: DeepSleepMode) -> Result<(), Error<I>> {
        let mut bus = self.lock();
        bus.deep_sleep_command(mode)?;
        bus.initialized = false;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Protocol<I, D>> {
        self.bus.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<I, D> Protocol<I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    /// Full refresh: both RAM planes, normal border, full waveform
    ///
    /// Writing the secondary plane too flushes stale diff data, so a full
    /// refresh always clears ghosting.
    fn full_update(&mut self, frame: &FrameBuffer) -> SequenceResult<I> {
        self.write_frame_to_both_rams(frame)?;
        let sequence = self.config.sequence_full;
        self.trigger_refresh(sequence)
    }

    /// Base map: prime both RAM planes with the same ground image
    ///
    /// Subsequent partial updates diff against this image instead of
    /// whatever the secondary plane last held.
    fn base_map_update(&mut self, frame: &FrameBuffer) -> SequenceResult<I> {
        self.write_frame_to_both_rams(frame)?;
        let sequence = self.config.sequence_full;
        self.trigger_refresh(sequence)
    }

    /// Partial refresh of the stored region (whole frame when unset)
    fn partial_update(&mut self, frame: &FrameBuffer) -> SequenceResult<I> {
        if !self.initialized {
            warn!("partial update refused: display not initialized");
            return Err(Error::NotInitialized);
        }

        let geometry = self.config.geometry;
        let region = self.region.unwrap_or_else(|| Region::covering(geometry));
        if !region.fits(geometry) {
            error!(
                "partial update region {region} exceeds {}x{} panel or is misaligned",
                geometry.width, geometry.height
            );
            return Err(Error::InvalidRegion {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            });
        }

        // Reset pulse keeps the background color from drifting across
        // repeated partial waveforms.
        self.interface.reset(&mut self.delay);
        let init_timeout = self.config.busy_timeout_init_ms;
        self.busy_wait(init_timeout)?;

        // Locked border prevents edge flashing.
        let border = self.config.border_locked;
        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[border])?;

        self.set_ram_window(
            region.x,
            region.y + region.height - 1,
            region.x + region.width - 1,
            region.y,
        )?;

        self.send_command(WRITE_RAM_BW)?;
        let bytes_per_line = geometry.bytes_per_line();
        let mut row = vec![0u8; region.width as usize / 8];
        for y in region.y..region.y + region.height {
            let offset = y as usize * bytes_per_line + region.x as usize / 8;
            frame.copy_bytes(offset, &mut row);
            self.send_data(&row)?;
        }

        let sequence = self.config.sequence_partial;
        self.trigger_refresh(sequence)
    }

    /// Hardware init: reset, soft reset, controller configuration
    fn hw_init(&mut self) -> SequenceResult<I> {
        let geometry = self.config.geometry;
        let init_timeout = self.config.busy_timeout_init_ms;

        self.interface.reset(&mut self.delay);
        self.busy_wait(init_timeout)?;

        self.send_command(SOFT_RESET)?;
        self.busy_wait(init_timeout)?;

        let gates = geometry.height - 1;
        let gate_scan = self.config.gate_scan;
        self.send_command(DRIVER_OUTPUT_CONTROL)?;
        self.send_data(&[(gates & 0xFF) as u8, (gates >> 8) as u8, gate_scan])?;

        let entry_mode = self.config.data_entry_mode;
        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[entry_mode])?;

        self.set_ram_window(0, geometry.height - 1, geometry.width - 1, 0)?;

        let border = self.config.border_normal;
        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[border])?;

        let ctrl1 = self.config.update_ctrl1;
        self.send_command(DISPLAY_UPDATE_CTRL1)?;
        self.send_data(&ctrl1)?;

        let temp_sensor = self.config.temp_sensor;
        self.send_command(TEMP_SENSOR_CONTROL)?;
        self.send_data(&[temp_sensor])?;

        self.busy_wait(init_timeout)?;

        self.initialized = true;
        self.mode = UpdateMode::Full;
        self.region = None;
        info!(
            "initialized {}x{} panel",
            geometry.width, geometry.height
        );
        Ok(())
    }

    /// Blank both RAM planes with an all-white sweep
    ///
    /// Runs under an ascending data entry mode so the sweep goes top to
    /// bottom, and restores the configured entry mode afterwards. The
    /// live frame is never read.
    fn clear_panel(&mut self) -> SequenceResult<I> {
        let geometry = self.config.geometry;

        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[ENTRY_X_INC_Y_INC])?;

        let blank = vec![Color::White.byte(); geometry.frame_size()];
        self.set_ram_window(0, 0, geometry.width - 1, geometry.height - 1)?;
        self.send_command(WRITE_RAM_BW)?;
        self.send_data(&blank)?;

        self.set_ram_window(0, 0, geometry.width - 1, geometry.height - 1)?;
        self.send_command(WRITE_RAM_RED)?;
        self.send_data(&blank)?;

        let border = self.config.border_normal;
        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[border])?;

        let sequence = self.config.sequence_full;
        self.trigger_refresh(sequence)?;

        let entry_mode = self.config.data_entry_mode;
        self.send_command(DATA_ENTRY_MODE)?;
        self.send_data(&[entry_mode])
    }

    /// Request deep sleep and let the controller settle
    fn deep_sleep_command(&mut self, mode: DeepSleepMode) -> SequenceResult<I> {
        self.send_command(DEEP_SLEEP)?;
        self.send_data(&[mode as u8])?;
        self.delay.delay_ms(DEEP_SLEEP_SETTLE_MS);
        Ok(())
    }

    /// Stream the whole frame into both RAM planes, border normal
    fn write_frame_to_both_rams(&mut self, frame: &FrameBuffer) -> SequenceResult<I> {
        let geometry = self.config.geometry;

        self.set_ram_window(0, geometry.height - 1, geometry.width - 1, 0)?;
        let snapshot = frame.snapshot();
        self.send_command(WRITE_RAM_BW)?;
        self.send_data(&snapshot)?;

        // Second plane restarts from freshly programmed counters.
        self.set_ram_window(0, geometry.height - 1, geometry.width - 1, 0)?;
        let snapshot = frame.snapshot();
        self.send_command(WRITE_RAM_RED)?;
        self.send_data(&snapshot)?;

        let border = self.config.border_normal;
        self.send_command(BORDER_WAVEFORM)?;
        self.send_data(&[border])
    }

    /// Program the RAM window and address counters
    ///
    /// Arguments are pixels; X values are divided by 8 because the
    /// controller addresses X per byte. Start/end ordering must match the
    /// data entry mode in effect: under the resident 0x01 mode, Y runs
    /// high-to-low (callers pass `y_start > y_end`), while the clear
    /// sweep temporarily runs ascending.
    fn set_ram_window(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> SequenceResult<I> {
        let x_start = (x_start / 8) as u8;
        let x_end = (x_end / 8) as u8;

        self.send_command(SET_RAM_X_RANGE)?;
        self.send_data(&[x_start, x_end])?;

        self.send_command(SET_RAM_Y_RANGE)?;
        self.send_data(&[
            (y_start & 0xFF) as u8,
            (y_start >> 8) as u8,
            (y_end & 0xFF) as u8,
            (y_end >> 8) as u8,
        ])?;

        self.send_command(SET_RAM_X_COUNTER)?;
        self.send_data(&[x_start])?;

        self.send_command(SET_RAM_Y_COUNTER)?;
        self.send_data(&[(y_start & 0xFF) as u8, (y_start >> 8) as u8])
    }

    /// Select the update sequence, activate, and wait for the waveform
    fn trigger_refresh(&mut self, sequence: u8) -> SequenceResult<I> {
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[sequence])?;
        self.send_command(MASTER_ACTIVATION)?;
        let update_timeout = self.config.busy_timeout_update_ms;
        self.busy_wait(update_timeout)
    }

    fn send_command(&mut self, command: u8) -> SequenceResult<I> {
        self.interface.send_command(command).map_err(Error::Interface)
    }

    fn send_data(&mut self, data: &[u8]) -> SequenceResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    fn busy_wait(&mut self, timeout_ms: u32) -> SequenceResult<I> {
        self.interface
            .busy_wait(&mut self.delay, timeout_ms)
            .map_err(Error::Interface)
    }
}

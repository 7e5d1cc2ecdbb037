//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`]
//! struct for communicating with the SSD1681 controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The SSD1681 requires:
//! - SPI bus (MOSI + SCK)
//! - GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active high), optional; panels
//!     wired without it are assumed always ready

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::{error, warn};

/// Interval between BUSY pin polls, in milliseconds
pub const BUSY_POLL_INTERVAL_MS: u32 = 5;

/// Width of each half of the reset pulse, in milliseconds
pub const RESET_PULSE_MS: u32 = 10;

/// Trait for hardware interface to the SSD1681 controller
///
/// This trait abstracts over different hardware implementations, allowing
/// the [`Epd`](crate::Epd) engine to work with any SPI + GPIO
/// implementation that satisfies embedded-hal traits, and letting tests
/// substitute a recording fake.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin low (command mode)
    /// 2. Send the command byte over SPI
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send data bytes to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin high (data mode)
    /// 2. Send the data bytes over SPI
    ///
    /// An empty payload is a no-op success and must not touch the bus.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Perform a hardware reset pulse
    ///
    /// The implementation must:
    /// 1. Set RST pin low
    /// 2. Wait at least 10ms
    /// 3. Set RST pin high
    /// 4. Wait at least 10ms
    ///
    /// Pin errors are not propagated; a stuck reset line shows up as a
    /// failed busy wait on the next transaction.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Wait for the BUSY pin to go low, with a deadline
    ///
    /// Polls the BUSY pin until it goes low (controller ready) or
    /// `timeout_ms` elapses. BUSY is active high: while high, the
    /// controller is processing a command. A device without a BUSY pin
    /// reports ready immediately.
    ///
    /// # Errors
    ///
    /// Returns a timeout error if BUSY does not go low within
    /// `timeout_ms`.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D, timeout_ms: u32) -> Result<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI write failed
    Spi {
        /// Underlying SPI error
        source: SpiErr,
        /// Number of bytes the write attempted to transfer
        len: usize,
    },
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for the BUSY pin
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi { source, len } => write!(f, "SPI error after {len} byte write: {source:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for the SSD1681
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO
/// traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, DC, RST, BUSY> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active high); `None` means the panel has no busy line
    busy: Option<BUSY>,
}

impl<SPI, DC, RST, BUSY> Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high), or `None` for panels
    ///   wired without one
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: Option<BUSY>) -> Self {
        Self { spi, dc, rst, busy }
    }
}

impl<SPI, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, DC, RST, BUSY>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi.write(&[command]).map_err(|e| {
            error!("failed to send command {command:#04x}: {e:?}");
            InterfaceError::Spi { source: e, len: 1 }
        })?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(|e| {
            error!("failed to send {} data bytes: {e:?}", data.len());
            InterfaceError::Spi {
                source: e,
                len: data.len(),
            }
        })?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        // Reset sequence: LOW -> wait 10ms -> HIGH -> wait 10ms
        let _ = self.rst.set_low();
        delay.delay_ms(RESET_PULSE_MS);
        let _ = self.rst.set_high();
        delay.delay_ms(RESET_PULSE_MS);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D, timeout_ms: u32) -> Result<(), Self::Error> {
        let Some(busy) = self.busy.as_mut() else {
            // No busy line wired: assume the controller is always ready.
            return Ok(());
        };

        let mut elapsed = 0u32;
        loop {
            match busy.is_high() {
                Ok(false) => return Ok(()),
                Ok(true) => {}
                Err(e) => return Err(InterfaceError::Pin(e)),
            }

            if elapsed >= timeout_ms {
                warn!("busy timeout after {timeout_ms} ms");
                return Err(InterfaceError::Timeout);
            }

            delay.delay_ms(BUSY_POLL_INTERVAL_MS);
            elapsed += BUSY_POLL_INTERVAL_MS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl core::fmt::Display for MockError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "mock error")
        }
    }

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    #[derive(Debug, Default)]
    struct MockSpi {
        writes: Vec<Vec<u8>>,
        fail_next: bool,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            if self.fail_next {
                return Err(MockError);
            }
            for op in operations {
                if let embedded_hal::spi::Operation::Write(bytes) = op {
                    self.writes.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    #[derive(Debug)]
    struct MockPin;

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(false)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    /// Busy pin that stays busy forever.
    #[derive(Debug)]
    struct StuckBusyPin;

    impl embedded_hal::digital::ErrorType for StuckBusyPin {
        type Error = MockError;
    }

    impl InputPin for StuckBusyPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(false)
        }
    }

    /// Busy pin that clears after a fixed number of reads.
    #[derive(Debug)]
    struct CountdownBusyPin(u32);

    impl embedded_hal::digital::ErrorType for CountdownBusyPin {
        type Error = MockError;
    }

    impl InputPin for CountdownBusyPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.0 == 0 {
                Ok(false)
            } else {
                self.0 -= 1;
                Ok(true)
            }
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|busy| !busy)
        }
    }

    #[derive(Debug, Default)]
    struct CountingDelay(Rc<RefCell<u32>>);

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn send_data_empty_payload_skips_bus() {
        let mut interface =
            Interface::<_, _, _, MockPin>::new(MockSpi::default(), MockPin, MockPin, None);
        interface.send_data(&[]).unwrap();
        assert!(interface.spi.writes.is_empty());
    }

    #[test]
    fn send_command_writes_one_byte() {
        let mut interface =
            Interface::<_, _, _, MockPin>::new(MockSpi::default(), MockPin, MockPin, None);
        interface.send_command(0x12).unwrap();
        assert_eq!(interface.spi.writes, vec![vec![0x12]]);
    }

    #[test]
    fn send_data_failure_reports_attempted_length() {
        let spi = MockSpi {
            writes: Vec::new(),
            fail_next: true,
        };
        let mut interface = Interface::<_, _, _, MockPin>::new(spi, MockPin, MockPin, None);
        let err = interface.send_data(&[0u8; 7]).unwrap_err();
        assert!(matches!(err, InterfaceError::Spi { len: 7, .. }));
    }

    #[test]
    fn busy_wait_without_pin_is_immediate() {
        let mut interface =
            Interface::<_, _, _, MockPin>::new(MockSpi::default(), MockPin, MockPin, None);
        let polls = Rc::new(RefCell::new(0));
        let mut delay = CountingDelay(Rc::clone(&polls));
        interface.busy_wait(&mut delay, 1_000).unwrap();
        assert_eq!(*polls.borrow(), 0);
    }

    #[test]
    fn busy_wait_times_out_after_deadline() {
        let mut interface =
            Interface::new(MockSpi::default(), MockPin, MockPin, Some(StuckBusyPin));
        let polls = Rc::new(RefCell::new(0));
        let mut delay = CountingDelay(Rc::clone(&polls));

        let err = interface.busy_wait(&mut delay, 100).unwrap_err();
        assert!(matches!(err, InterfaceError::Timeout));
        // The deadline bounds the wait: exactly timeout / poll-interval sleeps.
        assert_eq!(*polls.borrow(), 100 / BUSY_POLL_INTERVAL_MS);
    }

    #[test]
    fn busy_wait_returns_once_ready() {
        let mut interface = Interface::new(
            MockSpi::default(),
            MockPin,
            MockPin,
            Some(CountdownBusyPin(3)),
        );
        let polls = Rc::new(RefCell::new(0));
        let mut delay = CountingDelay(Rc::clone(&polls));

        interface.busy_wait(&mut delay, 1_000).unwrap();
        assert_eq!(*polls.borrow(), 3);
    }
}

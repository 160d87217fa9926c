//! Blocking AS7341 driver
//!
//! [`As7341`] owns the bus, a delay and a [`Clock`]. All state the
//! sensor does not report back on its own (bank selector, measurement
//! mode, last latched channels) is tracked in a [`Session`].
//!
//! Operations are split by concern:
//! - `bank`: bank selection and the scoped bank-1 helper
//! - `gain`: analog gain and integration timing
//! - `smux`: channel multiplexer tables
//! - `measure`: spectral acquisition cycle and channel latch
//! - `flicker`: flicker frequency detection
//! - `led`, `gpio`, `interrupt`: auxiliary peripherals

mod bank;
mod bus;
mod error;
mod flicker;
mod gain;
mod gpio;
mod interrupt;
mod led;
mod measure;
mod smux;

#[cfg(test)]
pub(crate) mod sim;

pub use bank::Bank;
pub use bus::Bus;
pub use error::Error;
pub use interrupt::InterruptStatus;
pub use led::led_drive_code;
pub use measure::MeasureOutcome;

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::SensorConfig;
use crate::domain::{ChannelData, Gain, IntegrationTiming, MeasureMode};
use crate::poll::{self, PollPolicy};
use crate::ports::Clock;
use crate::registers::*;

/// Driver-side view of the device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    mode: MeasureMode,
    gain: Gain,
    timing: IntegrationTiming,
    connected: bool,
    bank: Bank,
    channels: ChannelData,
}

impl Session {
    fn new() -> Self {
        Self {
            mode: MeasureMode::Spm,
            gain: Gain::default(),
            timing: IntegrationTiming::default(),
            connected: false,
            bank: Bank::Bank0,
            channels: ChannelData::default(),
        }
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    /// Last gain written through the driver
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Last ATIME/ASTEP written through the driver
    pub fn timing(&self) -> IntegrationTiming {
        self.timing
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    /// Channels from the most recent completed cycle
    pub fn channels(&self) -> &ChannelData {
        &self.channels
    }
}

pub struct As7341<I2C, D, C> {
    bus: Bus<I2C, D>,
    clock: C,
    session: Session,
}

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Driver for a sensor at the default address (0x39)
    pub fn new(i2c: I2C, delay: D, clock: C) -> Self {
        Self::with_address(i2c, delay, clock, I2C_ADDR)
    }

    pub fn with_address(i2c: I2C, delay: D, clock: C, address: u8) -> Self {
        Self {
            bus: Bus::new(i2c, delay, address),
            clock,
            session: Session::new(),
        }
    }

    /// Give back the bus and delay
    pub fn release(self) -> (I2C, D) {
        self.bus.release()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_connected(&self) -> bool {
        self.session.connected
    }

    /// Current time from the driver's clock
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Power on and check the device identity.
    ///
    /// A mismatching ID marks the session disconnected and returns
    /// [`Error::DeviceNotPresent`] with the value read. Other calls keep
    /// working regardless.
    pub fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        self.session.connected = false;
        self.bus.write_byte(ENABLE, ENABLE_PON)?;
        self.bus.delay_ms(POWER_ON_SETTLE_MS);

        let id = self.bus.read_byte(ID)?;
        if id & ID_MASK != ID_VALUE {
            error!("AS7341 not found at {:#x}: ID {:#x}", self.bus.address(), id);
            return Err(Error::DeviceNotPresent(id));
        }

        self.session.connected = true;
        info!("AS7341 detected (ID {:#x})", id);
        Ok(())
    }

    /// [`begin`](Self::begin), then apply every field of `config`
    pub fn init_with_config(&mut self, config: &SensorConfig) -> Result<(), Error<I2C::Error>> {
        self.begin()?;
        self.set_measure_mode(config.mode)?;
        self.set_gain(config.gain.code())?;
        self.set_atime(config.timing.atime)?;
        self.set_astep(config.timing.astep)?;
        match config.led_current_ma {
            Some(ma) => {
                self.set_led_current(ma)?;
                self.enable_led(true)?;
            }
            None => self.enable_led(false)?,
        }
        Ok(())
    }

    /// Write the bank-1 CONFIG mode bits
    pub fn set_measure_mode(&mut self, mode: MeasureMode) -> Result<(), Error<I2C::Error>> {
        self.with_bank1(|bus| {
            let config = bus.read_byte(CONFIG)?;
            bus.write_byte(CONFIG, (config & !CONFIG_MODE_MASK) | mode.bits())
        })?;
        self.session.mode = mode;
        Ok(())
    }

    /// Clear CONFIG (mode, LED and interrupt routing), then power down
    pub fn disable(&mut self) -> Result<(), Error<I2C::Error>> {
        self.with_bank1(|bus| bus.write_byte(CONFIG, 0x00))?;
        self.bus.write_byte(ENABLE, 0x00)?;
        self.session.mode = MeasureMode::Spm;
        self.session.connected = false;
        Ok(())
    }

    /// Read `reg` until `check` accepts its value or `policy` expires,
    /// sleeping through the driver's delay in between.
    ///
    /// A failed read counts as a flag that is not set yet: it is logged and
    /// polling continues, so bus trouble ends in a timeout rather than an
    /// error.
    fn poll_register<T>(
        &mut self,
        policy: PollPolicy,
        reg: u8,
        mut check: impl FnMut(u8) -> Option<T>,
    ) -> Option<T> {
        let polled: Result<Option<T>, Infallible> = poll::retry_with_deadline(
            &self.clock,
            &mut self.bus,
            policy,
            |bus, ms| bus.delay_ms(ms),
            |bus| {
                Ok(match bus.read_byte(reg) {
                    Ok(value) => check(value),
                    Err(_) => {
                        warn!("read of {:#x} failed while polling", reg);
                        None
                    }
                })
            },
        );
        polled.unwrap_or_else(|never| match never {})
    }
}

//! Analog gain and integration timing

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::domain::{Gain, IntegrationTiming};
use crate::ports::Clock;
use crate::registers::{ASTEP, ATIME, CFG_1, CFG_1_AGAIN_MASK};

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Write gain code `0..=10` to CFG_1.
    ///
    /// Out-of-range codes return [`Error::InvalidParameter`] without touching
    /// the bus.
    pub fn set_gain(&mut self, code: u8) -> Result<(), Error<I2C::Error>> {
        let gain = Gain::new(code).ok_or(Error::InvalidParameter)?;
        self.write_gain(gain)
    }

    pub fn write_gain(&mut self, gain: Gain) -> Result<(), Error<I2C::Error>> {
        self.bus.write_byte(CFG_1, gain.code())?;
        self.session.gain = gain;
        Ok(())
    }

    /// Gain currently configured in the sensor
    pub fn gain(&mut self) -> Result<Gain, Error<I2C::Error>> {
        let code = self.bus.read_byte(CFG_1)? & CFG_1_AGAIN_MASK;
        Gain::new(code).ok_or(Error::UnexpectedRegisterValue(code))
    }

    /// Multiplier for the configured gain, read back from the sensor
    pub fn gain_factor(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(self.gain()?.factor())
    }

    /// Apply the highest gain whose factor does not exceed `factor`
    pub fn set_gain_by_factor(&mut self, factor: f32) -> Result<Gain, Error<I2C::Error>> {
        let gain = Gain::floor_from_factor(factor);
        self.write_gain(gain)?;
        debug!("gain x{} requested, using code {}", factor, gain.code());
        Ok(gain)
    }

    pub fn set_atime(&mut self, atime: u8) -> Result<(), Error<I2C::Error>> {
        self.bus.write_byte(ATIME, atime)?;
        self.session.timing.atime = atime;
        Ok(())
    }

    pub fn set_astep(&mut self, astep: u16) -> Result<(), Error<I2C::Error>> {
        self.bus.write_word(ASTEP, astep)?;
        self.session.timing.astep = astep;
        Ok(())
    }

    /// ATIME and ASTEP as read back from the sensor
    pub fn integration_timing(&mut self) -> Result<IntegrationTiming, Error<I2C::Error>> {
        let atime = self.bus.read_byte(ATIME)?;
        let astep = self.bus.read_word(ASTEP)?;
        Ok(IntegrationTiming::new(atime, astep))
    }

    pub fn integration_time_ms(&mut self) -> Result<f32, Error<I2C::Error>> {
        Ok(self.integration_timing()?.integration_time_ms())
    }

    /// Pick the ATIME closest to `ms` at the current ASTEP and write it.
    ///
    /// Returns the timing that was applied. NaN and non-positive times are
    /// rejected before any bus access.
    pub fn set_integration_time_ms(
        &mut self,
        ms: f32,
    ) -> Result<IntegrationTiming, Error<I2C::Error>> {
        if ms.is_nan() || ms <= 0.0 {
            return Err(Error::InvalidParameter);
        }
        let astep = self.bus.read_word(ASTEP)?;
        let atime = IntegrationTiming::atime_for_ms(ms, astep);
        self.set_atime(atime)?;
        self.session.timing.astep = astep;
        Ok(IntegrationTiming::new(atime, astep))
    }
}

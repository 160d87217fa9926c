//! Interrupts, spectral thresholds and wait time

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::domain::MeasureMode;
use crate::ports::Clock;
use crate::registers::*;

/// Snapshot of the STATUS register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus(pub u8);

impl InterruptStatus {
    /// System interrupt (SYNS edge, GPIO)
    pub const fn system(self) -> bool {
        self.0 & STATUS_SINT != 0
    }

    pub const fn calibration(self) -> bool {
        self.0 & STATUS_C_INT != 0
    }

    pub const fn flicker(self) -> bool {
        self.0 & STATUS_FINT != 0
    }

    /// Spectral threshold crossed
    pub const fn spectral(self) -> bool {
        self.0 & STATUS_AINT != 0
    }

    pub const fn saturated(self) -> bool {
        self.0 & STATUS_ASAT != 0
    }
}

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    pub fn interrupt_status(&mut self) -> Result<InterruptStatus, Error<I2C::Error>> {
        Ok(InterruptStatus(self.bus.read_byte(STATUS)?))
    }

    /// Clear every pending interrupt (STATUS is write-1-to-clear)
    pub fn clear_interrupt(&mut self) -> Result<(), Error<I2C::Error>> {
        self.bus.write_byte(STATUS, STATUS_CLEAR_ALL)
    }

    pub fn set_spectral_interrupt(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(INTENAB, INTENAB_SP_IEN, enable)
    }

    /// Consecutive out-of-threshold cycles before AINT fires (0..=15)
    pub fn set_interrupt_persistence(&mut self, cycles: u8) -> Result<(), Error<I2C::Error>> {
        if cycles > 0x0F {
            return Err(Error::InvalidParameter);
        }
        self.bus.write_byte(PERS, cycles)
    }

    /// ADC channel (0..=4) compared against the spectral thresholds
    pub fn set_spectral_threshold_channel(&mut self, channel: u8) -> Result<(), Error<I2C::Error>> {
        if channel > 4 {
            return Err(Error::InvalidParameter);
        }
        self.bus.write_byte(CFG_12, channel)
    }

    /// Write both thresholds. Requires `low < high`; otherwise nothing is
    /// written.
    pub fn set_thresholds(&mut self, low: u16, high: u16) -> Result<(), Error<I2C::Error>> {
        if low >= high {
            return Err(Error::InvalidParameter);
        }
        self.bus.write_word(SP_TH_LOW, low)?;
        self.bus.write_word(SP_TH_HIGH, high)
    }

    /// (low, high)
    pub fn thresholds(&mut self) -> Result<(u16, u16), Error<I2C::Error>> {
        let low = self.bus.read_word(SP_TH_LOW)?;
        let high = self.bus.read_word(SP_TH_HIGH)?;
        Ok((low, high))
    }

    /// Switch to SYNS mode with the interrupt pin as the sync input
    pub fn set_syns_interrupt(&mut self) -> Result<(), Error<I2C::Error>> {
        self.with_bank1(|bus| {
            let config = bus.read_byte(CONFIG)?;
            let config = (config & !CONFIG_MODE_MASK) | CONFIG_INT_SEL | MeasureMode::Syns.bits();
            bus.write_byte(CONFIG, config)
        })?;
        self.session.mode = MeasureMode::Syns;
        Ok(())
    }

    /// Insert WTIME between consecutive measurements
    pub fn set_wait(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(ENABLE, ENABLE_WEN, enable)
    }

    pub fn set_wait_time(&mut self, wtime: u8) -> Result<(), Error<I2C::Error>> {
        self.bus.write_byte(WTIME, wtime)
    }
}

#[cfg(test)]
mod tests {
    use super::super::sim;
    use super::*;

    #[test]
    fn test_status_decoding() {
        let status = InterruptStatus(STATUS_AINT | STATUS_ASAT);
        assert!(status.spectral());
        assert!(status.saturated());
        assert!(!status.flicker());
        assert!(!status.system());
        assert!(!status.calibration());
    }

    #[test]
    fn test_clear_interrupt_writes_all_ones() {
        let (mut drv, sim, _) = sim::driver();
        sim.set_reg(STATUS, STATUS_AINT | STATUS_SINT);
        assert!(drv.interrupt_status().unwrap().spectral());
        drv.clear_interrupt().unwrap();
        assert_eq!(sim.writes_to(STATUS), [std::vec![0xFF]]);
        assert_eq!(drv.interrupt_status(), Ok(InterruptStatus(0)));
    }

    #[test]
    fn test_thresholds_roundtrip() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_thresholds(100, 4000).unwrap();
        assert_eq!(sim.writes_to(SP_TH_LOW), [std::vec![100, 0]]);
        assert_eq!(sim.writes_to(SP_TH_HIGH), [std::vec![0xA0, 0x0F]]);
        assert_eq!(drv.thresholds(), Ok((100, 4000)));
    }

    #[test]
    fn test_thresholds_require_low_below_high() {
        let (mut drv, sim, _) = sim::driver();
        assert_eq!(drv.set_thresholds(500, 500), Err(Error::InvalidParameter));
        assert_eq!(drv.set_thresholds(600, 500), Err(Error::InvalidParameter));
        assert_eq!(sim.transfer_count(), 0);
    }

    #[test]
    fn test_persistence_and_channel_ranges() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_interrupt_persistence(15).unwrap();
        assert_eq!(sim.reg(PERS), 15);
        drv.set_spectral_threshold_channel(4).unwrap();
        assert_eq!(sim.reg(CFG_12), 4);
        sim.clear_log();

        assert_eq!(drv.set_interrupt_persistence(16), Err(Error::InvalidParameter));
        assert_eq!(drv.set_spectral_threshold_channel(5), Err(Error::InvalidParameter));
        assert_eq!(sim.transfer_count(), 0);
    }

    #[test]
    fn test_spectral_interrupt_enable() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_spectral_interrupt(true).unwrap();
        assert_eq!(sim.reg(INTENAB), INTENAB_SP_IEN);
        drv.set_spectral_interrupt(false).unwrap();
        assert_eq!(sim.reg(INTENAB), 0);
    }

    #[test]
    fn test_syns_interrupt_sets_mode() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_syns_interrupt().unwrap();
        assert_eq!(sim.bank1_reg(CONFIG), CONFIG_INT_SEL | 0x01);
        assert_eq!(drv.session().mode(), MeasureMode::Syns);
        assert!(!sim.bank1_selected());
    }

    #[test]
    fn test_wait_settings() {
        let (mut drv, sim, _) = sim::driver();
        sim.set_reg(ENABLE, ENABLE_PON);
        drv.set_wait(true).unwrap();
        drv.set_wait_time(0x40).unwrap();
        assert_eq!(sim.reg(ENABLE), ENABLE_PON | ENABLE_WEN);
        assert_eq!(sim.reg(WTIME), 0x40);
    }
}

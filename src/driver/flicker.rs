//! Flicker frequency detection
//!
//! Routes the flicker photodiode through SMUX, enables FDEN and polls
//! FD_STATUS in two phases: first for a valid measurement, then for a
//! finished 100/120 Hz calculation. FDEN is switched off and the result
//! bits cleared however the cycle ends.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::domain::{ChannelGroup, FlickerFrequency, FlickerStatus};
use crate::poll::STATUS_POLL;
use crate::ports::Clock;
use crate::registers::{ENABLE, ENABLE_FDEN, FD_STATUS, FD_STATUS_CLEAR};

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    pub fn set_flicker_detection(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(ENABLE, ENABLE_FDEN, enable)
    }

    pub fn flicker_status(&mut self) -> Result<FlickerStatus, Error<I2C::Error>> {
        Ok(FlickerStatus(self.bus.read_byte(FD_STATUS)?))
    }

    /// Run one flicker detection cycle.
    ///
    /// Either poll phase timing out, or FD_STATUS being unreadable, yields
    /// [`FlickerFrequency::Undetermined`]. Errors while setting the cycle up
    /// are returned after the cleanup has been attempted. A failed cleanup
    /// is logged and does not change the result.
    pub fn flicker_frequency(&mut self) -> Result<FlickerFrequency, Error<I2C::Error>> {
        let result = self.run_flicker_cycle();
        self.finish_flicker_cycle();
        let frequency = result?;
        info!("flicker: {} Hz", frequency.hz());
        Ok(frequency)
    }

    fn run_flicker_cycle(&mut self) -> Result<FlickerFrequency, Error<I2C::Error>> {
        self.prepare_acquisition(ChannelGroup::Flicker)?;
        self.set_smux(true)?;
        self.wait_smux_applied();
        self.set_spectral_measurement(true)?;
        self.set_flicker_detection(true)?;

        let measured = self.poll_register(STATUS_POLL, FD_STATUS, |raw| {
            let status = FlickerStatus(raw);
            status.measurement_valid().then_some(status)
        });
        if measured.is_none() {
            warn!("flicker measurement did not become valid");
            return Ok(FlickerFrequency::Undetermined);
        }

        let calculated = self.poll_register(STATUS_POLL, FD_STATUS, |raw| {
            let status = FlickerStatus(raw);
            status.calculation_valid().then_some(status)
        });
        let Some(status) = calculated else {
            warn!("flicker calculation did not complete");
            return Ok(FlickerFrequency::Undetermined);
        };
        if status.saturated() {
            warn!("flicker photodiode saturated");
        }
        Ok(status.frequency())
    }

    /// FDEN off, then clear the result and valid bits. Both writes are
    /// attempted.
    fn finish_flicker_cycle(&mut self) {
        if self.set_flicker_detection(false).is_err() {
            warn!("flicker cleanup: FDEN not cleared");
        }
        if self.bus.write_byte(FD_STATUS, FD_STATUS_CLEAR).is_err() {
            warn!("flicker cleanup: FD_STATUS not cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::sim;
    use super::*;
    use crate::registers::{
        CFG_6, ENABLE_SP_EN, FD_STATUS_100HZ, FD_STATUS_100_VALID, FD_STATUS_120HZ,
        FD_STATUS_120_VALID,
        FD_STATUS_MEAS_VALID, SMUX_FD, SMUX_RAM,
    };

    const MEAS: u8 = FD_STATUS_MEAS_VALID;

    type Outcome = Result<FlickerFrequency, Error<embedded_hal::i2c::ErrorKind>>;

    fn run(script: &[u8]) -> (Outcome, sim::SimAs7341, u64) {
        let (mut drv, sim, time) = sim::driver();
        sim.state().fd_script.extend(script.iter().copied());
        let result = drv.flicker_frequency();
        (result, sim, time.now_ms())
    }

    fn assert_cleaned_up(sim: &sim::SimAs7341) {
        assert_eq!(sim.reg(ENABLE) & ENABLE_FDEN, 0);
        assert_eq!(sim.writes_to(FD_STATUS).last(), Some(&std::vec![FD_STATUS_CLEAR]));
    }

    #[test]
    fn test_detects_100hz() {
        let (result, sim, _) = run(&[0, MEAS, MEAS, MEAS | FD_STATUS_100_VALID | FD_STATUS_100HZ]);
        assert_eq!(result, Ok(FlickerFrequency::Hz100));
        assert_eq!(sim.writes_to(SMUX_RAM), [SMUX_FD.to_vec()]);
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_detects_120hz() {
        let (result, sim, _) = run(&[MEAS | FD_STATUS_120_VALID | FD_STATUS_120HZ]);
        assert_eq!(result, Ok(FlickerFrequency::Hz120));
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_100hz_has_priority() {
        let all =
            MEAS | FD_STATUS_100_VALID | FD_STATUS_100HZ | FD_STATUS_120_VALID | FD_STATUS_120HZ;
        let (result, _, _) = run(&[all]);
        assert_eq!(result, Ok(FlickerFrequency::Hz100));
    }

    #[test]
    fn test_valid_without_detection_is_undetermined() {
        let (result, sim, _) = run(&[MEAS | FD_STATUS_100_VALID | FD_STATUS_120_VALID]);
        assert_eq!(result, Ok(FlickerFrequency::Undetermined));
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_phase1_timeout() {
        let (result, sim, elapsed) = run(&[]);
        assert_eq!(result, Ok(FlickerFrequency::Undetermined));
        // table settle + one full poll window
        assert!((1100..=1150).contains(&elapsed), "elapsed {elapsed} ms");
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_phase2_timeout() {
        let (result, sim, elapsed) = run(&[MEAS]);
        assert_eq!(result, Ok(FlickerFrequency::Undetermined));
        // phase 1 passes on the first read, phase 2 runs its full window
        assert!((1100..=1150).contains(&elapsed), "elapsed {elapsed} ms");
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_slow_phase1_then_phase2_timeout() {
        let mut script = std::vec![0u8; 50];
        script.push(MEAS);
        let (result, sim, elapsed) = run(&script);
        assert_eq!(result, Ok(FlickerFrequency::Undetermined));
        // settle + 500 ms in phase 1 + full phase 2 window
        assert!((1600..=1650).contains(&elapsed), "elapsed {elapsed} ms");
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_unreadable_status_is_undetermined() {
        let (mut drv, sim, time) = sim::driver();
        sim.state().fd_script.extend([MEAS | FD_STATUS_100_VALID | FD_STATUS_100HZ]);
        sim.state().fail_reg = Some(FD_STATUS);

        let result = drv.flicker_frequency();

        assert_eq!(result, Ok(FlickerFrequency::Undetermined));
        assert!((1100..=1150).contains(&time.now_ms()), "elapsed {} ms", time.now_ms());
        // FDEN cleared even though the status clear failed
        assert_eq!(sim.reg(ENABLE) & ENABLE_FDEN, 0);
        assert_ne!(sim.reg(ENABLE) & ENABLE_SP_EN, 0);
    }

    #[test]
    fn test_cleanup_runs_after_setup_error() {
        let (mut drv, sim, _) = sim::driver();
        sim.state().fail_reg = Some(CFG_6);
        let result = drv.flicker_frequency();
        assert!(matches!(result, Err(Error::I2c(_))));
        assert_cleaned_up(&sim);
    }

    #[test]
    fn test_set_flicker_detection_bit6() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_flicker_detection(true).unwrap();
        assert_eq!(sim.reg(ENABLE), ENABLE_FDEN);
        drv.set_flicker_detection(false).unwrap();
        assert_eq!(sim.reg(ENABLE), 0);
    }
}

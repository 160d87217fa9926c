//! Spectral acquisition
//!
//! One cycle: leave low-power, stop any running measurement, route the
//! requested channel group through SMUX, enable, wait for AVALID and latch
//! all six channels in a single burst starting at ASTATUS.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::domain::{ChannelData, ChannelGroup, LATCH_LEN};
use crate::poll::STATUS_POLL;
use crate::ports::Clock;
use crate::registers::{
    ASTATUS, CFG_0, CFG_0_LOW_POWER, ENABLE, ENABLE_SP_EN, STATUS_2, STATUS_2_AVALID,
};

/// Result of one acquisition cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasureOutcome {
    /// Data latched and stored in the session
    Completed(ChannelData),
    /// AVALID did not rise before the poll ceiling; session data unchanged
    TimedOut,
    /// Synchronised mode: the measurement starts on the GPIO edge, read it
    /// later with [`As7341::read_spectral_data`]
    Armed,
}

impl MeasureOutcome {
    pub fn data(&self) -> Option<&ChannelData> {
        match self {
            Self::Completed(data) => Some(data),
            _ => None,
        }
    }
}

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    pub fn set_spectral_measurement(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(ENABLE, ENABLE_SP_EN, enable)
    }

    /// AVALID: a completed cycle is waiting to be latched
    pub fn measurement_completed(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.bus.read_byte(STATUS_2)? & STATUS_2_AVALID != 0)
    }

    /// Leave low-power, stop the engine and load `group`'s routing table
    pub(super) fn prepare_acquisition(
        &mut self,
        group: ChannelGroup,
    ) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(CFG_0, CFG_0_LOW_POWER, false)?;
        self.set_spectral_measurement(false)?;
        self.select_channel_group(group)
    }

    /// Run one acquisition cycle on `group`.
    ///
    /// In SPM mode this blocks until AVALID (10 ms steps, 1 s ceiling). In
    /// SYNS/SYND the GPIO pin is configured as the start trigger and the
    /// call returns [`MeasureOutcome::Armed`] straight away.
    pub fn start_measure(
        &mut self,
        group: ChannelGroup,
    ) -> Result<MeasureOutcome, Error<I2C::Error>> {
        self.prepare_acquisition(group)?;

        let synchronized = self.session.mode.is_synchronized();
        if synchronized {
            self.set_gpio_input(true)?;
        }

        self.set_smux(true)?;
        self.wait_smux_applied();
        self.set_spectral_measurement(true)?;

        if synchronized {
            debug!("{} armed, waiting for sync edge", group.name());
            return Ok(MeasureOutcome::Armed);
        }

        let completed = self.poll_register(STATUS_POLL, STATUS_2, |status| {
            (status & STATUS_2_AVALID != 0).then_some(())
        });
        if completed.is_none() {
            warn!("{} measurement timed out", group.name());
            return Ok(MeasureOutcome::TimedOut);
        }

        self.read_spectral_data().map(MeasureOutcome::Completed)
    }

    /// Latch ASTATUS and CH0..CH5 in one burst and store the result.
    pub fn read_spectral_data(&mut self) -> Result<ChannelData, Error<I2C::Error>> {
        let mut raw = [0u8; LATCH_LEN];
        self.bus.read_block(ASTATUS, &mut raw)?;
        let data = ChannelData::from_latch(&raw);
        if data.saturated() {
            warn!("analog saturation (ASTATUS {:#x})", data.astatus);
        }
        self.session.channels = data;
        Ok(data)
    }

    /// Channels from the last completed cycle, without bus access
    pub fn channel_data(&self) -> &ChannelData {
        &self.session.channels
    }

    /// Single ADC slot from the last completed cycle
    pub fn channel(&self, index: usize) -> Option<u16> {
        self.session.channels.channel(index)
    }
}

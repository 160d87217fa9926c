//! SMUX channel routing
//!
//! Loading a table is a two step write: the SMUX write command goes to
//! CFG_6, then the 20-byte table is burst into RAM at 0x00. The table only
//! takes effect once SMUXEN is set, and the sensor clears SMUXEN when done.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::domain::ChannelGroup;
use crate::poll::STATUS_POLL;
use crate::ports::Clock;
use crate::registers::{CFG_6, CFG_6_SMUX_CMD_WRITE, ENABLE, ENABLE_SMUXEN, SMUX_RAM};

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Load the routing table for `group`
    pub fn select_channel_group(&mut self, group: ChannelGroup) -> Result<(), Error<I2C::Error>> {
        self.bus.write_byte(CFG_6, CFG_6_SMUX_CMD_WRITE)?;
        self.bus.write_burst(SMUX_RAM, group.smux_table())?;
        trace!("SMUX table {} loaded", group.name());
        Ok(())
    }

    /// Same as [`select_channel_group`](Self::select_channel_group), by name.
    ///
    /// Unknown names fail with [`Error::UnknownChannelGroup`] before any
    /// bus traffic.
    pub fn select_channel_group_by_name(&mut self, name: &str) -> Result<(), Error<I2C::Error>> {
        let Some(group) = ChannelGroup::from_name(name) else {
            warn!("unknown SMUX group name");
            return Err(Error::UnknownChannelGroup);
        };
        self.select_channel_group(group)
    }

    pub fn set_smux(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(ENABLE, ENABLE_SMUXEN, enable)
    }

    /// Wait for the sensor to clear SMUXEN after applying a table.
    ///
    /// Returns `false` if the bit was still set at the poll ceiling, or
    /// could not be read back.
    pub fn wait_smux_applied(&mut self) -> bool {
        let done = self.poll_register(STATUS_POLL, ENABLE, |enable| {
            (enable & ENABLE_SMUXEN == 0).then_some(())
        });
        if done.is_none() {
            warn!("SMUX apply did not complete within {} ms", STATUS_POLL.timeout_ms);
        }
        done.is_some()
    }
}

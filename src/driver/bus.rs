//! Register access layer
//!
//! Byte, word and burst transfers against one device address, plus the
//! read-modify-write helper everything else is built on. Word and burst
//! writes block for the settle time the sensor needs before the value is
//! latched.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::Error;
use crate::registers::{BURST_SETTLE_MS, MAX_BURST_LEN, WORD_SETTLE_MS};

/// Owns the I2C peripheral and the delay used for settle times.
pub struct Bus<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> Bus<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Read a single byte from `reg`.
    pub fn read_byte(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian word starting at `reg` (first byte is the low byte).
    pub fn read_word(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read `buf.len()` consecutive registers starting at `reg` in one transfer.
    pub fn read_block(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.i2c.write_read(self.address, &[reg], buf)?;
        Ok(())
    }

    pub fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }

    /// Write a word low byte first, then wait for it to latch.
    pub fn write_word(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c.write(self.address, &[reg, lo, hi])?;
        self.delay.delay_ms(WORD_SETTLE_MS);
        Ok(())
    }

    /// Write up to [`MAX_BURST_LEN`] bytes starting at `reg`, then wait for
    /// the block to latch.
    pub fn write_burst(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        if data.len() > MAX_BURST_LEN {
            return Err(Error::InvalidParameter);
        }
        let mut buf = [0u8; MAX_BURST_LEN + 1];
        buf[0] = reg;
        buf[1..=data.len()].copy_from_slice(data);
        self.i2c.write(self.address, &buf[..=data.len()])?;
        self.delay.delay_ms(BURST_SETTLE_MS);
        Ok(())
    }

    /// Set (`set == true`) or clear the bits in `mask`, leaving the rest untouched.
    pub fn modify_register(
        &mut self,
        reg: u8,
        mask: u8,
        set: bool,
    ) -> Result<(), Error<I2C::Error>> {
        let current = self.read_byte(reg)?;
        let updated = if set { current | mask } else { current & !mask };
        self.write_byte(reg, updated)
    }
}

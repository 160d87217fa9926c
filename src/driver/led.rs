//! LED driver (bank 1)

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::ports::Clock;
use crate::registers::{CONFIG, CONFIG_LED_SEL, LED, LED_ACT, LED_DRIVE_MASK};

pub const LED_MIN_MA: u16 = 4;
pub const LED_MAX_MA: u16 = 258;

/// LED_DRIVE field for `ma`, clamped to 4..=258 mA in 2 mA steps
pub fn led_drive_code(ma: u16) -> u8 {
    ((ma.clamp(LED_MIN_MA, LED_MAX_MA) - LED_MIN_MA) / 2) as u8
}

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Route the LDR pin to the LED driver and switch it on or off
    pub fn enable_led(&mut self, on: bool) -> Result<(), Error<I2C::Error>> {
        self.with_bank1(|bus| {
            bus.modify_register(CONFIG, CONFIG_LED_SEL, on)?;
            bus.modify_register(LED, LED_ACT, on)
        })
    }

    /// Set the drive current, keeping the on/off bit as it is
    pub fn set_led_current(&mut self, ma: u16) -> Result<(), Error<I2C::Error>> {
        let code = led_drive_code(ma);
        self.with_bank1(|bus| {
            let led = bus.read_byte(LED)?;
            bus.write_byte(LED, (led & !LED_DRIVE_MASK) | code)
        })
    }
}

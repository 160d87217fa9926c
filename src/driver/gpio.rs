//! GPIO pin control (GPIO_2)

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Error};
use crate::ports::Clock;
use crate::registers::{
    GPIO_2, GPIO_2_GPIO_IN, GPIO_2_GPIO_IN_EN, GPIO_2_GPIO_INV, GPIO_2_GPIO_OUT,
};

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Use the pin as an input (sync trigger in SYNS/SYND)
    pub fn set_gpio_input(&mut self, enable: bool) -> Result<(), Error<I2C::Error>> {
        if enable {
            self.bus.write_byte(GPIO_2, GPIO_2_GPIO_IN_EN)
        } else {
            self.bus.modify_register(GPIO_2, GPIO_2_GPIO_IN_EN, false)
        }
    }

    /// Level on the pin when configured as input
    pub fn gpio_value(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.bus.read_byte(GPIO_2)? & GPIO_2_GPIO_IN != 0)
    }

    /// Drive the pin as an open-drain output
    pub fn set_gpio_output(&mut self, inverted: bool) -> Result<(), Error<I2C::Error>> {
        let mut value = GPIO_2_GPIO_OUT;
        if inverted {
            value |= GPIO_2_GPIO_INV;
        }
        self.bus.write_byte(GPIO_2, value)
    }

    pub fn set_gpio_inverted(&mut self, inverted: bool) -> Result<(), Error<I2C::Error>> {
        self.bus.modify_register(GPIO_2, GPIO_2_GPIO_INV, inverted)
    }

    /// Write the low nibble of GPIO_2 directly
    pub fn set_gpio_mask(&mut self, mask: u8) -> Result<(), Error<I2C::Error>> {
        self.bus.write_byte(GPIO_2, mask & 0x0F)
    }
}

#[cfg(test)]
mod tests {
    use super::super::sim;
    use super::*;

    #[test]
    fn test_gpio_input_enable_and_disable() {
        let (mut drv, sim, _) = sim::driver();
        sim.set_reg(GPIO_2, GPIO_2_GPIO_INV);
        drv.set_gpio_input(true).unwrap();
        assert_eq!(sim.reg(GPIO_2), GPIO_2_GPIO_IN_EN);

        sim.set_reg(GPIO_2, GPIO_2_GPIO_IN_EN | GPIO_2_GPIO_INV);
        drv.set_gpio_input(false).unwrap();
        assert_eq!(sim.reg(GPIO_2), GPIO_2_GPIO_INV);
    }

    #[test]
    fn test_gpio_value_reads_bit0() {
        let (mut drv, sim, _) = sim::driver();
        sim.set_reg(GPIO_2, GPIO_2_GPIO_IN_EN);
        assert_eq!(drv.gpio_value(), Ok(false));
        sim.set_reg(GPIO_2, GPIO_2_GPIO_IN_EN | GPIO_2_GPIO_IN);
        assert_eq!(drv.gpio_value(), Ok(true));
    }

    #[test]
    fn test_gpio_output_and_inversion() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_gpio_output(false).unwrap();
        assert_eq!(sim.reg(GPIO_2), GPIO_2_GPIO_OUT);
        drv.set_gpio_output(true).unwrap();
        assert_eq!(sim.reg(GPIO_2), GPIO_2_GPIO_OUT | GPIO_2_GPIO_INV);
        drv.set_gpio_inverted(false).unwrap();
        assert_eq!(sim.reg(GPIO_2), GPIO_2_GPIO_OUT);
    }

    #[test]
    fn test_gpio_mask_keeps_low_nibble() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_gpio_mask(0xF6).unwrap();
        assert_eq!(sim.reg(GPIO_2), 0x06);
    }
}

//! Register bank selection
//!
//! CONFIG, GPIO and LED (0x70..0x74) are only visible with CFG_0.REG_BANK
//! set. The bit is sticky, so every bank-1 access goes through
//! [`As7341::with_bank1`], which always switches back.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{As7341, Bus, Error};
use crate::ports::Clock;
use crate::registers::{CFG_0, CFG_0_REG_BANK};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Registers 0x80 and above
    #[default]
    Bank0,
    /// Registers 0x60..0x74
    Bank1,
}

impl<I2C, D, C> As7341<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    pub fn set_bank(&mut self, bank: Bank) -> Result<(), Error<I2C::Error>> {
        self.bus
            .modify_register(CFG_0, CFG_0_REG_BANK, bank == Bank::Bank1)?;
        self.session.bank = bank;
        Ok(())
    }

    /// Run `f` with bank 1 selected.
    ///
    /// Bank 0 is restored afterwards even if `f` fails; the first error is
    /// the one returned.
    pub fn with_bank1<R>(
        &mut self,
        f: impl FnOnce(&mut Bus<I2C, D>) -> Result<R, Error<I2C::Error>>,
    ) -> Result<R, Error<I2C::Error>> {
        self.set_bank(Bank::Bank1)?;
        let result = f(&mut self.bus);
        let restored = self.set_bank(Bank::Bank0);
        match (result, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => {
                warn!("failed to restore register bank 0");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::sim;
    use super::*;
    use crate::registers::{CONFIG, LED};

    #[test]
    fn test_set_bank_tracks_selector() {
        let (mut drv, sim, _) = sim::driver();
        drv.set_bank(Bank::Bank1).unwrap();
        assert!(sim.bank1_selected());
        assert_eq!(drv.session().bank(), Bank::Bank1);
        drv.set_bank(Bank::Bank0).unwrap();
        assert!(!sim.bank1_selected());
        assert_eq!(drv.session().bank(), Bank::Bank0);
    }

    #[test]
    fn test_set_bank_preserves_other_cfg0_bits() {
        let (mut drv, sim, _) = sim::driver();
        sim.set_reg(CFG_0, 0x24);
        drv.set_bank(Bank::Bank1).unwrap();
        assert_eq!(sim.reg(CFG_0), 0x34);
        drv.set_bank(Bank::Bank0).unwrap();
        assert_eq!(sim.reg(CFG_0), 0x24);
    }

    #[test]
    fn test_with_bank1_writes_in_bank1() {
        let (mut drv, sim, _) = sim::driver();
        let value = drv
            .with_bank1(|bus| {
                bus.write_byte(LED, 0x85)?;
                bus.read_byte(LED)
            })
            .unwrap();
        assert_eq!(value, 0x85);
        assert_eq!(sim.bank1_reg(LED), 0x85);
        assert_eq!(sim.reg(LED), 0);
        assert!(!sim.bank1_selected());
    }

    #[test]
    fn test_with_bank1_restores_after_closure_error() {
        let (mut drv, sim, _) = sim::driver();
        let result: Result<(), _> = drv.with_bank1(|_| Err(Error::InvalidParameter));
        assert_eq!(result, Err(Error::InvalidParameter));
        assert!(!sim.bank1_selected());
        assert_eq!(drv.session().bank(), Bank::Bank0);
    }

    #[test]
    fn test_with_bank1_restores_after_bus_failure() {
        let (mut drv, sim, _) = sim::driver();
        sim.state().fail_reg = Some(CONFIG);
        let result = drv.with_bank1(|bus| bus.write_byte(CONFIG, 0x01));
        assert!(matches!(result, Err(Error::I2c(_))));
        assert!(!sim.bank1_selected());
        assert_eq!(drv.session().bank(), Bank::Bank0);
    }

    #[test]
    fn test_failed_switch_leaves_tracked_bank() {
        let (mut drv, sim, _) = sim::driver();
        sim.state().fail_reg = Some(CFG_0);
        let result = drv.with_bank1(|bus| bus.read_byte(CONFIG));
        assert!(matches!(result, Err(Error::I2c(_))));
        assert_eq!(drv.session().bank(), Bank::Bank0);
        assert!(!sim.bank1_selected());
    }
}

//! Flicker detection results
//!
//! The sensor reports mains flicker through FD_STATUS: two "detected" bits,
//! two matching "valid" bits, and a measurement-valid bit that comes first.

use crate::registers::{
    FD_STATUS_100HZ, FD_STATUS_100_VALID, FD_STATUS_120HZ, FD_STATUS_120_VALID,
    FD_STATUS_MEAS_VALID, FD_STATUS_SAT_DETECT,
};

/// Outcome of a flicker detection cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlickerFrequency {
    /// No valid result, or the cycle timed out
    #[default]
    Undetermined,
    /// 100 Hz (50 Hz mains)
    Hz100,
    /// 120 Hz (60 Hz mains)
    Hz120,
}

impl FlickerFrequency {
    /// Frequency in Hz, 0 when undetermined
    pub const fn hz(self) -> u16 {
        match self {
            Self::Undetermined => 0,
            Self::Hz100 => 100,
            Self::Hz120 => 120,
        }
    }
}

/// Snapshot of the FD_STATUS register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlickerStatus(pub u8);

impl FlickerStatus {
    pub const fn measurement_valid(self) -> bool {
        self.0 & FD_STATUS_MEAS_VALID != 0
    }

    /// Either frequency calculation has finished
    pub const fn calculation_valid(self) -> bool {
        self.0 & (FD_STATUS_100_VALID | FD_STATUS_120_VALID) != 0
    }

    pub const fn saturated(self) -> bool {
        self.0 & FD_STATUS_SAT_DETECT != 0
    }

    /// Decide the frequency. 100 Hz wins when both are valid and detected.
    pub const fn frequency(self) -> FlickerFrequency {
        let s = self.0;
        if s & FD_STATUS_100_VALID != 0 && s & FD_STATUS_100HZ != 0 {
            FlickerFrequency::Hz100
        } else if s & FD_STATUS_120_VALID != 0 && s & FD_STATUS_120HZ != 0 {
            FlickerFrequency::Hz120
        } else {
            FlickerFrequency::Undetermined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        // valid + detected for both: 100 Hz wins
        assert_eq!(FlickerStatus(0b0010_1111).frequency(), FlickerFrequency::Hz100);
        assert_eq!(FlickerStatus(0b0010_0101).frequency(), FlickerFrequency::Hz100);
        assert_eq!(FlickerStatus(0b0010_1010).frequency(), FlickerFrequency::Hz120);
        // 100 Hz detected but only the 120 Hz result is valid
        assert_eq!(FlickerStatus(0b0010_1001).frequency(), FlickerFrequency::Undetermined);
        // both valid, nothing detected
        assert_eq!(FlickerStatus(0b0010_1100).frequency(), FlickerFrequency::Undetermined);
    }

    #[test]
    fn test_phase_bits() {
        assert!(!FlickerStatus(0).measurement_valid());
        assert!(FlickerStatus(0x20).measurement_valid());
        assert!(!FlickerStatus(0x20).calculation_valid());
        assert!(FlickerStatus(0x24).calculation_valid());
        assert!(FlickerStatus(0x28).calculation_valid());
        assert!(FlickerStatus(0x10).saturated());
    }

    #[test]
    fn test_hz() {
        assert_eq!(FlickerFrequency::Undetermined.hz(), 0);
        assert_eq!(FlickerFrequency::Hz100.hz(), 100);
        assert_eq!(FlickerFrequency::Hz120.hz(), 120);
    }
}

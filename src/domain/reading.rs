//! Raw channel data and sensor identity
//!
//! `ChannelData` is what one acquisition cycle latches: six ADC words plus
//! the ASTATUS byte that was frozen together with them.

use crate::registers::{ASTATUS_AGAIN_MASK, ASTATUS_ASAT};

/// Number of ADC channels latched per acquisition
pub const ADC_CHANNELS: usize = 6;

/// Size of the ASTATUS + CH0..CH5 burst
pub const LATCH_LEN: usize = 1 + ADC_CHANNELS * 2;

/// Six ADC words latched in one burst, in ADC0..ADC5 order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelData {
    /// ASTATUS byte captured with the data
    pub astatus: u8,
    /// ADC0..ADC5 counts
    pub channels: [u16; ADC_CHANNELS],
}

impl ChannelData {
    /// Decode the 13-byte latch burst: status byte, then six little-endian words
    pub fn from_latch(raw: &[u8; LATCH_LEN]) -> Self {
        let mut channels = [0u16; ADC_CHANNELS];
        for (i, ch) in channels.iter_mut().enumerate() {
            *ch = u16::from_le_bytes([raw[1 + 2 * i], raw[2 + 2 * i]]);
        }
        Self {
            astatus: raw[0],
            channels,
        }
    }

    /// Value of ADC slot `index`, `None` past slot 5
    pub fn channel(&self, index: usize) -> Option<u16> {
        self.channels.get(index).copied()
    }

    /// Analog saturation was flagged during this acquisition
    pub const fn saturated(&self) -> bool {
        self.astatus & ASTATUS_ASAT != 0
    }

    /// Gain code the sensor reported with this data
    pub const fn gain_code(&self) -> u8 {
        self.astatus & ASTATUS_AGAIN_MASK
    }
}

/// Sensor identifier
///
/// Uses a single byte to identify sensors on the device so readings can be
/// tagged without heap allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorId(pub u8);

impl SensorId {
    /// Primary AS7341 on the QWIIC connector
    pub const AS7341: SensorId = SensorId(11);

    /// Test/mock sensor
    pub const TEST: SensorId = SensorId(255);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn as_str(&self) -> &'static str {
        match self.0 {
            11 => "as7341",
            255 => "test",
            _ => "unknown",
        }
    }

    pub const fn value(&self) -> u8 {
        self.0
    }
}

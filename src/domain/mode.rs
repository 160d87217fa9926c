//! Measurement modes (CONFIG register bits 0-1)

/// How a spectral acquisition is started
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MeasureMode {
    /// Spectral measurement, started by software and polled for completion
    #[default]
    Spm = 0x00,
    /// Start synchronised to the GPIO pin
    Syns = 0x01,
    /// Start synchronised to the GPIO pin, integration ends after a set number of edges
    Synd = 0x03,
}

impl MeasureMode {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode CONFIG mode bits. The reserved value 0b10 maps to `None`.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0x00 => Some(Self::Spm),
            0x01 => Some(Self::Syns),
            0x03 => Some(Self::Synd),
            _ => None,
        }
    }

    /// Completion is signalled externally rather than polled
    pub const fn is_synchronized(self) -> bool {
        !matches!(self, Self::Spm)
    }
}

//! Spectral reading domain entity
//!
//! A full AS7341 spectrum needs two acquisition cycles because only six
//! ADCs are available: F1..F4 first, then F5..F8. Clear and NIR are routed
//! in both cycles; the values from the second cycle are kept.

use crate::domain::{ChannelData, SensorId};

/// A ten-band reading from the AS7341.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpectralReading {
    /// Timestamp in microseconds since boot
    pub timestamp_us: i64,
    /// Sensor identifier
    pub sensor_id: SensorId,

    // 8 visible channels, wavelength ordered
    /// F1: 415nm - Violet
    pub f1_415nm: u16,
    /// F2: 445nm - Indigo
    pub f2_445nm: u16,
    /// F3: 480nm - Blue
    pub f3_480nm: u16,
    /// F4: 515nm - Cyan
    pub f4_515nm: u16,
    /// F5: 555nm - Green
    pub f5_555nm: u16,
    /// F6: 590nm - Yellow
    pub f6_590nm: u16,
    /// F7: 630nm - Orange
    pub f7_630nm: u16,
    /// F8: 680nm - Red
    pub f8_680nm: u16,

    /// Clear channel (broadband visible light)
    pub clear: u16,
    /// NIR: ~910nm
    pub nir: u16,

    /// Gain code used for this reading
    pub gain: u8,
    /// Whether either cycle reported analog saturation
    pub saturated: bool,
}

impl SpectralReading {
    /// Merge the F1F4CN and F5F8CN cycles into one reading
    pub fn from_cycles(
        timestamp_us: i64,
        sensor_id: SensorId,
        low: &ChannelData,
        high: &ChannelData,
    ) -> Self {
        let [f1, f2, f3, f4, _, _] = low.channels;
        let [f5, f6, f7, f8, clear, nir] = high.channels;
        Self {
            timestamp_us,
            sensor_id,
            f1_415nm: f1,
            f2_445nm: f2,
            f3_480nm: f3,
            f4_515nm: f4,
            f5_555nm: f5,
            f6_590nm: f6,
            f7_630nm: f7,
            f8_680nm: f8,
            clear,
            nir,
            gain: high.gain_code(),
            saturated: low.saturated() || high.saturated(),
        }
    }

    /// The eight visible channels, violet to red
    pub const fn visible_channels(&self) -> [u16; 8] {
        [
            self.f1_415nm,
            self.f2_445nm,
            self.f3_480nm,
            self.f4_515nm,
            self.f5_555nm,
            self.f6_590nm,
            self.f7_630nm,
            self.f8_680nm,
        ]
    }

    /// All channels including clear and NIR
    ///
    /// Order: F1..F8, Clear, NIR
    pub const fn all_channels(&self) -> [u16; 10] {
        [
            self.f1_415nm,
            self.f2_445nm,
            self.f3_480nm,
            self.f4_515nm,
            self.f5_555nm,
            self.f6_590nm,
            self.f7_630nm,
            self.f8_680nm,
            self.clear,
            self.nir,
        ]
    }

    /// Index into `all_channels` of the strongest visible band
    pub fn peak_visible_channel(&self) -> usize {
        let channels = self.visible_channels();
        let mut peak = 0;
        for (i, &value) in channels.iter().enumerate() {
            if value > channels[peak] {
                peak = i;
            }
        }
        peak
    }

    /// Channel names for display/logging
    pub const CHANNEL_NAMES: [&'static str; 10] = [
        "F1_415nm", "F2_445nm", "F3_480nm", "F4_515nm", "F5_555nm", "F6_590nm", "F7_630nm",
        "F8_680nm", "Clear", "NIR",
    ];

    /// Channel centre wavelengths in nm (0 for clear)
    pub const CHANNEL_WAVELENGTHS: [u16; 10] = [415, 445, 480, 515, 555, 590, 630, 680, 0, 910];
}

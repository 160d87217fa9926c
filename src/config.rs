//! Sensor configuration applied at bring-up.

use crate::domain::{Gain, IntegrationTiming, MeasureMode};

/// Settings written by [`As7341::init_with_config`](crate::driver::As7341::init_with_config)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    pub mode: MeasureMode,
    pub gain: Gain,
    pub timing: IntegrationTiming,
    /// LED drive current in mA; `None` leaves the LED off
    pub led_current_ma: Option<u16>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mode: MeasureMode::Spm,
            gain: Gain::X8,
            timing: IntegrationTiming::new(29, 599), // ~50 ms
            led_current_ma: None,
        }
    }
}

impl SensorConfig {
    /// Dim scenes: x256 gain, ~167 ms integration
    pub const fn high_sensitivity() -> Self {
        Self {
            mode: MeasureMode::Spm,
            gain: Gain::X256,
            timing: IntegrationTiming::new(59, 999),
            led_current_ma: None,
        }
    }

    /// Bright scenes / fast refresh: x4 gain, ~17 ms integration
    pub const fn fast() -> Self {
        Self {
            mode: MeasureMode::Spm,
            gain: Gain::X4,
            timing: IntegrationTiming::new(9, 599),
            led_current_ma: None,
        }
    }
}

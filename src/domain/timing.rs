//! Integration timing
//!
//! Exposure is `(ATIME + 1)` steps of `(ASTEP + 1) * 2.78 µs` each.

/// Duration of one ASTEP unit in microseconds
pub const ASTEP_UNIT_US: f32 = 2.78;

/// ATIME/ASTEP pair as stored in the sensor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntegrationTiming {
    /// Step count minus one
    pub atime: u8,
    /// Step duration minus one, in 2.78 µs units
    pub astep: u16,
}

impl IntegrationTiming {
    pub const fn new(atime: u8, astep: u16) -> Self {
        Self { atime, astep }
    }

    /// Total integration time in milliseconds
    pub fn integration_time_ms(&self) -> f32 {
        (self.astep as f32 + 1.0) * (self.atime as f32 + 1.0) * ASTEP_UNIT_US / 1000.0
    }

    /// Duration of a single step in milliseconds
    pub fn step_ms(&self) -> f32 {
        (self.astep as f32 + 1.0) * ASTEP_UNIT_US / 1000.0
    }

    /// ATIME that gets closest to `ms` for a fixed ASTEP, clamped to a byte
    pub fn atime_for_ms(ms: f32, astep: u16) -> u8 {
        let step_ms = Self::new(0, astep).step_ms();
        let steps = libm::roundf(ms / step_ms);
        if steps.is_nan() || steps < 1.0 {
            0
        } else if steps > 256.0 {
            u8::MAX
        } else {
            (steps as u16 - 1) as u8
        }
    }
}

impl Default for IntegrationTiming {
    /// 30 steps of ~1.67 ms, about 50 ms
    fn default() -> Self {
        Self::new(29, 599)
    }
}

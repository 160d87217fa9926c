//! Spectral sensor port - interface for spectral light sensors
//!
//! This port defines how the application drives a multi-channel spectral
//! sensor like the AS7341 11-channel sensor, without knowing about the bus,
//! register banks or SMUX tables behind it.

use crate::domain::{ChannelData, ChannelGroup, FlickerFrequency, SensorId, SpectralReading};
use core::future::Future;

/// Port trait for spectral sensors
///
/// Each method runs one complete device sequence. Implementations must not
/// let two sequences interleave on the same device.
pub trait SpectralSensorPort {
    /// Read all spectral channels and return a complete reading
    ///
    /// For the AS7341 this runs two acquisition cycles (F1-F4 and F5-F8,
    /// both with Clear and NIR) and merges them.
    fn read(&mut self) -> impl Future<Output = Result<SpectralReading, SpectralSensorError>>;

    /// Run one acquisition cycle on a single channel group
    fn read_group(
        &mut self,
        group: ChannelGroup,
    ) -> impl Future<Output = Result<ChannelData, SpectralSensorError>>;

    /// Get the sensor ID for this sensor instance
    fn sensor_id(&self) -> SensorId;

    /// Set the analog gain code (0-10, i.e. 0.5x to 512x)
    fn set_gain(&mut self, gain: u8) -> impl Future<Output = Result<(), SpectralSensorError>>;

    /// Set the gain to the highest step not above `factor`, returning the
    /// code that was applied
    fn set_gain_factor(&mut self, factor: f32)
        -> impl Future<Output = Result<u8, SpectralSensorError>>;

    /// Write ATIME and ASTEP directly
    fn set_integration(
        &mut self,
        atime: u8,
        astep: u16,
    ) -> impl Future<Output = Result<(), SpectralSensorError>>;

    /// Set the integration time in milliseconds
    ///
    /// Longer integration times increase sensitivity and reduce noise
    /// but take longer to complete a measurement.
    fn set_integration_time_ms(
        &mut self,
        ms: f32,
    ) -> impl Future<Output = Result<(), SpectralSensorError>>;

    /// Detect mains flicker
    fn flicker_frequency(
        &mut self,
    ) -> impl Future<Output = Result<FlickerFrequency, SpectralSensorError>>;

    /// Set LED drive current and switch it on or off
    fn set_led(
        &mut self,
        current_ma: u16,
        enabled: bool,
    ) -> impl Future<Output = Result<(), SpectralSensorError>>;

    /// Current gain code and integration timing as reported by the sensor
    fn settings(&mut self) -> impl Future<Output = Result<SensorSettings, SpectralSensorError>>;

    /// Check if the sensor is initialized and ready
    fn is_ready(&self) -> bool;
}

/// Settings read back from the sensor
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSettings {
    pub gain: u8,
    pub atime: u8,
    pub astep: u16,
    pub integration_time_ms: f32,
}

/// Errors that can occur during spectral sensor operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpectralSensorError {
    /// Sensor read operation failed
    ReadFailed,
    /// Sensor has not been initialized
    NotInitialized,
    /// Operation timed out
    Timeout,
    /// One or more channels are saturated (values at maximum)
    Saturated,
    /// I2C communication error
    I2cError,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Sensor not responding or not detected
    NotDetected,
}

impl SpectralSensorError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadFailed => "read failed",
            Self::NotInitialized => "sensor not initialized",
            Self::Timeout => "measurement timed out",
            Self::Saturated => "saturated",
            Self::I2cError => "I2C error",
            Self::InvalidConfig => "invalid parameter",
            Self::NotDetected => "sensor not detected",
        }
    }
}

//! Ports (interfaces) defining the boundaries of the application
//!
//! Ports are traits that define how the application interacts with external
//! systems. They keep the driver and dispatcher independent of specific
//! implementations.
//!
//! # Hexagonal Architecture
//!
//! - **SpectralSensorPort**: How we take spectral readings (AS7341, fake)
//! - **Clock**: Where bounded polls get the current time from (embassy, fake)

pub mod clock;
pub mod spectral_sensor;

pub use clock::Clock;
pub use spectral_sensor::{SensorSettings, SpectralSensorError, SpectralSensorPort};

//! Adapters - concrete implementations of ports
//!
//! Adapters connect the application to the outside world by implementing
//! the port traits. Each adapter knows how to work with a specific
//! technology or hardware.
//!
//! # Available Adapters
//!
//! - **as7341**: AS7341 11-channel spectral sensor via I2C
//! - **clock**: embassy-time backed clock for bounded polling

pub mod as7341;
pub mod clock;

pub use self::as7341::{As7341Adapter, SharedAs7341};
pub use clock::EmbassyClock;

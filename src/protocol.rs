//! Shared protocol for AS7341 sensor control
//!
//! This module defines the message protocol used between the host CLI
//! and the device for measurements and parameter changes.
//!
//! Messages are serialized using `postcard` with COBS encoding for framing:
//! every frame ends in a single `0x00` byte and contains no other zeros.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[cfg(feature = "std")]
use std::string::{String, ToString};

use crate::domain::{ChannelGroup, SpectralReading};

/// Longest error message carried in a response
pub const MAX_ERROR_LEN: usize = 64;

/// Buffer size that fits any encoded command or response
pub const MAX_FRAME_LEN: usize = 128;

/// Command sent from host to device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorCommand {
    /// Full 10-band reading (two acquisition cycles)
    Measure,

    /// One acquisition cycle on a single SMUX group
    MeasureGroup { group: ChannelGroup },

    /// Flicker detection cycle
    Flicker,

    /// Analog gain by code (0-10)
    SetGain { code: u8 },

    /// Analog gain by factor, floored to the nearest step
    SetGainFactor { factor: f32 },

    /// Raw ATIME / ASTEP
    SetIntegration { atime: u8, astep: u16 },

    /// Integration time in milliseconds (ASTEP kept, ATIME rounded)
    SetIntegrationMs { ms: f32 },

    /// LED drive current and on/off
    SetLed { current_ma: u16, enabled: bool },

    /// Read back gain and integration timing
    GetSettings,

    /// Get system diagnostics (for debugging without RTT probe)
    Diagnostics,
}

/// Response sent from device to host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SensorResponse {
    /// Success
    Ok,

    /// Error message
    #[cfg(not(feature = "std"))]
    Error { message: heapless::String<MAX_ERROR_LEN> },
    #[cfg(feature = "std")]
    Error { message: String },

    /// Full spectrum
    Reading { reading: SpectralReading },

    /// Raw ADC values of one channel group
    Channels {
        group: ChannelGroup,
        channels: [u16; 6],
        gain: u8,
        saturated: bool,
    },

    /// Flicker result, 0 when undetermined
    Flicker { hz: u16 },

    /// Gain applied by SetGain / SetGainFactor
    Gain { code: u8, factor: f32 },

    /// Current sensor settings
    Settings {
        gain: u8,
        gain_factor: f32,
        atime: u8,
        astep: u16,
        integration_time_ms: f32,
    },

    /// System diagnostics
    Diagnostics {
        /// Whether the sensor passed init
        sensor_ready: bool,
        /// Number of commands handled so far
        commands_handled: u32,
        /// Number of successful full readings
        readings_taken: u32,
        /// Number of failed readings (including timeouts)
        read_failures: u32,
        /// Number of flicker cycles run
        flicker_runs: u32,
        /// Current uptime in milliseconds
        uptime_ms: u64,
    },
}

impl SensorResponse {
    /// Create error response, truncated to [`MAX_ERROR_LEN`] bytes
    #[cfg(not(feature = "std"))]
    pub fn error(msg: &str) -> Self {
        let mut message = heapless::String::new();
        for c in msg.chars() {
            if message.push(c).is_err() {
                break;
            }
        }
        Self::Error { message }
    }

    /// Create error response (std version)
    #[cfg(feature = "std")]
    pub fn error(msg: &str) -> Self {
        Self::Error {
            message: msg.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Encode `message` as a COBS frame into `buf`, returning the used part
pub fn encode<'a, T: Serialize>(message: &T, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
    postcard::to_slice_cobs(message, buf)
}

/// Decode one COBS frame in place
pub fn decode<T: DeserializeOwned>(frame: &mut [u8]) -> postcard::Result<T> {
    postcard::from_bytes_cobs(frame)
}

//! AS7341 Spectral Sensor Library
//!
//! This library drives the AMS AS7341 11-channel spectral sensor over I2C
//! and exposes it through a hexagonal architecture for embedded
//! applications.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                │
//! │  - Gain ladder, integration timing, SMUX channel groups         │
//! │  - ChannelData / SpectralReading entities, flicker decoding     │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Driver (blocking)                           │
//! │  - Register access, bank switching, bounded polling             │
//! │  - Measurement cycle, flicker detection, LED, GPIO, interrupts  │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                              │
//! │  - SpectralSensorPort: take readings, change parameters         │
//! │  - Clock: time source for bounded polls                         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                    │
//! │  - As7341Adapter: driver behind an embassy-sync mutex           │
//! │  - EmbassyClock: embassy-time Instant                           │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Protocol + Dispatcher                       │
//! │  - SensorCommand / SensorResponse (postcard + COBS)             │
//! │  - CommandHandler: commands onto the port                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! - `std`: host build (std strings in the protocol, `as7341_host` shell)
//! - `defmt`: log through defmt on target
//! - `log`: log through the `log` facade on the host

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

// ============================================================================
// Protocol (shared between host and device)
// ============================================================================

pub mod protocol;

pub use protocol::{SensorCommand, SensorResponse, MAX_FRAME_LEN};

// ============================================================================
// Sensor core
// ============================================================================

pub mod config;
pub mod domain;
pub mod driver;
pub mod poll;
pub mod registers;

pub use config::SensorConfig;
pub use domain::{
    ChannelData, ChannelGroup, FlickerFrequency, Gain, IntegrationTiming, MeasureMode, SensorId,
    SpectralReading,
};
pub use driver::{As7341, Error, MeasureOutcome};

// ============================================================================
// Hexagonal Architecture
// ============================================================================

/// Ports - traits defining boundaries
pub mod ports;

/// Adapters - concrete implementations
pub mod adapters;

/// Command dispatcher
pub mod app;

pub use adapters::{As7341Adapter, EmbassyClock};
pub use app::CommandHandler;
pub use ports::{Clock, SpectralSensorError, SpectralSensorPort};

//! Domain layer - pure sensor logic independent of the bus
//!
//! Gain ladder, integration timing, SMUX channel groups, flicker decoding
//! and the reading entities built from latched channel data.

pub mod channel_group;
pub mod flicker;
pub mod gain;
pub mod mode;
pub mod reading;
pub mod spectral;
pub mod timing;

pub use channel_group::{ChannelGroup, UnknownChannelGroup};
pub use flicker::{FlickerFrequency, FlickerStatus};
pub use gain::Gain;
pub use mode::MeasureMode;
pub use reading::{ChannelData, SensorId, ADC_CHANNELS, LATCH_LEN};
pub use spectral::SpectralReading;
pub use timing::IntegrationTiming;

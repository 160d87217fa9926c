//! Device-side command dispatcher
//!
//! Maps each [`SensorCommand`] onto the spectral sensor port and builds the
//! matching [`SensorResponse`]. Failures never escape: they become
//! `SensorResponse::Error` so the host always gets an answer.

use crate::domain::Gain;
use crate::ports::{Clock, SpectralSensorError, SpectralSensorPort};
use crate::protocol::{SensorCommand, SensorResponse};

/// Counters reported by [`SensorCommand::Diagnostics`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Counters {
    pub commands_handled: u32,
    pub readings_taken: u32,
    pub read_failures: u32,
    pub flicker_runs: u32,
}

pub struct CommandHandler<P, C> {
    port: P,
    clock: C,
    counters: Counters,
}

impl<P, C> CommandHandler<P, C>
where
    P: SpectralSensorPort,
    C: Clock,
{
    pub fn new(port: P, clock: C) -> Self {
        Self {
            port,
            clock,
            counters: Counters::default(),
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Execute one command against the sensor
    pub async fn handle(&mut self, command: SensorCommand) -> SensorResponse {
        self.counters.commands_handled = self.counters.commands_handled.wrapping_add(1);
        debug!("command: {:?}", command);

        let result = match command {
            SensorCommand::Measure => self.measure().await,
            SensorCommand::MeasureGroup { group } => {
                self.port.read_group(group).await.map(|data| SensorResponse::Channels {
                    group,
                    channels: data.channels,
                    gain: data.gain_code(),
                    saturated: data.saturated(),
                })
            }
            SensorCommand::Flicker => {
                self.counters.flicker_runs = self.counters.flicker_runs.wrapping_add(1);
                self.port
                    .flicker_frequency()
                    .await
                    .map(|f| SensorResponse::Flicker { hz: f.hz() })
            }
            SensorCommand::SetGain { code } => match Gain::new(code) {
                Some(gain) => self.port.set_gain(code).await.map(|()| SensorResponse::Gain {
                    code,
                    factor: gain.factor(),
                }),
                None => Err(SpectralSensorError::InvalidConfig),
            },
            SensorCommand::SetGainFactor { factor } => {
                self.port.set_gain_factor(factor).await.map(|code| SensorResponse::Gain {
                    code,
                    factor: Gain::new(code).map_or(0.0, Gain::factor),
                })
            }
            SensorCommand::SetIntegration { atime, astep } => self
                .port
                .set_integration(atime, astep)
                .await
                .map(|()| SensorResponse::Ok),
            SensorCommand::SetIntegrationMs { ms } => self
                .port
                .set_integration_time_ms(ms)
                .await
                .map(|()| SensorResponse::Ok),
            SensorCommand::SetLed { current_ma, enabled } => self
                .port
                .set_led(current_ma, enabled)
                .await
                .map(|()| SensorResponse::Ok),
            SensorCommand::GetSettings => {
                self.port.settings().await.map(|s| SensorResponse::Settings {
                    gain: s.gain,
                    gain_factor: Gain::new(s.gain).map_or(0.0, Gain::factor),
                    atime: s.atime,
                    astep: s.astep,
                    integration_time_ms: s.integration_time_ms,
                })
            }
            SensorCommand::Diagnostics => Ok(self.diagnostics()),
        };

        result.unwrap_or_else(|e| {
            warn!("command failed: {:?}", e);
            SensorResponse::error(e.as_str())
        })
    }

    async fn measure(&mut self) -> Result<SensorResponse, SpectralSensorError> {
        match self.port.read().await {
            Ok(reading) => {
                self.counters.readings_taken = self.counters.readings_taken.wrapping_add(1);
                Ok(SensorResponse::Reading { reading })
            }
            Err(e) => {
                self.counters.read_failures = self.counters.read_failures.wrapping_add(1);
                Err(e)
            }
        }
    }

    fn diagnostics(&self) -> SensorResponse {
        SensorResponse::Diagnostics {
            sensor_ready: self.port.is_ready(),
            commands_handled: self.counters.commands_handled,
            readings_taken: self.counters.readings_taken,
            read_failures: self.counters.read_failures,
            flicker_runs: self.counters.flicker_runs,
            uptime_ms: self.clock.now_ms(),
        }
    }
}

//! AS7341 spectral sensor adapter
//!
//! This adapter implements the SpectralSensorPort trait on top of the
//! blocking [`As7341`] driver. The driver lives in an `embassy_sync` mutex
//! so several tasks can share one sensor; each port call holds the lock for
//! its whole register sequence.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::SensorConfig;
use crate::domain::{
    ChannelData, ChannelGroup, FlickerFrequency, IntegrationTiming, SensorId, SpectralReading,
};
use crate::driver::{As7341, Error, MeasureOutcome};
use crate::ports::spectral_sensor::{SensorSettings, SpectralSensorError, SpectralSensorPort};
use crate::ports::Clock;

/// A driver shared between tasks
pub type SharedAs7341<M, I2C, D, C> = Mutex<M, As7341<I2C, D, C>>;

/// AS7341 adapter implementing SpectralSensorPort
pub struct As7341Adapter<'a, M: RawMutex, I2C, D, C> {
    sensor: &'a SharedAs7341<M, I2C, D, C>,
    sensor_id: SensorId,
    ready: bool,
}

impl<'a, M, I2C, D, C> As7341Adapter<'a, M, I2C, D, C>
where
    M: RawMutex,
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    /// Create a new AS7341 adapter
    ///
    /// The sensor is not initialized until `init()` is called.
    pub fn new(sensor: &'a SharedAs7341<M, I2C, D, C>, sensor_id: SensorId) -> Self {
        Self {
            sensor,
            sensor_id,
            ready: false,
        }
    }

    /// Initialize the AS7341 sensor with the default configuration
    pub async fn init(&mut self) -> Result<(), SpectralSensorError> {
        self.init_with_config(&SensorConfig::default()).await
    }

    /// Initialize with a custom configuration
    pub async fn init_with_config(
        &mut self,
        config: &SensorConfig,
    ) -> Result<(), SpectralSensorError> {
        self.ready = false;
        let mut sensor = self.sensor.lock().await;
        sensor.init_with_config(config).map_err(|e| match e {
            Error::I2c(_) | Error::DeviceNotPresent(_) => SpectralSensorError::NotDetected,
            other => sensor_error(other),
        })?;
        self.ready = true;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), SpectralSensorError> {
        if self.ready {
            Ok(())
        } else {
            Err(SpectralSensorError::NotInitialized)
        }
    }
}

/// Run one cycle and insist on latched data
fn acquire<I2C, D, C>(
    sensor: &mut As7341<I2C, D, C>,
    group: ChannelGroup,
) -> Result<ChannelData, SpectralSensorError>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    match sensor.start_measure(group).map_err(sensor_error)? {
        MeasureOutcome::Completed(data) => Ok(data),
        MeasureOutcome::TimedOut => Err(SpectralSensorError::Timeout),
        MeasureOutcome::Armed => {
            warn!("AS7341: {} armed in sync mode, no data yet", group.name());
            Err(SpectralSensorError::ReadFailed)
        }
    }
}

fn sensor_error<E>(error: Error<E>) -> SpectralSensorError {
    match error {
        Error::I2c(_) => SpectralSensorError::I2cError,
        Error::DeviceNotPresent(_) => SpectralSensorError::NotDetected,
        Error::InvalidParameter | Error::UnknownChannelGroup => SpectralSensorError::InvalidConfig,
        Error::UnexpectedRegisterValue(_) => SpectralSensorError::ReadFailed,
    }
}

impl<M, I2C, D, C> SpectralSensorPort for As7341Adapter<'_, M, I2C, D, C>
where
    M: RawMutex,
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    async fn read(&mut self) -> Result<SpectralReading, SpectralSensorError> {
        self.ensure_ready()?;

        let mut sensor = self.sensor.lock().await;
        let low = acquire(&mut *sensor, ChannelGroup::F1F4ClearNir)?;
        let high = acquire(&mut *sensor, ChannelGroup::F5F8ClearNir)?;

        let timestamp_us = (sensor.now_ms() * 1000) as i64;
        let reading = SpectralReading::from_cycles(timestamp_us, self.sensor_id, &low, &high);

        if reading.saturated {
            warn!("AS7341: measurement saturated");
        }

        Ok(reading)
    }

    async fn read_group(
        &mut self,
        group: ChannelGroup,
    ) -> Result<ChannelData, SpectralSensorError> {
        self.ensure_ready()?;
        let mut sensor = self.sensor.lock().await;
        acquire(&mut *sensor, group)
    }

    fn sensor_id(&self) -> SensorId {
        self.sensor_id
    }

    async fn set_gain(&mut self, gain: u8) -> Result<(), SpectralSensorError> {
        self.sensor.lock().await.set_gain(gain).map_err(sensor_error)
    }

    async fn set_gain_factor(&mut self, factor: f32) -> Result<u8, SpectralSensorError> {
        let mut sensor = self.sensor.lock().await;
        let gain = sensor.set_gain_by_factor(factor).map_err(sensor_error)?;
        Ok(gain.code())
    }

    async fn set_integration(&mut self, atime: u8, astep: u16) -> Result<(), SpectralSensorError> {
        let mut sensor = self.sensor.lock().await;
        sensor.set_atime(atime).map_err(sensor_error)?;
        sensor.set_astep(astep).map_err(sensor_error)
    }

    async fn set_integration_time_ms(&mut self, ms: f32) -> Result<(), SpectralSensorError> {
        let mut sensor = self.sensor.lock().await;
        sensor.set_integration_time_ms(ms).map_err(sensor_error)?;
        Ok(())
    }

    async fn flicker_frequency(&mut self) -> Result<FlickerFrequency, SpectralSensorError> {
        self.ensure_ready()?;
        self.sensor.lock().await.flicker_frequency().map_err(sensor_error)
    }

    async fn set_led(&mut self, current_ma: u16, enabled: bool) -> Result<(), SpectralSensorError> {
        let mut sensor = self.sensor.lock().await;
        sensor.set_led_current(current_ma).map_err(sensor_error)?;
        sensor.enable_led(enabled).map_err(sensor_error)
    }

    async fn settings(&mut self) -> Result<SensorSettings, SpectralSensorError> {
        let mut sensor = self.sensor.lock().await;
        let gain = sensor.gain().map_err(sensor_error)?;
        let IntegrationTiming { atime, astep } = sensor.integration_timing().map_err(sensor_error)?;
        Ok(SensorSettings {
            gain: gain.code(),
            atime,
            astep,
            integration_time_ms: IntegrationTiming::new(atime, astep).integration_time_ms(),
        })
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

//! Driver error type.

/// Errors returned by [`As7341`](super::As7341) operations.
///
/// Polling timeouts are not errors: they surface as
/// [`MeasureOutcome::TimedOut`](super::MeasureOutcome::TimedOut) or
/// [`FlickerFrequency::Undetermined`](crate::domain::FlickerFrequency::Undetermined).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Underlying I2C transfer failed
    I2c(E),
    /// ID register did not match (contains the value read)
    DeviceNotPresent(u8),
    /// Parameter outside the range the register accepts; nothing was written
    InvalidParameter,
    /// SMUX group name not recognised; nothing was written
    UnknownChannelGroup,
    /// A register read back a value the driver cannot represent
    UnexpectedRegisterValue(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::I2c(error)
    }
}

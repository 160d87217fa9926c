//! Clock port - monotonic time source for bounded polling
//!
//! Sleeping is done through `embedded_hal::delay::DelayNs`; this port only
//! answers "what time is it", so tests can drive both from one fake source.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

//! Embassy time source
//!
//! Pair with `embassy_time::Delay`, which implements
//! `embedded_hal::delay::DelayNs`, to give the driver real time on target.

use embassy_time::Instant;

use crate::ports::Clock;

/// [`Clock`] backed by the embassy time driver
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = EmbassyClock;
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
    }
}

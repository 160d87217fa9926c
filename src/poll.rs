//! Bounded polling
//!
//! Every wait on a hardware-asserted flag goes through
//! [`retry_with_deadline`]: probe, check the deadline, sleep, repeat.
//! Time comes from a [`Clock`] and sleeping from a caller-supplied function,
//! so nothing here touches real time.

use crate::ports::Clock;

/// Interval and ceiling for one polling loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollPolicy {
    pub interval_ms: u32,
    pub timeout_ms: u32,
}

impl PollPolicy {
    pub const fn new(interval_ms: u32, timeout_ms: u32) -> Self {
        Self {
            interval_ms,
            timeout_ms,
        }
    }
}

/// 10 ms step, 1000 ms ceiling. Used for completion, flicker and SMUX flags.
pub const STATUS_POLL: PollPolicy = PollPolicy::new(10, 1000);

/// Probe until it yields `Some`, or until `policy.timeout_ms` has elapsed.
///
/// The probe runs once before the first deadline check, so a flag that is
/// already set costs no sleep. Returns `Ok(None)` on timeout; probe errors
/// abort the loop immediately.
pub fn retry_with_deadline<X, T, E>(
    clock: &impl Clock,
    ctx: &mut X,
    policy: PollPolicy,
    mut sleep: impl FnMut(&mut X, u32),
    mut probe: impl FnMut(&mut X) -> Result<Option<T>, E>,
) -> Result<Option<T>, E> {
    let start = clock.now_ms();
    loop {
        if let Some(value) = probe(ctx)? {
            return Ok(Some(value));
        }
        if clock.now_ms().saturating_sub(start) >= u64::from(policy.timeout_ms) {
            return Ok(None);
        }
        sleep(ctx, policy.interval_ms);
    }
}

//! Analog gain ladder
//!
//! The AS7341 exposes eleven gain steps. Code `c` multiplies the photodiode
//! signal by `0.5 * 2^c`, i.e. x0.5 at code 0 up to x512 at code 10.

/// A validated analog gain code in `0..=10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gain(u8);

impl Gain {
    /// Highest gain code accepted by the sensor.
    pub const MAX_CODE: u8 = 10;

    /// x0.5
    pub const MIN: Gain = Gain(0);
    /// x4
    pub const X4: Gain = Gain(3);
    /// x8, the default used by the handheld firmware
    pub const X8: Gain = Gain(4);
    /// x256
    pub const X256: Gain = Gain(9);
    /// x512
    pub const MAX: Gain = Gain(Self::MAX_CODE);

    /// Create a gain from its register code, rejecting anything above 10
    pub const fn new(code: u8) -> Option<Self> {
        if code <= Self::MAX_CODE {
            Some(Self(code))
        } else {
            None
        }
    }

    /// Raw register code
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Multiplicative factor, `2^(code - 1)`
    pub fn factor(self) -> f32 {
        (1u32 << self.0) as f32 * 0.5
    }

    /// Highest gain whose factor does not exceed `factor`.
    ///
    /// Never overshoots the request. Anything below x0.5 (including NaN)
    /// lands on code 0.
    pub fn floor_from_factor(factor: f32) -> Self {
        (0..=Self::MAX_CODE)
            .rev()
            .map(Gain)
            .find(|gain| gain.factor() <= factor)
            .unwrap_or(Self::MIN)
    }

    /// All gain steps, lowest first
    pub fn all() -> impl Iterator<Item = Gain> {
        (0..=Self::MAX_CODE).map(Gain)
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::X8
    }
}

impl TryFrom<u8> for Gain {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Gain::new(code).ok_or(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_follows_ladder() {
        for gain in Gain::all() {
            let expected = 0.5 * (1u32 << gain.code()) as f32;
            assert_eq!(gain.factor(), expected);
        }
        assert_eq!(Gain::MIN.factor(), 0.5);
        assert_eq!(Gain::X8.factor(), 8.0);
        assert_eq!(Gain::MAX.factor(), 512.0);
    }

    #[test]
    fn test_factor_strictly_increasing() {
        let factors: heapless::Vec<f32, 11> = Gain::all().map(Gain::factor).collect();
        assert!(factors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Gain::new(10).is_some());
        assert!(Gain::new(11).is_none());
        assert_eq!(Gain::try_from(200), Err(200));
    }

    #[test]
    fn test_floor_never_overshoots() {
        assert_eq!(Gain::floor_from_factor(8.0).code(), 4);
        assert_eq!(Gain::floor_from_factor(15.9).code(), 4);
        assert_eq!(Gain::floor_from_factor(16.0).code(), 5);
        assert_eq!(Gain::floor_from_factor(1000.0).code(), 10);
        assert_eq!(Gain::floor_from_factor(0.7).code(), 0);
        assert_eq!(Gain::floor_from_factor(0.1).code(), 0);
        assert_eq!(Gain::floor_from_factor(f32::NAN).code(), 0);
    }
}

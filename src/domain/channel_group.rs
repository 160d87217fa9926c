//! SMUX channel groups
//!
//! The AS7341 has six ADCs but more photodiodes than that, so each
//! acquisition first routes a subset of diodes through the SMUX.

use core::str::FromStr;

use crate::registers::{SMUX_F1F4CN, SMUX_F5F8CN, SMUX_FD, SMUX_TABLE_LEN};

/// Named photodiode subset routed to the six ADCs
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelGroup {
    /// F1..F4 on ADC0..ADC3, Clear on ADC4, NIR on ADC5
    F1F4ClearNir,
    /// F5..F8 on ADC0..ADC3, Clear on ADC4, NIR on ADC5
    F5F8ClearNir,
    /// Flicker photodiode only
    Flicker,
}

impl ChannelGroup {
    /// Look up a group by its symbolic name.
    ///
    /// Accepts the short names used by the web front-end ("F1F4CN",
    /// "F5F8CN", "FD") as well as a few aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "F1F4CN" | "F1F4" => Some(Self::F1F4ClearNir),
            "F5F8CN" | "F5F8" => Some(Self::F5F8ClearNir),
            "FD" | "flicker" => Some(Self::Flicker),
            _ => None,
        }
    }

    /// Canonical short name
    pub const fn name(self) -> &'static str {
        match self {
            Self::F1F4ClearNir => "F1F4CN",
            Self::F5F8ClearNir => "F5F8CN",
            Self::Flicker => "FD",
        }
    }

    /// SMUX routing table to burst-load for this group
    pub const fn smux_table(self) -> &'static [u8; SMUX_TABLE_LEN] {
        match self {
            Self::F1F4ClearNir => &SMUX_F1F4CN,
            Self::F5F8ClearNir => &SMUX_F5F8CN,
            Self::Flicker => &SMUX_FD,
        }
    }

    /// Labels of the six ADC slots for this routing
    pub const fn channel_names(self) -> [&'static str; 6] {
        match self {
            Self::F1F4ClearNir => ["F1_415nm", "F2_445nm", "F3_480nm", "F4_515nm", "Clear", "NIR"],
            Self::F5F8ClearNir => ["F5_555nm", "F6_590nm", "F7_630nm", "F8_680nm", "Clear", "NIR"],
            Self::Flicker => ["-", "-", "-", "-", "-", "Flicker"],
        }
    }
}

/// Returned when a symbolic group name is not recognised
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownChannelGroup;

impl FromStr for ChannelGroup {
    type Err = UnknownChannelGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or(UnknownChannelGroup)
    }
}

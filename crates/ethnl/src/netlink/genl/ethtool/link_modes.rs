//! Link-mode names, indexed by `ETHTOOL_LINK_MODE_*` bit number.

use std::fmt;

use super::bitset::CompactBitset;

/// Link-mode bit names. Entry `i` names bit `i` of a link-mode bitset.
pub static LINK_MODES: &[&str] = &[
    "10baseT/Half",
    "10baseT/Full",
    "100baseT/Half",
    "100baseT/Full",
    "1000baseT/Half",
    "1000baseT/Full",
    "Autoneg",
    "TP",
    "AUI",
    "MII",
    "FIBRE",
    "BNC",
    "10000baseT/Full",
    "Pause",
    "Asym_Pause",
    "2500baseX/Full",
    "Backplane",
    "1000baseKX/Full",
    "10000baseKX4/Full",
    "10000baseKR/Full",
    "10000baseR_FEC",
    "20000baseMLD2/Full",
    "20000baseKR2/Full",
    "40000baseKR4/Full",
    "40000baseCR4/Full",
    "40000baseSR4/Full",
    "40000baseLR4/Full",
    "56000baseKR4/Full",
    "56000baseCR4/Full",
    "56000baseSR4/Full",
    "56000baseLR4/Full",
    "25000baseCR/Full",
    "25000baseKR/Full",
    "25000baseSR/Full",
    "50000baseCR2/Full",
    "50000baseKR2/Full",
    "100000baseKR4/Full",
    "100000baseSR4/Full",
    "100000baseCR4/Full",
    "100000baseLR4_ER4/Full",
    "50000baseSR2/Full",
    "1000baseX/Full",
    "10000baseCR/Full",
    "10000baseSR/Full",
    "10000baseLR/Full",
    "10000baseLRM/Full",
    "10000baseER/Full",
    "2500baseT/Full",
    "5000baseT/Full",
    "FEC_NONE",
    "FEC_RS",
    "FEC_BASER",
    "50000baseKR/Full",
    "50000baseSR/Full",
    "50000baseCR/Full",
    "50000baseLR_ER_FR/Full",
    "50000baseDR/Full",
    "100000baseKR2/Full",
    "100000baseSR2/Full",
    "100000baseCR2/Full",
    "100000baseLR2_ER2_FR2/Full",
    "100000baseDR2/Full",
    "200000baseKR4/Full",
    "200000baseSR4/Full",
    "200000baseLR4_ER4_FR4/Full",
    "200000baseDR4/Full",
    "200000baseCR4/Full",
    "100baseT1/Full",
    "1000baseT1/Full",
    "400000baseKR8/Full",
    "400000baseSR8/Full",
    "400000baseLR8_ER8_FR8/Full",
    "400000baseDR8/Full",
    "400000baseCR8/Full",
    "FEC_LLRS",
    "100000baseKR/Full",
    "100000baseSR/Full",
    "100000baseLR_ER_FR/Full",
    "100000baseCR/Full",
    "100000baseDR/Full",
    "200000baseKR2/Full",
    "200000baseSR2/Full",
    "200000baseLR2_ER2_FR2/Full",
    "200000baseDR2/Full",
    "200000baseCR2/Full",
    "400000baseKR4/Full",
    "400000baseSR4/Full",
    "400000baseLR4_ER4_FR4/Full",
    "400000baseDR4/Full",
    "400000baseCR4/Full",
    "100baseFX/Half",
    "100baseFX/Full",
    "10baseT1L/Full",
    "800000baseCR8/Full",
    "800000baseKR8/Full",
    "800000baseDR8/Full",
    "800000baseDR8_2/Full",
    "800000baseSR8/Full",
    "800000baseVR8/Full",
    "10baseT1S/Full",
    "10baseT1S/Half",
    "10baseT1S_P2MP/Half",
    "10baseT1BRR/Full",
];

/// The compact codec for link-mode bitsets, sized to [`LINK_MODES`].
pub fn link_mode_codec() -> CompactBitset {
    CompactBitset::new(LINK_MODES.len() as u32)
}

/// One link mode in a capability set.
///
/// Bits the table does not name are kept with `name: None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdvertisedLinkMode {
    /// Bit index.
    pub index: u32,
    /// Mode name, e.g. `"1000baseT/Full"`.
    pub name: Option<&'static str>,
}

impl AdvertisedLinkMode {
    /// `FEC_NONE` (bit 49).
    pub const FEC_NONE: Self = Self {
        index: 49,
        name: Some("FEC_NONE"),
    };
    /// `FEC_RS` (bit 50).
    pub const FEC_RS: Self = Self {
        index: 50,
        name: Some("FEC_RS"),
    };
    /// `FEC_BASER` (bit 51).
    pub const FEC_BASER: Self = Self {
        index: 51,
        name: Some("FEC_BASER"),
    };
    /// `FEC_LLRS` (bit 74).
    pub const FEC_LLRS: Self = Self {
        index: 74,
        name: Some("FEC_LLRS"),
    };

    /// Resolve a bit index against the link-mode table.
    pub fn from_index(index: u32) -> Self {
        Self {
            index,
            name: LINK_MODES.get(index as usize).copied(),
        }
    }

    /// Look up a mode by its table name.
    pub fn by_name(name: &str) -> Option<Self> {
        LINK_MODES
            .iter()
            .position(|&n| n == name)
            .map(|i| Self::from_index(i as u32))
    }
}

impl fmt::Display for AdvertisedLinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "bit{}", self.index),
        }
    }
}

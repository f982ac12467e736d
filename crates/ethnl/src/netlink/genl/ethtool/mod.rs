//! Ethtool device settings via Generic Netlink.
//!
//! This module maps the kernel's ethtool netlink interface (available since
//! Linux 5.6) onto typed records:
//!
//! - Link info (port type)
//! - Link modes (speed, duplex, autonegotiation, advertised modes)
//! - Link state (carrier)
//! - Wake-on-LAN
//! - Forward Error Correction
//! - Private flags
//!
//! # Example
//!
//! ```rust,ignore
//! use ethnl::{Client, Interface};
//!
//! # async fn example<T: ethnl::Transport>(transport: T) -> ethnl::Result<()> {
//! let client = Client::new(transport);
//!
//! let state = client.link_state(&Interface::name("eth0")).await?;
//! println!("Link: {}", if state.link { "up" } else { "down" });
//!
//! for modes in client.link_modes().await? {
//!     println!("{}: {:?} Mb/s {:?}", modes.interface, modes.speed, modes.duplex);
//! }
//! # Ok(())
//! # }
//! ```

mod bitset;
mod client;
mod header;
mod link_modes;
mod types;

pub use bitset::{
    BitsetCodec, Bitmap, CompactBitset, FixedBitfield, VerboseBit, parse_bits, write_bits,
};
pub use client::Client;
pub use header::{parse_header, write_header};
pub use link_modes::{AdvertisedLinkMode, LINK_MODES, link_mode_codec};
pub use types::*;

/// Ethtool Generic Netlink family name.
pub const ETHTOOL_GENL_NAME: &str = "ethtool";

/// Ethtool Generic Netlink version.
pub const ETHTOOL_GENL_VERSION: u8 = 1;

// =============================================================================
// Commands
// =============================================================================

/// `ETHTOOL_MSG_*` commands this crate sends.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolCmd {
    /// `ETHTOOL_MSG_LINKINFO_GET`
    LinkinfoGet = 2,
    /// `ETHTOOL_MSG_LINKMODES_GET`
    LinkmodesGet = 4,
    /// `ETHTOOL_MSG_LINKSTATE_GET`
    LinkstateGet = 6,
    /// `ETHTOOL_MSG_WOL_GET`
    WolGet = 9,
    /// `ETHTOOL_MSG_WOL_SET`
    WolSet = 10,
    /// `ETHTOOL_MSG_PRIVFLAGS_GET`
    PrivflagsGet = 13,
    /// `ETHTOOL_MSG_PRIVFLAGS_SET`
    PrivflagsSet = 14,
    /// `ETHTOOL_MSG_FEC_GET`
    FecGet = 29,
    /// `ETHTOOL_MSG_FEC_SET`
    FecSet = 30,
}

impl EthtoolCmd {
    /// Kernel command name, for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::LinkinfoGet => "LINKINFO_GET",
            Self::LinkmodesGet => "LINKMODES_GET",
            Self::LinkstateGet => "LINKSTATE_GET",
            Self::WolGet => "WOL_GET",
            Self::WolSet => "WOL_SET",
            Self::PrivflagsGet => "PRIVFLAGS_GET",
            Self::PrivflagsSet => "PRIVFLAGS_SET",
            Self::FecGet => "FEC_GET",
            Self::FecSet => "FEC_SET",
        }
    }
}

// =============================================================================
// Header Attributes
// =============================================================================

/// Attributes for the request header (nested under ETHTOOL_A_*_HEADER).
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolHeaderAttr {
    Unspec = 0,
    /// u32, omitted when zero.
    DevIndex = 1,
    /// NUL-terminated, omitted when empty.
    DevName = 2,
    /// u32 of [`EthtoolFlag`] bits.
    Flags = 3,
}

/// `ETHTOOL_FLAG_*` values for the header `FLAGS` attribute.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolFlag {
    /// Reply with `SIZE`/`VALUE`/`MASK` bitmaps instead of bit lists.
    CompactBitsets = 1 << 0,
}

// =============================================================================
// Bitset Attributes
// =============================================================================

/// `ETHTOOL_A_BITSET_*`
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolBitsetAttr {
    Unspec = 0,
    /// Value is the whole set; no mask follows (flag).
    Nomask = 1,
    /// u32 bit count.
    Size = 2,
    /// Bit-by-bit list (nested).
    Bits = 3,
    /// u32 words of set bits.
    Value = 4,
    /// u32 words of meaningful bits.
    Mask = 5,
}

/// Attributes inside `ETHTOOL_A_BITSET_BITS`.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolBitsetBitsAttr {
    Unspec = 0,
    /// One bit (nested).
    Bit = 1,
}

/// `ETHTOOL_A_BITSET_BIT_*`
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolBitsetBitAttr {
    Unspec = 0,
    /// Bit index (u32).
    Index = 1,
    /// Bit name (string).
    Name = 2,
    /// Present when the bit is set.
    Value = 3,
}

// =============================================================================
// Per-command Attributes
// =============================================================================

/// Attributes for link info.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolLinkinfoAttr {
    Unspec = 0,
    /// Request header (nested).
    Header = 1,
    /// Physical port type (u8).
    Port = 2,
}

/// Attributes for link modes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolLinkmodesAttr {
    Unspec = 0,
    /// Request header (nested).
    Header = 1,
    /// Autonegotiation enabled (u8).
    Autoneg = 2,
    /// Our link modes: supported as mask, advertised as value (bitset).
    Ours = 3,
    /// Peer advertised link modes (bitset).
    Peer = 4,
    /// Current speed in Mb/s (u32).
    Speed = 5,
    /// Current duplex (u8).
    Duplex = 6,
}

/// Attributes for link state.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolLinkstateAttr {
    Unspec = 0,
    /// Request header (nested).
    Header = 1,
    /// Link detected (u8, boolean).
    Link = 2,
}

/// Attributes for Wake-on-LAN.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolWolAttr {
    Unspec = 0,
    /// Request header (nested).
    Header = 1,
    /// Enabled modes (bitfield32).
    Modes = 2,
    /// SecureOn password (binary).
    Sopass = 3,
}

/// Attributes for Forward Error Correction.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolFecAttr {
    Unspec = 0,
    /// Request header (nested).
    Header = 1,
    /// Configured modes, as link-mode bits (bitset).
    Modes = 2,
    /// Automatic FEC selection (u8, boolean).
    Auto = 3,
    /// Active mode, as a link-mode index (u32).
    Active = 4,
}

/// Attributes for private flags.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EthtoolPrivflagsAttr {
    Unspec = 0,
    /// Request header (nested).
    Header = 1,
    /// Flags (bitset).
    Flags = 2,
}

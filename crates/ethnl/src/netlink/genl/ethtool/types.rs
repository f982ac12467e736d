//! Ethtool records and their wire mappings.
//!
//! Each record implements [`EthtoolMessage`], which knows the command that
//! fetches it, how to parse one reply message into it, and how to write it
//! back out. Records the kernel lets callers change also implement
//! [`EthtoolSet`].

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::netlink::attr::{get, walk};
use crate::netlink::builder::AttrBuilder;
use crate::netlink::error::{Error, Result};
use crate::netlink::interface::Interface;

use super::bitset::{BitsetCodec, Bitmap, FixedBitfield, parse_bits, write_bits};
use super::header::{parse_header, write_header};
use super::link_modes::{AdvertisedLinkMode, link_mode_codec};
use super::{
    EthtoolCmd, EthtoolFecAttr, EthtoolLinkinfoAttr, EthtoolLinkmodesAttr, EthtoolLinkstateAttr,
    EthtoolPrivflagsAttr, EthtoolWolAttr,
};

// =============================================================================
// Mapping traits
// =============================================================================

/// A record fetched with an ethtool `*_GET` command.
pub trait EthtoolMessage: Sized {
    /// Command that fetches this record.
    const GET: EthtoolCmd;
    /// Tag of the request/reply header nest.
    const HEADER: u16;
    /// Human-readable record name, e.g. `"link info"`.
    const NAME: &'static str;
    /// Operation named in errors from a `GET`, e.g. `"fetching link info"`.
    const GET_OPERATION: &'static str;
    /// Whether reads ask for compact bitsets.
    ///
    /// Every record but [`PrivateFlags`] sets this. Private flag names only
    /// come back in the bit-by-bit form, so that read leaves the flag off.
    const COMPACT: bool = true;

    /// The device this record describes.
    fn interface(&self) -> &Interface;

    /// Parse one reply message body.
    ///
    /// Attributes may arrive in any order; unknown ones are ignored.
    fn parse(data: &[u8]) -> Result<Self>;

    /// Write every attribute after the header, as a reply would carry it.
    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()>;

    /// Encode a full reply body: header plus [`write_body`](Self::write_body).
    fn encode(&self) -> Result<Vec<u8>> {
        let mut builder = AttrBuilder::new();
        write_header(&mut builder, Self::HEADER, self.interface(), false);
        self.write_body(&mut builder)?;
        builder.finish()
    }

    /// Encode a `GET` request for `iface`. An empty selector asks for all
    /// devices.
    fn request(iface: &Interface) -> Result<Vec<u8>> {
        let mut builder = AttrBuilder::new();
        write_header(&mut builder, Self::HEADER, iface, Self::COMPACT);
        builder.finish()
    }
}

/// A record the kernel accepts through an ethtool `*_SET` command.
pub trait EthtoolSet: EthtoolMessage {
    /// Command that applies this record.
    const SET: EthtoolCmd;
    /// Operation named in errors from a `SET`.
    const SET_OPERATION: &'static str;

    /// Write the attributes a set request carries after the header.
    fn write_set_body(&self, builder: &mut AttrBuilder) -> Result<()>;

    /// Encode a full `SET` request body. The header carries no flags.
    fn encode_set(&self) -> Result<Vec<u8>> {
        let mut builder = AttrBuilder::new();
        write_header(&mut builder, Self::HEADER, self.interface(), false);
        self.write_set_body(&mut builder)?;
        builder.finish()
    }
}

fn modes_from_bitmap(bits: &Bitmap) -> Vec<AdvertisedLinkMode> {
    bits.iter().map(AdvertisedLinkMode::from_index).collect()
}

fn bitmap_from_modes(modes: &[AdvertisedLinkMode]) -> Bitmap {
    modes.iter().map(|m| m.index).collect()
}

fn write_link_modes(
    builder: &mut AttrBuilder,
    attr_type: u16,
    modes: &[AdvertisedLinkMode],
) -> Result<()> {
    let codec = link_mode_codec();
    // Checked before the bitmap grows to the index.
    if let Some(mode) = modes.iter().find(|m| m.index >= codec.size()) {
        return Err(Error::InvalidAttribute(format!(
            "bit {} out of range for bitset of size {}",
            mode.index,
            codec.size()
        )));
    }
    let bits = bitmap_from_modes(modes);
    codec.encode(builder, attr_type, &bits, &bits)
}

fn parse_link_modes(payload: &[u8]) -> Result<Vec<AdvertisedLinkMode>> {
    Ok(modes_from_bitmap(&link_mode_codec().decode(payload)?))
}

// =============================================================================
// Common Types
// =============================================================================

/// Duplex mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Duplex {
    /// Half duplex.
    Half,
    /// Full duplex.
    Full,
    /// Unknown duplex.
    #[default]
    Unknown,
}

impl Duplex {
    /// Parse from kernel value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Duplex::Half,
            0x01 => Duplex::Full,
            _ => Duplex::Unknown,
        }
    }

    /// Convert to kernel value.
    pub fn to_u8(self) -> u8 {
        match self {
            Duplex::Half => 0x00,
            Duplex::Full => 0x01,
            Duplex::Unknown => 0xff,
        }
    }
}

/// Physical port type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Port {
    /// Twisted pair (RJ45).
    TwistedPair,
    /// Attachment Unit Interface.
    Aui,
    /// Media Independent Interface.
    Mii,
    /// Fiber optic.
    Fibre,
    /// BNC connector.
    Bnc,
    /// Direct attach (copper SFP+).
    DirectAttach,
    /// No port.
    None,
    /// Other port type.
    #[default]
    Other,
}

impl Port {
    /// Parse from kernel value. Unknown values map to [`Port::Other`].
    pub fn from_u8(v: u8) -> Self {
        match v {
            0x00 => Port::TwistedPair,
            0x01 => Port::Aui,
            0x02 => Port::Mii,
            0x03 => Port::Fibre,
            0x04 => Port::Bnc,
            0x05 => Port::DirectAttach,
            0xef => Port::None,
            _ => Port::Other,
        }
    }

    /// Convert to kernel value.
    pub fn to_u8(self) -> u8 {
        match self {
            Port::TwistedPair => 0x00,
            Port::Aui => 0x01,
            Port::Mii => 0x02,
            Port::Fibre => 0x03,
            Port::Bnc => 0x04,
            Port::DirectAttach => 0x05,
            Port::None => 0xef,
            Port::Other => 0xff,
        }
    }
}

/// Autonegotiation setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AutoNegotiation {
    /// Disabled.
    #[default]
    Off,
    /// Enabled.
    On,
}

impl AutoNegotiation {
    /// Parse from kernel value; any non-zero byte is `On`.
    pub fn from_u8(v: u8) -> Self {
        if v == 0 { Self::Off } else { Self::On }
    }

    /// Convert to kernel value.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

/// Speed value the kernel reports when the speed is unknown.
pub const SPEED_UNKNOWN: u32 = u32::MAX;

// =============================================================================
// Link Info
// =============================================================================

/// Link information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkInfo {
    /// Device the record describes.
    pub interface: Interface,
    /// Physical port type.
    pub port: Port,
}

impl EthtoolMessage for LinkInfo {
    const GET: EthtoolCmd = EthtoolCmd::LinkinfoGet;
    const HEADER: u16 = EthtoolLinkinfoAttr::Header as u16;
    const NAME: &'static str = "link info";
    const GET_OPERATION: &'static str = "fetching link info";

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn parse(data: &[u8]) -> Result<Self> {
        let mut info = Self::default();
        walk(data, |attr_type, payload| {
            match attr_type {
                t if t == EthtoolLinkinfoAttr::Header as u16 => {
                    info.interface = parse_header(payload)?;
                }
                t if t == EthtoolLinkinfoAttr::Port as u16 => {
                    info.port = Port::from_u8(get::u8(payload)?);
                }
                _ => {}
            }
            Ok(())
        })?;
        Ok(info)
    }

    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        builder.append_attr_u8(EthtoolLinkinfoAttr::Port as u16, self.port.to_u8());
        Ok(())
    }
}

// =============================================================================
// Link Modes
// =============================================================================

/// Link modes: negotiated speed and duplex plus advertised capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkMode {
    /// Device the record describes.
    pub interface: Interface,
    /// Current speed in Mb/s, `None` when unknown.
    pub speed: Option<u32>,
    /// Current duplex mode.
    pub duplex: Duplex,
    /// Autonegotiation setting.
    pub auto_negotiation: AutoNegotiation,
    /// Modes this device advertises.
    pub ours: Vec<AdvertisedLinkMode>,
    /// Modes the link partner advertises.
    pub peer: Vec<AdvertisedLinkMode>,
}

impl LinkMode {
    /// Check if we advertise the named mode.
    pub fn advertises(&self, mode: &str) -> bool {
        self.ours.iter().any(|m| m.name == Some(mode))
    }

    /// Check if the link partner advertises the named mode.
    pub fn peer_advertises(&self, mode: &str) -> bool {
        self.peer.iter().any(|m| m.name == Some(mode))
    }
}

impl EthtoolMessage for LinkMode {
    const GET: EthtoolCmd = EthtoolCmd::LinkmodesGet;
    const HEADER: u16 = EthtoolLinkmodesAttr::Header as u16;
    const NAME: &'static str = "link modes";
    const GET_OPERATION: &'static str = "fetching link modes";

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn parse(data: &[u8]) -> Result<Self> {
        let mut modes = Self::default();
        walk(data, |attr_type, payload| {
            match attr_type {
                t if t == EthtoolLinkmodesAttr::Header as u16 => {
                    modes.interface = parse_header(payload)?;
                }
                t if t == EthtoolLinkmodesAttr::Autoneg as u16 => {
                    modes.auto_negotiation = AutoNegotiation::from_u8(get::u8(payload)?);
                }
                t if t == EthtoolLinkmodesAttr::Ours as u16 => {
                    modes.ours = parse_link_modes(payload)?;
                }
                t if t == EthtoolLinkmodesAttr::Peer as u16 => {
                    modes.peer = parse_link_modes(payload)?;
                }
                t if t == EthtoolLinkmodesAttr::Speed as u16 => {
                    let speed = get::u32_ne(payload)?;
                    modes.speed = (speed != SPEED_UNKNOWN).then_some(speed);
                }
                t if t == EthtoolLinkmodesAttr::Duplex as u16 => {
                    modes.duplex = Duplex::from_u8(get::u8(payload)?);
                }
                _ => {}
            }
            Ok(())
        })?;
        Ok(modes)
    }

    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        builder.append_attr_u8(
            EthtoolLinkmodesAttr::Autoneg as u16,
            self.auto_negotiation.to_u8(),
        );
        write_link_modes(builder, EthtoolLinkmodesAttr::Ours as u16, &self.ours)?;
        write_link_modes(builder, EthtoolLinkmodesAttr::Peer as u16, &self.peer)?;
        builder.append_attr_u32(
            EthtoolLinkmodesAttr::Speed as u16,
            self.speed.unwrap_or(SPEED_UNKNOWN),
        );
        builder.append_attr_u8(EthtoolLinkmodesAttr::Duplex as u16, self.duplex.to_u8());
        Ok(())
    }
}

// =============================================================================
// Link State
// =============================================================================

/// Link state information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkState {
    /// Device the record describes.
    pub interface: Interface,
    /// Link is detected (carrier present).
    pub link: bool,
}

impl EthtoolMessage for LinkState {
    const GET: EthtoolCmd = EthtoolCmd::LinkstateGet;
    const HEADER: u16 = EthtoolLinkstateAttr::Header as u16;
    const NAME: &'static str = "link state";
    const GET_OPERATION: &'static str = "fetching link state";

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn parse(data: &[u8]) -> Result<Self> {
        let mut state = Self::default();
        walk(data, |attr_type, payload| {
            match attr_type {
                t if t == EthtoolLinkstateAttr::Header as u16 => {
                    state.interface = parse_header(payload)?;
                }
                t if t == EthtoolLinkstateAttr::Link as u16 => {
                    state.link = get::bool(payload)?;
                }
                _ => {}
            }
            Ok(())
        })?;
        Ok(state)
    }

    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        builder.append_attr_bool(EthtoolLinkstateAttr::Link as u16, self.link);
        Ok(())
    }
}

// =============================================================================
// Wake-on-LAN
// =============================================================================

/// Wake-on-LAN modes (`WAKE_*` flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WolMode(pub u32);

impl WolMode {
    /// Wake on PHY activity.
    pub const PHY: Self = Self(1 << 0);
    /// Wake on unicast messages.
    pub const UNICAST: Self = Self(1 << 1);
    /// Wake on multicast messages.
    pub const MULTICAST: Self = Self(1 << 2);
    /// Wake on broadcast messages.
    pub const BROADCAST: Self = Self(1 << 3);
    /// Wake on ARP.
    pub const ARP: Self = Self(1 << 4);
    /// Wake on MagicPacket.
    pub const MAGIC: Self = Self(1 << 5);
    /// Wake on MagicPacket with SecureOn password.
    pub const MAGIC_SECURE: Self = Self(1 << 6);
    /// Wake on filter(s).
    pub const FILTER: Self = Self(1 << 7);

    const NAMES: [(Self, &'static str); 8] = [
        (Self::PHY, "phy"),
        (Self::UNICAST, "unicast"),
        (Self::MULTICAST, "multicast"),
        (Self::BROADCAST, "broadcast"),
        (Self::ARP, "arp"),
        (Self::MAGIC, "magic"),
        (Self::MAGIC_SECURE, "magic_secure"),
        (Self::FILTER, "filter"),
    ];

    /// No modes (wake-on-LAN disabled).
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every mode this crate knows about.
    pub const fn all() -> Self {
        Self(0xff)
    }

    /// Get the raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for WolMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WolMode {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for WolMode {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<u32> for WolMode {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<WolMode> for u32 {
    fn from(val: WolMode) -> Self {
        val.0
    }
}

impl fmt::Display for WolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("disabled");
        }
        let mut first = true;
        for (mode, name) in Self::NAMES {
            if self.contains(mode) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let unknown = self.0 & !Self::all().0;
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#x}", unknown)?;
        }
        Ok(())
    }
}

/// Wake-on-LAN configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WakeOnLan {
    /// Device the record describes.
    pub interface: Interface,
    /// Enabled wake-up sources.
    pub modes: WolMode,
}

impl EthtoolMessage for WakeOnLan {
    const GET: EthtoolCmd = EthtoolCmd::WolGet;
    const HEADER: u16 = EthtoolWolAttr::Header as u16;
    const NAME: &'static str = "wake-on-LAN";
    const GET_OPERATION: &'static str = "fetching wake-on-LAN";

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn parse(data: &[u8]) -> Result<Self> {
        let mut wol = Self::default();
        walk(data, |attr_type, payload| {
            match attr_type {
                t if t == EthtoolWolAttr::Header as u16 => {
                    wol.interface = parse_header(payload)?;
                }
                t if t == EthtoolWolAttr::Modes as u16 => {
                    let bits = FixedBitfield.decode(payload)?;
                    wol.modes = WolMode(bits.words().first().copied().unwrap_or(0));
                }
                // SecureOn password is not decoded.
                _ => {}
            }
            Ok(())
        })?;
        Ok(wol)
    }

    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        let modes = Bitmap::from_words(vec![self.modes.bits()]);
        FixedBitfield.encode(builder, EthtoolWolAttr::Modes as u16, &modes, &modes)
    }
}

impl EthtoolSet for WakeOnLan {
    const SET: EthtoolCmd = EthtoolCmd::WolSet;
    const SET_OPERATION: &'static str = "setting wake-on-LAN";

    /// The selector covers every known mode so that modes left out of
    /// `modes` are cleared.
    fn write_set_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        let value = Bitmap::from_words(vec![self.modes.bits()]);
        let selector = Bitmap::from_words(vec![(self.modes | WolMode::all()).bits()]);
        FixedBitfield.encode(builder, EthtoolWolAttr::Modes as u16, &value, &selector)
    }
}

// =============================================================================
// Forward Error Correction
// =============================================================================

/// Forward Error Correction configuration.
///
/// Modes are link-mode bits (`FEC_NONE`, `FEC_RS`, `FEC_BASER`, `FEC_LLRS`)
/// and are passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Fec {
    /// Device the record describes.
    pub interface: Interface,
    /// Configured FEC modes.
    pub modes: Vec<AdvertisedLinkMode>,
    /// Let the driver pick the mode automatically.
    pub auto: bool,
    /// Mode currently in use. Read-only.
    pub active: Option<AdvertisedLinkMode>,
}

impl EthtoolMessage for Fec {
    const GET: EthtoolCmd = EthtoolCmd::FecGet;
    const HEADER: u16 = EthtoolFecAttr::Header as u16;
    const NAME: &'static str = "FEC";
    const GET_OPERATION: &'static str = "fetching FEC";

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn parse(data: &[u8]) -> Result<Self> {
        let mut fec = Self::default();
        walk(data, |attr_type, payload| {
            match attr_type {
                t if t == EthtoolFecAttr::Header as u16 => {
                    fec.interface = parse_header(payload)?;
                }
                t if t == EthtoolFecAttr::Modes as u16 => {
                    fec.modes = parse_link_modes(payload)?;
                }
                t if t == EthtoolFecAttr::Auto as u16 => {
                    fec.auto = get::bool(payload)?;
                }
                t if t == EthtoolFecAttr::Active as u16 => {
                    fec.active = Some(AdvertisedLinkMode::from_index(get::u32_ne(payload)?));
                }
                _ => {}
            }
            Ok(())
        })?;
        Ok(fec)
    }

    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        self.write_set_body(builder)?;
        if let Some(active) = self.active {
            builder.append_attr_u32(EthtoolFecAttr::Active as u16, active.index);
        }
        Ok(())
    }
}

impl EthtoolSet for Fec {
    const SET: EthtoolCmd = EthtoolCmd::FecSet;
    const SET_OPERATION: &'static str = "setting FEC";

    fn write_set_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        write_link_modes(builder, EthtoolFecAttr::Modes as u16, &self.modes)?;
        builder.append_attr_bool(EthtoolFecAttr::Auto as u16, self.auto);
        Ok(())
    }
}

// =============================================================================
// Private Flags
// =============================================================================

/// Driver-defined private flags, keyed by the names the driver reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PrivateFlags {
    /// Device the record describes.
    pub interface: Interface,
    /// Flag name to state.
    pub flags: BTreeMap<String, bool>,
}

impl PrivateFlags {
    /// Check if the named flag is present and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }
}

impl EthtoolMessage for PrivateFlags {
    const GET: EthtoolCmd = EthtoolCmd::PrivflagsGet;
    const HEADER: u16 = EthtoolPrivflagsAttr::Header as u16;
    const NAME: &'static str = "private flags";
    const GET_OPERATION: &'static str = "fetching private flags";
    // Names only travel in the bit-by-bit form.
    const COMPACT: bool = false;

    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn parse(data: &[u8]) -> Result<Self> {
        let mut flags = Self::default();
        walk(data, |attr_type, payload| {
            match attr_type {
                t if t == EthtoolPrivflagsAttr::Header as u16 => {
                    flags.interface = parse_header(payload)?;
                }
                t if t == EthtoolPrivflagsAttr::Flags as u16 => {
                    for bit in parse_bits(payload)? {
                        if let Some(name) = bit.name {
                            flags.flags.insert(name, bit.value);
                        }
                    }
                }
                _ => {}
            }
            Ok(())
        })?;
        Ok(flags)
    }

    fn write_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        self.write_set_body(builder)
    }
}

impl EthtoolSet for PrivateFlags {
    const SET: EthtoolCmd = EthtoolCmd::PrivflagsSet;
    const SET_OPERATION: &'static str = "setting private flags";

    fn write_set_body(&self, builder: &mut AttrBuilder) -> Result<()> {
        write_bits(
            builder,
            EthtoolPrivflagsAttr::Flags as u16,
            self.flags.iter().map(|(name, &value)| (name.as_str(), value)),
        );
        Ok(())
    }
}

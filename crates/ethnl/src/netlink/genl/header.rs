//! `struct genlmsghdr`.
//!
//! Layout of one ethtool message as the transport frames it; this crate
//! only sees the last two parts:
//!
//! ```text
//! nlmsghdr    16 bytes   transport
//! genlmsghdr   4 bytes   cmd u8 | version u8 | reserved u16
//! nlattr...              ETHTOOL_A_* attributes
//! ```

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::netlink::error::{Error, Result};

/// Per-family header: which command, at which family version.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct GenlMsgHdr {
    /// `ETHTOOL_MSG_*` command.
    pub cmd: u8,
    /// Family version; ethtool is at 1.
    pub version: u8,
    /// Always zero.
    pub reserved: u16,
}

/// Wire length of [`GenlMsgHdr`].
pub const GENL_HDRLEN: usize = std::mem::size_of::<GenlMsgHdr>();

impl GenlMsgHdr {
    /// Header for `cmd` at `version`.
    #[inline]
    pub const fn new(cmd: u8, version: u8) -> Self {
        Self {
            cmd,
            version,
            reserved: 0,
        }
    }

    /// Parse a header from the front of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (hdr, _) = Self::read_from_prefix(data).map_err(|_| Error::Truncated {
            expected: GENL_HDRLEN,
            actual: data.len(),
        })?;
        Ok(hdr)
    }

    /// Wire bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        IntoBytes::as_bytes(self)
    }
}

//! `nlattr` streams: header layout, iteration and scalar accessors.
//!
//! Every ethtool message body is a flat run of 4-byte aligned attributes,
//! some of which nest further runs (the request header, bitsets, bit
//! lists). [`walk`] is the single entry point the mappers use to read them.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::error::{Error, Result};
use super::parse::parse_u32_ne;

/// Attribute alignment in bytes.
pub const NLA_ALIGNTO: usize = 4;

/// Length of the `nlattr` header.
pub const NLA_HDRLEN: usize = 4;

/// Set on attributes whose payload is itself an attribute stream.
pub const NLA_F_NESTED: u16 = 1 << 15;
/// Set on attributes whose payload is big-endian.
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
/// The bits of `nla_type` that carry the tag.
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

/// Round `len` up to the next attribute boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    len.next_multiple_of(NLA_ALIGNTO)
}

/// `struct nlattr`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Header plus payload length, without trailing padding.
    pub nla_len: u16,
    /// Tag and flag bits.
    pub nla_type: u16,
}

impl NlAttr {
    /// Header for a `data_len`-byte payload.
    ///
    /// Lengths past `u16` wrap; [`AttrBuilder`](super::builder::AttrBuilder)
    /// checks them before calling this.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// The tag with the flag bits masked off.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Whether the sender marked the payload as nested.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Wire bytes of the header.
    pub fn as_bytes(&self) -> &[u8] {
        IntoBytes::as_bytes(self)
    }

    /// Read a header from the front of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match Self::read_from_prefix(data) {
            Ok((attr, _)) => Ok(attr),
            Err(_) => Err(Error::Truncated {
                expected: NLA_HDRLEN,
                actual: data.len(),
            }),
        }
    }
}

/// Yields `(tag, payload)` for each attribute of a stream.
///
/// Stops early when a header claims more bytes than remain, or when fewer
/// than [`NLA_HDRLEN`] trailing bytes are left; [`is_malformed`]
/// then returns `true`. [`walk`] turns that into an error.
///
/// [`is_malformed`]: AttrIter::is_malformed
pub struct AttrIter<'a> {
    rest: &'a [u8],
    malformed: bool,
}

impl<'a> AttrIter<'a> {
    /// Iterate over the attributes in `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            rest: data,
            malformed: false,
        }
    }

    /// Whether the stream has been fully consumed.
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Whether iteration ended on a broken header or stray bytes.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    fn fail(&mut self) -> Option<(u16, &'a [u8])> {
        self.malformed = true;
        self.rest = &[];
        None
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let Ok(attr) = NlAttr::from_bytes(self.rest) else {
            return self.fail();
        };

        let len = usize::from(attr.nla_len);
        if !(NLA_HDRLEN..=self.rest.len()).contains(&len) {
            return self.fail();
        }

        let payload = &self.rest[NLA_HDRLEN..len];
        // The last attribute may omit its padding.
        self.rest = self.rest.get(nla_align(len)..).unwrap_or(&[]);
        Some((attr.kind(), payload))
    }
}

/// Hand each `(tag, payload)` in `data` to `f`, in wire order.
///
/// Callers match the tags they know and skip the rest. A truncated stream
/// fails with [`Error::InvalidMessage`] after the complete attributes have
/// been visited.
pub fn walk<'a>(data: &'a [u8], mut f: impl FnMut(u16, &'a [u8]) -> Result<()>) -> Result<()> {
    let mut iter = AttrIter::new(data);
    for (attr_type, payload) in iter.by_ref() {
        f(attr_type, payload)?;
    }
    if iter.is_malformed() {
        return Err(Error::InvalidMessage("truncated attribute stream".into()));
    }
    Ok(())
}

/// Scalar payload accessors.
pub mod get {
    use super::*;

    /// First byte of the payload.
    pub fn u8(data: &[u8]) -> Result<u8> {
        data.first()
            .copied()
            .ok_or_else(|| Error::InvalidAttribute("empty u8 attribute".into()))
    }

    /// One-byte boolean; any non-zero value is `true`.
    pub fn bool(data: &[u8]) -> Result<bool> {
        u8(data).map(|b| b != 0)
    }

    /// Native-endian u32 from the first four bytes.
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        parse_u32_ne(&mut &data[..]).map_err(|_| {
            Error::InvalidAttribute(format!("u32 attribute has {} bytes", data.len()))
        })
    }

    /// NUL-terminated UTF-8 string; a missing terminator is tolerated.
    pub fn string(data: &[u8]) -> Result<&str> {
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..end])
            .map_err(|e| Error::InvalidAttribute(format!("string attribute: {e}")))
    }
}

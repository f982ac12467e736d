//! Writes the attribute stream of an ethtool request.
//!
//! Only the part after the generic netlink header is produced here;
//! `nlmsghdr` framing and sequence numbers belong to the transport.
//!
//! ```ignore
//! let mut b = AttrBuilder::new();
//! b.nested(1, |h| h.append_attr_str(2, "eth0"));
//! b.append_attr_u8(2, 1);
//! let body = b.finish()?;
//! ```

use super::attr::{NLA_F_NESTED, NLA_HDRLEN, NlAttr, nla_align};
use super::error::{Error, Result};

/// An open nest; pass it back to [`AttrBuilder::nest_end`].
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct NestToken {
    offset: usize,
    attr_type: u16,
}

/// Accumulates 4-byte aligned `nlattr`s.
///
/// Lengths that do not fit the 16-bit `nla_len` are remembered and
/// reported by [`finish`](Self::finish) rather than at the call site, so
/// the `append_*` methods stay infallible.
#[derive(Debug, Clone, Default)]
pub struct AttrBuilder {
    buf: Vec<u8>,
    overflow: Option<u16>,
}

impl AttrBuilder {
    /// Start an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far, padding included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn pad(&mut self) {
        self.buf.resize(nla_align(self.buf.len()), 0);
    }

    fn check_len(&mut self, attr_type: u16, len: usize) {
        if len > usize::from(u16::MAX) {
            self.overflow.get_or_insert(attr_type);
        }
    }

    /// Raw payload under `attr_type`.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) {
        self.check_len(attr_type, NLA_HDRLEN + data.len());
        self.buf
            .extend_from_slice(NlAttr::new(attr_type, data.len()).as_bytes());
        self.buf.extend_from_slice(data);
        self.pad();
    }

    pub fn append_attr_u8(&mut self, attr_type: u16, value: u8) {
        self.append_attr(attr_type, &[value]);
    }

    /// One byte, `0` or `1`.
    pub fn append_attr_bool(&mut self, attr_type: u16, value: bool) {
        self.append_attr_u8(attr_type, u8::from(value));
    }

    /// Zero-length flag attribute.
    pub fn append_attr_empty(&mut self, attr_type: u16) {
        self.append_attr(attr_type, &[]);
    }

    pub fn append_attr_u32(&mut self, attr_type: u16, value: u32) {
        self.append_attr(attr_type, &value.to_ne_bytes());
    }

    /// `value` plus a trailing NUL.
    pub fn append_attr_str(&mut self, attr_type: u16, value: &str) {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        self.append_attr(attr_type, &data);
    }

    /// Open a nest under `attr_type`. Everything appended until the
    /// matching [`nest_end`](Self::nest_end) lands inside it.
    pub fn nest_start(&mut self, attr_type: u16) -> NestToken {
        let offset = self.buf.len();
        self.buf
            .extend_from_slice(NlAttr::new(attr_type | NLA_F_NESTED, 0).as_bytes());
        NestToken { offset, attr_type }
    }

    /// Close a nest and patch its length.
    pub fn nest_end(&mut self, token: NestToken) {
        let len = self.buf.len() - token.offset;
        self.check_len(token.attr_type, len);
        self.buf[token.offset..token.offset + 2].copy_from_slice(&(len as u16).to_ne_bytes());
        self.pad();
    }

    /// Nest whatever `f` writes under `attr_type`.
    pub fn nested(&mut self, attr_type: u16, f: impl FnOnce(&mut Self)) {
        let token = self.nest_start(attr_type);
        f(self);
        self.nest_end(token);
    }

    /// Take the finished stream.
    ///
    /// Fails with [`Error::InvalidAttribute`] naming the first attribute or
    /// nest that outgrew `nla_len`.
    pub fn finish(self) -> Result<Vec<u8>> {
        if let Some(attr_type) = self.overflow {
            return Err(Error::InvalidAttribute(format!(
                "attribute {attr_type} is longer than {} bytes",
                u16::MAX
            )));
        }
        Ok(self.buf)
    }

    /// The stream written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

//! The request/response transport consumed by the ethtool client.
//!
//! Socket lifecycle, family-id resolution, sequence numbers, and multi-part
//! reassembly all live behind [`Transport`]. The client hands over one
//! [`GenlMessage`] per operation and gets back the reply messages,
//! already stripped of their netlink headers and of `NLMSG_DONE`/ack
//! frames.

use std::future::Future;

use bytes::{BufMut, Bytes, BytesMut};

use super::error::{Result, TransportError};
use super::genl::{GENL_HDRLEN, GenlMsgHdr};

/// A generic netlink message: the GENL header plus its attribute payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenlMessage {
    /// Command and version.
    pub header: GenlMsgHdr,
    /// Encoded attributes following the header.
    pub data: Bytes,
}

impl GenlMessage {
    /// Create a message for `cmd` at `version` carrying `data`.
    pub fn new(cmd: u8, version: u8, data: impl Into<Bytes>) -> Self {
        Self {
            header: GenlMsgHdr::new(cmd, version),
            data: data.into(),
        }
    }

    /// The command identifier.
    #[inline]
    pub fn cmd(&self) -> u8 {
        self.header.cmd
    }

    /// Parse a message from its wire form (genlmsghdr followed by attributes).
    pub fn from_bytes(mut bytes: Bytes) -> Result<Self> {
        let header = GenlMsgHdr::from_bytes(&bytes)?;
        let data = bytes.split_off(GENL_HDRLEN);
        Ok(Self { header, data })
    }

    /// Serialize to wire form (genlmsghdr followed by attributes).
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(GENL_HDRLEN + self.data.len());
        buf.put_slice(self.header.as_bytes());
        buf.put_slice(&self.data);
        buf.freeze()
    }
}

/// Executes ethtool generic netlink requests.
///
/// `flags` is `NLM_F_REQUEST` combined with either `NLM_F_DUMP` (list all
/// devices) or `NLM_F_ACK` (mutation). A kernel `NLMSG_ERROR` must be
/// reported as [`TransportError::Kernel`] so the client can classify it.
pub trait Transport {
    /// Send one request and collect every reply message.
    fn execute(
        &self,
        request: GenlMessage,
        flags: u16,
    ) -> impl Future<Output = std::result::Result<Vec<GenlMessage>, TransportError>> + Send;

    /// Release the underlying connection.
    fn close(self) -> std::result::Result<(), TransportError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

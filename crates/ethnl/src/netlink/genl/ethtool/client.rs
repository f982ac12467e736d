//! Ethtool request dispatcher.
//!
//! Every public method performs exactly one [`Transport::execute`] call.
//! Reads come in two shapes, picked by the method rather than by the
//! selector:
//!
//! - targeted (`link_info(&iface)`): the selector must name a device and
//!   the kernel must answer with exactly one message
//! - dump (`link_infos()`): empty header, `NLM_F_DUMP`, zero or more replies
//!
//! Mutations are targeted, request an acknowledgement, and send a header
//! without the compact-bitsets flag.

use crate::netlink::error::{Error, Result, translate};
use crate::netlink::interface::Interface;
use crate::netlink::message::{NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST};
use crate::netlink::transport::{GenlMessage, Transport};

use super::ETHTOOL_GENL_VERSION;
use super::types::{
    EthtoolMessage, EthtoolSet, Fec, LinkInfo, LinkMode, LinkState, PrivateFlags, WakeOnLan,
};

/// Ethtool client over a generic netlink [`Transport`].
///
/// # Example
///
/// ```ignore
/// use ethnl::{Client, Interface, WakeOnLan, WolMode};
///
/// let client = Client::new(transport);
///
/// let info = client.link_info(&Interface::name("eth0")).await?;
/// println!("port: {:?}", info.port);
///
/// client
///     .set_wake_on_lan(&WakeOnLan {
///         interface: Interface::name("eth0"),
///         modes: WolMode::MAGIC,
///     })
///     .await?;
/// ```
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    /// Create a client that sends requests through `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Close the underlying transport.
    pub fn close(self) -> Result<()> {
        self.transport.close().map_err(Error::Transport)
    }

    // =========================================================================
    // Link Info
    // =========================================================================

    /// Get link info for one device.
    pub async fn link_info(&self, iface: &Interface) -> Result<LinkInfo> {
        self.get(iface).await
    }

    /// Get link info for every device.
    pub async fn link_infos(&self) -> Result<Vec<LinkInfo>> {
        self.dump().await
    }

    // =========================================================================
    // Link Modes
    // =========================================================================

    /// Get link modes for one device.
    pub async fn link_mode(&self, iface: &Interface) -> Result<LinkMode> {
        self.get(iface).await
    }

    /// Get link modes for every device.
    pub async fn link_modes(&self) -> Result<Vec<LinkMode>> {
        self.dump().await
    }

    // =========================================================================
    // Link State
    // =========================================================================

    /// Get link state for one device.
    pub async fn link_state(&self, iface: &Interface) -> Result<LinkState> {
        self.get(iface).await
    }

    /// Get link state for every device.
    pub async fn link_states(&self) -> Result<Vec<LinkState>> {
        self.dump().await
    }

    // =========================================================================
    // Wake-on-LAN
    // =========================================================================

    /// Get wake-on-LAN settings for one device.
    pub async fn wake_on_lan(&self, iface: &Interface) -> Result<WakeOnLan> {
        self.get(iface).await
    }

    /// Get wake-on-LAN settings for every device.
    pub async fn wake_on_lans(&self) -> Result<Vec<WakeOnLan>> {
        self.dump().await
    }

    /// Replace the wake-on-LAN modes of `wol.interface`.
    ///
    /// Modes not in `wol.modes` are disabled.
    pub async fn set_wake_on_lan(&self, wol: &WakeOnLan) -> Result<()> {
        self.set(wol).await
    }

    // =========================================================================
    // FEC
    // =========================================================================

    /// Get FEC settings for one device.
    pub async fn fec(&self, iface: &Interface) -> Result<Fec> {
        self.get(iface).await
    }

    /// Get FEC settings for every device.
    pub async fn fecs(&self) -> Result<Vec<Fec>> {
        self.dump().await
    }

    /// Configure FEC on `fec.interface`. `fec.active` is not sent.
    pub async fn set_fec(&self, fec: &Fec) -> Result<()> {
        self.set(fec).await
    }

    // =========================================================================
    // Private Flags
    // =========================================================================

    /// Get private flags for one device.
    pub async fn private_flags(&self, iface: &Interface) -> Result<PrivateFlags> {
        self.get(iface).await
    }

    /// Get private flags for every device.
    pub async fn all_private_flags(&self) -> Result<Vec<PrivateFlags>> {
        self.dump().await
    }

    /// Change the listed private flags on `flags.interface`.
    ///
    /// Flags not in the map are left untouched.
    pub async fn set_private_flags(&self, flags: &PrivateFlags) -> Result<()> {
        self.set(flags).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Targeted read: one device, exactly one reply.
    async fn get<M: EthtoolMessage>(&self, iface: &Interface) -> Result<M> {
        if iface.is_empty() {
            return Err(Error::MalformedRequest);
        }

        let request = GenlMessage::new(M::GET as u8, ETHTOOL_GENL_VERSION, M::request(iface)?);
        tracing::debug!(
            cmd = M::GET.name(),
            mode = "targeted",
            interface = %iface,
            "sending ethtool request"
        );
        let replies = self
            .execute(M::GET_OPERATION, request, NLM_F_REQUEST)
            .await?;

        if replies.len() != 1 {
            panic!(
                "ethtool {}: expected exactly one reply for {}, got {}",
                M::GET.name(),
                iface,
                replies.len()
            );
        }
        M::parse(&replies[0].data)
    }

    /// Dump read: every device, any number of replies.
    async fn dump<M: EthtoolMessage>(&self) -> Result<Vec<M>> {
        let request = GenlMessage::new(
            M::GET as u8,
            ETHTOOL_GENL_VERSION,
            M::request(&Interface::default())?,
        );
        tracing::debug!(cmd = M::GET.name(), mode = "dump", "sending ethtool request");
        let replies = self
            .execute(M::GET_OPERATION, request, NLM_F_REQUEST | NLM_F_DUMP)
            .await?;

        replies.iter().map(|msg| M::parse(&msg.data)).collect()
    }

    /// Targeted mutation; the reply carries no record.
    async fn set<M: EthtoolSet>(&self, record: &M) -> Result<()> {
        let iface = record.interface();
        if iface.is_empty() {
            return Err(Error::MalformedRequest);
        }

        let request = GenlMessage::new(M::SET as u8, ETHTOOL_GENL_VERSION, record.encode_set()?);
        tracing::debug!(
            cmd = M::SET.name(),
            mode = "targeted",
            interface = %iface,
            "sending ethtool request"
        );
        self.execute(M::SET_OPERATION, request, NLM_F_REQUEST | NLM_F_ACK)
            .await?;
        Ok(())
    }

    async fn execute(
        &self,
        operation: &'static str,
        request: GenlMessage,
        flags: u16,
    ) -> Result<Vec<GenlMessage>> {
        let cmd = request.cmd();
        match self.transport.execute(request, flags).await {
            Ok(replies) => {
                tracing::trace!(cmd, count = replies.len(), "received ethtool replies");
                Ok(replies)
            }
            Err(e) => {
                tracing::debug!(cmd, error = %e, "ethtool request failed");
                Err(translate(operation, e))
            }
        }
    }
}

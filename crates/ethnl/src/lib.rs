//! Typed access to the Linux ethtool generic netlink family.
//!
//! This crate maps ethtool records (link info, link modes, link state,
//! wake-on-LAN, FEC, private flags) to and from the family's nested
//! attribute format, and drives request/response exchanges over a
//! caller-supplied [`Transport`].
//!
//! # Features
//!
//! - `serde` - `Serialize` for every record and enum
//!
//! # Example
//!
//! ```ignore
//! use ethnl::{Client, Interface};
//!
//! async fn show<T: ethnl::Transport>(transport: T) -> ethnl::Result<()> {
//!     let client = Client::new(transport);
//!
//!     for info in client.link_infos().await? {
//!         println!("{}: {:?}", info.interface, info.port);
//!     }
//!
//!     match client.link_mode(&Interface::name("eth0")).await {
//!         Ok(modes) => println!("speed: {:?} Mb/s", modes.speed),
//!         Err(e) if e.is_not_found() => println!("eth0 has no ethtool support"),
//!         Err(e) => return Err(e),
//!     }
//!
//!     client.close()
//! }
//! ```

pub mod netlink;

// Re-export common types at crate root for convenience
pub use netlink::genl::ethtool::{
    AdvertisedLinkMode, AutoNegotiation, Client, Duplex, Fec, LinkInfo, LinkMode, LinkState, Port,
    PrivateFlags, WakeOnLan, WolMode,
};
pub use netlink::{Error, ErrorKind, GenlMessage, Interface, Result, Transport, TransportError};

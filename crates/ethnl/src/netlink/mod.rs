//! Netlink plumbing for the ethtool family.
//!
//! - [`attr`] and [`builder`] read and write `nlattr` streams
//! - [`transport`] defines the boundary to the socket layer
//! - [`genl`] holds the generic netlink header and the ethtool family
//! - [`error`] classifies failures
//!
//! # Quick Start
//!
//! ```ignore
//! use ethnl::netlink::genl::ethtool::Client;
//! use ethnl::netlink::Interface;
//!
//! let client = Client::new(transport);
//! let state = client.link_state(&Interface::index(2)).await?;
//! ```

pub mod attr;
pub mod builder;
mod error;
pub mod genl;
mod interface;
pub mod message;
pub mod parse;
pub mod transport;

pub use attr::{AttrIter, NlAttr};
pub use builder::{AttrBuilder, NestToken};
pub use error::{Error, ErrorKind, Result, TransportError, translate};
pub use interface::Interface;
pub use transport::{GenlMessage, Transport};

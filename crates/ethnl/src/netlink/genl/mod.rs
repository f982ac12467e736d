//! Generic Netlink (GENL) support.
//!
//! Generic netlink extends the standard netlink protocol with a per-family
//! header carrying a command and a version:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ ethtool::Client                         │
//! │ (typed records, dump/targeted/set)      │
//! └────────────────┬────────────────────────┘
//!                  │ GenlMessage
//! ┌────────────────▼────────────────────────┐
//! │ Transport                               │
//! │ (socket, family id, framing)            │
//! └─────────────────────────────────────────┘
//! ```

mod header;

pub use header::{GENL_HDRLEN, GenlMsgHdr};

pub mod ethtool;

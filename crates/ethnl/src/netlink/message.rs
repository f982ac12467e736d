//! Netlink request flags passed to the transport.

/// Request message.
pub const NLM_F_REQUEST: u16 = 0x01;
/// Request an acknowledgement on success.
pub const NLM_F_ACK: u16 = 0x04;
/// Return the complete table instead of a single entry.
pub const NLM_F_ROOT: u16 = 0x100;
/// Return all entries matching the criteria.
pub const NLM_F_MATCH: u16 = 0x200;
/// Dump request (ROOT | MATCH).
pub const NLM_F_DUMP: u16 = NLM_F_ROOT | NLM_F_MATCH;

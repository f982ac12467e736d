//! The `ETHTOOL_A_*_HEADER` nest shared by every ethtool command.

use crate::netlink::attr::{get, walk};
use crate::netlink::builder::AttrBuilder;
use crate::netlink::error::Result;
use crate::netlink::interface::Interface;

use super::{EthtoolFlag, EthtoolHeaderAttr};

/// Write the request header nest under `attr_type`.
///
/// Index `0` and empty names are left out, so an empty selector produces an
/// empty nest (a dump of every device). `compact` asks the kernel to reply
/// with compact bitsets and is only meaningful on reads.
pub fn write_header(builder: &mut AttrBuilder, attr_type: u16, iface: &Interface, compact: bool) {
    let token = builder.nest_start(attr_type);
    if let Some(index) = iface.as_index() {
        builder.append_attr_u32(EthtoolHeaderAttr::DevIndex as u16, index);
    }
    if let Some(name) = iface.as_name() {
        builder.append_attr_str(EthtoolHeaderAttr::DevName as u16, name);
    }
    if compact {
        builder.append_attr_u32(
            EthtoolHeaderAttr::Flags as u16,
            EthtoolFlag::CompactBitsets as u32,
        );
    }
    builder.nest_end(token);
}

/// Parse a reply header nest into the device it describes.
pub fn parse_header(data: &[u8]) -> Result<Interface> {
    let mut iface = Interface::default();
    walk(data, |attr_type, payload| {
        match attr_type {
            t if t == EthtoolHeaderAttr::DevIndex as u16 => {
                iface.index = Some(get::u32_ne(payload)?);
            }
            t if t == EthtoolHeaderAttr::DevName as u16 => {
                iface.name = Some(get::string(payload)?.to_string());
            }
            _ => {}
        }
        Ok(())
    })?;
    Ok(iface)
}

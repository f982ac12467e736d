//! Set request tests.
//!
//! Each set sends one acknowledged request whose header carries no flags.

use std::collections::BTreeMap;

use ethnl::netlink::AttrIter;
use ethnl::netlink::genl::ethtool::{
    BitsetCodec, EthtoolCmd, EthtoolFecAttr, EthtoolMessage, EthtoolPrivflagsAttr,
    EthtoolWolAttr, FixedBitfield, parse_bits,
};
use ethnl::netlink::message::{NLM_F_ACK, NLM_F_REQUEST};
use ethnl::{
    AdvertisedLinkMode, Client, ErrorKind, Fec, Interface, PrivateFlags, Result, WakeOnLan,
    WolMode,
};

use crate::common::{StubTransport, attr_types, header_attr_types};

fn find_attr(data: &[u8], attr_type: u16) -> Option<&[u8]> {
    AttrIter::new(data)
        .find(|(t, _)| *t == attr_type)
        .map(|(_, payload)| payload)
}

#[tokio::test]
async fn test_set_wake_on_lan() -> Result<()> {
    let client = Client::new(StubTransport::replying(Vec::new()));
    let wol = WakeOnLan {
        interface: Interface::new(2, "eth0"),
        modes: WolMode::MAGIC | WolMode::PHY,
    };

    client.set_wake_on_lan(&wol).await?;

    let (request, flags) = client.transport().last_request();
    assert_eq!(flags, NLM_F_REQUEST | NLM_F_ACK);
    assert_eq!(request.header.cmd, EthtoolCmd::WolSet as u8);
    assert_eq!(header_attr_types(&request.data), vec![1, 2]);

    let modes = find_attr(&request.data, EthtoolWolAttr::Modes as u16).expect("modes");
    assert_eq!(modes.len(), 12);
    let value = u32::from_ne_bytes(modes[0..4].try_into().unwrap());
    let selector = u32::from_ne_bytes(modes[4..8].try_into().unwrap());
    assert_eq!(value, 0x21);
    assert_eq!(selector, 0xff);

    // What the kernel would store reads back as the requested modes.
    let stored = FixedBitfield.decode(modes)?;
    assert_eq!(stored.words(), &[0x21]);
    Ok(())
}

#[tokio::test]
async fn test_disable_wake_on_lan_clears_all_modes() -> Result<()> {
    let client = Client::new(StubTransport::replying(Vec::new()));
    let wol = WakeOnLan {
        interface: Interface::name("eth0"),
        modes: WolMode::empty(),
    };

    client.set_wake_on_lan(&wol).await?;

    let (request, _) = client.transport().last_request();
    let modes = find_attr(&request.data, EthtoolWolAttr::Modes as u16).expect("modes");
    assert_eq!(&modes[0..4], &0u32.to_ne_bytes());
    assert_eq!(&modes[4..8], &0xffu32.to_ne_bytes());
    Ok(())
}

#[tokio::test]
async fn test_set_fec_omits_active() -> Result<()> {
    let client = Client::new(StubTransport::replying(Vec::new()));
    let fec = Fec {
        interface: Interface::name("ens1f0"),
        modes: vec![AdvertisedLinkMode::FEC_RS],
        auto: false,
        active: Some(AdvertisedLinkMode::FEC_BASER),
    };

    client.set_fec(&fec).await?;

    let (request, flags) = client.transport().last_request();
    assert_eq!(flags, NLM_F_REQUEST | NLM_F_ACK);
    assert_eq!(request.header.cmd, EthtoolCmd::FecSet as u8);
    assert_eq!(
        attr_types(&request.data),
        vec![
            Fec::HEADER,
            EthtoolFecAttr::Modes as u16,
            EthtoolFecAttr::Auto as u16
        ]
    );

    let parsed = Fec::parse(&request.data)?;
    assert_eq!(parsed.modes, vec![AdvertisedLinkMode::FEC_RS]);
    assert!(!parsed.auto);
    assert_eq!(parsed.active, None);
    Ok(())
}

#[tokio::test]
async fn test_set_private_flags_by_name() -> Result<()> {
    let client = Client::new(StubTransport::replying(Vec::new()));
    let flags = PrivateFlags {
        interface: Interface::name("ens1f0"),
        flags: BTreeMap::from([
            ("legacy-rx".to_string(), true),
            ("disable-fw-lldp".to_string(), false),
        ]),
    };

    client.set_private_flags(&flags).await?;

    let (request, flags_sent) = client.transport().last_request();
    assert_eq!(flags_sent, NLM_F_REQUEST | NLM_F_ACK);
    assert_eq!(request.header.cmd, EthtoolCmd::PrivflagsSet as u8);
    assert_eq!(header_attr_types(&request.data), vec![2]);

    let payload = find_attr(&request.data, EthtoolPrivflagsAttr::Flags as u16).expect("flags");
    let bits = parse_bits(payload)?;
    assert_eq!(bits.len(), 2);
    assert!(bits.iter().all(|bit| bit.index.is_none()));

    let parsed = PrivateFlags::parse(&request.data)?;
    assert!(parsed.is_enabled("legacy-rx"));
    assert!(!parsed.is_enabled("disable-fw-lldp"));
    assert_eq!(parsed.flags.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_set_empty_selector_is_rejected() {
    let client = Client::new(StubTransport::replying(Vec::new()));

    assert_kind!(
        client.set_wake_on_lan(&WakeOnLan::default()).await,
        ErrorKind::MalformedRequest
    );
    assert_kind!(
        client.set_fec(&Fec::default()).await,
        ErrorKind::MalformedRequest
    );
    assert_kind!(
        client.set_private_flags(&PrivateFlags::default()).await,
        ErrorKind::MalformedRequest
    );
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn test_set_fec_index_past_table() {
    let client = Client::new(StubTransport::replying(Vec::new()));
    let fec = Fec {
        interface: Interface::name("ens1f0"),
        modes: vec![AdvertisedLinkMode::from_index(u32::MAX)],
        ..Default::default()
    };

    let started = std::time::Instant::now();
    let err = client.set_fec(&fec).await.unwrap_err();
    assert!(matches!(err, ethnl::Error::InvalidAttribute(_)));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(started.elapsed() < std::time::Duration::from_millis(500));
    assert_eq!(client.transport().calls(), 0);
}

//! Dispatcher integration tests.
//!
//! Targeted vs dump reads, request encoding, and reply cardinality.

use ethnl::netlink::AttrBuilder;
use ethnl::netlink::genl::ethtool::{
    ETHTOOL_GENL_VERSION, EthtoolCmd, EthtoolLinkinfoAttr, EthtoolLinkstateAttr, EthtoolMessage,
};
use ethnl::netlink::message::{NLM_F_DUMP, NLM_F_REQUEST};
use ethnl::{
    AdvertisedLinkMode, AutoNegotiation, Client, Duplex, ErrorKind, Fec, GenlMessage, Interface,
    LinkInfo, LinkMode, LinkState, Port, PrivateFlags, Result, WakeOnLan, WolMode,
};

use crate::common::{StubTransport, attr_types, header_attr_types, init_tracing, reply};

#[tokio::test]
async fn test_link_info_targeted() -> Result<()> {
    init_tracing();

    let mut body = AttrBuilder::new();
    body.nested(EthtoolLinkinfoAttr::Header as u16, |b| {
        b.append_attr_u32(1, 1);
        b.append_attr_str(2, "eth0");
    });
    body.append_attr_u8(EthtoolLinkinfoAttr::Port as u16, 0x05);
    let msg = GenlMessage::new(
        EthtoolCmd::LinkinfoGet as u8,
        ETHTOOL_GENL_VERSION,
        body.finish()?,
    );

    let client = Client::new(StubTransport::replying(vec![msg]));
    let info = client.link_info(&Interface::new(1, "eth0")).await?;

    assert_eq!(
        info,
        LinkInfo {
            interface: Interface::new(1, "eth0"),
            port: Port::DirectAttach,
        }
    );

    let (request, flags) = client.transport().last_request();
    assert_eq!(flags, NLM_F_REQUEST);
    assert_eq!(request.header.cmd, EthtoolCmd::LinkinfoGet as u8);
    assert_eq!(request.header.version, 1);
    // DEV_INDEX, DEV_NAME, FLAGS
    assert_eq!(header_attr_types(&request.data), vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_targeted_by_index_only() -> Result<()> {
    let state = LinkState {
        interface: Interface::new(4, "wlan0"),
        link: true,
    };
    let client = Client::new(StubTransport::replying(vec![reply(&state)]));

    let got = client.link_state(&Interface::index(4)).await?;
    assert_eq!(got, state);

    let (request, _) = client.transport().last_request();
    assert_eq!(header_attr_types(&request.data), vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn test_targeted_empty_selector_is_rejected() {
    let client = Client::new(StubTransport::replying(Vec::new()));

    assert_kind!(
        client.link_info(&Interface::default()).await,
        ErrorKind::MalformedRequest
    );
    assert_kind!(
        client.link_mode(&Interface::new(0, "")).await,
        ErrorKind::MalformedRequest
    );
    assert_kind!(
        client.private_flags(&Interface::name("")).await,
        ErrorKind::MalformedRequest
    );
    assert_eq!(client.transport().calls(), 0);
}

#[tokio::test]
async fn test_dump_with_no_devices() -> Result<()> {
    let client = Client::new(StubTransport::replying(Vec::new()));

    let infos = client.link_infos().await?;
    assert!(infos.is_empty());

    let (request, flags) = client.transport().last_request();
    assert_eq!(flags, NLM_F_REQUEST | NLM_F_DUMP);
    // Empty selector: only the compact-bitsets flag
    assert_eq!(header_attr_types(&request.data), vec![3]);
    assert_eq!(client.transport().calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_dump_link_modes_two_devices() -> Result<()> {
    init_tracing();

    let eth0 = LinkMode {
        interface: Interface::new(1, "eth0"),
        speed: Some(1000),
        duplex: Duplex::Full,
        auto_negotiation: AutoNegotiation::On,
        ours: vec![
            AdvertisedLinkMode::from_index(3),
            AdvertisedLinkMode::from_index(5),
            AdvertisedLinkMode::from_index(6),
        ],
        peer: vec![AdvertisedLinkMode::from_index(5)],
    };
    let eth1 = LinkMode {
        interface: Interface::new(2, "eth1"),
        speed: None,
        duplex: Duplex::Unknown,
        auto_negotiation: AutoNegotiation::Off,
        ours: Vec::new(),
        peer: Vec::new(),
    };

    let client = Client::new(StubTransport::replying(vec![reply(&eth0), reply(&eth1)]));
    let modes = client.link_modes().await?;

    assert_eq!(modes, vec![eth0, eth1]);
    let names: Vec<_> = modes[0].ours.iter().filter_map(|m| m.name).collect();
    assert_eq!(names, vec!["100baseT/Full", "1000baseT/Full", "Autoneg"]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_attributes_are_ignored() -> Result<()> {
    let mut body = AttrBuilder::new();
    body.append_attr_u32(0x7f, 0xdead_beef);
    body.nested(EthtoolLinkstateAttr::Header as u16, |b| {
        b.append_attr_str(2, "eth0");
        b.append_attr_u32(4, 9);
    });
    body.append_attr_u8(EthtoolLinkstateAttr::Link as u16, 1);
    body.append_attr_u32(3, 7); // SQI
    let msg = GenlMessage::new(
        EthtoolCmd::LinkstateGet as u8,
        ETHTOOL_GENL_VERSION,
        body.finish()?,
    );

    let client = Client::new(StubTransport::replying(vec![msg]));
    let state = client.link_state(&Interface::name("eth0")).await?;
    assert!(state.link);
    assert_eq!(state.interface, Interface::name("eth0"));
    Ok(())
}

#[tokio::test]
async fn test_private_flags_request_uses_verbose_bitsets() -> Result<()> {
    let mut flags = PrivateFlags {
        interface: Interface::name("ens1f0"),
        ..Default::default()
    };
    flags.flags.insert("legacy-rx".into(), true);

    let client = Client::new(StubTransport::replying(vec![reply(&flags)]));
    let got = client.private_flags(&Interface::name("ens1f0")).await?;
    assert_eq!(got, flags);

    let (request, _) = client.transport().last_request();
    // DEV_NAME only; no compact flag
    assert_eq!(header_attr_types(&request.data), vec![2]);
    assert_eq!(attr_types(&request.data), vec![PrivateFlags::HEADER]);
    Ok(())
}

#[tokio::test]
async fn test_dump_wake_on_lan() -> Result<()> {
    let replies = vec![
        reply(&WakeOnLan {
            interface: Interface::new(2, "eth0"),
            modes: WolMode::MAGIC,
        }),
        reply(&WakeOnLan {
            interface: Interface::new(3, "eth1"),
            modes: WolMode::empty(),
        }),
    ];
    let client = Client::new(StubTransport::replying(replies));

    let wols = client.wake_on_lans().await?;
    assert_eq!(wols.len(), 2);
    assert_eq!(wols[0].modes, WolMode::MAGIC);
    assert_eq!(wols[0].modes.to_string(), "magic");
    assert!(wols[1].modes.is_empty());

    let (request, flags) = client.transport().last_request();
    assert_eq!(flags, NLM_F_REQUEST | NLM_F_DUMP);
    assert_eq!(request.header.cmd, EthtoolCmd::WolGet as u8);
    Ok(())
}

#[tokio::test]
async fn test_dump_private_flags() -> Result<()> {
    let mut flags = PrivateFlags {
        interface: Interface::new(5, "ens1f0"),
        ..Default::default()
    };
    flags.flags.insert("legacy-rx".into(), false);
    flags.flags.insert("link-down-on-close".into(), true);

    let client = Client::new(StubTransport::replying(vec![reply(&flags)]));
    let all = client.all_private_flags().await?;
    assert_eq!(all, vec![flags]);

    let (request, _) = client.transport().last_request();
    // Dump of every device without compact bitsets: an empty header
    assert!(header_attr_types(&request.data).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_fec_targeted() -> Result<()> {
    let fec = Fec {
        interface: Interface::new(7, "ens2"),
        modes: vec![AdvertisedLinkMode::FEC_NONE, AdvertisedLinkMode::FEC_RS],
        auto: true,
        active: Some(AdvertisedLinkMode::FEC_RS),
    };
    let client = Client::new(StubTransport::replying(vec![reply(&fec)]));

    let got = client.fec(&Interface::index(7)).await?;
    assert_eq!(got, fec);
    assert_eq!(client.transport().last_request().0.header.cmd, EthtoolCmd::FecGet as u8);
    Ok(())
}

#[tokio::test]
#[should_panic(expected = "expected exactly one reply")]
async fn test_targeted_zero_replies_panics() {
    let client = Client::new(StubTransport::replying(Vec::new()));
    let _ = client.link_info(&Interface::name("eth0")).await;
}

#[tokio::test]
#[should_panic(expected = "got 2")]
async fn test_targeted_two_replies_panics() {
    let info = LinkInfo {
        interface: Interface::name("eth0"),
        port: Port::TwistedPair,
    };
    let client = Client::new(StubTransport::replying(vec![reply(&info), reply(&info)]));
    let _ = client.link_info(&Interface::name("eth0")).await;
}

#[tokio::test]
async fn test_close() -> Result<()> {
    let client = Client::new(StubTransport::replying(Vec::new()));
    client.close()
}

//! JSON output of decoded records.

use ethnl::{AdvertisedLinkMode, Client, Interface, LinkMode, Result};

use crate::common::{StubTransport, reply};

#[tokio::test]
async fn test_link_mode_to_json() -> Result<()> {
    let modes = LinkMode {
        interface: Interface::new(1, "eth0"),
        speed: Some(1000),
        ours: vec![AdvertisedLinkMode::from_index(5)],
        ..Default::default()
    };
    let client = Client::new(StubTransport::replying(vec![reply(&modes)]));
    let got = client.link_mode(&Interface::name("eth0")).await?;

    let json = serde_json::to_value(&got).unwrap();
    assert_eq!(json["interface"]["name"], "eth0");
    assert_eq!(json["interface"]["index"], 1);
    assert_eq!(json["speed"], 1000);
    assert_eq!(json["ours"][0]["index"], 5);
    assert_eq!(json["ours"][0]["name"], "1000baseT/Full");
    assert!(json["peer"].as_array().unwrap().is_empty());
    Ok(())
}

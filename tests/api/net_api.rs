use crate::helpers::TestApi;
use serde_json::json;
use wsclient::prelude::NetService;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn nics_lists_the_adapters() {
    // Arrange
    let api = TestApi::new().await;
    api.mount_nic("VMID", "nat", "vmnet8").await;

    // Act
    let list = api.client.network().nics("VMID").await.unwrap();

    // Assert
    assert_eq!(list.num, 1);
    assert_eq!(list.nics[0].kind, "nat");
    assert_eq!(list.nics[0].vmnet, "vmnet8");
}

#[tokio::test]
async fn renew_mac_recreates_the_adapter() {
    // Arrange
    let api = TestApi::new().await;
    api.mount_nic("VMID", "custom", "vmnet2").await;

    // Act
    let result = api.client.network().renew_mac("VMID").await;

    // Assert
    assert!(result.is_ok());
    let requests = api.server.received_requests().await.unwrap();
    let methods: Vec<&str> = requests
        .iter()
        .map(|request| request.method.as_str())
        .collect();
    assert_eq!(methods, vec!["GET", "DELETE", "POST"]);
}

#[tokio::test]
async fn renew_mac_on_a_bridged_adapter_clears_the_vmnet() {
    // Arrange
    let api = TestApi::new().await;
    Mock::given(method("GET"))
        .and(path("/api/vms/VMID/nic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "num": 1,
            "nics": [{
                "index": 1,
                "type": "bridged",
                "vmnet": "vmnet0",
                "macAddress": "00:0c:29:aa:bb:cc"
            }]
        })))
        .mount(&api.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/vms/VMID/nic/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vms/VMID/nic"))
        .and(body_json(json!({"type": "bridged", "vmnet": ""})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "index": 1,
            "type": "bridged",
            "vmnet": "",
            "macAddress": "00:0c:29:11:22:33"
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    // Act
    let result = api.client.network().renew_mac("VMID").await;

    // Assert
    assert!(result.is_ok());
}

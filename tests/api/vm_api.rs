use crate::helpers::TestApi;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, method, path};
use wiremock::{Mock, ResponseTemplate};
use wsclient::prelude::{NewVm, PowerAction, PowerState, VmService, VmUpdate};

#[tokio::test]
async fn loading_the_same_vm_twice_returns_identical_records() {
    // Arrange
    let api = TestApi::new().await;
    api.mount_vm("VMID", "/vms/alpha.vmx", "alpha").await;

    // Act
    let first = api.client.vms().vm("VMID").await.unwrap();
    let second = api.client.vms().vm("VMID").await.unwrap();

    // Assert
    assert_eq!(first, second);
    assert_eq!(first.display_name, "alpha");
    assert_eq!(first.power_state, PowerState::Off);
}

#[tokio::test]
async fn create_then_load_shows_the_requested_hardware() {
    // Arrange
    let api = TestApi::new().await;
    Mock::given(method("POST"))
        .and(path("/api/vms"))
        .and(body_json(json!({"name": "clone", "parentId": "PARENT"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "NEW", "path": "/vms/new.vmx"})),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/vms/NEW"))
        .and(body_json(json!({"processors": 3, "memory": 1536})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"processors": 3, "memory": 1536})),
        )
        .expect(1)
        .mount(&api.server)
        .await;
    api.mount_nic("NEW", "nat", "vmnet8").await;
    Mock::given(method("GET"))
        .and(path("/api/vms"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "NEW", "path": "/vms/new.vmx"}])),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vms/NEW"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"cpu": {"processors": 3}, "memory": 1536})),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vms/NEW/params/displayName"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "displayName", "value": "clone"})),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vms/NEW/params/annotation"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "annotation", "value": ""})),
        )
        .mount(&api.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vms/NEW/power"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"power_state": "poweredOff"})))
        .mount(&api.server)
        .await;

    // Act
    let created = api
        .client
        .vms()
        .create(NewVm {
            parent_id: "PARENT".to_owned(),
            name: "clone".to_owned(),
            description: String::new(),
            processors: 3,
            memory: 1536,
            power: None,
        })
        .await
        .unwrap();
    let loaded = api.client.vms().vm("NEW").await.unwrap();

    // Assert
    assert_eq!(created.processors, 3);
    assert_eq!(created.memory, 1536);
    assert_eq!(loaded.processors, 3);
    assert_eq!(loaded.memory, 1536);
}

#[tokio::test]
async fn update_round_trips_the_power_state() {
    // Arrange
    let api = TestApi::new().await;
    api.mount_vm("VMID", "/vms/alpha.vmx", "alpha").await;
    Mock::given(method("PUT"))
        .and(path("/api/vms/VMID/power"))
        .and(body_string("off"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"power_state": "poweredOff"})))
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/vms/VMID/power"))
        .and(body_string("on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"power_state": "poweredOn"})))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/vms/VMID"))
        .and(body_json(json!({"processors": 4, "memory": 4096})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"processors": 4, "memory": 4096})),
        )
        .mount(&api.server)
        .await;

    let mut vm = api.client.vms().vm("VMID").await.unwrap();
    // The mock reports the VM as powered off; ask for "on" explicitly so the
    // restore leg is exercised.
    let update = VmUpdate {
        name: "alpha".to_owned(),
        description: String::new(),
        processors: 4,
        memory: 4096,
        power: Some(PowerAction::On),
    };

    // Act
    api.client.vms().update(&mut vm, update).await.unwrap();

    // Assert
    assert_eq!(vm.power_state, PowerState::On);
}

#[tokio::test]
async fn register_tracks_the_definition_file() {
    // Arrange
    let api = TestApi::new().await;
    Mock::given(method("POST"))
        .and(path("/api/vms/registration"))
        .and(body_json(json!({"name": "alpha", "path": "/vms/alpha.vmx"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": "REG", "path": "/vms/alpha.vmx"})),
        )
        .mount(&api.server)
        .await;

    // Act
    let vm = api
        .client
        .vms()
        .register("alpha", "/vms/alpha.vmx")
        .await
        .unwrap();

    // Assert
    assert_eq!(vm.id, "REG");
    assert_eq!(vm.display_name, "alpha");
}

mod net_api;
mod vm_api;

// -----------------------------------------------------------------------------

mod helpers {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wsclient::prelude::WorkstationClient;

    /// Test helper that runs a mock hypervisor in the background and provides
    /// a ready `WorkstationClient` for making API calls against it.
    ///
    pub struct TestApi {
        pub server: MockServer,
        pub client: WorkstationClient,
    }

    impl TestApi {
        /// Creates a new `TestApi`.
        ///
        pub async fn new() -> Self {
            let server = MockServer::start().await;
            let client = WorkstationClient::new(
                &format!("{}/api", server.uri()),
                "user",
                "pass".into(),
                false,
                "NONE",
            )
            .unwrap();

            TestApi { server, client }
        }

        /// Mounts the read endpoints for one powered-off VM.
        ///
        pub async fn mount_vm(&self, id: &str, vm_path: &str, name: &str) {
            Mock::given(method("GET"))
                .and(path("/api/vms"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!([{"id": id, "path": vm_path}])),
                )
                .mount(&self.server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/api/vms/{id}")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"cpu": {"processors": 2}, "memory": 1024})),
                )
                .mount(&self.server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/api/vms/{id}/params/displayName")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"name": "displayName", "value": name})),
                )
                .mount(&self.server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/api/vms/{id}/params/annotation")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"name": "annotation", "value": "test machine"})),
                )
                .mount(&self.server)
                .await;
            Mock::given(method("GET"))
                .and(path(format!("/api/vms/{id}/power")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"power_state": "poweredOff"})),
                )
                .mount(&self.server)
                .await;
        }

        /// Mounts the NIC endpoints for a VM with one adapter.
        ///
        pub async fn mount_nic(&self, id: &str, kind: &str, vmnet: &str) {
            Mock::given(method("GET"))
                .and(path(format!("/api/vms/{id}/nic")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "num": 1,
                    "nics": [{
                        "index": 1,
                        "type": kind,
                        "vmnet": vmnet,
                        "macAddress": "00:0c:29:aa:bb:cc"
                    }]
                })))
                .mount(&self.server)
                .await;
            Mock::given(method("DELETE"))
                .and(path(format!("/api/vms/{id}/nic/1")))
                .respond_with(ResponseTemplate::new(204))
                .mount(&self.server)
                .await;
            Mock::given(method("POST"))
                .and(path(format!("/api/vms/{id}/nic")))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                    "index": 1,
                    "type": kind,
                    "vmnet": vmnet,
                    "macAddress": "00:0c:29:dd:ee:ff"
                })))
                .mount(&self.server)
                .await;
        }
    }
}

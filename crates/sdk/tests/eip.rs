//! Elastic IP actions against a recording transport.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use zsdk::actions::{AttachEipAction, GetEipAttachableVmNicsAction};
use zsdk::{
    Client, ClientConfig, Credentials, ErrorCode, HttpMethod, PollPolicy, RawRequest, RawResponse,
    Transport, TransportError,
};

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<RawRequest>>>,
    replies: Arc<Mutex<VecDeque<RawResponse>>>,
}

impl Recorder {
    fn replying(replies: impl IntoIterator<Item = RawResponse>) -> Self {
        let recorder = Self::default();
        recorder.replies.lock().extend(replies);
        recorder
    }

    fn sent(&self) -> Vec<RawRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
        self.sent.lock().push(request);
        let reply = self.replies.lock().pop_front();
        reply.ok_or_else(|| TransportError::new("no scripted reply"))
    }
}

fn client(recorder: &Recorder) -> Client {
    let _ = zsdk_log::init_test();
    let config = ClientConfig {
        poll: PollPolicy {
            interval: Duration::from_millis(5),
            ..PollPolicy::default()
        },
        ..ClientConfig::default()
    };
    Client::builder(recorder.clone())
        .config(config)
        .worker_threads(2)
        .build()
        .unwrap()
}

#[test]
fn candidate_nics_are_listed() {
    let recorder = Recorder::replying([RawResponse::ok(json!({
        "inventories": [
            {"uuid": "nic-1", "vmInstanceUuid": "vm-1", "ip": "192.168.0.10"},
            {"uuid": "nic-2", "vmInstanceUuid": "vm-2"}
        ]
    }))]);

    let result = client(&recorder).call(GetEipAttachableVmNicsAction {
        eip_uuid: Some("e1".into()),
        vm_name: Some(" web ".into()),
        credentials: Credentials::session("s-1"),
        ..Default::default()
    });

    let listed = result.throw_exception_if_error().unwrap();
    let nics = &listed.value().unwrap().inventories;
    assert_eq!(nics.len(), 2);
    assert_eq!(nics[0].ip.as_deref(), Some("192.168.0.10"));

    let sent = recorder.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].path, "/eips/e1/vm-instances/candidate-nics");
    assert_eq!(
        sent[0].query.clone().map(serde_json::Value::Object),
        Some(json!({"vmName": "web", "limit": 1000, "offset": 0}))
    );
}

#[test]
fn missing_eip_uuid_fails_before_sending() {
    let recorder = Recorder::default();

    let result = client(&recorder).call(GetEipAttachableVmNicsAction {
        vm_uuid: Some("vm-1".into()),
        credentials: Credentials::session("s-1"),
        ..Default::default()
    });

    let error = result.error().unwrap();
    assert_eq!(error.code, "CLIENT.MISSING_PATH_PARAMETER");
    insta::assert_snapshot!(
        error.details,
        @"path `/eips/{eipUuid}/vm-instances/candidate-nics` has no value for placeholder `{eipUuid}`"
    );
    assert!(recorder.sent().is_empty());
}

#[test]
fn attach_polls_the_job_to_completion() {
    let recorder = Recorder::replying([
        RawResponse::accepted("/v1/api-jobs/j7"),
        RawResponse::accepted("/v1/api-jobs/j7"),
        RawResponse::ok(json!({"inventory": {"uuid": "e1", "vmNicUuid": "nic-1", "state": "Enabled"}})),
    ]);

    let result = client(&recorder).call(AttachEipAction {
        eip_uuid: Some("e1".into()),
        vm_nic_uuid: Some("nic-1".into()),
        user_tags: Some(vec!["owner::ops".into()]),
        credentials: Credentials::access_key("ak", "sk"),
        ..Default::default()
    });

    let inventory = &result.value().unwrap().inventory;
    assert_eq!(inventory.vm_nic_uuid.as_deref(), Some("nic-1"));
    assert_eq!(inventory.state.as_deref(), Some("Enabled"));

    let sent = recorder.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].path, "/eips/e1/vm-instances/nics/nic-1");
    assert_eq!(
        sent[0].body,
        Some(json!({"params": {}, "userTags": ["owner::ops"]}))
    );
    assert!(sent[1..].iter().all(|r| r.path == "/v1/api-jobs/j7"));
}

#[test]
fn attach_failure_reported_by_the_job() {
    let remote = ErrorCode::new("SYS.1007", "operation failure", "vm nic[nic-1] not found");
    let recorder = Recorder::replying([
        RawResponse::accepted("/v1/api-jobs/j8"),
        RawResponse::error(503, &remote),
    ]);

    let client = client(&recorder);
    let (tx, rx) = std::sync::mpsc::channel();
    client.call_with(
        AttachEipAction {
            eip_uuid: Some("e1".into()),
            vm_nic_uuid: Some("nic-1".into()),
            credentials: Credentials::session("s-1"),
            ..Default::default()
        },
        move |result| tx.send(result).unwrap(),
    );

    let result = rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(result.error(), Some(&remote));
    assert!(result.value().is_none());
}

#[test]
fn registry_lists_shipped_actions_consistently() {
    let registry = zsdk::registry();
    assert_eq!(registry.names(), vec!["AttachEip", "GetEipAttachableVmNics"]);
    assert!(registry.inconsistencies().is_empty());

    let spec = registry.get("AttachEip").unwrap();
    assert!(spec.rest.need_poll);
    assert_eq!(spec.rest.parameter_name, "params");
}

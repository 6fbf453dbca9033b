//! End-to-end tests for the invocation pipeline.
//!
//! These tests drive real [`Client`]s against a scripted in-memory transport
//! that records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::runtime::Handle;
use zsdk_action::{
    Action, ActionSpec, Auth, CallOptions, Client, ClientConfig, Credentials, ErrorCode,
    HttpMethod, PollPolicy, RawRequest, RawResponse, RestDescriptor, Transport, TransportError,
};
use zsdk_schema::{ParameterSchema, ParameterSpec};

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Script {
    sent: Mutex<Vec<RawRequest>>,
    replies: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    fallback: Mutex<Option<RawResponse>>,
    delay: Mutex<Option<Duration>>,
    panics: AtomicUsize,
}

/// Replays queued replies in order, then the fallback (or `204`).
#[derive(Clone, Default)]
struct ScriptedTransport {
    script: Arc<Script>,
}

impl ScriptedTransport {
    fn replying(replies: impl IntoIterator<Item = RawResponse>) -> Self {
        let transport = Self::default();
        transport
            .script
            .replies
            .lock()
            .extend(replies.into_iter().map(Ok));
        transport
    }

    fn always(self, response: RawResponse) -> Self {
        *self.script.fallback.lock() = Some(response);
        self
    }

    fn failing(self, error: TransportError) -> Self {
        self.script.replies.lock().push_back(Err(error));
        self
    }

    fn delayed(self, delay: Duration) -> Self {
        *self.script.delay.lock() = Some(delay);
        self
    }

    fn panicking(self) -> Self {
        self.script.panics.store(1, Ordering::SeqCst);
        self
    }

    fn sent(&self) -> Vec<RawRequest> {
        self.script.sent.lock().clone()
    }

    fn send_count(&self) -> usize {
        self.script.sent.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
        self.script.sent.lock().push(request);
        let delay = *self.script.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        assert!(
            self.script.panics.load(Ordering::SeqCst) == 0,
            "transport exploded"
        );
        let next = self.script.replies.lock().pop_front();
        next.unwrap_or_else(|| {
            Ok(self
                .script
                .fallback
                .lock()
                .clone()
                .unwrap_or_else(RawResponse::no_content))
        })
    }
}

// ---------------------------------------------------------------------------
// Test actions
// ---------------------------------------------------------------------------

static LIST_NICS: ActionSpec = ActionSpec::new(
    "ListCandidateNics",
    RestDescriptor::get("/eips/{eipUuid}/vm-instances/candidate-nics"),
    ParameterSchema::new(&[
        ParameterSpec::string("eipUuid").required().nonempty(),
        ParameterSpec::string("vmName"),
        ParameterSpec::integer("limit").default_int(1000),
        ParameterSpec::integer("offset").default_int(0),
    ]),
);

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListNics {
    eip_uuid: Option<String>,
    vm_name: Option<String>,
    #[serde(skip)]
    credentials: Credentials,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct NicList {
    inventories: Vec<Value>,
}

impl Action for ListNics {
    type Output = NicList;

    fn spec() -> &'static ActionSpec {
        &LIST_NICS
    }

    fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

static ATTACH: ActionSpec = ActionSpec::new(
    "Attach",
    RestDescriptor::post("/eips/{eipUuid}/vm-instances/nics/{vmNicUuid}")
        .polled()
        .nested_under("params"),
    ParameterSchema::new(&[
        ParameterSpec::string("eipUuid").required().nonempty(),
        ParameterSpec::string("vmNicUuid").required().nonempty(),
        ParameterSpec::string("usedIpUuid"),
    ]),
);

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Attach {
    eip_uuid: Option<String>,
    vm_nic_uuid: Option<String>,
    used_ip_uuid: Option<String>,
    system_tags: Option<Vec<String>>,
    #[serde(skip)]
    credentials: Credentials,
    #[serde(skip)]
    options: CallOptions,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct Attached {
    inventory: Option<Value>,
}

impl Action for Attach {
    type Output = Attached;

    fn spec() -> &'static ActionSpec {
        &ATTACH
    }

    fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn options(&self) -> &CallOptions {
        &self.options
    }
}

fn list_nics(eip: &str) -> ListNics {
    ListNics {
        eip_uuid: Some(eip.into()),
        credentials: Credentials::session("s-1"),
        ..ListNics::default()
    }
}

fn attach() -> Attach {
    Attach {
        eip_uuid: Some("e1".into()),
        vm_nic_uuid: Some("n1".into()),
        system_tags: Some(vec!["tag::a".into()]),
        credentials: Credentials::access_key("ak", "sk").with_request_ip("10.0.0.7"),
        ..Attach::default()
    }
}

fn client_on_current(transport: &ScriptedTransport, config: ClientConfig) -> Client {
    Client::builder(transport.clone())
        .config(config)
        .handle(Handle::current())
        .build()
        .unwrap()
}

fn fast_polling() -> ClientConfig {
    ClientConfig {
        poll: PollPolicy {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
            max_attempts: 100,
        },
        ..ClientConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Pre-flight failures
// ---------------------------------------------------------------------------

#[test]
fn validation_failure_never_reaches_the_transport() {
    let transport = ScriptedTransport::default();
    let client = Client::new(transport.clone()).unwrap();

    for eip in [None, Some(String::new()), Some("   ".to_owned())] {
        let result = client.call(ListNics {
            eip_uuid: eip,
            ..list_nics("unused")
        });
        let error = result.error().expect("validation must fail");
        assert_eq!(error.code, "CLIENT.VALIDATION");
        assert!(error.details.contains("eipUuid"), "{}", error.details);
        assert!(result.value().is_none());
    }

    assert_eq!(transport.send_count(), 0);
}

#[rstest]
#[case::none(Credentials::default())]
#[case::blank_session(Credentials::session("  "))]
#[case::half_access_key(Credentials::access_key("ak", ""))]
fn missing_credentials_never_reach_the_transport(#[case] credentials: Credentials) {
    let transport = ScriptedTransport::default();
    let client = Client::new(transport.clone()).unwrap();

    let result = client.call(ListNics {
        credentials,
        ..list_nics("e1")
    });

    assert_eq!(result.error().unwrap().code, "CLIENT.AUTHENTICATION_REQUIRED");
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn completion_path_reports_preflight_errors_too() {
    let transport = ScriptedTransport::default();
    let client = client_on_current(&transport, ClientConfig::default());

    let (tx, rx) = tokio::sync::oneshot::channel();
    client.call_with(ListNics::default(), move |result| {
        let _ = tx.send(result);
    });

    let result = rx.await.unwrap();
    assert_eq!(result.error().unwrap().code, "CLIENT.VALIDATION");
    assert_eq!(transport.send_count(), 0);
}

// ---------------------------------------------------------------------------
// Request resolution and response adaptation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_request_is_resolved_and_decoded() {
    let transport =
        ScriptedTransport::replying([RawResponse::ok(json!({"inventories": [{"uuid": "nic-1"}]}))]);
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client
        .call_async(ListNics {
            vm_name: Some("  web ".into()),
            ..list_nics("e1")
        })
        .await;

    assert_eq!(
        result.value(),
        Some(&NicList {
            inventories: vec![json!({"uuid": "nic-1"})]
        })
    );

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].path, "/eips/e1/vm-instances/candidate-nics");
    assert_eq!(
        sent[0].query.clone().map(Value::Object),
        Some(json!({"vmName": "web", "limit": 1000, "offset": 0}))
    );
    assert_eq!(sent[0].auth, Some(Auth::Session("s-1".into())));
}

#[tokio::test]
async fn empty_success_yields_default_output() {
    let transport = ScriptedTransport::replying([RawResponse::no_content()]);
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client.call_async(list_nics("e1")).await;
    assert_eq!(result.value(), Some(&NicList::default()));
    assert!(result.error().is_none());
}

#[tokio::test]
async fn server_error_is_delivered_unchanged() {
    let remote = ErrorCode::new("SYS.1001", "resource not found", "eip[e1] is gone");
    let transport = ScriptedTransport::replying([RawResponse::error(404, &remote)]);
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client.call_async(list_nics("e1")).await;
    assert_eq!(result.error(), Some(&remote));

    let raised = result.throw_exception_if_error().unwrap_err();
    assert_eq!(
        raised.to_string(),
        "error[code: SYS.1001, description: resource not found, details: eip[e1] is gone]"
    );
}

#[tokio::test]
async fn transport_failure_becomes_error_result() {
    let transport =
        ScriptedTransport::default().failing(TransportError::new("connection refused"));
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client.call_async(list_nics("e1")).await;
    let error = result.error().unwrap();
    assert_eq!(error.code, "CLIENT.TRANSPORT");
    assert!(error.details.contains("connection refused"));
}

#[tokio::test]
async fn transport_panic_becomes_error_result() {
    let transport = ScriptedTransport::default().panicking();
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client.call_async(list_nics("e1")).await;
    let error = result.error().unwrap();
    assert_eq!(error.code, "CLIENT.INTERNAL");
    assert!(error.details.contains("transport exploded"));
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn polled_action_follows_the_job_location() {
    let transport = ScriptedTransport::replying([
        RawResponse::accepted("/v1/api-jobs/j1"),
        RawResponse::accepted("/v1/api-jobs/j1"),
        RawResponse::ok(json!({"inventory": {"uuid": "e1", "vmNicUuid": "n1"}})),
    ]);
    let client = client_on_current(&transport, fast_polling());

    let result = client.call_async(attach()).await;
    assert_eq!(
        result.value(),
        Some(&Attached {
            inventory: Some(json!({"uuid": "e1", "vmNicUuid": "n1"}))
        })
    );

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].method, HttpMethod::Post);
    assert_eq!(sent[0].path, "/eips/e1/vm-instances/nics/n1");
    assert_eq!(
        sent[0].body,
        Some(json!({"params": {}, "systemTags": ["tag::a"]}))
    );
    for poll in &sent[1..] {
        assert_eq!(poll.method, HttpMethod::Get);
        assert_eq!(poll.path, "/v1/api-jobs/j1");
        assert_eq!(poll.request_ip.as_deref(), Some("10.0.0.7"));
        assert_eq!(
            poll.auth,
            Some(Auth::AccessKey {
                id: "ak".into(),
                secret: "sk".into()
            })
        );
    }
}

#[tokio::test(start_paused = true)]
async fn polling_gives_up_after_its_budget() {
    let transport = ScriptedTransport::default().always(RawResponse::accepted("/v1/api-jobs/j1"));
    let client = client_on_current(&transport, fast_polling());

    let result = client.call_async(attach()).await;
    let error = result.error().unwrap();
    assert_eq!(error.code, "CLIENT.POLL_TIMEOUT");
    assert!(error.details.contains("/v1/api-jobs/j1"));
    // one submit, then one poll per elapsed second
    assert_eq!(transport.send_count(), 1 + 5);
}

#[tokio::test(start_paused = true)]
async fn polling_respects_the_attempt_cap() {
    let transport = ScriptedTransport::default().always(RawResponse::accepted("/v1/api-jobs/j1"));
    let mut config = fast_polling();
    config.poll.max_attempts = 3;
    let client = client_on_current(&transport, config);

    let result = client.call_async(attach()).await;
    assert_eq!(result.error().unwrap().code, "CLIENT.POLL_TIMEOUT");
    assert_eq!(transport.send_count(), 1 + 3);
}

#[tokio::test(start_paused = true)]
async fn per_call_options_override_the_poll_policy() {
    let transport = ScriptedTransport::default().always(RawResponse::accepted("/v1/api-jobs/j1"));
    let client = client_on_current(&transport, fast_polling());

    let result = client
        .call_async(Attach {
            options: CallOptions::new().with_poll_timeout(Duration::from_secs(2)),
            ..attach()
        })
        .await;
    assert_eq!(result.error().unwrap().code, "CLIENT.POLL_TIMEOUT");
    assert_eq!(transport.send_count(), 1 + 2);
}

#[tokio::test(start_paused = true)]
async fn polling_failure_is_reported() {
    let remote = ErrorCode::new("SYS.1006", "operation failed", "nic is busy");
    let transport = ScriptedTransport::replying([
        RawResponse::accepted("/v1/api-jobs/j1"),
        RawResponse::error(503, &remote),
    ]);
    let client = client_on_current(&transport, fast_polling());

    let result = client.call_async(attach()).await;
    assert_eq!(result.error(), Some(&remote));
}

#[tokio::test(start_paused = true)]
async fn unpolled_action_rejects_a_job_handle() {
    let transport = ScriptedTransport::replying([RawResponse::accepted("/v1/api-jobs/j1")]);
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client.call_async(list_nics("e1")).await;
    assert_eq!(result.error().unwrap().code, "CLIENT.DECODE");
    assert_eq!(transport.send_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_polling() {
    let transport = ScriptedTransport::default().always(RawResponse::accepted("/v1/api-jobs/j1"));
    let client = client_on_current(&transport, fast_polling());

    let pending = client.submit(attach());
    pending.cancel();

    let result = pending.await;
    assert_eq!(result.error().unwrap().code, "CLIENT.CANCELLED");
    assert_eq!(transport.send_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn invocation_timeout_bounds_a_slow_transport() {
    let transport = ScriptedTransport::default().delayed(Duration::from_secs(3600));
    let client = client_on_current(&transport, ClientConfig::default());

    let result = client.call_async(list_nics("e1")).await;
    assert!(result.is_success(), "default timeout is two hours");

    let result = client
        .call_async(Attach {
            options: CallOptions::new().with_timeout(Duration::from_secs(30)),
            ..attach()
        })
        .await;
    assert_eq!(result.error().unwrap().code, "CLIENT.TIMEOUT");
}

// ---------------------------------------------------------------------------
// Delivery guarantees
// ---------------------------------------------------------------------------

#[test]
fn blocking_call_runs_on_the_owned_runtime() {
    let transport = ScriptedTransport::replying([RawResponse::ok(json!({"inventories": []}))]);
    let client = Client::builder(transport.clone())
        .worker_threads(2)
        .build()
        .unwrap();

    let result = client.call(list_nics("e1"));
    assert_eq!(result.value(), Some(&NicList::default()));
    assert_eq!(transport.send_count(), 1);
}

#[test]
fn concurrent_completions_are_delivered_exactly_once() {
    const N: usize = 256;

    let transport = ScriptedTransport::default().always(RawResponse::ok(json!({"inventories": []})));
    let client = Client::builder(transport.clone())
        .worker_threads(4)
        .build()
        .unwrap();

    let delivered = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();

    for i in 0..N {
        let delivered = Arc::clone(&delivered);
        let tx = tx.clone();
        // every fourth call fails validation to mix both outcomes
        let action = if i % 4 == 0 {
            ListNics::default()
        } else {
            list_nics(&format!("e{i}"))
        };
        client.call_with(action, move |result| {
            assert!(result.value().is_some() != result.error().is_some());
            delivered.fetch_add(1, Ordering::SeqCst);
            tx.send(i).unwrap();
        });
    }
    drop(tx);

    let mut seen: Vec<usize> = rx.iter().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..N).collect::<Vec<_>>());
    assert_eq!(delivered.load(Ordering::SeqCst), N);
    assert_eq!(transport.send_count(), N - N / 4);
}

#[test]
fn completion_fires_when_the_runtime_goes_away() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let transport = ScriptedTransport::default().delayed(Duration::from_secs(3600));
    let client = Client::builder(transport.clone())
        .handle(runtime.handle().clone())
        .build()
        .unwrap();

    let (tx, rx) = mpsc::channel();
    client.call_with(list_nics("e1"), move |result| {
        tx.send(result).unwrap();
    });

    // let the request reach the transport before tearing the runtime down
    while transport.send_count() == 0 {
        std::thread::sleep(Duration::from_millis(5));
    }
    drop(runtime);

    let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(result.error().unwrap().code, "CLIENT.INTERNAL");
}

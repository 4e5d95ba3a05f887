//! Call Session Lifecycle Integration Tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use voxline::domain::call::{
    CallSession, CallStatus, ChangeEvent, DtmfTones, ListenerError, ProviderGateway,
    SessionListener,
};
use voxline::domain::shared::value_objects::{HandlerId, ProviderId};
use voxline::DomainError;

/// Gateway double that records every dispatched request
#[derive(Default)]
struct RecordingGateway {
    requests: Mutex<Vec<String>>,
}

impl RecordingGateway {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl ProviderGateway for RecordingGateway {
    async fn request_answer(&self, _handler_id: &HandlerId) -> voxline::Result<()> {
        self.record("answer".to_string());
        Ok(())
    }

    async fn request_hangup(&self, _handler_id: &HandlerId) -> voxline::Result<()> {
        self.record("hangup".to_string());
        Ok(())
    }

    async fn request_hold(&self, _handler_id: &HandlerId, enable: bool) -> voxline::Result<()> {
        self.record(format!("hold:{}", enable));
        Ok(())
    }

    async fn request_deflect(&self, _handler_id: &HandlerId, target: &str) -> voxline::Result<()> {
        self.record(format!("deflect:{}", target));
        Ok(())
    }

    async fn request_send_dtmf(
        &self,
        _handler_id: &HandlerId,
        tones: &DtmfTones,
    ) -> voxline::Result<()> {
        self.record(format!("dtmf:{}", tones));
        Ok(())
    }
}

/// Listener double that records event descriptions, optionally failing
struct RecordingListener {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingListener {
    fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<dyn SessionListener> {
        Arc::new(Self {
            name,
            log,
            fail: false,
        })
    }

    fn failing(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<dyn SessionListener> {
        Arc::new(Self {
            name,
            log,
            fail: true,
        })
    }
}

impl SessionListener for RecordingListener {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ListenerError> {
        let description = match event {
            ChangeEvent::Status(e) => format!("status:{}", e.status_text),
            ChangeEvent::LineId(e) => format!("line_id:{}", e.line_id),
            ChangeEvent::StartedAt(_) => "started_at".to_string(),
            ChangeEvent::Duration(e) => format!("duration:{}", e.seconds),
            ChangeEvent::Emergency(e) => format!("emergency:{}", e.emergency),
            ChangeEvent::Multiparty(e) => format!("multiparty:{}", e.multiparty),
            ChangeEvent::Forwarded(e) => format!("forwarded:{}", e.forwarded),
        };
        self.log
            .lock()
            .unwrap()
            .push(format!("{}/{}", self.name, description));

        if self.fail {
            Err(ListenerError::new("listener refused the event"))
        } else {
            Ok(())
        }
    }
}

fn incoming_session(gateway: Arc<RecordingGateway>) -> CallSession {
    CallSession::new(
        ProviderId::new("provider-test"),
        "+15551234567",
        true,
        gateway,
    )
}

#[tokio::test]
async fn test_incoming_answer_flow() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut session = incoming_session(gateway.clone());

    let log = Arc::new(Mutex::new(Vec::new()));
    session.subscribe(RecordingListener::new("l1", log.clone()));

    assert_eq!(session.status(), CallStatus::Alerting);
    assert!(session.is_incoming());

    // Answer is accepted for dispatch, state untouched
    session.answer().await.unwrap();
    assert_eq!(gateway.requests(), vec!["answer"]);
    assert_eq!(session.status(), CallStatus::Alerting);
    assert!(log.lock().unwrap().is_empty());

    // Provider confirms: status change, started_at set, duration runs from 0
    session.apply_provider_status(CallStatus::Active).unwrap();
    assert_eq!(session.status(), CallStatus::Active);
    assert!(session.started_at().is_some());
    assert_eq!(session.duration(), 0);

    let entries = log.lock().unwrap();
    assert_eq!(entries.as_slice(), &["l1/status:active", "l1/started_at"]);
}

#[tokio::test]
async fn test_hold_round_trip_emits_one_status_event_per_report() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut session = incoming_session(gateway.clone());
    session.apply_provider_status(CallStatus::Active).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    session.subscribe(RecordingListener::new("l1", log.clone()));

    session.hold(true).await.unwrap();
    session.apply_provider_status(CallStatus::Held).unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);

    // A second hold request is accepted but no status event follows until
    // the provider reports a further change
    session.hold(true).await.unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(gateway.requests(), vec!["hold:true", "hold:true"]);

    session.hold(false).await.unwrap();
    session.apply_provider_status(CallStatus::Active).unwrap();

    let entries = log.lock().unwrap();
    assert_eq!(entries.as_slice(), &["l1/status:held", "l1/status:active"]);
}

#[tokio::test]
async fn test_two_listeners_in_order_despite_first_failing() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut session = incoming_session(gateway);

    let log = Arc::new(Mutex::new(Vec::new()));
    session.subscribe(RecordingListener::failing("l1", log.clone()));
    session.subscribe(RecordingListener::new("l2", log.clone()));

    session.apply_provider_status(CallStatus::Active).unwrap();
    session.apply_provider_status(CallStatus::Held).unwrap();

    let entries = log.lock().unwrap();
    assert_eq!(
        entries.as_slice(),
        &[
            "l1/status:active",
            "l2/status:active",
            "l1/started_at",
            "l2/started_at",
            "l1/status:held",
            "l2/status:held",
        ]
    );
}

#[tokio::test]
async fn test_full_lifecycle_with_disconnect_freeze() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut session = incoming_session(gateway.clone());

    let log = Arc::new(Mutex::new(Vec::new()));
    session.subscribe(RecordingListener::new("l1", log.clone()));

    session.answer().await.unwrap();
    session.apply_provider_status(CallStatus::Active).unwrap();
    let started = session.started_at().unwrap();

    session.send_dtmf("1a2B#").await.unwrap();

    session.hangup().await.unwrap();
    session.apply_provider_status(CallStatus::Disconnected).unwrap();

    // DTMF canonicalized; lifecycle dispatched in order
    assert_eq!(
        gateway.requests(),
        vec!["answer", "dtmf:1A2B#", "hangup"]
    );

    // started_at survived, duration frozen, no further transitions
    assert_eq!(session.started_at(), Some(started));
    let frozen = session.duration();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(session.duration(), frozen);
    assert!(matches!(
        session.apply_provider_status(CallStatus::Active),
        Err(DomainError::InvalidTransition(_))
    ));

    // Terminal freeze emitted the final duration event
    let entries = log.lock().unwrap();
    assert_eq!(
        entries.last().unwrap(),
        &format!("l1/duration:{}", frozen)
    );
}

#[tokio::test]
async fn test_property_reports_reach_subscribers_exactly_once() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut session = incoming_session(gateway);

    let log = Arc::new(Mutex::new(Vec::new()));
    session.subscribe(RecordingListener::new("l1", log.clone()));

    session.set_line_id("+15550009999").unwrap();
    session.set_line_id("+15550009999").unwrap();
    session.set_multiparty(true).unwrap();
    session.set_forwarded(true).unwrap();
    session.set_emergency(true).unwrap();

    let entries = log.lock().unwrap();
    assert_eq!(
        entries.as_slice(),
        &[
            "l1/line_id:+15550009999",
            "l1/multiparty:true",
            "l1/forwarded:true",
            "l1/emergency:true",
        ]
    );
}

#[tokio::test]
async fn test_snapshot_mirrors_adapter_property_set() {
    let gateway = Arc::new(RecordingGateway::default());
    let mut session = incoming_session(gateway);
    session.apply_provider_status(CallStatus::Active).unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.provider_id.as_str(), "provider-test");
    assert_eq!(snapshot.status_text, "active");
    assert_eq!(snapshot.line_id, "+15551234567");
    assert!(snapshot.started_at.is_some());
    assert!(snapshot.is_incoming);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["statusText"], "active");
    assert_eq!(json["lineId"], "+15551234567");
}

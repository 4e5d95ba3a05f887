//! Call session aggregate root
//!
//! Owns the authoritative state of one call and enforces transition legality.
//! Every committed mutation is fanned out through the session's notification
//! hub on the committing context. Mutating operations take `&mut self`, so a
//! session shared across tasks must sit behind a mutex; distinct sessions are
//! fully independent.

use crate::domain::call::event::ChangeEvent;
use crate::domain::call::notify::{NotificationHub, SessionListener};
use crate::domain::call::provider::{ProviderEvent, ProviderGateway};
use crate::domain::call::value_object::{CallStatus, DtmfTones};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::{HandlerId, ProviderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Call session aggregate root
///
/// Commands (answer, hangup, hold, deflect, send_dtmf) validate the current
/// state and delegate to the provider gateway without touching local state;
/// the loop closes when the provider's confirmation arrives as a status or
/// property report.
pub struct CallSession {
    handler_id: HandlerId,
    provider_id: ProviderId,
    line_id: String,
    status: CallStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    /// Last whole-second duration observed by `tick`
    last_duration: u64,
    incoming: bool,
    emergency: bool,
    multiparty: bool,
    forwarded: bool,
    gateway: Arc<dyn ProviderGateway>,
    hub: NotificationHub,
}

impl CallSession {
    /// Create a new session. Incoming calls start at `Alerting` (the remote
    /// party is ringing us), outgoing calls at `Dialing`.
    pub fn new(
        provider_id: ProviderId,
        line_id: impl Into<String>,
        incoming: bool,
        gateway: Arc<dyn ProviderGateway>,
    ) -> Self {
        let status = if incoming {
            CallStatus::Alerting
        } else {
            CallStatus::Dialing
        };

        let session = Self {
            handler_id: HandlerId::new(),
            provider_id,
            line_id: line_id.into(),
            status,
            started_at: None,
            ended_at: None,
            last_duration: 0,
            incoming,
            emergency: false,
            multiparty: false,
            forwarded: false,
            gateway,
            hub: NotificationHub::new(),
        };

        info!(
            handler_id = %session.handler_id,
            provider_id = %session.provider_id,
            line_id = %session.line_id,
            incoming = session.incoming,
            status = %session.status,
            "call session created"
        );

        session
    }

    /// Request that this call be answered
    ///
    /// Valid only for incoming calls that have not yet connected. The status
    /// changes only when the provider confirms with a status report.
    pub async fn answer(&self) -> Result<()> {
        if !self.incoming {
            return Err(DomainError::InvalidOperation(
                "Cannot answer an outgoing call".to_string(),
            ));
        }
        if !matches!(self.status, CallStatus::Dialing | CallStatus::Alerting) {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot answer a call in status {}",
                self.status
            )));
        }

        self.gateway.request_answer(&self.handler_id).await
    }

    /// Request that this call be hung up
    pub async fn hangup(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidOperation(
                "Call is already disconnected".to_string(),
            ));
        }

        self.gateway.request_hangup(&self.handler_id).await
    }

    /// Request hold (`enable` = true) or resume (`enable` = false)
    ///
    /// Idempotent at the request level: re-requesting the current direction
    /// is accepted and produces no further status event until the provider
    /// reports a change.
    pub async fn hold(&self, enable: bool) -> Result<()> {
        if !matches!(self.status, CallStatus::Active | CallStatus::Held) {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot hold a call in status {}",
                self.status
            )));
        }

        self.gateway.request_hold(&self.handler_id, enable).await
    }

    /// Request that this incoming call be deflected to another line
    pub async fn deflect(&self, target: &str) -> Result<()> {
        if !self.incoming || !matches!(self.status, CallStatus::Dialing | CallStatus::Alerting) {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot deflect a call in status {}",
                self.status
            )));
        }
        if target.is_empty() {
            return Err(DomainError::InvalidArgument(
                "Deflect target is empty".to_string(),
            ));
        }

        self.gateway.request_deflect(&self.handler_id, target).await
    }

    /// Request that DTMF tones be played into the call
    ///
    /// Provider-side effect only; local state never changes.
    pub async fn send_dtmf(&self, tones: &str) -> Result<()> {
        if self.status != CallStatus::Active {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot send DTMF in status {}",
                self.status
            )));
        }
        let tones = DtmfTones::parse(tones)?;

        self.gateway.request_send_dtmf(&self.handler_id, &tones).await
    }

    /// Apply a status change reported by the provider
    ///
    /// An illegal transition leaves state untouched and is reported back to
    /// the event pump; the session recovers in place. On success the status
    /// event is emitted first, then any timing bookkeeping events.
    pub fn apply_provider_status(&mut self, new_status: CallStatus) -> Result<()> {
        if !self.status.can_transition_to(new_status) {
            warn!(
                handler_id = %self.handler_id,
                from = %self.status,
                to = %new_status,
                "rejected provider status report"
            );
            return Err(DomainError::InvalidTransition(format!(
                "Cannot transition from {} to {}",
                self.status, new_status
            )));
        }

        self.status = new_status;
        info!(handler_id = %self.handler_id, status = %new_status, "call status changed");
        self.notify(ChangeEvent::status(self.handler_id.clone(), new_status));

        if new_status == CallStatus::Active && self.started_at.is_none() {
            let now = Utc::now();
            self.started_at = Some(now);
            self.notify(ChangeEvent::started_at(self.handler_id.clone(), now));
        }

        if new_status.is_terminal() {
            self.ended_at = Some(Utc::now());
            let frozen = self.duration();
            self.last_duration = frozen;
            self.notify(ChangeEvent::duration(self.handler_id.clone(), frozen));
        }

        Ok(())
    }

    /// Apply any inbound provider report
    pub fn apply_provider_event(&mut self, event: ProviderEvent) -> Result<()> {
        match event {
            ProviderEvent::StatusReported(status) => self.apply_provider_status(status),
            ProviderEvent::LineIdReported(line_id) => self.set_line_id(line_id),
            ProviderEvent::EmergencyReported(emergency) => self.set_emergency(emergency),
            ProviderEvent::MultipartyReported(multiparty) => self.set_multiparty(multiparty),
            ProviderEvent::ForwardedReported(forwarded) => self.set_forwarded(forwarded),
        }
    }

    /// Update the remote line id. Unchanged values emit nothing.
    pub fn set_line_id(&mut self, line_id: impl Into<String>) -> Result<()> {
        self.ensure_not_terminal("line id")?;
        let line_id = line_id.into();
        if self.line_id == line_id {
            return Ok(());
        }

        self.line_id = line_id.clone();
        self.notify(ChangeEvent::line_id(self.handler_id.clone(), line_id));
        Ok(())
    }

    /// Update the emergency flag. Unchanged values emit nothing.
    pub fn set_emergency(&mut self, emergency: bool) -> Result<()> {
        self.ensure_not_terminal("emergency flag")?;
        if self.emergency == emergency {
            return Ok(());
        }

        self.emergency = emergency;
        self.notify(ChangeEvent::emergency(self.handler_id.clone(), emergency));
        Ok(())
    }

    /// Update the multiparty flag. Unchanged values emit nothing.
    pub fn set_multiparty(&mut self, multiparty: bool) -> Result<()> {
        self.ensure_not_terminal("multiparty flag")?;
        if self.multiparty == multiparty {
            return Ok(());
        }

        self.multiparty = multiparty;
        self.notify(ChangeEvent::multiparty(self.handler_id.clone(), multiparty));
        Ok(())
    }

    /// Update the forwarded flag. Unchanged values emit nothing.
    pub fn set_forwarded(&mut self, forwarded: bool) -> Result<()> {
        self.ensure_not_terminal("forwarded flag")?;
        if self.forwarded == forwarded {
            return Ok(());
        }

        self.forwarded = forwarded;
        self.notify(ChangeEvent::forwarded(self.handler_id.clone(), forwarded));
        Ok(())
    }

    /// Recompute the derived duration and emit when the whole-second value
    /// advanced. External tickers own the cadence; the session never runs its
    /// own timer. No-op before the call is active or after it disconnected.
    pub fn tick(&mut self) {
        if self.started_at.is_none() || self.status.is_terminal() {
            return;
        }

        let seconds = self.duration();
        if seconds != self.last_duration {
            self.last_duration = seconds;
            self.notify(ChangeEvent::duration(self.handler_id.clone(), seconds));
        }
    }

    /// Register a listener for this session's change events
    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        self.hub.subscribe(listener);
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&self, listener: &Arc<dyn SessionListener>) {
        self.hub.unsubscribe(listener);
    }

    /// Point-in-time view of the full attribute set
    pub fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            handler_id: self.handler_id.clone(),
            provider_id: self.provider_id.clone(),
            status: self.status,
            status_text: self.status_text().to_string(),
            line_id: self.line_id.clone(),
            started_at: self.started_at.map(|t| t.timestamp_millis()),
            duration: self.duration(),
            is_incoming: self.incoming,
            is_emergency: self.emergency,
            is_multiparty: self.multiparty,
            is_forwarded: self.forwarded,
        }
    }

    // Getters
    pub fn handler_id(&self) -> &HandlerId {
        &self.handler_id
    }

    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn status_text(&self) -> &'static str {
        self.status.as_str()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_incoming(&self) -> bool {
        self.incoming
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn is_multiparty(&self) -> bool {
        self.multiparty
    }

    pub fn is_forwarded(&self) -> bool {
        self.forwarded
    }

    /// Call duration in seconds, derived from `started_at` against now while
    /// the call lives and against the disconnect time once terminal. Never
    /// stored as a counter.
    pub fn duration(&self) -> u64 {
        let Some(started) = self.started_at else {
            return 0;
        };
        let end = self.ended_at.unwrap_or_else(Utc::now);
        (end - started).num_seconds().max(0) as u64
    }

    fn ensure_not_terminal(&self, what: &str) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidOperation(format!(
                "Cannot update {} of a disconnected call",
                what
            )));
        }
        Ok(())
    }

    fn notify(&self, event: ChangeEvent) {
        // The mutation is already committed; listener failures are isolated
        // and logged, never propagated to the mutation's caller.
        if let Err(e) = self.hub.emit(&event) {
            warn!(handler_id = %self.handler_id, error = %e, "listener failed during emission");
        }
    }
}

/// Point-in-time property snapshot of one call session
///
/// `started_at` is exported as epoch milliseconds for boundary adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSnapshot {
    pub handler_id: HandlerId,
    pub provider_id: ProviderId,
    pub status: CallStatus,
    pub status_text: String,
    pub line_id: String,
    pub started_at: Option<i64>,
    pub duration: u64,
    pub is_incoming: bool,
    pub is_emergency: bool,
    pub is_multiparty: bool,
    pub is_forwarded: bool,
}

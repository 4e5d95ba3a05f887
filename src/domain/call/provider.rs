//! Provider gateway port
//!
//! The only outbound dependency of a call session. Implemented in the
//! telephony integration layer (ofono, SIP stack, test double).

use crate::domain::call::value_object::{CallStatus, DtmfTones};
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::HandlerId;
use async_trait::async_trait;

/// Outbound telephony capability a session delegates its commands to.
///
/// Every request is fire-and-forget: `Ok(())` means the request was accepted
/// for dispatch, never that the action completed. Completion arrives later as
/// a [`ProviderEvent`]. In-flight requests are not cancellable; a contradictory
/// status report simply wins or loses at the session's transition check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Request that an incoming call be answered
    async fn request_answer(&self, handler_id: &HandlerId) -> Result<()>;

    /// Request that the call be hung up
    async fn request_hangup(&self, handler_id: &HandlerId) -> Result<()>;

    /// Request that the call be placed on hold (true) or resumed (false)
    async fn request_hold(&self, handler_id: &HandlerId, enable: bool) -> Result<()>;

    /// Request that an incoming call be deflected to another line
    async fn request_deflect(&self, handler_id: &HandlerId, target: &str) -> Result<()>;

    /// Request that DTMF tones be played into the call
    async fn request_send_dtmf(&self, handler_id: &HandlerId, tones: &DtmfTones) -> Result<()>;
}

/// Inbound report from the provider about one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    StatusReported(CallStatus),
    LineIdReported(String),
    EmergencyReported(bool),
    MultipartyReported(bool),
    ForwardedReported(bool),
}

//! Call change events
//!
//! One event per changed attribute per committed mutation. Boundary adapters
//! mirror these one-to-one as their own notification signals.

use crate::domain::call::value_object::CallStatus;
use crate::domain::shared::events::{DomainEvent, EventMetadata};
use crate::domain::shared::value_objects::HandlerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base struct for all change events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEventBase {
    pub metadata: EventMetadata,
    pub handler_id: HandlerId,
}

impl ChangeEventBase {
    fn new(handler_id: HandlerId) -> Self {
        Self {
            metadata: EventMetadata::new(),
            handler_id,
        }
    }
}

/// Status changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChanged {
    pub base: ChangeEventBase,
    pub status: CallStatus,
    pub status_text: String,
}

impl DomainEvent for StatusChanged {
    fn event_type(&self) -> &'static str {
        "call.status_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Line id changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineIdChanged {
    pub base: ChangeEventBase,
    pub line_id: String,
}

impl DomainEvent for LineIdChanged {
    fn event_type(&self) -> &'static str {
        "call.line_id_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Started-at changed event, fired once when the call first becomes active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedAtChanged {
    pub base: ChangeEventBase,
    pub started_at: DateTime<Utc>,
}

impl DomainEvent for StartedAtChanged {
    fn event_type(&self) -> &'static str {
        "call.started_at_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Duration changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationChanged {
    pub base: ChangeEventBase,
    pub seconds: u64,
}

impl DomainEvent for DurationChanged {
    fn event_type(&self) -> &'static str {
        "call.duration_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Emergency flag changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyChanged {
    pub base: ChangeEventBase,
    pub emergency: bool,
}

impl DomainEvent for EmergencyChanged {
    fn event_type(&self) -> &'static str {
        "call.emergency_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Multiparty flag changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipartyChanged {
    pub base: ChangeEventBase,
    pub multiparty: bool,
}

impl DomainEvent for MultipartyChanged {
    fn event_type(&self) -> &'static str {
        "call.multiparty_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Forwarded flag changed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardedChanged {
    pub base: ChangeEventBase,
    pub forwarded: bool,
}

impl DomainEvent for ForwardedChanged {
    fn event_type(&self) -> &'static str {
        "call.forwarded_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Union of all change events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChangeEvent {
    Status(StatusChanged),
    LineId(LineIdChanged),
    StartedAt(StartedAtChanged),
    Duration(DurationChanged),
    Emergency(EmergencyChanged),
    Multiparty(MultipartyChanged),
    Forwarded(ForwardedChanged),
}

impl ChangeEvent {
    pub fn status(handler_id: HandlerId, status: CallStatus) -> Self {
        ChangeEvent::Status(StatusChanged {
            base: ChangeEventBase::new(handler_id),
            status,
            status_text: status.as_str().to_string(),
        })
    }

    pub fn line_id(handler_id: HandlerId, line_id: String) -> Self {
        ChangeEvent::LineId(LineIdChanged {
            base: ChangeEventBase::new(handler_id),
            line_id,
        })
    }

    pub fn started_at(handler_id: HandlerId, started_at: DateTime<Utc>) -> Self {
        ChangeEvent::StartedAt(StartedAtChanged {
            base: ChangeEventBase::new(handler_id),
            started_at,
        })
    }

    pub fn duration(handler_id: HandlerId, seconds: u64) -> Self {
        ChangeEvent::Duration(DurationChanged {
            base: ChangeEventBase::new(handler_id),
            seconds,
        })
    }

    pub fn emergency(handler_id: HandlerId, emergency: bool) -> Self {
        ChangeEvent::Emergency(EmergencyChanged {
            base: ChangeEventBase::new(handler_id),
            emergency,
        })
    }

    pub fn multiparty(handler_id: HandlerId, multiparty: bool) -> Self {
        ChangeEvent::Multiparty(MultipartyChanged {
            base: ChangeEventBase::new(handler_id),
            multiparty,
        })
    }

    pub fn forwarded(handler_id: HandlerId, forwarded: bool) -> Self {
        ChangeEvent::Forwarded(ForwardedChanged {
            base: ChangeEventBase::new(handler_id),
            forwarded,
        })
    }

    pub fn handler_id(&self) -> &HandlerId {
        match self {
            ChangeEvent::Status(e) => &e.base.handler_id,
            ChangeEvent::LineId(e) => &e.base.handler_id,
            ChangeEvent::StartedAt(e) => &e.base.handler_id,
            ChangeEvent::Duration(e) => &e.base.handler_id,
            ChangeEvent::Emergency(e) => &e.base.handler_id,
            ChangeEvent::Multiparty(e) => &e.base.handler_id,
            ChangeEvent::Forwarded(e) => &e.base.handler_id,
        }
    }
}

//! Call value objects

use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Call status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Outgoing call is being set up
    Dialing,
    /// Remote party is ringing (incoming ring or outgoing ringback)
    Alerting,
    /// Call is connected and media is flowing
    Active,
    /// Call is on hold
    Held,
    /// Call has ended; terminal
    Disconnected,
}

impl CallStatus {
    /// Check if status transition is valid
    pub fn can_transition_to(&self, new_status: CallStatus) -> bool {
        use CallStatus::*;

        match (self, new_status) {
            // From Dialing
            (Dialing, Alerting) => true,
            (Dialing, Active) => true,
            (Dialing, Disconnected) => true,

            // From Alerting
            (Alerting, Active) => true,
            (Alerting, Disconnected) => true,

            // From Active
            (Active, Held) => true,
            (Active, Disconnected) => true,

            // From Held
            (Held, Active) => true,
            (Held, Disconnected) => true,

            // Can't transition out of Disconnected
            (Disconnected, _) => false,

            // All other transitions are invalid
            _ => false,
        }
    }

    /// Symbolic status text, recomputed on demand
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Dialing => "dialing",
            CallStatus::Alerting => "alerting",
            CallStatus::Active => "active",
            CallStatus::Held => "held",
            CallStatus::Disconnected => "disconnected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Disconnected)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated DTMF tone sequence
///
/// Tones are restricted to the keypad alphabet 0-9, *, # and A-D.
/// Lowercase letter input is canonicalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtmfTones(String);

impl DtmfTones {
    pub fn parse(tones: &str) -> Result<Self> {
        if tones.is_empty() {
            return Err(DomainError::InvalidArgument(
                "DTMF tone sequence is empty".to_string(),
            ));
        }

        let mut canonical = String::with_capacity(tones.len());
        for c in tones.chars() {
            match c {
                '0'..='9' | '*' | '#' | 'A'..='D' => canonical.push(c),
                'a'..='d' => canonical.push(c.to_ascii_uppercase()),
                _ => {
                    return Err(DomainError::InvalidArgument(format!(
                        "Invalid DTMF character: {:?}",
                        c
                    )))
                }
            }
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DtmfTones {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Voxline - an in-memory voice call session core
//!
//! Holds the authoritative state of active calls, validates every status
//! transition, and fans out ordered, exactly-once change notifications to
//! subscribers. Transports that mirror this state (D-Bus, RPC) and the
//! telephony provider itself live outside the crate behind the
//! [`domain::call::ProviderGateway`] port.

pub mod config;
pub mod domain;

// Re-export commonly used types
pub use domain::call::{CallSession, CallSnapshot, CallStatus, SessionListener};
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;

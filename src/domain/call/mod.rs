//! Call bounded context - manages the lifecycle of one call session

pub mod aggregate;
pub mod event;
pub mod notify;
pub mod provider;
pub mod value_object;

pub use aggregate::{CallSession, CallSnapshot};
pub use event::ChangeEvent;
pub use notify::{ListenerError, NotificationHub, SessionListener};
pub use provider::{ProviderEvent, ProviderGateway};
pub use value_object::{CallStatus, DtmfTones};

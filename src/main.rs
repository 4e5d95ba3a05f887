use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use voxline::config::Config;
use voxline::domain::call::{
    CallSession, CallStatus, ChangeEvent, DtmfTones, ListenerError, ProviderGateway,
    SessionListener,
};
use voxline::domain::shared::value_objects::{HandlerId, ProviderId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log.level))
        .init();

    info!("Starting Voxline call session demo");
    info!("Configuration loaded: {:?}", config);

    demo_call_lifecycle(&config).await?;

    info!("Voxline demo complete");

    Ok(())
}

/// Gateway stand-in that logs requests instead of driving a modem
struct LoggingGateway;

#[async_trait]
impl ProviderGateway for LoggingGateway {
    async fn request_answer(&self, handler_id: &HandlerId) -> voxline::Result<()> {
        info!(%handler_id, "provider: answer requested");
        Ok(())
    }

    async fn request_hangup(&self, handler_id: &HandlerId) -> voxline::Result<()> {
        info!(%handler_id, "provider: hangup requested");
        Ok(())
    }

    async fn request_hold(&self, handler_id: &HandlerId, enable: bool) -> voxline::Result<()> {
        info!(%handler_id, enable, "provider: hold requested");
        Ok(())
    }

    async fn request_deflect(&self, handler_id: &HandlerId, target: &str) -> voxline::Result<()> {
        info!(%handler_id, target, "provider: deflect requested");
        Ok(())
    }

    async fn request_send_dtmf(
        &self,
        handler_id: &HandlerId,
        tones: &DtmfTones,
    ) -> voxline::Result<()> {
        info!(%handler_id, %tones, "provider: DTMF requested");
        Ok(())
    }
}

/// Listener stand-in for a boundary adapter mirroring the session
struct LoggingListener;

impl SessionListener for LoggingListener {
    fn on_change(&self, event: &ChangeEvent) -> Result<(), ListenerError> {
        info!(handler_id = %event.handler_id(), "change event: {:?}", event);
        Ok(())
    }
}

/// Walk one incoming call through its lifecycle
async fn demo_call_lifecycle(config: &Config) -> anyhow::Result<()> {
    info!("=== Call Lifecycle Demo ===");

    let mut session = CallSession::new(
        ProviderId::new(config.provider.provider_id.clone()),
        config.provider.default_line_id.clone(),
        true,
        Arc::new(LoggingGateway),
    );
    session.subscribe(Arc::new(LoggingListener));

    info!(
        "Incoming call from {}: {}",
        session.line_id(),
        serde_json::to_string(&session.snapshot())?
    );

    // Answer; the provider later confirms with a status report
    session.answer().await?;
    session.apply_provider_status(CallStatus::Active)?;
    info!("Call answered, duration runs from {:?}", session.started_at());

    // Hold round-trip
    session.hold(true).await?;
    session.apply_provider_status(CallStatus::Held)?;
    session.hold(false).await?;
    session.apply_provider_status(CallStatus::Active)?;

    // Some in-call signalling
    session.send_dtmf("123#").await?;

    // Hang up; the provider later confirms the disconnect
    session.hangup().await?;
    session.apply_provider_status(CallStatus::Disconnected)?;

    info!(
        "Call ended after {}s: {}",
        session.duration(),
        serde_json::to_string(&session.snapshot())?
    );

    info!("=== Call Lifecycle Demo Complete ===");

    Ok(())
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
///
/// - Emits structured JSON logs via `tracing_subscriber`.
/// - Bridges `log` records into `tracing` so `log::info!` etc. from
///   dependencies are correlated with request spans.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON formatting for structured logging.
    // with_current_span + with_span_list ensures every event includes the
    // active span stack (request spans from tracing-actix-web included).
    let formatting_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()?;

    // Bridge `log` records into tracing.
    // Ignore errors if a logger was already set (e.g., tests).
    let _ = tracing_log::LogTracer::init();

    Ok(())
}

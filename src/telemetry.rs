use crate::prelude::Result;
use tracing::Subscriber;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

/// Maps the configuration's textual debug levels (`NONE`, `ERROR`, `INFO`,
/// `DEBUG`) onto an `EnvFilter`. The `RUST_LOG` environment variable wins
/// when set; unknown levels disable logging rather than guessing.
///
pub fn default_filter(debug_level: &str) -> EnvFilter {
    let directive = match debug_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "ERROR" => "error",
        _ => "off",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_error| EnvFilter::new(directive))
}

/// Composes and returns a tracing subscriber for the library's diagnostics.
///
/// The library only emits `tracing` events and never installs a subscriber
/// itself; the host application composes one here and registers it once.
///
/// # Arguments
///
/// * `debug_level`: Textual level from the configuration surface.
/// * `sink`: Destination where logs will be written to.
///
/// # Returns
///
/// `Subscriber` instance.
///
pub fn get_subscriber<Sink>(debug_level: &str, sink: Sink) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Sync + Send + 'static,
{
    // Use compact, pretty-formatted logs in debug builds, and JSON logs in
    // release builds.
    #[cfg(debug_assertions)]
    let subscriber_builder = tracing_subscriber::fmt().compact();
    #[cfg(not(debug_assertions))]
    let subscriber_builder = tracing_subscriber::fmt().json().with_current_span(true);

    subscriber_builder
        .with_env_filter(default_filter(debug_level))
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_writer(sink)
        .finish()
}

/// Register a subscriber as global default to process span data.
///
/// # Warning
///
/// This function should only be called **once** in the application's
/// lifetime.
///
/// # Arguments
///
/// * `subscriber`: Subscriber to set as the global default for the
///   application.
///
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> Result<()> {
    // Old loggers support.
    LogTracer::init()?;

    set_global_default(subscriber)?;
    Ok(())
}

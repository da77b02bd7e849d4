use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the console subscriber, plus a daily-rolling file when a log
/// directory is configured. Keep the returned guard alive until shutdown.
pub fn init_tracing(logging: Option<&LoggingConfig>) -> anyhow::Result<Option<WorkerGuard>> {
    let directory = logging.and_then(|l| l.directory.as_deref());

    let (file_layer, guard) = match directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, "dossier-api.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false),
        )
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

//! Console and rolling file logging.
//!
//! Records at `INFO` and above go to the console and to `application.log.<date>` under the log
//! directory. `ERROR` records, including panics, are also copied to `exceptions.log.<date>`.
//! Files rotate daily. Records emitted through the `log` facade are bridged in by `init`.

use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

pub const APPLICATION_LOG: &str = "application.log";
pub const EXCEPTIONS_LOG: &str = "exceptions.log";

/// Keeps the background file writers alive. Dropping it flushes pending records.
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Builds the layered subscriber without installing it.
pub fn subscriber(log_dir: &Path) -> (impl Subscriber + Send + Sync + 'static, LogGuards) {
    let (application, application_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, APPLICATION_LOG));
    let (exceptions, exceptions_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, EXCEPTIONS_LOG));

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_filter(LevelFilter::INFO))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(application)
                .with_filter(LevelFilter::INFO),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(exceptions)
                .with_filter(LevelFilter::ERROR),
        );

    (
        subscriber,
        LogGuards {
            _guards: vec![application_guard, exceptions_guard],
        },
    )
}

/// Installs the global subscriber and a panic hook that logs through it.
pub fn init(log_dir: &Path) -> LogGuards {
    let (subscriber, guards) = subscriber(log_dir);
    subscriber.init();

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {info}");
        default_hook(info);
    }));

    guards
}

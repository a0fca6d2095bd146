use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "pdf-quiz.log";

/// Install the global subscriber.
///
/// Everything at `RUST_LOG` (default `info`) goes to `<dir>/pdf-quiz.log`.
/// With `stderr` set, errors are echoed to stderr too; keep it off while the
/// terminal UI owns the screen. The returned guard flushes the file on drop.
pub fn init(dir: &Path, stderr: bool) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_filter(EnvFilter::new("error"))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(stderr_layer)
        .init();

    Ok(guard)
}

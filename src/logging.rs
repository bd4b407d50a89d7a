use std::path::Path;

use anyhow::anyhow;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "campus_harvest=info";

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("campus_harvest=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber
///
/// Logs go to stderr, or to `log_file` when given. The returned guard must be
/// held until exit so buffered lines reach the file.
pub fn setup_logging(log_file: Option<&Path>, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    match log_file {
        Some(path) => {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
                _ => std::env::current_dir()?,
            };
            std::fs::create_dir_all(&dir)?;
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("log file path {} has no file name", path.display()))?;

            let file_appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter(verbose))
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init()?;
            Ok(None)
        }
    }
}

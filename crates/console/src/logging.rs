use crate::cli::Args;
use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: a JSON file rolled daily under
/// `--log-dir`, plus human-readable stderr output when asked for.
/// `RUST_LOG` overrides `--log-filter`.
pub(crate) fn init_tracing(args: &Args) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&args.log_dir)
        .with_context(|| format!("failed to create log dir {}", args.log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        &args.log_dir,
        &args.log_file,
    ));

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&args.log_filter)
            .with_context(|| format!("invalid log filter {:?}", args.log_filter))?,
    };
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_writer(writer);
    let stderr_layer = args.log_to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .context("tracing subscriber already installed")?;
    Ok(guard)
}

//! Tracing setup for the command-line binary.

use std::path::Path;

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};


/// Initializes a console layer and a daily-rotated file layer.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// until the program exits.
pub fn initialize_tracing<P>(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: P,
    log_file_name: &str,
) -> Result<WorkerGuard>
where
    P: AsRef<Path>,
{
    let log_file_output_directory = log_file_output_directory.as_ref();

    std::fs::create_dir_all(log_file_output_directory)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Failed to create log file output directory at {}.",
                log_file_output_directory.display()
            )
        })?;


    let file_appender = tracing_appender::rolling::daily(log_file_output_directory, log_file_name);
    let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_level_filter);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file_writer)
        .with_ansi(false)
        .with_filter(log_file_level_filter);


    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("Failed to install global tracing subscriber.")?;

    Ok(guard)
}


/// Parses a level filter directive such as `info` or `optreg=debug,warn`.
pub fn parse_level_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .into_diagnostic()
        .wrap_err_with(|| miette!("Invalid level filter directive: {directive:?}."))
}

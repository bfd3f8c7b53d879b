use clap::Parser;
use miette::{Context, Result};
use tracing::{debug, info};

use crate::{cli::CLIArgs, configuration::ApplicationOptions};

mod cli;
mod configuration;


/// Base name of the rotated log files.
const LOG_FILE_NAME: &str = "optreg.log";


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    let options = ApplicationOptions::load(
        cli_args.configuration_file_path.as_deref(),
        &cli_args.env_prefix,
        &cli_args.option_arguments,
    )
    .wrap_err("Failed to load options.")?;

    if cli_args.show {
        print!("{}", optreg::show(&options.registry));
        return Ok(());
    }


    let logging_raii_guard = optreg::logging::initialize_tracing(
        options.logging.console_output_level_filter()?,
        options.logging.log_file_output_level_filter()?,
        options.logging.log_file_output_directory(),
        LOG_FILE_NAME,
    )
    .wrap_err("Failed to initialize tracing.")?;

    info!("Tracing initialized.");

    match options.file_path.as_ref() {
        Some(path) => info!("Configuration file: {}.", path.display()),
        None => info!("No configuration file, using defaults, environment and flags."),
    }

    let server = &options.server;
    info!(
        "Server would listen on {}:{} with a {:?} request timeout.",
        server.host.get(),
        server.port.get(),
        server.request_timeout.get()
    );

    server.allowed_origins.with(|origins| {
        debug!(count = origins.len(), "Allowed origins: {}.", origins.join(", "));
    });

    server.api_token.with(|token| {
        debug!(token_length = token.len(), "API token loaded.");
    });

    drop(logging_raii_guard);
    Ok(())
}

//! Command-line interface definitions for the `optreg` binary.

use std::path::PathBuf;

use clap::Parser;



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "optreg",
    author,
    about = "Resolves the demo service configuration from file, environment and flags.",
    version
)]
pub struct CLIArgs {
    /// This is the path to the configuration file to use.
    /// If unspecified, `./data/configuration.toml` is used when it exists.
    #[arg(
        short = 'c',
        long = "configuration-file-path",
        help = "Path to the TOML configuration file. Defaults to ./data/configuration.toml if present."
    )]
    pub configuration_file_path: Option<PathBuf>,

    #[arg(
        long = "env-prefix",
        default_value = "OPTREG",
        help = "Prefix of environment variables to read options from (e.g. OPTREG_SERVER_PORT)."
    )]
    pub env_prefix: String,

    #[arg(
        long = "show",
        help = "Print the resolved option table (secrets masked) and exit."
    )]
    pub show: bool,

    /// Everything after `--` is handed to the option flag parser,
    /// e.g. `optreg -- --server.port=8080 -v`.
    #[arg(
        last = true,
        allow_hyphen_values = true,
        value_name = "OPTIONS",
        help = "Option overrides, passed after `--` as --name=value."
    )]
    pub option_arguments: Vec<String>,
}

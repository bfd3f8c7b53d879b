//! The options of the `optreg` binary itself, declared through the registry.
//!
//! Your starting point should probably be [`ApplicationOptions::load`].

use std::{
    env::current_dir,
    path::{Path, PathBuf},
    time::Duration,
};

use miette::{miette, Context, IntoDiagnostic, Result};
use optreg::{
    alias, caller, group, required, secret, EnvSource, FlagSource, Grp, Opt, Registry, Resolver,
    TomlFileSource,
};
use tracing_subscriber::EnvFilter;



/// Log-related options.
pub struct LoggingOptions {
    pub console_output_level_filter: Opt<String>,
    pub log_file_output_level_filter: Opt<String>,
    pub log_file_output_directory: Opt<String>,
}

impl LoggingOptions {
    fn declare(registry: &mut Registry) -> Result<Self> {
        let logging = Grp::new("log", &[caller("optreg")]);

        Ok(Self {
            console_output_level_filter: registry.string(
                "console_level",
                "info",
                "console log level filter",
                &[group(&logging), alias("v")],
            )?,
            log_file_output_level_filter: registry.string(
                "file_level",
                "debug",
                "log file level filter",
                &[group(&logging)],
            )?,
            log_file_output_directory: registry.string(
                "directory",
                "./data/logs",
                "log file output directory",
                &[group(&logging)],
            )?,
        })
    }

    pub fn console_output_level_filter(&self) -> Result<EnvFilter> {
        optreg::logging::parse_level_filter(&self.console_output_level_filter.get())
            .wrap_err("Failed to parse option log.console_level.")
    }

    pub fn log_file_output_level_filter(&self) -> Result<EnvFilter> {
        optreg::logging::parse_level_filter(&self.log_file_output_level_filter.get())
            .wrap_err("Failed to parse option log.file_level.")
    }

    pub fn log_file_output_directory(&self) -> PathBuf {
        PathBuf::from(self.log_file_output_directory.get())
    }
}


/// Options of the demo service.
pub struct ServerOptions {
    pub host: Opt<String>,
    pub port: Opt<u64>,
    pub request_timeout: Opt<Duration>,
    pub allowed_origins: Opt<Vec<String>>,
    pub api_token: Opt<String>,
}

impl ServerOptions {
    fn declare(registry: &mut Registry) -> Result<Self> {
        let server = Grp::new("server", &[]);
        let authentication = Grp::new("auth", &[group(&server), required(), secret()]);

        Ok(Self {
            host: registry.string("host", "127.0.0.1", "listen address", &[group(&server)])?,
            port: registry.uint("port", 8080, "listen port", &[group(&server), alias("p")])?,
            request_timeout: registry.duration(
                "timeout",
                Duration::from_secs(30),
                "request timeout",
                &[group(&server)],
            )?,
            allowed_origins: registry.strings(
                "allowed_origins",
                &[],
                "CORS origins, comma separated",
                &[group(&server)],
            )?,
            api_token: registry.string(
                "token",
                "",
                "bearer token clients must present",
                &[group(&authentication)],
            )?,
        })
    }
}


/// All options, resolved.
pub struct ApplicationOptions {
    /// The configuration file that was read, if any.
    pub file_path: Option<PathBuf>,

    pub logging: LoggingOptions,

    pub server: ServerOptions,

    pub registry: Registry,
}

impl ApplicationOptions {
    /// Declares every option, then resolves them from (in increasing precedence)
    /// the configuration file, the environment and `option_arguments`.
    pub fn load(
        configuration_file_path: Option<&Path>,
        env_prefix: &str,
        option_arguments: &[String],
    ) -> Result<Self> {
        let mut registry = Registry::new();

        let logging = LoggingOptions::declare(&mut registry)
            .wrap_err("Failed to declare logging options.")?;
        let server =
            ServerOptions::declare(&mut registry).wrap_err("Failed to declare server options.")?;


        let file_path = match configuration_file_path {
            Some(path) => Some(
                dunce::canonicalize(path)
                    .into_diagnostic()
                    .wrap_err_with(|| {
                        miette!("Could not canonicalize configuration file path {}.", path.display())
                    })?,
            ),
            None => get_default_configuration_file_path()?,
        };

        let file_source = file_path
            .as_ref()
            .map(TomlFileSource::load)
            .transpose()
            .wrap_err("Could not load configuration file!")?;

        let flag_source = FlagSource::parse(option_arguments.iter().cloned())
            .wrap_err("Could not parse option arguments.")?;


        Resolver::new()
            .with_optional_source(file_source)
            .with_source(EnvSource::new(env_prefix))
            .with_source(flag_source)
            .resolve(&registry)
            .wrap_err("Failed to resolve configuration.")?;

        Ok(Self {
            file_path,
            logging,
            server,
            registry,
        })
    }
}


/// Returns `{current directory}/data/configuration.toml` if that file exists.
fn get_default_configuration_file_path() -> Result<Option<PathBuf>> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.toml");

    if !configuration_filepath.is_file() {
        return Ok(None);
    }

    dunce::canonicalize(configuration_filepath)
        .into_diagnostic()
        .wrap_err("Could not canonicalize default configuration file path.")
        .map(Some)
}

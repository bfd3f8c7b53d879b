//! A typed configuration-option registry.
//!
//! Options are declared once on a [`Registry`], each backed by a [`Value`] that
//! knows how to parse itself from a string. [`Modifier`]s adjust a node while it
//! is declared: aliases, secrecy, requiredness and [`Grp`] namespaces.
//! A [`Resolver`] then applies configuration sources in precedence order,
//! recording which source set each option, and [`show`] renders the result
//! with secrets masked.
//!
//! ```
//! use std::time::Duration;
//!
//! use optreg::{group, required, secret, FlagSource, Grp, Registry, Resolver};
//!
//! # fn main() -> miette::Result<()> {
//! let mut registry = Registry::new();
//! let http = Grp::new("http", &[required()]);
//!
//! let timeout = registry.duration("timeout", Duration::from_secs(5), "request timeout", &[group(&http)])?;
//! let token = registry.string("token", "", "api token", &[secret()])?;
//!
//! Resolver::new()
//!     .with_source(FlagSource::parse(["--http.timeout=30s", "--token=abc"])?)
//!     .resolve(&registry)?;
//!
//! assert_eq!(timeout.get(), Duration::from_secs(30));
//! assert_eq!(token.get(), "abc");
//! assert!(!optreg::show(&registry).contains("abc"));
//! # Ok(())
//! # }
//! ```

mod error;
mod group;
pub mod logging;
mod modifier;
mod node;
mod registry;
mod render;
mod source;
mod value;

pub use error::{RegistryError, ResolveError, ResolveErrors, SourceError, ValueError};
pub use group::{Grp, GROUP_SEPARATOR};
pub use modifier::{alias, apply_all, caller, group, required, secret, Modifier};
pub use node::{Node, DEFAULT_SOURCE};
pub use registry::Registry;
pub use render::{show, SECRET_PLACEHOLDER};
pub use source::{env_key, EnvSource, FlagSource, Resolver, Source, TomlFileSource};
pub use value::{Opt, OptionType, Typed, Value};

//! Error types for value parsing, registration and resolution.
//!
//! All public errors implement [`Diagnostic`] and carry an error code
//! of the form `OPTREG-Exxx`.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;



/// Returned by [`Value::set`][crate::Value::set] when a raw string is not a valid
/// representation for the value's type.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse {raw:?} as {type_name}: {reason}")]
#[diagnostic(code("OPTREG-E001"))]
pub struct ValueError {
    pub raw: String,
    pub type_name: &'static str,
    pub reason: String,
}

impl ValueError {
    pub fn new<R, S>(raw: R, type_name: &'static str, reason: S) -> Self
    where
        R: Into<String>,
        S: ToString,
    {
        Self {
            raw: raw.into(),
            type_name,
            reason: reason.to_string(),
        }
    }

    /// Replaces every occurrence of the raw input with `placeholder`.
    ///
    /// Used for options marked secret, whose input must not reach logs or reports.
    pub fn redacted(self, placeholder: &str) -> Self {
        let reason = if self.raw.is_empty() {
            self.reason
        } else {
            self.reason.replace(&self.raw, placeholder)
        };

        Self {
            raw: placeholder.to_string(),
            type_name: self.type_name,
            reason,
        }
    }
}


/// Errors raised while handing a configured node to the [`Registry`][crate::Registry].
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("option name must not be empty")]
    #[diagnostic(code("OPTREG-E010"))]
    EmptyName,

    #[error("option {name} has an empty alias")]
    #[diagnostic(code("OPTREG-E011"))]
    EmptyAlias { name: String },

    #[error("option {name} is already registered")]
    #[diagnostic(
        code("OPTREG-E012"),
        help("option names must be unique after group prefixing")
    )]
    DuplicateName { name: String },

    #[error("alias {alias} of option {name} is already used by option {existing}")]
    #[diagnostic(code("OPTREG-E013"))]
    DuplicateAlias {
        alias: String,
        name: String,
        existing: String,
    },
}


/// Errors produced by a configuration source itself, before any node is touched.
#[derive(Error, Diagnostic, Debug)]
pub enum SourceError {
    #[error("failed to read configuration file {}", path.display())]
    #[diagnostic(
        code("OPTREG-E020"),
        help("check that the file exists and is readable")
    )]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {origin}")]
    #[diagnostic(code("OPTREG-E021"))]
    InvalidToml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("entry of list {key} contains a comma")]
    #[diagnostic(
        code("OPTREG-E022"),
        help("list entries are joined with commas, so an entry may not contain one")
    )]
    CommaInListEntry { key: String },

    #[error("key {key} is defined more than once")]
    #[diagnostic(
        code("OPTREG-E024"),
        help("a dotted key and a table entry with the same path collide")
    )]
    ConflictingKey { key: String },

    #[error("unexpected argument {argument}")]
    #[diagnostic(code("OPTREG-E023"), help("options are passed as --name=value"))]
    UnexpectedArgument { argument: String },
}


/// A single problem found while resolving the registry against its sources.
#[derive(Error, Diagnostic, Debug)]
pub enum ResolveError {
    #[error("{source_name} supplied an invalid value for {path_name}")]
    #[diagnostic(code("OPTREG-E030"))]
    InvalidValue {
        path_name: String,
        source_name: String,
        #[source]
        #[diagnostic_source]
        error: ValueError,
    },

    #[error("required option {path_name} was not set by any source")]
    #[diagnostic(code("OPTREG-E031"))]
    MissingRequired { path_name: String },

    #[error("{source_name} references unknown option {key}")]
    #[diagnostic(code("OPTREG-E032"))]
    UnknownKey { key: String, source_name: String },
}


/// All problems collected during one resolution pass.
#[derive(Error, Diagnostic, Debug)]
#[error("configuration could not be resolved ({} problem(s))", errors.len())]
#[diagnostic(code("OPTREG-E039"))]
pub struct ResolveErrors {
    #[related]
    pub errors: Vec<ResolveError>,
}

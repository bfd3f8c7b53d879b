use std::{collections::HashMap, ffi::OsString};

use tracing::warn;

use super::Source;
use crate::node::Node;


/// Environment variable name for the option `name`.
///
/// `db.port` with prefix `APP` becomes `APP_DB_PORT`; an empty prefix gives `DB_PORT`.
pub fn env_key(prefix: &str, name: &str) -> String {
    let name = name
        .chars()
        .map(|character| match character {
            '.' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect::<String>();

    if prefix.is_empty() {
        name
    } else {
        format!("{}_{}", prefix.to_ascii_uppercase(), name)
    }
}


/// Reads options from environment variables, looked up by qualified name only.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    variables: HashMap<String, String>,
}

impl EnvSource {
    /// Snapshots the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self::from_os_vars(prefix, std::env::vars_os())
    }

    /// Like [`EnvSource::from_vars`], but skips entries that are not valid UTF-8.
    pub fn from_os_vars<S, I>(prefix: S, variables: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let variables = variables.into_iter().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    warn!(variable = %key, "Skipping environment variable with a non UTF-8 value.");
                    None
                }
                (Err(key), _) => {
                    warn!(
                        variable = %key.to_string_lossy(),
                        "Skipping environment variable with a non UTF-8 name."
                    );
                    None
                }
            }
        });

        Self::from_vars(prefix, variables)
    }

    /// Uses the given variables instead of the process environment.
    pub fn from_vars<S, I, K, V>(prefix: S, variables: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            variables: variables
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Source for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn lookup(&self, node: &Node) -> Option<String> {
        self.variables
            .get(&env_key(&self.prefix, node.name()))
            .cloned()
    }
}

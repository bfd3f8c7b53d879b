use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use toml::{Table, Value as TomlValue};
use tracing::debug;

use super::Source;
use crate::{error::SourceError, group::GROUP_SEPARATOR, node::Node};


/// Reads options from a TOML document.
///
/// Tables map onto group prefixes, so
/// ```toml
/// [db]
/// port = 5432
/// hosts = ["a", "b"]
/// ```
/// supplies `db.port = "5432"` and `db.hosts = "a,b"`. Quoted dotted keys
/// (`"db.port" = 5432`) are equivalent; defining the same key both ways is
/// an error, as is a list entry containing a comma.
#[derive(Debug, Clone)]
pub struct TomlFileSource {
    file_path: Option<PathBuf>,
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl TomlFileSource {
    /// Loads and flattens the file at `file_path`.
    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Self, SourceError> {
        let file_path = file_path.as_ref();

        let contents =
            std::fs::read_to_string(file_path).map_err(|source| SourceError::ReadFailed {
                path: file_path.to_path_buf(),
                source,
            })?;

        let mut file_source = Self::parse(&contents, &file_path.display().to_string())?;
        file_source.file_path = Some(file_path.to_path_buf());

        debug!(
            file_path = %file_path.display(),
            keys = file_source.order.len(),
            "Loaded configuration file."
        );

        Ok(file_source)
    }

    /// Parses an in-memory TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, SourceError> {
        Self::parse(contents, "inline TOML document")
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn parse(contents: &str, origin: &str) -> Result<Self, SourceError> {
        let table =
            toml::from_str::<Table>(contents).map_err(|source| SourceError::InvalidToml {
                origin: origin.to_string(),
                source,
            })?;

        let mut file_source = Self {
            file_path: None,
            values: HashMap::new(),
            order: Vec::new(),
        };
        file_source.flatten_table("", &table)?;

        Ok(file_source)
    }

    fn flatten_table(&mut self, prefix: &str, table: &Table) -> Result<(), SourceError> {
        for (key, value) in table {
            let qualified_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{GROUP_SEPARATOR}{key}")
            };

            if let TomlValue::Table(inner) = value {
                self.flatten_table(&qualified_key, inner)?;
                continue;
            }

            // `"db.port" = 1` next to `[db] port = 2` flattens to the same key twice.
            if self.values.contains_key(&qualified_key) {
                return Err(SourceError::ConflictingKey { key: qualified_key });
            }

            let rendered = render_value(&qualified_key, value)?;

            self.order.push(qualified_key.clone());
            self.values.insert(qualified_key, rendered);
        }

        Ok(())
    }
}

fn render_value(key: &str, value: &TomlValue) -> Result<String, SourceError> {
    let rendered = match value {
        TomlValue::String(string) => string.clone(),
        TomlValue::Integer(integer) => integer.to_string(),
        TomlValue::Float(float) => float.to_string(),
        TomlValue::Boolean(boolean) => boolean.to_string(),
        TomlValue::Datetime(datetime) => datetime.to_string(),
        TomlValue::Table(table) => table.to_string(),
        TomlValue::Array(array) => {
            let entries = array
                .iter()
                .map(|entry| render_value(key, entry))
                .collect::<Result<Vec<_>, _>>()?;

            // List options split on commas, so an entry holding one would not survive.
            if entries.iter().any(|entry| entry.contains(',')) {
                return Err(SourceError::CommaInListEntry {
                    key: key.to_string(),
                });
            }

            entries.join(",")
        }
    };

    Ok(rendered)
}

impl Source for TomlFileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn lookup(&self, node: &Node) -> Option<String> {
        self.values.get(node.name()).cloned()
    }

    fn supplied_keys(&self) -> Vec<String> {
        self.order.clone()
    }
}

use std::fmt;

use crate::{error::ValueError, render::SECRET_PLACEHOLDER, value::Value};


/// Provenance reported for a node no source has set.
pub const DEFAULT_SOURCE: &str = "default";


/// One declared configuration option.
///
/// A node is created together with its [`Value`] and then configured by
/// [`Modifier`][crate::Modifier]s. Once the [`Registry`][crate::Registry] owns it,
/// only the value's state and the recorded provenance change.
pub struct Node {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) value: Box<dyn Value>,
    pub(crate) set_source: Option<String>,
    pub(crate) is_secret: bool,
    pub(crate) is_required: bool,
    pub(crate) caller: String,
}

impl Node {
    pub fn new<N, D, V>(name: N, description: D, value: V) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        V: Value + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            aliases: Vec::new(),
            value: Box::new(value),
            set_source: None,
            is_secret: false,
            is_required: false,
            caller: String::new(),
        }
    }

    /// Qualified, dot-separated name (e.g. `db.port`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    pub fn is_secret(&self) -> bool {
        self.is_secret
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Display identity: `name`, or `caller:name` when a caller prefix is set.
    pub fn path_name(&self) -> String {
        if self.caller.is_empty() {
            return self.name.clone();
        }

        format!("{}:{}", self.caller, self.name)
    }

    /// The source that last set this node, or [`DEFAULT_SOURCE`].
    pub fn source(&self) -> &str {
        match self.set_source.as_deref() {
            Some(source) if !source.is_empty() => source,
            _ => DEFAULT_SOURCE,
        }
    }

    /// Sets the value from `raw` and, on success only, records `source` as its provenance.
    ///
    /// For secret nodes the returned error has `raw` replaced by [`SECRET_PLACEHOLDER`].
    pub fn apply(&mut self, raw: &str, source: &str) -> Result<(), ValueError> {
        let is_secret = self.is_secret;

        self.value.set(raw).map_err(|error| match is_secret {
            true => error.redacted(SECRET_PLACEHOLDER),
            false => error,
        })?;
        self.set_source = Some(source.to_string());

        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("type", &self.value.type_name())
            .field("source", &self.source())
            .field("is_secret", &self.is_secret)
            .field("is_required", &self.is_required)
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}

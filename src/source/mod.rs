//! Configuration sources and the resolver that applies them to a [`Registry`].
//!
//! # Precedence
//! Sources are applied in the order they were added to the [`Resolver`], lowest
//! precedence first. The conventional order is defaults (the declared values),
//! then [`TomlFileSource`], [`EnvSource`] and finally [`FlagSource`]. A later
//! source that supplies a valid value overrides an earlier one and becomes the
//! node's provenance.
//!
//! Within one source, nodes are independent and are set in parallel. A single
//! node only ever sees one source at a time.

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{
    error::{ResolveError, ResolveErrors},
    node::{Node, DEFAULT_SOURCE},
    registry::Registry,
};

pub use self::env::{env_key, EnvSource};
pub use self::file::TomlFileSource;
pub use self::flag::FlagSource;

mod env;
mod file;
mod flag;



/// Anything that can supply raw option strings.
pub trait Source: Send + Sync {
    /// Provenance tag recorded on nodes this source sets (e.g. `"env"`).
    fn name(&self) -> &str;

    /// Raw value this source holds for `node`, if any.
    fn lookup(&self, node: &Node) -> Option<String>;

    /// Keys this source was explicitly given. Each must name a registered
    /// option or alias, otherwise resolution reports it.
    ///
    /// Sources that read from a shared namespace (the environment) return nothing.
    fn supplied_keys(&self) -> Vec<String> {
        Vec::new()
    }
}


/// Applies an ordered list of sources to every node of a registry.
#[derive(Default)]
pub struct Resolver {
    sources: Vec<Box<dyn Source>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source with higher precedence than all previously added ones.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: Source + 'static,
    {
        self.sources.push(Box::new(source));
        self
    }

    /// Adds a source only when one is given.
    pub fn with_optional_source<S>(self, source: Option<S>) -> Self
    where
        S: Source + 'static,
    {
        match source {
            Some(source) => self.with_source(source),
            None => self,
        }
    }

    /// Resolves every node against all sources.
    ///
    /// Problems don't stop resolution; they are collected and returned together.
    /// Required options still sourced from the default are reported last.
    pub fn resolve(&self, registry: &Registry) -> Result<(), ResolveErrors> {
        let mut errors = Vec::new();

        for source in &self.sources {
            debug!(source = source.name(), "Applying configuration source.");

            errors.extend(unknown_keys(source.as_ref(), registry));
            errors.extend(apply_source(source.as_ref(), registry));
        }

        errors.extend(missing_required(registry));


        if errors.is_empty() {
            Ok(())
        } else {
            Err(ResolveErrors { errors })
        }
    }
}


fn unknown_keys(source: &dyn Source, registry: &Registry) -> Vec<ResolveError> {
    source
        .supplied_keys()
        .into_iter()
        .filter(|key| !registry.contains(key))
        .map(|key| ResolveError::UnknownKey {
            key,
            source_name: source.name().to_string(),
        })
        .collect()
}

fn apply_source(source: &dyn Source, registry: &Registry) -> Vec<ResolveError> {
    let mut errors = registry
        .nodes()
        .par_iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            let mut node = cell.lock();
            let raw = source.lookup(&node)?;

            match node.apply(&raw, source.name()) {
                Ok(()) => {
                    trace!(name = %node.name(), source = source.name(), "Option set.");
                    None
                }
                Err(error) => {
                    // Raw input stays out of the log; the error is already redacted for secrets.
                    warn!(
                        name = %node.name(),
                        source = source.name(),
                        "Ignoring invalid value."
                    );

                    Some((
                        index,
                        ResolveError::InvalidValue {
                            path_name: node.path_name(),
                            source_name: source.name().to_string(),
                            error,
                        },
                    ))
                }
            }
        })
        .collect::<Vec<_>>();

    // Report in declaration order regardless of scheduling.
    errors.sort_unstable_by_key(|(index, _)| *index);

    errors.into_iter().map(|(_, error)| error).collect()
}

fn missing_required(registry: &Registry) -> Vec<ResolveError> {
    registry
        .nodes()
        .iter()
        .filter_map(|cell| {
            let node = cell.lock();

            (node.is_required() && node.source() == DEFAULT_SOURCE).then(|| {
                ResolveError::MissingRequired {
                    path_name: node.path_name(),
                }
            })
        })
        .collect()
}

//! The collection all declared options are registered into.
//!
//! There is no process-wide instance: callers own a [`Registry`] and pass it
//! to whatever declares options, so independent registries can coexist (in
//! tests, for example).

use std::{collections::HashMap, time::Duration};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    error::{RegistryError, ValueError},
    modifier::{apply_all, Modifier},
    node::Node,
    value::{Opt, OptionType, Typed, Value},
};


/// Owns every declared [`Node`].
///
/// Declaration needs `&mut self`; once declaration is over the registry is
/// shared by reference and only node values and provenance change. Each node
/// sits behind its own lock, so distinct nodes can be set concurrently.
#[derive(Default)]
pub struct Registry {
    nodes: Vec<Mutex<Node>>,

    /// Qualified name to index into `nodes`.
    names: HashMap<String, usize>,

    /// Alias to index into `nodes`.
    aliases: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Declares an option backed by an arbitrary [`Value`] implementation.
    ///
    /// `modifiers` are applied in order before the node is validated and stored.
    pub fn declare<V>(
        &mut self,
        name: &str,
        description: &str,
        value: V,
        modifiers: &[Modifier],
    ) -> Result<(), RegistryError>
    where
        V: Value + 'static,
    {
        let mut node = Node::new(name, description, value);
        apply_all(&mut node, modifiers);

        self.register(node)
    }

    /// Declares an option of any [`OptionType`] and returns its read handle.
    pub fn option<T: OptionType>(
        &mut self,
        name: &str,
        default: T,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<T>, RegistryError> {
        let (value, handle) = Typed::new(default);
        self.declare(name, description, value, modifiers)?;

        Ok(handle)
    }

    pub fn int(
        &mut self,
        name: &str,
        default: i64,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<i64>, RegistryError> {
        self.option(name, default, description, modifiers)
    }

    pub fn uint(
        &mut self,
        name: &str,
        default: u64,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<u64>, RegistryError> {
        self.option(name, default, description, modifiers)
    }

    pub fn float(
        &mut self,
        name: &str,
        default: f64,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<f64>, RegistryError> {
        self.option(name, default, description, modifiers)
    }

    pub fn boolean(
        &mut self,
        name: &str,
        default: bool,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<bool>, RegistryError> {
        self.option(name, default, description, modifiers)
    }

    pub fn string(
        &mut self,
        name: &str,
        default: &str,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<String>, RegistryError> {
        self.option(name, default.to_string(), description, modifiers)
    }

    pub fn strings(
        &mut self,
        name: &str,
        default: &[&str],
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<Vec<String>>, RegistryError> {
        let default = default.iter().map(|entry| entry.to_string()).collect();

        self.option(name, default, description, modifiers)
    }

    pub fn duration(
        &mut self,
        name: &str,
        default: Duration,
        description: &str,
        modifiers: &[Modifier],
    ) -> Result<Opt<Duration>, RegistryError> {
        self.option(name, default, description, modifiers)
    }

    /// Validates and stores a fully configured node.
    ///
    /// Nothing is stored when any check fails.
    pub fn register(&mut self, node: Node) -> Result<(), RegistryError> {
        if node.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        if self.names.contains_key(&node.name) || self.aliases.contains_key(&node.name) {
            return Err(RegistryError::DuplicateName {
                name: node.name.clone(),
            });
        }

        for (position, alias) in node.aliases.iter().enumerate() {
            if alias.is_empty() {
                return Err(RegistryError::EmptyAlias {
                    name: node.name.clone(),
                });
            }

            let existing = if *alias == node.name || node.aliases[..position].contains(alias) {
                Some(node.name.clone())
            } else {
                self.aliases
                    .get(alias)
                    .or_else(|| self.names.get(alias))
                    .map(|index| self.nodes[*index].lock().name.clone())
            };

            if let Some(existing) = existing {
                return Err(RegistryError::DuplicateAlias {
                    alias: alias.clone(),
                    name: node.name.clone(),
                    existing,
                });
            }
        }


        let index = self.nodes.len();

        self.names.insert(node.name.clone(), index);
        for alias in &node.aliases {
            self.aliases.insert(alias.clone(), index);
        }

        debug!(
            name = %node.name,
            value_type = node.value.type_name(),
            aliases = ?node.aliases,
            required = node.is_required,
            secret = node.is_secret,
            "Registered option."
        );

        self.nodes.push(Mutex::new(node));
        Ok(())
    }

    /// Finds a node by qualified name or alias and runs `reader` against it.
    ///
    /// The node stays locked while `reader` runs; calling [`Registry::with_node`] or
    /// [`Registry::apply`] for the same node from inside `reader` deadlocks.
    pub fn with_node<R, F>(&self, key: &str, reader: F) -> Option<R>
    where
        F: FnOnce(&Node) -> R,
    {
        let index = self.names.get(key).or_else(|| self.aliases.get(key))?;

        Some(reader(&self.nodes[*index].lock()))
    }

    /// Whether `key` is a registered name or alias.
    pub fn contains(&self, key: &str) -> bool {
        self.names.contains_key(key) || self.aliases.contains_key(key)
    }

    /// Sets the node named (or aliased) `key` from `raw`, recording `source` on success.
    ///
    /// Returns `None` when no such node exists. Errors for secret nodes carry
    /// [`SECRET_PLACEHOLDER`][crate::SECRET_PLACEHOLDER] instead of `raw`.
    pub fn apply(
        &self,
        key: &str,
        raw: &str,
        source: &str,
    ) -> Option<Result<(), ValueError>> {
        let index = self.names.get(key).or_else(|| self.aliases.get(key))?;

        Some(self.nodes[*index].lock().apply(raw, source))
    }

    /// Nodes in declaration order.
    pub(crate) fn nodes(&self) -> &[Mutex<Node>] {
        &self.nodes
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        group::Grp,
        modifier::{alias, group, required, secret},
    };

    #[test]
    fn typed_declarations_return_live_handles() {
        let mut registry = Registry::new();

        let port = registry.int("db.port", 5432, "database port", &[]).unwrap();
        let hosts = registry.strings("db.hosts", &["a", "b"], "replicas", &[]).unwrap();

        assert_eq!(port.get(), 5432);
        assert_eq!(hosts.get(), vec!["a", "b"]);

        registry.apply("db.port", "6000", "test").unwrap().unwrap();
        assert_eq!(port.get(), 6000);
        assert_eq!(registry.with_node("db.port", |node| node.source().to_string()).unwrap(), "test");
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = Registry::new();

        assert_eq!(
            registry.int("", 0, "", &[]).unwrap_err(),
            RegistryError::EmptyName
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_alias_is_rejected() {
        let mut registry = Registry::new();

        assert_eq!(
            registry.int("port", 0, "", &[alias("")]).unwrap_err(),
            RegistryError::EmptyAlias {
                name: "port".to_string()
            }
        );
    }

    #[test]
    fn duplicate_names_after_grouping_are_rejected() {
        let mut registry = Registry::new();
        let database = Grp::new("db", &[]);

        registry.int("db.port", 5432, "", &[]).unwrap();
        let error = registry.int("port", 1, "", &[group(&database)]).unwrap_err();

        assert_eq!(
            error,
            RegistryError::DuplicateName {
                name: "db.port".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_aliases_are_rejected_across_nodes() {
        let mut registry = Registry::new();

        registry.int("db.port", 5432, "", &[alias("p")]).unwrap();
        let error = registry.string("db.password", "", "", &[alias("p")]).unwrap_err();

        assert_eq!(
            error,
            RegistryError::DuplicateAlias {
                alias: "p".to_string(),
                name: "db.password".to_string(),
                existing: "db.port".to_string(),
            }
        );
        assert!(!registry.contains("db.password"));
    }

    #[test]
    fn alias_may_not_shadow_a_name() {
        let mut registry = Registry::new();

        registry.boolean("verbose", false, "", &[]).unwrap();
        assert!(registry.int("level", 0, "", &[alias("verbose")]).is_err());
        assert!(registry.int("p", 0, "", &[]).is_ok());
        assert!(matches!(
            registry.int("port", 0, "", &[alias("p")]),
            Err(RegistryError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn repeated_alias_on_one_node_is_rejected() {
        let mut registry = Registry::new();

        assert!(matches!(
            registry.int("port", 0, "", &[alias("p"), alias("p")]),
            Err(RegistryError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn lookups_accept_aliases() {
        let mut registry = Registry::new();
        registry
            .string("db.password", "", "database password", &[alias("pw"), secret(), required()])
            .unwrap();

        let (name, is_secret, is_required) = registry
            .with_node("pw", |node| (node.name().to_string(), node.is_secret(), node.is_required()))
            .unwrap();

        assert_eq!(name, "db.password");
        assert!(is_secret);
        assert!(is_required);
        assert!(registry.with_node("missing", |_| ()).is_none());
        assert!(registry.apply("missing", "x", "test").is_none());
    }

    #[test]
    fn direct_apply_on_secret_node_hides_the_input() {
        let mut registry = Registry::new();
        registry.int("db.pin", 0, "", &[secret(), alias("pin")]).unwrap();

        let error = registry.apply("pin", "hunter2", "test").unwrap().unwrap_err();

        assert_eq!(error.raw, crate::SECRET_PLACEHOLDER);
        assert!(!format!("{error:?}").contains("hunter2"));
        assert!(registry.apply("db.missing", "1", "test").is_none());
    }
}

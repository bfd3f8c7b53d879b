//! Modifiers applied to a [`Node`] while it is being declared.
//!
//! ```
//! use optreg::{alias, required, Registry};
//!
//! # fn main() -> Result<(), optreg::RegistryError> {
//! let mut registry = Registry::new();
//! let port = registry.int("db.port", 5432, "database port", &[alias("p"), required()])?;
//!
//! assert_eq!(port.get(), 5432);
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc};

use crate::{group::Grp, node::Node};


/// An in-place mutation of a [`Node`], applied once at declaration time.
///
/// [`alias`], [`secret`], [`required`] and [`caller`] commute. [`group`] does not:
/// it wraps whatever name the node has when it runs, so the order of several
/// group modifiers decides how their prefixes nest.
#[derive(Clone)]
pub struct Modifier(Arc<dyn Fn(&mut Node) + Send + Sync>);

impl Modifier {
    pub(crate) fn new<F>(modify: F) -> Self
    where
        F: Fn(&mut Node) + Send + Sync + 'static,
    {
        Self(Arc::new(modify))
    }

    pub fn apply(&self, node: &mut Node) {
        (self.0)(node)
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Modifier")
    }
}


/// Applies `modifiers` to `node` in the given order.
pub fn apply_all<'a, I>(node: &mut Node, modifiers: I)
where
    I: IntoIterator<Item = &'a Modifier>,
{
    for modifier in modifiers {
        modifier.apply(node);
    }
}


/// Adds an alternative name, e.g. a short command-line flag.
/// Shape and uniqueness are checked by the registry, not here.
pub fn alias<S: Into<String>>(alias: S) -> Modifier {
    let alias = alias.into();

    Modifier::new(move |node| node.aliases.push(alias.clone()))
}

/// Masks the option's value whenever the configuration is rendered.
pub fn secret() -> Modifier {
    Modifier::new(|node| node.is_secret = true)
}

/// Makes resolution fail unless some source sets the option.
pub fn required() -> Modifier {
    Modifier::new(|node| node.is_required = true)
}

/// Sets the caller prefix shown in [`Node::path_name`].
///
/// Usually carried by a [`Grp`] so that every member gets the same prefix.
pub fn caller<S: Into<String>>(caller: S) -> Modifier {
    let caller = caller.into();

    Modifier::new(move |node| node.caller = caller.clone())
}

/// Qualifies the node's current name with the group's prefix, then applies
/// the group's own modifiers.
pub fn group(group: &Grp) -> Modifier {
    let group = group.clone();

    Modifier::new(move |node| {
        node.name = group.key(&node.name);
        group.apply_opts(node);
    })
}

use crate::{
    modifier::{apply_all, Modifier},
    node::Node,
};


/// Separator between a group prefix and the member's local name.
pub const GROUP_SEPARATOR: char = '.';


/// A reusable namespace for related options.
///
/// Applying a group through [`group`][crate::group()] renames the node to
/// `prefix.name` and then applies the group's own modifiers to it.
///
/// Groups nest by carrying another group's modifier:
///
/// ```
/// use optreg::{group, secret, Grp};
///
/// let database = Grp::new("db", &[]);
/// let credentials = Grp::new("credentials", &[group(&database), secret()]);
///
/// assert_eq!(credentials.key("password"), "credentials.password");
/// ```
#[derive(Clone, Debug)]
pub struct Grp {
    prefix: String,
    opts: Vec<Modifier>,
}

impl Grp {
    pub fn new<S: Into<String>>(prefix: S, opts: &[Modifier]) -> Self {
        Self {
            prefix: prefix.into(),
            opts: opts.to_vec(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Qualifies `local_name` with this group's prefix.
    pub fn key(&self, local_name: &str) -> String {
        if self.prefix.is_empty() {
            return local_name.to_string();
        }

        format!("{}{}{}", self.prefix, GROUP_SEPARATOR, local_name)
    }

    /// Applies the group's modifiers to `node`, in declaration order.
    pub fn apply_opts(&self, node: &mut Node) {
        apply_all(node, &self.opts);
    }
}

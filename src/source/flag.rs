use std::collections::HashMap;

use super::Source;
use crate::{error::SourceError, node::Node};


/// Reads options from command-line style arguments.
///
/// Accepted forms, with one or two leading dashes:
/// - `--db.port=5432`
/// - `--db.port 5432`
/// - `-p 5432` (by alias)
/// - `--verbose` (no value following, read as `true`)
///
/// A value that itself starts with `-` has to use the `=` form.
/// When a key is given several times the last one wins.
#[derive(Debug, Clone, Default)]
pub struct FlagSource {
    values: HashMap<String, String>,
    order: Vec<String>,
}

impl FlagSource {
    pub fn parse<I, S>(arguments: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut source = Self::default();
        let mut arguments = arguments.into_iter().map(Into::<String>::into).peekable();

        while let Some(argument) = arguments.next() {
            let Some(flag) = argument
                .strip_prefix("--")
                .or_else(|| argument.strip_prefix('-'))
                .filter(|flag| !flag.is_empty())
            else {
                return Err(SourceError::UnexpectedArgument {
                    argument: argument.clone(),
                });
            };

            let (key, value) = match flag.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => match arguments.next_if(|next| !next.starts_with('-')) {
                    Some(value) => (flag.to_string(), value),
                    None => (flag.to_string(), "true".to_string()),
                },
            };

            if key.is_empty() {
                return Err(SourceError::UnexpectedArgument { argument });
            }

            if !source.values.contains_key(&key) {
                source.order.push(key.clone());
            }
            source.values.insert(key, value);
        }

        Ok(source)
    }
}

impl Source for FlagSource {
    fn name(&self) -> &str {
        "flag"
    }

    /// The qualified name wins over aliases; among aliases, declaration order wins.
    fn lookup(&self, node: &Node) -> Option<String> {
        std::iter::once(node.name())
            .chain(node.aliases().iter().map(String::as_str))
            .find_map(|key| self.values.get(key))
            .cloned()
    }

    fn supplied_keys(&self) -> Vec<String> {
        self.order.clone()
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Typed;

    fn node(name: &str, aliases: &[&str]) -> Node {
        let (value, _) = Typed::new(String::new());
        let mut node = Node::new(name, "", value);
        node.aliases = aliases.iter().map(|alias| alias.to_string()).collect();

        node
    }

    #[test]
    fn parses_all_flag_forms() {
        let source = FlagSource::parse([
            "--db.port=5432",
            "--db.host",
            "example.org",
            "-p",
            "7",
            "--verbose",
            "--offset=-3",
        ])
        .unwrap();

        assert_eq!(source.lookup(&node("db.port", &[])).as_deref(), Some("5432"));
        assert_eq!(source.lookup(&node("db.host", &[])).as_deref(), Some("example.org"));
        assert_eq!(source.lookup(&node("level", &["p"])).as_deref(), Some("7"));
        assert_eq!(source.lookup(&node("verbose", &[])).as_deref(), Some("true"));
        assert_eq!(source.lookup(&node("offset", &[])).as_deref(), Some("-3"));
        assert_eq!(
            source.supplied_keys(),
            ["db.port", "db.host", "p", "verbose", "offset"]
        );
    }

    #[test]
    fn bare_flag_before_another_flag_is_boolean() {
        let source = FlagSource::parse(["--verbose", "--color=never"]).unwrap();

        assert_eq!(source.lookup(&node("verbose", &[])).as_deref(), Some("true"));
        assert_eq!(source.lookup(&node("color", &[])).as_deref(), Some("never"));
    }

    #[test]
    fn name_takes_priority_over_alias() {
        let source = FlagSource::parse(["-p=1", "--port=2"]).unwrap();

        assert_eq!(source.lookup(&node("port", &["p"])).as_deref(), Some("2"));
    }

    #[test]
    fn last_occurrence_wins() {
        let source = FlagSource::parse(["--port=1", "--port=2"]).unwrap();

        assert_eq!(source.lookup(&node("port", &[])).as_deref(), Some("2"));
        assert_eq!(source.supplied_keys(), ["port"]);
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(matches!(
            FlagSource::parse(["stray"]),
            Err(SourceError::UnexpectedArgument { argument }) if argument == "stray"
        ));
        assert!(FlagSource::parse(["--"]).is_err());
        assert!(FlagSource::parse(["--=5"]).is_err());
    }
}

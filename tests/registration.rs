use std::{io::Write, time::Duration};

use optreg::{
    alias, caller, group, required, secret, show, EnvSource, FlagSource, Grp, Node, Opt,
    OptionType, Registry, ResolveError, Resolver, TomlFileSource, Typed, Value, ValueError,
    SECRET_PLACEHOLDER,
};


fn source_of(registry: &Registry, key: &str) -> String {
    registry
        .with_node(key, |node| node.source().to_string())
        .expect("option is registered")
}


#[test]
fn grouped_required_timeout_tracks_its_provenance() {
    let mut registry = Registry::new();
    let http = Grp::new("http", &[required()]);

    let timeout = registry
        .duration("timeout", Duration::from_secs(5), "request timeout", &[group(&http)])
        .unwrap();

    let (name, is_required) = registry
        .with_node("http.timeout", |node| (node.name().to_string(), node.is_required()))
        .unwrap();
    assert_eq!(name, "http.timeout");
    assert!(is_required);
    assert_eq!(source_of(&registry, "http.timeout"), "default");

    Resolver::new()
        .with_source(FlagSource::parse(["--http.timeout", "30s"]).unwrap())
        .resolve(&registry)
        .unwrap();

    assert_eq!(timeout.get(), Duration::from_secs(30));
    assert_eq!(source_of(&registry, "http.timeout"), "flag");
}


#[test]
fn required_option_left_at_default_fails_resolution() {
    let mut registry = Registry::new();
    let http = Grp::new("http", &[required()]);
    registry
        .duration("timeout", Duration::from_secs(5), "request timeout", &[group(&http)])
        .unwrap();

    let errors = Resolver::new()
        .with_source(EnvSource::from_vars("APP", Vec::<(String, String)>::new()))
        .resolve(&registry)
        .unwrap_err();

    assert!(matches!(
        errors.errors.as_slice(),
        [ResolveError::MissingRequired { path_name }] if path_name == "http.timeout"
    ));
}


#[test]
fn malformed_integer_keeps_prior_state() {
    let (mut value, handle) = Typed::new(5432_i64);

    assert!(value.set("not-a-number").is_err());
    assert_eq!(value.type_name(), "int");
    assert_eq!(handle.get(), 5432);
    assert_eq!(value.to_string(), "5432");
}


#[test]
fn file_env_and_flags_layer_in_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[db]\nhost = \"file.local\"\nport = 1111\nuser = \"file-user\""
    )
    .unwrap();

    let mut registry = Registry::new();
    let database = Grp::new("db", &[]);

    let host = registry
        .string("host", "localhost", "database host", &[group(&database)])
        .unwrap();
    let port = registry
        .int("port", 5432, "database port", &[group(&database), alias("p")])
        .unwrap();
    let user = registry
        .string("user", "postgres", "database user", &[group(&database)])
        .unwrap();
    let name = registry
        .string("name", "app", "database name", &[group(&database)])
        .unwrap();

    Resolver::new()
        .with_source(TomlFileSource::load(file.path()).unwrap())
        .with_source(EnvSource::from_vars(
            "APP",
            [("APP_DB_PORT", "2222"), ("APP_DB_USER", "env-user")],
        ))
        .with_source(FlagSource::parse(["-p", "3333"]).unwrap())
        .resolve(&registry)
        .unwrap();

    assert_eq!(host.get(), "file.local");
    assert_eq!(user.get(), "env-user");
    assert_eq!(port.get(), 3333);
    assert_eq!(name.get(), "app");

    assert_eq!(source_of(&registry, "db.host"), "file");
    assert_eq!(source_of(&registry, "db.user"), "env");
    assert_eq!(source_of(&registry, "p"), "flag");
    assert_eq!(source_of(&registry, "db.name"), "default");
}


#[test]
fn all_problems_are_reported_together() {
    let mut registry = Registry::new();
    registry.int("workers", 4, "", &[]).unwrap();
    registry.string("token", "", "", &[required(), secret()]).unwrap();

    let errors = Resolver::new()
        .with_source(FlagSource::parse(["--workers=many", "--wrokers=2"]).unwrap())
        .resolve(&registry)
        .unwrap_err();

    assert_eq!(errors.errors.len(), 3);
    assert!(matches!(&errors.errors[0], ResolveError::UnknownKey { key, .. } if key == "wrokers"));
    assert!(matches!(&errors.errors[1], ResolveError::InvalidValue { path_name, .. } if path_name == "workers"));
    assert!(matches!(&errors.errors[2], ResolveError::MissingRequired { path_name } if path_name == "token"));
}


#[test]
fn show_masks_secrets_and_reports_sources() {
    let mut registry = Registry::new();
    let vault = Grp::new("vault", &[secret(), caller("storage")]);

    registry
        .string("password", "", "vault password", &[group(&vault)])
        .unwrap();
    registry.int("retries", 3, "retry count", &[]).unwrap();

    Resolver::new()
        .with_source(EnvSource::from_vars(
            "",
            [("VAULT_PASSWORD", "correct horse battery staple")],
        ))
        .resolve(&registry)
        .unwrap();

    let rendered = show(&registry);
    let password_line = rendered
        .lines()
        .find(|line| line.starts_with("storage:vault.password"))
        .unwrap();

    assert!(password_line.contains(SECRET_PLACEHOLDER));
    assert!(password_line.contains("env"));
    assert!(!rendered.contains("horse"));

    let retries_line = rendered.lines().find(|line| line.starts_with("retries")).unwrap();
    assert!(retries_line.contains('3'));
    assert!(retries_line.contains("default"));
}


/// A user-defined option type, declared without any change to the registry.
#[derive(Clone, Debug, PartialEq)]
enum Compression {
    None,
    Gzip,
    Zstd,
}

impl OptionType for Compression {
    const TYPE_NAME: &'static str = "compression";

    fn parse_option(raw: &str) -> Result<Self, String> {
        match raw {
            "none" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            "zstd" => Ok(Self::Zstd),
            other => Err(format!("unknown compression {other:?}")),
        }
    }

    fn render_option(&self) -> String {
        format!("{self:?}").to_lowercase()
    }
}


/// A hand-written value implementation, bypassing `Typed` entirely.
struct Port(u16);

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for Port {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        let port = raw
            .parse::<u16>()
            .map_err(|error| ValueError::new(raw, "port", error))?;

        if port == 0 {
            return Err(ValueError::new(raw, "port", "port 0 is reserved"));
        }

        self.0 = port;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "port"
    }
}


#[test]
fn custom_value_types_participate() {
    let mut registry = Registry::new();

    let compression: Opt<Compression> = registry
        .option("compression", Compression::None, "payload compression", &[])
        .unwrap();
    registry
        .declare("admin.port", "admin listen port", Port(9000), &[])
        .unwrap();

    let mut standalone = Node::new("standalone", "", Port(1));
    optreg::apply_all(&mut standalone, &[alias("s"), secret()]);
    registry.register(standalone).unwrap();

    Resolver::new()
        .with_source(FlagSource::parse(["--compression=zstd", "--admin.port=0", "-s", "22"]).unwrap())
        .resolve(&registry)
        .unwrap_err();

    assert_eq!(compression.get(), Compression::Zstd);
    assert_eq!(
        registry.with_node("admin.port", |node| node.value().to_string()).unwrap(),
        "9000"
    );
    assert_eq!(source_of(&registry, "admin.port"), "default");
    assert_eq!(
        registry.with_node("s", |node| (node.value().to_string(), node.is_secret())).unwrap(),
        ("22".to_string(), true)
    );
    assert!(show(&registry).contains("compression  zstd"));
}


#[test]
fn independent_registries_do_not_interfere() {
    let mut first = Registry::new();
    let mut second = Registry::new();

    first.int("port", 1, "", &[]).unwrap();
    second.int("port", 2, "", &[]).unwrap();

    assert_eq!(first.with_node("port", |node| node.value().to_string()).unwrap(), "1");
    assert_eq!(second.with_node("port", |node| node.value().to_string()).unwrap(), "2");
}

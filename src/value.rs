//! The value contract every option type implements, and the built-in option types.
//!
//! A [`Value`] only has to know how to parse itself from a string and how to
//! name its own type. The registry never inspects concrete types; anything
//! implementing [`Value`] can be declared.
//!
//! Most option types don't implement [`Value`] by hand. Implementing
//! [`OptionType`] for a plain Rust type is enough: [`Typed`] adapts it and
//! shares its state with the [`Opt`] handle returned to the declaring caller.

use std::{fmt, sync::Arc, time::Duration};

use parking_lot::RwLock;

use crate::error::ValueError;



/// Capability implemented by all configuration option values.
///
/// [`Display`][fmt::Display] is the value's string form, used when the
/// resolved table is rendered.
pub trait Value: fmt::Display + Send + Sync {
    /// Parse `raw` into the value's internal state.
    ///
    /// On error the previous state must still be readable; implementations
    /// in this crate leave it untouched.
    fn set(&mut self, raw: &str) -> Result<(), ValueError>;

    /// Stable type tag used for documentation and introspection (e.g. `"int"`).
    fn type_name(&self) -> &'static str;
}


/// A plain Rust type that can back a configuration option through [`Typed`].
pub trait OptionType: Clone + Send + Sync + 'static {
    const TYPE_NAME: &'static str;

    fn parse_option(raw: &str) -> Result<Self, String>;

    fn render_option(&self) -> String;
}


/// Read handle to a declared option's current value.
///
/// Cloning the handle is cheap; all clones observe the same value.
pub struct Opt<T> {
    cell: Arc<RwLock<T>>,
}

impl<T> Clone for Opt<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Clone> Opt<T> {
    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.cell.read().clone()
    }

    /// Runs `reader` against the current value without cloning it.
    pub fn with<R, F>(&self, reader: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        reader(&self.cell.read())
    }
}

impl<T: fmt::Debug> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opt").field(&*self.cell.read()).finish()
    }
}


/// [`Value`] adapter for any [`OptionType`].
pub struct Typed<T> {
    cell: Arc<RwLock<T>>,
}

impl<T: OptionType> Typed<T> {
    /// Creates the value holding `default`, together with the caller's read handle.
    pub fn new(default: T) -> (Self, Opt<T>) {
        let cell = Arc::new(RwLock::new(default));

        (
            Self {
                cell: Arc::clone(&cell),
            },
            Opt { cell },
        )
    }
}

impl<T: OptionType> Value for Typed<T> {
    fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        // Parse fully before taking the lock so a bad string never touches the state.
        let parsed =
            T::parse_option(raw).map_err(|reason| ValueError::new(raw, T::TYPE_NAME, reason))?;

        *self.cell.write() = parsed;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }
}

impl<T: OptionType> fmt::Display for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cell.read().render_option())
    }
}



impl OptionType for i64 {
    const TYPE_NAME: &'static str = "int";

    fn parse_option(raw: &str) -> Result<Self, String> {
        raw.trim().parse::<i64>().map_err(|error| error.to_string())
    }

    fn render_option(&self) -> String {
        self.to_string()
    }
}

impl OptionType for u64 {
    const TYPE_NAME: &'static str = "uint";

    fn parse_option(raw: &str) -> Result<Self, String> {
        raw.trim().parse::<u64>().map_err(|error| error.to_string())
    }

    fn render_option(&self) -> String {
        self.to_string()
    }
}

impl OptionType for f64 {
    const TYPE_NAME: &'static str = "float";

    fn parse_option(raw: &str) -> Result<Self, String> {
        raw.trim().parse::<f64>().map_err(|error| error.to_string())
    }

    fn render_option(&self) -> String {
        self.to_string()
    }
}

impl OptionType for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_option(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err("expected one of true/false, 1/0, yes/no, on/off".to_string()),
        }
    }

    fn render_option(&self) -> String {
        self.to_string()
    }
}

impl OptionType for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_option(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render_option(&self) -> String {
        self.clone()
    }
}

/// Comma-separated list. Surrounding whitespace and empty entries are dropped.
impl OptionType for Vec<String> {
    const TYPE_NAME: &'static str = "strings";

    fn parse_option(raw: &str) -> Result<Self, String> {
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn render_option(&self) -> String {
        self.join(",")
    }
}

/// Human-friendly spans such as `30s`, `250ms` or `1h 30m`.
impl OptionType for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse_option(raw: &str) -> Result<Self, String> {
        humantime::parse_duration(raw.trim()).map_err(|error| error.to_string())
    }

    fn render_option(&self) -> String {
        humantime::format_duration(*self).to_string()
    }
}

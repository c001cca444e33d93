//! Helper functions available to every template.
//!
//! Each helper is installed both as a global function and as a filter, so
//! `{{ snake_case(project) }}` and `{{ project | snake_case }}` are the same.

use cruet::Inflector;
use indexmap::IndexMap;
use minijinja::value::{Rest, Value};
use minijinja::{Environment, Error, ErrorKind};
use regex::Regex;
use std::sync::Arc;

/// A helper callable: variadic template values in, one value out.
pub type Helper = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

/// Ordered mapping from helper name to callable.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    helpers: IndexMap<String, Helper>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.into())
}

fn string_arg<'a>(name: &str, args: &'a [Value], index: usize) -> Result<&'a str, Error> {
    args.get(index)
        .and_then(|value| value.as_str())
        .ok_or_else(|| invalid(format!("{name}() expects a string as argument {}", index + 1)))
}

fn text_helper(name: &'static str, convert: fn(&str) -> String) -> Helper {
    Arc::new(move |args: &[Value]| {
        if args.len() != 1 {
            return Err(invalid(format!("{name}() takes exactly one argument")));
        }
        Ok(Value::from(convert(string_arg(name, args, 0)?)))
    })
}

fn regex_replace(args: &[Value]) -> Result<Value, Error> {
    if args.len() != 3 {
        return Err(invalid("regex_replace() takes a value, a pattern and a replacement"));
    }
    let value = string_arg("regex_replace", args, 0)?;
    let pattern = string_arg("regex_replace", args, 1)?;
    let replacement = string_arg("regex_replace", args, 2)?;
    let regex = Regex::new(pattern)
        .map_err(|e| invalid(format!("regex_replace(): invalid pattern '{pattern}': {e}")))?;
    Ok(Value::from(regex.replace_all(value, replacement).into_owned()))
}

fn env_var(args: &[Value]) -> Result<Value, Error> {
    let name = string_arg("env", args, 0)?;
    match (std::env::var(name), args.get(1)) {
        (Ok(value), _) => Ok(Value::from(value)),
        (Err(_), Some(default)) => Ok(default.clone()),
        (Err(_), None) => Err(invalid(format!("environment variable '{name}' is not set"))),
    }
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with kiln's standard helpers.
    pub fn with_helpers() -> Self {
        let mut registry = Self::new();
        registry.insert("snake_case", text_helper("snake_case", |s| s.to_snake_case()));
        registry.insert("camel_case", text_helper("camel_case", |s| s.to_camel_case()));
        registry.insert("pascal_case", text_helper("pascal_case", |s| s.to_pascal_case()));
        registry.insert("kebab_case", text_helper("kebab_case", |s| s.to_kebab_case()));
        registry.insert(
            "screaming_snake_case",
            text_helper("screaming_snake_case", |s| s.to_screaming_snake_case()),
        );
        registry.insert("title_case", text_helper("title_case", |s| s.to_title_case()));
        registry.insert("plural", text_helper("plural", |s| s.to_plural()));
        registry.insert("singular", text_helper("singular", |s| s.to_singular()));
        registry.insert("regex_replace", Arc::new(regex_replace));
        registry.insert("env", Arc::new(env_var));
        registry
    }

    /// Adds or replaces a helper.
    pub fn insert<S: Into<String>>(&mut self, name: S, helper: Helper) -> Option<Helper> {
        self.helpers.insert(name.into(), helper)
    }

    /// Registers every helper as a function and a filter on `env`.
    pub fn install(&self, env: &mut Environment<'static>) {
        for (name, helper) in &self.helpers {
            let function = Arc::clone(helper);
            env.add_function(name.clone(), move |args: Rest<Value>| function(args.as_slice()));
            let filter = Arc::clone(helper);
            env.add_filter(name.clone(), move |args: Rest<Value>| filter(args.as_slice()));
        }
    }
}

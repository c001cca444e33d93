//! User input handling.
//! The [`Prompter`] trait is the seam between the binder and whatever asks the
//! user; [`DialoguerPrompter`] is the terminal implementation.

use crate::context::ContextValue;
use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Select};
use serde_json::Value;

/// Asks the user for context values.
pub trait Prompter: Send + Sync {
    /// Asks for the value of a leaf `key`, seeded with its current value.
    ///
    /// For a sequence the answer should be one of its items.
    fn prompt_value(&self, key: &str, seed: &ContextValue) -> Result<Value>;

    /// Asks whether the group named `key` should be customized at all.
    fn confirm(&self, key: &str, default: bool) -> Result<bool>;
}

/// Terminal prompter built on dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn prompt_error(key: &str, err: dialoguer::Error) -> Error {
    Error::Prompt { key: key.to_string(), reason: err.to_string() }
}

/// Renders a JSON value the way a user would type it.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn ask_yes_no(key: &str, prompt: String, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| prompt_error(key, e))
}

fn prompt_text(key: &str, default: &Value) -> Result<Value> {
    let mut input = Input::<String>::new().with_prompt(key).allow_empty(true);
    let default_text = display_value(default);
    if !default_text.is_empty() {
        input = input.default(default_text);
    }
    let answer = input.interact_text().map_err(|e| prompt_error(key, e))?;

    // Numbers stay numbers when the user types one
    Ok(match default {
        Value::Number(_) => {
            serde_json::from_str::<serde_json::Number>(answer.trim())
                .map(Value::Number)
                .unwrap_or(Value::String(answer))
        }
        _ => Value::String(answer),
    })
}

impl Prompter for DialoguerPrompter {
    fn prompt_value(&self, key: &str, seed: &ContextValue) -> Result<Value> {
        match seed {
            ContextValue::Sequence { default, alternatives } => {
                let items: Vec<&Value> = std::iter::once(default).chain(alternatives).collect();
                let labels: Vec<String> = items.iter().map(|item| display_value(item)).collect();
                let selection = Select::new()
                    .with_prompt(key)
                    .default(0)
                    .items(&labels)
                    .interact()
                    .map_err(|e| prompt_error(key, e))?;
                Ok(items[selection].clone())
            }
            ContextValue::Scalar(Value::Bool(default)) => {
                Ok(Value::Bool(ask_yes_no(key, key.to_string(), *default)?))
            }
            ContextValue::Scalar(default) => prompt_text(key, default),
            ContextValue::Group(_) => Err(Error::Prompt {
                key: key.to_string(),
                reason: "groups have no value to ask for".to_string(),
            }),
        }
    }

    fn confirm(&self, key: &str, default: bool) -> Result<bool> {
        ask_yes_no(key, format!("Customize {key}?"), default)
    }
}

#![allow(dead_code)]

use kiln::context::ContextValue;
use kiln::error::{Error, Result};
use kiln::prompt::Prompter;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Answers prompts from a script and records every question asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    values: HashMap<String, Value>,
    gates: HashMap<String, bool>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn open(mut self, group: &str, open: bool) -> Self {
        self.gates.insert(group.to_string(), open);
        self
    }

    /// Questions asked so far, as `value:<key>` or `gate:<group>`.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt_value(&self, key: &str, seed: &ContextValue) -> Result<Value> {
        self.asked.lock().unwrap().push(format!("value:{key}"));
        Ok(self
            .values
            .get(key)
            .cloned()
            .or_else(|| seed.default_value().cloned())
            .unwrap_or(Value::Null))
    }

    fn confirm(&self, key: &str, default: bool) -> Result<bool> {
        self.asked.lock().unwrap().push(format!("gate:{key}"));
        Ok(self.gates.get(key).copied().unwrap_or(default))
    }
}

/// Fails every prompt, like a closed terminal.
pub struct FailingPrompter;

impl Prompter for FailingPrompter {
    fn prompt_value(&self, key: &str, _seed: &ContextValue) -> Result<Value> {
        Err(Error::Prompt { key: key.to_string(), reason: "not a terminal".to_string() })
    }

    fn confirm(&self, key: &str, _default: bool) -> Result<bool> {
        Err(Error::Prompt { key: key.to_string(), reason: "not a terminal".to_string() })
    }
}

/// Lays out a template directory: `project.json` plus files under `template/`.
pub fn write_template(root: &Path, context: &Value, files: &[(&str, &str)]) {
    std::fs::create_dir_all(root.join("template")).unwrap();
    std::fs::write(root.join("project.json"), serde_json::to_string_pretty(context).unwrap())
        .unwrap();
    for (name, content) in files {
        let path = root.join("template").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

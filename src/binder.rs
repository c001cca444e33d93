//! Binding a context to prompts.
//!
//! [`BoundContext`] turns a [`Context`] into the object templates evaluate
//! against. Every leaf key becomes a lazily resolved variable: the first
//! lookup decides its value (default, or an interactive prompt when the
//! enclosing group's [`Gate`] opens), writes the answer back into the context
//! and memoizes it for the rest of the render.

use crate::constants::DELIMS_KEY;
use crate::context::{Context, ContextValue};
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use indexmap::IndexMap;
use log::debug;
use minijinja::value::{Object, Value as TemplateValue};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type GateId = usize;

const ROOT_GATE: GateId = 0;

/// Decides whether the leaves of a group are prompted for.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Already answered.
    Decided(bool),
    /// Asked on first use, only if the parent gate is open.
    Pending { group: String, parent: GateId },
}

#[derive(Debug)]
struct Binding {
    /// Group keys leading from the root to the leaf's map
    group_path: Vec<String>,
    gate: GateId,
    resolved: Option<Value>,
}

struct BinderState {
    context: Context,
    bindings: IndexMap<String, Binding>,
    gates: Vec<Gate>,
    use_defaults: bool,
    prompter: Arc<dyn Prompter>,
    failure: Option<Error>,
}

/// Shared handle to a context whose leaves resolve on demand.
///
/// Clones refer to the same state, so one clone can be handed to the
/// template engine while another reads the final context afterwards.
#[derive(Clone)]
pub struct BoundContext {
    state: Arc<Mutex<BinderState>>,
}

impl std::fmt::Debug for BoundContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never block here: the engine may format the object mid-lookup.
        f.debug_struct("BoundContext").finish_non_exhaustive()
    }
}

fn bind_group(
    context: &Context,
    group_path: &mut Vec<String>,
    gate: GateId,
    bindings: &mut IndexMap<String, Binding>,
    gates: &mut Vec<Gate>,
) {
    for (key, value) in context {
        if group_path.is_empty() && key == DELIMS_KEY {
            continue;
        }
        match value {
            ContextValue::Group(group) => {
                gates.push(Gate::Pending { group: key.clone(), parent: gate });
                let child = gates.len() - 1;
                group_path.push(key.clone());
                bind_group(group, group_path, child, bindings, gates);
                group_path.pop();
            }
            _ => {
                if bindings.contains_key(key) {
                    debug!("Leaf '{key}' shadows an earlier leaf with the same name");
                }
                bindings.insert(
                    key.clone(),
                    Binding { group_path: group_path.clone(), gate, resolved: None },
                );
            }
        }
    }
}

impl BinderState {
    fn group(&self, group_path: &[String]) -> Option<&Context> {
        let mut context = &self.context;
        for group in group_path {
            match context.get(group)? {
                ContextValue::Group(inner) => context = inner,
                _ => return None,
            }
        }
        Some(context)
    }

    fn group_mut(&mut self, group_path: &[String]) -> Option<&mut Context> {
        let mut context = &mut self.context;
        for group in group_path {
            match context.get_mut(group)? {
                ContextValue::Group(inner) => context = inner,
                _ => return None,
            }
        }
        Some(context)
    }

    fn is_open(&mut self, id: GateId) -> Result<bool> {
        let (group, parent) = match &self.gates[id] {
            Gate::Decided(open) => return Ok(*open),
            Gate::Pending { group, parent } => (group.clone(), *parent),
        };

        let open = self.is_open(parent)? && self.prompter.confirm(&group, false)?;
        debug!("Group '{group}' is {}", if open { "customized" } else { "left at defaults" });
        self.gates[id] = Gate::Decided(open);
        Ok(open)
    }

    fn resolve(&mut self, key: &str) -> Result<Option<Value>> {
        let (group_path, gate) = match self.bindings.get(key) {
            None => return Ok(None),
            Some(Binding { resolved: Some(value), .. }) => return Ok(Some(value.clone())),
            Some(binding) => (binding.group_path.clone(), binding.gate),
        };

        let Some(current) = self.group(&group_path).and_then(|group| group.get(key)).cloned()
        else {
            return Ok(None);
        };
        let default = current.default_value().cloned().unwrap_or(Value::Null);

        let value = if self.use_defaults || !self.is_open(gate)? {
            default
        } else {
            self.prompter.prompt_value(key, &current)?
        };

        if let Some(group) = self.group_mut(&group_path) {
            group.insert(key, current.with_answer(value.clone()));
        }
        if let Some(binding) = self.bindings.get_mut(key) {
            binding.resolved = Some(value.clone());
        }
        Ok(Some(value))
    }
}

impl BoundContext {
    /// Binds every leaf of `context`.
    ///
    /// # Arguments
    /// * `context` - The merged context to resolve against
    /// * `prompter` - Asks the user for values and group gates
    /// * `use_defaults` - Never prompt; every leaf resolves to its default
    pub fn bind(context: Context, prompter: Arc<dyn Prompter>, use_defaults: bool) -> Self {
        let mut bindings = IndexMap::new();
        let mut gates = vec![Gate::Decided(true)];
        bind_group(&context, &mut Vec::new(), ROOT_GATE, &mut bindings, &mut gates);
        debug!("Bound {} context keys", bindings.len());

        let state = BinderState { context, bindings, gates, use_defaults, prompter, failure: None };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    fn lock(&self) -> MutexGuard<'_, BinderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves a leaf, prompting if needed.
    ///
    /// Returns `Ok(None)` for names that are not bound leaves.
    pub fn resolve(&self, key: &str) -> Result<Option<Value>> {
        self.lock().resolve(key)
    }

    /// The template engine's view of this context.
    pub fn to_value(&self) -> TemplateValue {
        TemplateValue::from_object(self.clone())
    }

    /// Takes the first prompt failure raised during a template lookup.
    pub fn take_failure(&self) -> Option<Error> {
        self.lock().failure.take()
    }

    /// Returns the context including every answer given so far.
    pub fn snapshot(&self) -> Context {
        self.lock().context.clone()
    }
}

impl Object for BoundContext {
    fn get_value(self: &Arc<Self>, key: &TemplateValue) -> Option<TemplateValue> {
        let key = key.as_str()?;
        let mut state = self.lock();
        match state.resolve(key) {
            Ok(value) => value.map(|value| TemplateValue::from_serialize(&value)),
            Err(err) => {
                // The engine only sees an undefined value; keep the real cause.
                state.failure.get_or_insert(err);
                None
            }
        }
    }
}

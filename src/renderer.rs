//! Template renderer and rendering functionality for kiln.
//! Wraps a MiniJinja environment configured with strict undefined handling,
//! the helper registry and the template's delimiter override.

use crate::constants::DELIMS_KEY;
use crate::context::Delimiters;
use crate::error::{Error, Result};
use crate::functions::FunctionRegistry;
use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `name` - Name reported in errors
    /// * `template` - Template string to render
    /// * `context` - Value variables are resolved against
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, name: &str, template: &str, context: &Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
#[derive(Debug)]
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the given helpers and optional delimiters.
    ///
    /// # Errors
    /// * `Error::TemplateParse` if the engine rejects the delimiters
    pub fn new(functions: &FunctionRegistry, delimiters: Option<&Delimiters>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        functions.install(&mut env);

        if let Some(Delimiters { left, right }) = delimiters {
            // Blocks and comments are marked by the same pair plus `%` or `#`,
            // so `<%`/`%>` gives `<%% if x %%>` and `<%# note #%>`.
            let syntax = SyntaxConfig::builder()
                .variable_delimiters(left.clone(), right.clone())
                .block_delimiters(format!("{left}%"), format!("%{right}"))
                .comment_delimiters(format!("{left}#"), format!("#{right}"))
                .build()
                .map_err(|source| Error::TemplateParse {
                    template: DELIMS_KEY.to_string(),
                    source,
                })?;
            env.set_syntax(syntax);
        }

        Ok(Self { env })
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// Every call compiles a separate template, so a file name and the file's
    /// contents never share template state.
    ///
    /// # Errors
    /// * `Error::TemplateParse` if the template is not valid syntax
    /// * `Error::TemplateRender` for undefined variables and helper failures
    fn render(&self, name: &str, template: &str, context: &Value) -> Result<String> {
        self.env
            .render_named_str(name, template, context)
            .map_err(|e| Error::from_template(name, e))
    }
}

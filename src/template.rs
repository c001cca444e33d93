//! The template handle.
//!
//! A template directory holds a declared context (`project.json`), optional
//! metadata (`__metadata.json`) and the tree to render (`template/`).
//! [`Template`] ties context loading, prompt binding and directory rendering
//! together for one execution.

use crate::binder::BoundContext;
use crate::constants::{CONTEXT_FILE, LOCAL_CONTEXT_FILE, METADATA_FILE, TEMPLATE_DIR};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::functions::FunctionRegistry;
use crate::metadata::Metadata;
use crate::processor::{Processor, RenderReport};
use crate::prompt::{DialoguerPrompter, Prompter};
use crate::renderer::MiniJinjaRenderer;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded template, ready to execute.
pub struct Template {
    root: PathBuf,
    context: Context,
    metadata: Metadata,
    functions: FunctionRegistry,
    prompter: Arc<dyn Prompter>,
    use_defaults: bool,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("root", &self.root)
            .field("metadata", &self.metadata)
            .field("use_defaults", &self.use_defaults)
            .finish_non_exhaustive()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .map_err(|source| Error::PathResolution { path: path.to_path_buf(), source })
}

impl Template {
    /// Loads a template directory.
    ///
    /// # Errors
    /// * `Error::PathResolution` if `path` cannot be made absolute
    /// * `Error::TemplateNotFound` if the directory or its `template/` subtree is missing
    /// * `Error::ContextRead` / `Error::MetadataRead` for malformed files
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = absolute(path.as_ref())?;
        if !root.join(TEMPLATE_DIR).is_dir() {
            return Err(Error::TemplateNotFound { template_dir: root.display().to_string() });
        }

        let context = Context::load(root.join(CONTEXT_FILE))?.unwrap_or_default();
        let metadata = Metadata::load(root.join(METADATA_FILE))?.unwrap_or_default();
        debug!("Loaded template {} with {} context keys", root.display(), context.len());

        Ok(Self {
            root,
            context,
            metadata,
            functions: FunctionRegistry::with_helpers(),
            prompter: Arc::new(DialoguerPrompter::new()),
            use_defaults: false,
        })
    }

    /// Replaces the helper functions templates can call.
    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// Replaces the prompter used for interactive answers.
    pub fn with_prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// From now on, never prompt: every key takes its default or saved value.
    pub fn use_defaults(&mut self) {
        self.use_defaults = true;
    }

    pub fn info(&self) -> &Metadata {
        &self.metadata
    }

    /// The declared context as loaded from the template.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Renders the template into `output_dir`.
    ///
    /// Saved answers from a previous run in `output_dir` pre-fill the
    /// context. The answers used are saved back only when every file
    /// rendered; a failed run leaves the saved answers untouched.
    pub fn execute<P: AsRef<Path>>(&self, output_dir: P) -> Result<RenderReport> {
        let output_root = absolute(output_dir.as_ref())?;
        let local_context = output_root.join(LOCAL_CONTEXT_FILE);

        let mut context = self.context.clone();
        if let Some(saved) = Context::load(&local_context)? {
            debug!("Merging saved answers from {}", local_context.display());
            context.merge(saved);
        }

        let engine = MiniJinjaRenderer::new(&self.functions, context.delimiters().as_ref())?;
        let bound = BoundContext::bind(context, Arc::clone(&self.prompter), self.use_defaults);

        let template_root = self.root.join(TEMPLATE_DIR);
        let report = Processor::new(&engine, &bound, &template_root, &output_root)
            .announce_created(!self.use_defaults)
            .run()?;

        bound.snapshot().save(&local_context)?;
        Ok(report)
    }
}

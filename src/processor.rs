//! Directory rendering.
//!
//! Walks a template tree depth-first, renders every path and every file's
//! contents, and materializes the result under an output directory. Files
//! whose contents render to nothing but whitespace are not written.

use crate::binder::BoundContext;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// What a render produced, relative to the output directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Files written
    pub created: Vec<PathBuf>,
    /// Files whose contents were whitespace only and were left out
    pub discarded: Vec<PathBuf>,
}

/// Checks that a rendered path stays inside the output directory.
pub fn is_rendered_path_safe(rendered: &str) -> bool {
    Path::new(rendered)
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// True when `content` is empty or holds only ASCII whitespace
/// (space, tab, newline, carriage return, form feed).
pub fn is_only_whitespace(content: &str) -> bool {
    content.bytes().all(|byte| byte.is_ascii_whitespace())
}

fn create_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path) {
        Err(e) if e.kind() != ErrorKind::AlreadyExists => Err(Error::filesystem(path, e)),
        _ => Ok(()),
    }
}

fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(Error::filesystem(path, e)),
        _ => Ok(()),
    }
}

/// Renders a template tree into an output directory.
pub struct Processor<'a> {
    engine: &'a dyn TemplateRenderer,
    context: &'a BoundContext,
    template_root: &'a Path,
    output_root: &'a Path,
    announce: bool,
}

impl<'a> Processor<'a> {
    pub fn new(
        engine: &'a dyn TemplateRenderer,
        context: &'a BoundContext,
        template_root: &'a Path,
        output_root: &'a Path,
    ) -> Self {
        Self { engine, context, template_root, output_root, announce: false }
    }

    /// Prints "Created <file>" for every file as it is written.
    pub fn announce_created(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    /// Renders through the engine, preferring a prompt failure over the
    /// undefined-value error it causes.
    fn render(&self, name: &str, template: &str) -> Result<String> {
        let result = self.engine.render(name, template, &self.context.to_value());
        match self.context.take_failure() {
            Some(failure) => Err(failure),
            None => result,
        }
    }

    /// Renders every component of a source path on its own. Returns `None`
    /// when any component renders to whitespace only.
    fn render_path(&self, relative: &Path) -> Result<Option<String>> {
        let name = format!("{} (name)", relative.display());
        let mut parts = Vec::new();
        for component in relative.components() {
            let part = self.render(&name, &component.as_os_str().to_string_lossy())?;
            if is_only_whitespace(&part) {
                return Ok(None);
            }
            parts.push(part);
        }
        Ok(Some(parts.join("/")))
    }

    /// Walks the whole tree. The first error aborts the walk; anything
    /// written before it stays on disk.
    pub fn run(&self) -> Result<RenderReport> {
        debug!("Rendering {} into {}", self.template_root.display(), self.output_root.display());
        fs::create_dir_all(self.output_root)
            .map_err(|e| Error::filesystem(self.output_root, e))?;

        let mut report = RenderReport::default();
        let mut walker = WalkDir::new(self.template_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.template_root).to_path_buf();
                Error::filesystem(path, e.into())
            })?;
            let source = entry.path();
            let relative = source
                .strip_prefix(self.template_root)
                .map_err(|_| Error::UnsafePath { rendered: source.display().to_string() })?;

            debug!("Processing source entry: {}", relative.display());
            let Some(rendered) = self.render_path(relative)? else {
                debug!("Skipping {}: a name component rendered empty", relative.display());
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            };
            if !is_rendered_path_safe(&rendered) {
                return Err(Error::UnsafePath { rendered });
            }

            let target = self.output_root.join(&rendered);
            if entry.file_type().is_dir() {
                debug!("Creating directory {}", target.display());
                create_dir(&target)?;
            } else if self.process_file(source, &relative.to_string_lossy(), &target)? {
                if self.announce {
                    println!("Created {rendered}");
                }
                report.created.push(PathBuf::from(rendered));
            } else {
                report.discarded.push(PathBuf::from(rendered));
            }
        }

        Ok(report)
    }

    /// Renders one file. Returns false when nothing was written.
    fn process_file(&self, source: &Path, name: &str, target: &Path) -> Result<bool> {
        remove_file(target)?;

        let bytes = fs::read(source).map_err(|e| Error::filesystem(source, e))?;
        let content = match String::from_utf8(bytes) {
            Ok(template) => {
                let content = self.render(name, &template)?;
                if is_only_whitespace(&content) {
                    debug!("Discarding {}: rendered to whitespace only", target.display());
                    return Ok(false);
                }
                content.into_bytes()
            }
            Err(e) => {
                debug!("Copying binary file {name} without rendering");
                e.into_bytes()
            }
        };

        debug!("Writing file: {}", target.display());
        fs::write(target, content).map_err(|e| Error::filesystem(target, e))?;
        let permissions = fs::metadata(source)
            .map_err(|e| Error::filesystem(source, e))?
            .permissions();
        fs::set_permissions(target, permissions).map_err(|e| Error::filesystem(target, e))?;
        Ok(true)
    }
}

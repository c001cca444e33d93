//! Error handling for kiln.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// All the ways loading or executing a template can fail.
///
/// Absent context and metadata files are not errors; they are reported as
/// `None` by the loaders instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The template or destination path could not be made absolute.
    #[error("Cannot resolve path '{path}': {source}.")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template directory, or its template subtree, does not exist.
    #[error("Template '{template_dir}' does not exist.")]
    TemplateNotFound { template_dir: String },

    /// A context file exists but could not be read or decoded.
    #[error("Failed to read context file '{path}': {reason}.")]
    ContextRead { path: PathBuf, reason: String },

    /// The metadata file exists but could not be read or decoded.
    #[error("Failed to read metadata file '{path}': {reason}.")]
    MetadataRead { path: PathBuf, reason: String },

    /// A name or content template is not valid template syntax.
    #[error("Failed to parse template '{template}': {source}.")]
    TemplateParse {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    /// A template parsed but failed while rendering.
    #[error("Failed to render template '{template}': {source}.")]
    TemplateRender {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    /// A filesystem operation on the destination tree failed.
    #[error("IO error on '{path}': {source}.")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A rendered path would escape the destination root.
    #[error("Rendered path '{rendered}' escapes the output directory.")]
    UnsafePath { rendered: String },

    /// The final context could not be persisted.
    #[error("Failed to write context file '{path}': {reason}.")]
    ContextWrite { path: PathBuf, reason: String },

    /// The interactive prompt failed.
    #[error("Prompt for '{key}' failed: {reason}.")]
    Prompt { key: String, reason: String },
}

impl Error {
    /// Wraps an IO error together with the path it happened on.
    pub fn filesystem<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::Filesystem { path: path.into(), source }
    }

    /// Classifies an engine error as a parse or render failure.
    pub fn from_template<S: Into<String>>(template: S, source: minijinja::Error) -> Self {
        let template = template.into();
        match source.kind() {
            minijinja::ErrorKind::SyntaxError => Error::TemplateParse { template, source },
            _ => Error::TemplateRender { template, source },
        }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}

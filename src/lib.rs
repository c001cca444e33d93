//! kiln renders a directory of templates into a project skeleton.
//! Values come from interactive prompts or saved defaults, and the answers
//! used are saved next to the output so a later run can reuse them.

/// Prompt binding: lazily resolved context keys and group gates
pub mod binder;

/// Command-line interface module for the kiln binary
pub mod cli;

/// File names and reserved keys
pub mod constants;

/// Context model, loading, merging and saving
pub mod context;

/// Error types and handling
pub mod error;

/// Helper functions templates can call
pub mod functions;

/// Logger setup for the binary
pub mod logger;

/// Descriptive template metadata
pub mod metadata;

/// Directory walking and file materialization
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// MiniJinja environment wrapper
pub mod renderer;

/// The template handle tying everything together
pub mod template;

pub use template::Template;

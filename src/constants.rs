//! Common constants used throughout kiln.

/// Declared context file at the template root
pub const CONTEXT_FILE: &str = "project.json";

/// Optional descriptive metadata at the template root
pub const METADATA_FILE: &str = "__metadata.json";

/// Directory holding the files to render, relative to the template root
pub const TEMPLATE_DIR: &str = "template";

/// Saved answers written at the root of a rendered destination
pub const LOCAL_CONTEXT_FILE: &str = ".kiln.json";

/// Reserved context key overriding the variable delimiters
pub const DELIMS_KEY: &str = "_delims_";

//! Command-line interface implementation for kiln.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for kiln.
#[derive(Parser, Debug)]
#[command(author, version, about = "kiln: render a template directory into a new project", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Directory where the project will be rendered
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Do not prompt; use declared or previously saved values
    #[arg(short = 'd', long)]
    pub use_defaults: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let mut command = Args::command().help_template(
                    r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                );
                // Nothing sensible to do if stdout is gone
                let _ = command.print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

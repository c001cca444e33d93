//! kiln's entry point: parses arguments, loads the template and renders it.

use kiln::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    logger::init_logger,
    Template,
};

fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let mut template = Template::load(&args.template)?;
    if let Some(name) = &template.info().name {
        println!("Using template '{name}'");
    }
    if args.use_defaults {
        template.use_defaults();
    }

    let report = template.execute(&args.output_dir)?;
    println!(
        "Rendered {} files into {}.",
        report.created.len(),
        args.output_dir.display()
    );
    Ok(())
}

/// Initializes env_logger: debug output with `verbose`, warnings otherwise.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn })
        .init();
}

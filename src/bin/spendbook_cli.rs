use spendbook::cli::run_cli;
use spendbook::init_with_filter;
use spendbook_config::{Config, ConfigManager};

fn main() {
    // Log directives come from the config file, read before the shell opens it.
    let filter = ConfigManager::with_base_dir(Config::default_home())
        .and_then(|manager| manager.load())
        .ok()
        .and_then(|config| config.log_filter);
    init_with_filter(filter.as_deref());

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

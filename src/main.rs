use colored::Colorize;
use tourai::{cli::run_cli, config::load_config, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_filter = logging::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", format!("Invalid configuration: {}", e).red());
            return Err(Box::new(e));
        }
    };

    if config.debug && std::env::var_os("RUST_LOG").is_none() {
        logging::set_debug(&log_filter)?;
    }

    tracing::debug!(endpoint = %config.endpoint, timeout_secs = config.timeout_secs, "configuration loaded");
    run_cli(config)
}

use std::process;

use log::error;
use tracing_subscriber::EnvFilter;

use elevator_dispatch::modules;
use elevator_dispatch::utilities::config::Config;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // READ CONFIGURATION
    let config = match Config::get() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        },
    };

    if let Err(e) = modules::run(config) {
        error!("Simulation failed: {}", e);
        process::exit(1);
    }
}

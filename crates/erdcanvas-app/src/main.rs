//! Main application entry point (native).

use clap::Parser;
use erdcanvas_app::AppConfig;

fn main() {
    env_logger::init();
    log::info!("Starting ErdCanvas");

    // Usage errors exit with status 2 from clap.
    let config = AppConfig::parse();

    match erdcanvas_app::run(&config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

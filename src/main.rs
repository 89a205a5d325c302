mod backend;
mod core;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;
use orbit::BackendKind;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "orbit", about = "Terminal client for circle presence sharing")]
struct Args {
    /// Backend to connect to (overrides config file)
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to orbit.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("orbit.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match core::config::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Config unusable ({e}), falling back to defaults");
            core::config::OrbitConfig::default()
        }
    };
    let resolved = core::config::resolve(&file_config, args.backend.as_ref().map(BackendKind::as_str));

    log::info!("Orbit starting up with backend: {}", resolved.backend);

    tui::run(resolved)
}

mod app;
mod session;
mod ui;

use std::path::Path;

use trace_oxide::DisplayConfig;
use trace_oxide::constants::config::CONFIG_FILE;

use app::DriverDisplay;

/// Start the puffin server so `puffin_viewer` can attach
#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    let address = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&address) {
        Ok(server) => {
            log::info!("Puffin server listening on {address}");
            Some(server)
        }
        Err(e) => {
            log::warn!("Failed to start puffin server: {e}");
            None
        }
    }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = start_puffin_server();

    let config = DisplayConfig::load_or_default(Path::new(CONFIG_FILE));
    log::info!(
        "Throttling requests every {} ms, {} samples per trace",
        config.throttle_interval_ms,
        config.data_request_sample_count
    );

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "trace-oxide - Driver Display",
        options,
        Box::new(|cc| Ok(Box::new(DriverDisplay::new(cc, config)))),
    )
}

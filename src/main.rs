#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use anyhow::Context;
use std::net::SocketAddr;
use tokio::sync::watch;
use zipwhip_webhooks::config::Config;
use zipwhip_webhooks::{App, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry)?;

    zipwhip_webhooks::setup_panic_hook();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    zipwhip_webhooks::spawn_signal_handler(shutdown_tx);

    let app = App::new(&config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to bind listener");
            return Err(e).with_context(|| format!("failed to bind {addr}"));
        }
    };

    tracing::info!(address = %addr, "Server listening");

    app.serve(listener, shutdown_rx).await
}

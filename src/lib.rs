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

use crate::config::Config;
use crate::services::decoder::DecodeDispatcher;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

/// The wired-up receiver: the HTTP router plus the dispatcher its handlers spawn decode tasks on.
#[derive(Debug)]
pub struct App {
    pub router: axum::Router,
    pub dispatcher: DecodeDispatcher,
    pub shutdown_timeout: Duration,
}

impl App {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let dispatcher = DecodeDispatcher::new();
        let router = api::app_router(config.webhook.clone(), dispatcher.clone());
        Self { router, dispatcher, shutdown_timeout: Duration::from_secs(config.server.shutdown_timeout_secs) }
    }

    /// Serves until `shutdown_rx` flips to `true`, then gives in-flight decode tasks up to
    /// `shutdown_timeout` to finish.
    ///
    /// # Errors
    /// Returns an error if the server fails while accepting connections.
    pub async fn serve(self, listener: TcpListener, mut shutdown_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|&s| s).await;
            })
            .await?;

        tokio::select! {
            () = self.dispatcher.drain() => {
                tracing::info!("Decode tasks finished.");
            }
            () = tokio::time::sleep(self.shutdown_timeout) => {
                tracing::warn!(in_flight = self.dispatcher.in_flight(), "Timeout waiting for decode tasks to finish.");
            }
        }

        Ok(())
    }
}

/// Flips `shutdown_tx` to `true` on Ctrl-C or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }

        tracing::info!("Shutdown signal received, draining...");
        let _ = shutdown_tx.send(true);
    });
}

/// Routes panics (including ones inside decode tasks) through `tracing` before the default hook runs.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Panic occurred");
        default_hook(info);
    }));
}

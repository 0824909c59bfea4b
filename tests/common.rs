#![allow(dead_code)]
use clap::Parser;
use std::sync::Once;
use tokio::sync::watch;
use zipwhip_webhooks::App;
use zipwhip_webhooks::config::Config;
use zipwhip_webhooks::services::decoder::DecodeDispatcher;

static INIT: Once = Once::new();

pub const RECEIVE_PAYLOAD: &str = r#"{"body":"hi","bodySize":2,"visible":true,"hasAttachment":false,"finalDestination":"+15551234567","messageType":"MT","deleted":false,"id":42,"statusCode":4,"messageTransport":1,"dateCreated":"2024-01-01T00:00:00Z","read":false,"finalSource":"+15557654321","deviceId":9}"#;

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("zipwhip_webhooks=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config() -> Config {
    Config::parse_from(["zipwhip-webhooks", "--host", "127.0.0.1", "--port", "0", "--shutdown-timeout-secs", "2"])
}

pub struct TestApp {
    pub url: String,
    pub client: reqwest::Client,
    pub dispatcher: DecodeDispatcher,
    pub shutdown_tx: watch::Sender<bool>,
    pub server: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = App::new(&config);
        let dispatcher = app.dispatcher.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server = tokio::spawn(app.serve(listener, shutdown_rx));

        Self { url: format!("http://{addr}"), client: reqwest::Client::new(), dispatcher, shutdown_tx, server }
    }

    pub async fn post(&self, path: &str, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client.post(format!("{}{}", self.url, path)).body(body).send().await.unwrap()
    }
}

//! pdf-chat-relay: server binary.
//! Loads config, validates the upstream URL eagerly, and serves the relay.

use pdf_chat_client::config;
use pdf_chat_relay::AppState;
use std::path::PathBuf;
use std::process;

fn resolve_config_path() -> Option<PathBuf> {
    // 1. --config <path> flag
    let args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if let Some(path) = args.get(pos + 1) {
            return Some(PathBuf::from(path));
        }
    }
    // 2. PDF_CHAT_CONFIG env var
    if let Ok(val) = std::env::var("PDF_CHAT_CONFIG") {
        return Some(PathBuf::from(val));
    }
    // 3. Default path (~/.pdf-chat/config.yaml)
    config::default_config_path()
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("received Ctrl+C, shutting down");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // The config file is optional as long as the env var names the upstream.
    let cfg = match resolve_config_path() {
        Some(path) if path.exists() => match config::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!(
                    "Error: failed to load config from {}: {}",
                    path.display(),
                    e
                );
                process::exit(1);
            }
        },
        _ => config::Config::default(),
    };

    let upstream = match std::env::var("PDF_CHAT_UPSTREAM_URL")
        .ok()
        .or(cfg.relay.upstream_url)
    {
        Some(u) => u,
        None => {
            eprintln!(
                "Error: upstream URL not configured (set PDF_CHAT_UPSTREAM_URL or relay.upstream_url)"
            );
            process::exit(1);
        }
    };

    // A bad upstream address must fail startup, not the first request.
    if let Err(e) = url::Url::parse(&upstream) {
        eprintln!("Error: invalid upstream URL {}: {}", upstream, e);
        process::exit(1);
    }

    let port = cfg.relay.port.unwrap_or(8080);
    let addr = format!("127.0.0.1:{}", port);

    let app = pdf_chat_relay::router(AppState::new(&upstream));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };

    tracing::info!(%addr, %upstream, "relay listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Error: server failed: {}", e);
        process::exit(1);
    }
}

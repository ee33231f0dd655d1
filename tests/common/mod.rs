//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tempfile::TempDir;

use portfolio_api::config::ServiceConfig;
use portfolio_api::lifecycle::Shutdown;
use portfolio_api::HttpServer;

/// A running service on an ephemeral port with scratch storage.
///
/// Dropping it drops the shutdown coordinator, which stops the server task.
pub struct TestServer {
    #[allow(dead_code)]
    pub addr: SocketAddr,
    pub base_url: String,
    _storage: TempDir,
    _shutdown: Shutdown,
}

pub async fn start_server() -> TestServer {
    let storage = tempfile::tempdir().expect("tempdir");

    let mut config = ServiceConfig::default();
    config.environment = "test".to_string();
    config.storage.data_dir = storage.path().join("data").display().to_string();
    config.storage.log_dir = storage.path().join("logs").display().to_string();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    // The configured bind address is only used by main(); tests bind first
    // so the port is known before the server starts.
    config.server.bind_address = addr.to_string();

    let server = HttpServer::init(config).await.expect("server init");

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer {
        addr,
        base_url: format!("http://{addr}"),
        _storage: storage,
        _shutdown: shutdown,
    }
}

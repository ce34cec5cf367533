//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use error_pages::http::ServeError;
use error_pages::{ErrorPagesConfig, HttpServer, Shutdown};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), ServeError>>,
    #[allow(dead_code)]
    pub updates: mpsc::UnboundedSender<ErrorPagesConfig>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server for `config` on 127.0.0.1.
pub async fn start_server(config: ErrorPagesConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);
    let task = tokio::spawn(server.run(listener, Some(rx), shutdown.clone()));

    TestServer {
        addr,
        shutdown,
        task,
        updates,
    }
}

/// Config with a single minimal HTML template.
pub fn simple_config() -> ErrorPagesConfig {
    let mut config = ErrorPagesConfig::default();
    config.templates.insert("simple", "<h1>{{ code }}</h1><p>{{ message }}</p>");
    config.template_name = "simple".into();
    config.respond_with_same_http_code = true;
    config
}

//! 共享测试工具：本地 HTTP 响应服务器

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use regform_app::ClientConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
}

/// Minimal HTTP/1.1 server answering canned responses per request target.
///
/// Unknown targets get a 404. Every connection is closed after one response.
pub struct TestServer {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::default();
        let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::default();

        let (routes_task, hits_task) = (Arc::clone(&routes), Arc::clone(&hits));
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes_task);
                let hits = Arc::clone(&hits_task);
                tokio::spawn(async move {
                    let _ = serve(stream, routes, hits).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            routes,
            hits,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `ClientConfig` pointing at this server
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: Some(5),
            ..ClientConfig::default()
        }
    }

    pub fn route(&self, target: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().insert(
            target.to_string(),
            Route {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn json(&self, target: &str, body: &str) {
        self.route(target, 200, body);
    }

    pub fn hits(&self, target: &str) -> usize {
        self.hits.lock().unwrap().get(target).copied().unwrap_or(0)
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    *hits.lock().unwrap().entry(target.clone()).or_default() += 1;

    let route = routes.lock().unwrap().get(&target).cloned().unwrap_or(Route {
        status: 404,
        body: r#"{"error": "not found"}"#.to_string(),
    });
    let response = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Address nothing listens on
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

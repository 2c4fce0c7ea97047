//! Shared utilities for integration tests.

#![allow(dead_code)]

use arc_swap::ArcSwap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use cep_resolver::config::{ProviderConfig, ProviderKind, ServiceConfig};
use cep_resolver::lifecycle::ShutdownSignal;
use cep_resolver::{AddressResolver, HttpServer, Shutdown};

pub const VIA_CEP_BODY: &str = r#"{"cep":"01001-000","logradouro":"Praça da Sé","complemento":"lado ímpar","bairro":"Sé","localidade":"São Paulo","uf":"SP","ibge":"3550308"}"#;

pub const BRASIL_API_BODY: &str = r#"{"cep":"01001000","state":"SP","city":"São Paulo","neighborhood":"Sé","street":"Praça da Sé","service":"open-cep"}"#;

/// A mock upstream bound to an ephemeral port.
pub struct Upstream {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Read the request head so the client never sees a reset.
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 512];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

/// Start a programmable upstream. The closure decides the status and body
/// of every response; it may sleep, or never return to simulate a hang.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> Upstream
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        read_request(&mut socket).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    Upstream { addr, hits }
}

/// Upstream answering every request with `status` and `body` after `delay`.
pub async fn start_upstream(status: u16, body: &'static str, delay: Duration) -> Upstream {
    start_programmable_upstream(move || async move {
        tokio::time::sleep(delay).await;
        (status, body.to_string())
    })
    .await
}

/// Upstream that accepts connections and never answers.
pub async fn start_hanging_upstream() -> Upstream {
    start_programmable_upstream(|| async {
        std::future::pending::<()>().await;
        (200, String::new())
    })
    .await
}

pub fn provider(kind: ProviderKind, upstream: &Upstream) -> ProviderConfig {
    ProviderConfig {
        kind,
        name: None,
        base_url: upstream.base_url(),
        request_timeout_ms: 5000,
    }
}

/// Config racing a ViaCEP-shaped and a BrasilAPI-shaped upstream.
pub fn service_config(via_cep: &Upstream, brasil_api: &Upstream, timeout_ms: u64) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.resolver.timeout_ms = timeout_ms;
    config.providers = vec![
        provider(ProviderKind::ViaCep, via_cep),
        provider(ProviderKind::BrasilApi, brasil_api),
    ];
    config
}

/// A running server plus the handles to stop or reconfigure it.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ServiceConfig>,
    pub resolver: Arc<ArcSwap<AddressResolver>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(config: ServiceConfig) -> RunningServer {
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown: ShutdownSignal = shutdown.subscribe();
    let resolver = server.resolver_handle();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    RunningServer {
        addr,
        shutdown,
        config_updates,
        resolver,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

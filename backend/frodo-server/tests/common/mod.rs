#![allow(dead_code)]

use frodo_hub::{Hub, HubConfig, Metrics, NullStore, ShutdownCoordinator};
use frodo_server::{AppState, BrokerStatus, CacheStatus, build_router};

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use tokio::net::TcpListener;

pub const TEST_POOL_COUNT: usize = 3;

/// Stand-in for a dependency whose health a test can flip
#[derive(Default)]
pub struct StubDependency {
    down: AtomicBool,
}

impl StubDependency {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStatus for StubDependency {
    async fn ping(&self) -> bool {
        !self.down.load(Ordering::SeqCst)
    }

    fn connection_count(&self) -> usize {
        TEST_POOL_COUNT
    }
}

#[async_trait]
impl BrokerStatus for StubDependency {
    async fn ping(&self) -> bool {
        !self.down.load(Ordering::SeqCst)
    }
}

/// Handles on everything behind the router
pub struct TestApp {
    pub hub: Hub,
    pub cache: Arc<StubDependency>,
    pub broker: Arc<StubDependency>,
    pub shutdown: ShutdownCoordinator,
    pub state: AppState,
}

pub fn create_app() -> TestApp {
    let hub = Hub::new(HubConfig::default(), Arc::new(NullStore), Metrics::new());
    let cache = Arc::new(StubDependency::default());
    let broker = Arc::new(StubDependency::default());
    let shutdown = ShutdownCoordinator::new();

    let state = AppState {
        hub: hub.clone(),
        cache: cache.clone(),
        broker: broker.clone(),
        shutdown: shutdown.clone(),
        keep_alive: Duration::from_millis(50),
    };

    TestApp {
        hub,
        cache,
        broker,
        shutdown,
        state,
    }
}

/// Router served through axum-test, for request/response routes
pub fn create_test_server(app: &TestApp) -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(build_router(app.state.clone()))
        .expect("Failed to create test server")
}

/// Router served on a real socket, for streaming responses
pub async fn spawn_server(app: &TestApp) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(app.state.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// Read SSE `data:` values until `count` have arrived, skipping keep-alive comments
pub async fn read_data_lines(response: &mut reqwest::Response, count: usize) -> Vec<String> {
    let mut buffer = String::new();
    let mut data = Vec::new();

    while data.len() < count {
        let chunk = tokio::time::timeout(Duration::from_secs(2), response.chunk())
            .await
            .expect("timed out waiting for an event")
            .unwrap()
            .expect("stream ended early");
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());

        while let Some(end) = buffer.find('\n') {
            let line: String = buffer.drain(..=end).collect();
            if let Some(value) = line.trim_end_matches('\n').strip_prefix("data:") {
                data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
        }
    }

    data
}

/// Poll until the hub reports `expected` connections, or give up after two seconds
pub async fn wait_for_connections(hub: &Hub, expected: usize) -> bool {
    for _ in 0..200 {
        if hub.connection_count() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

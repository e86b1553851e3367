//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which lays out a temporary media tree with one
//! root per collection and builds a full [`AppContext`] over it. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing; [`TestHarness::request`] drives the router in-process.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use carmine::config::{Config, MediaConfig, SettingsStore};
use carmine::server::{create_router, AppContext};
use carmine_common::MediaId;

pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: tempfile::TempDir,
}

impl TestHarness {
    /// Harness with empty `videos/`, `music/` and `photos/` roots and a
    /// config file that settings changes are written to.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let base = dir.path().canonicalize().expect("failed to canonicalize");
        for sub in ["videos", "music", "photos"] {
            std::fs::create_dir_all(base.join(sub)).expect("failed to create root");
        }

        let config = Config {
            media: MediaConfig {
                videos: vec![PathBuf::from("videos")],
                music: vec![PathBuf::from("music")],
                photos: vec![PathBuf::from("photos")],
            },
            ..Config::default()
        };
        let settings = SettingsStore::new(config, Some(base.join("carmine.toml")));
        let ctx = AppContext::new(settings);

        Self { ctx, dir }
    }

    /// Canonical base directory of the harness.
    pub fn base(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("failed to canonicalize")
    }

    /// Write a file under the harness base and return its id.
    pub fn add_file(&self, relative: &str, contents: &[u8]) -> String {
        let path = self.base().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        MediaId::from_path(&path).to_string()
    }

    pub fn id_for(&self, relative: &str) -> String {
        MediaId::from_path(&self.base().join(relative)).to_string()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.base().join(relative)
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone(), None)
    }

    /// Send a request through the router without a socket.
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("router should not fail");
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> TestResponse {
        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "invalid JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Deterministic test payload: byte `i` is `i % 251`.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

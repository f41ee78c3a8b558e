//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use podconfig::channel::{ChannelLookup, LookupError};
use podconfig::feeds::{ChannelInfo, FeedService};
use podconfig::http::{build_router, AppState};
use podconfig::reload::{ReloadError, ServiceReloader};
use podconfig::{ChangeLog, ConfigStore};

pub const BASE_CONFIG: &str = r#"
[server]
port = 8080
hostname = "https://pods.example.com/"

[storage]
type = "local"

[storage.local]
data_dir = "/app/data"
"#;

/// Channel lookup answering from a fixed table.
#[derive(Default)]
pub struct StubLookup {
    channels: HashMap<String, ChannelInfo>,
}

impl StubLookup {
    pub fn with(mut self, source_url: &str, title: &str) -> Self {
        self.channels.insert(
            source_url.to_string(),
            ChannelInfo {
                url: format!("https://www.youtube.com/channel/UC{}", self.channels.len()),
                title: title.to_string(),
                cover_art: Some("https://img.example/cover.jpg".to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl ChannelLookup for StubLookup {
    async fn lookup(&self, source_url: &str) -> Result<ChannelInfo, LookupError> {
        self.channels
            .get(source_url)
            .cloned()
            .ok_or(LookupError::MissingCanonical)
    }
}

/// Reloader whose outcome is switchable at runtime.
pub struct StubReloader {
    pub succeed: AtomicBool,
    pub calls: AtomicUsize,
}

impl StubReloader {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed: AtomicBool::new(succeed),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ServiceReloader for StubReloader {
    fn target(&self) -> &str {
        "podsync"
    }

    async fn reload(&self) -> Result<(), ReloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ReloadError::Failed {
                status: "exit status: 1".to_string(),
                output: "Error: No such container: podsync".to_string(),
            })
        }
    }
}

/// A temporary podsync config file plus everything wired around it.
pub struct Harness {
    pub dir: TempDir,
    pub path: PathBuf,
    pub feeds: Arc<FeedService>,
    pub reloader: Arc<StubReloader>,
    pub router: Router,
}

impl Harness {
    pub fn new(initial: &str, lookup: StubLookup) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, initial).unwrap();

        let feeds = Arc::new(FeedService::new(
            ConfigStore::new(&path),
            Arc::new(ChangeLog::new()),
        ));
        let reloader = Arc::new(StubReloader::new(true));
        let state = AppState {
            feeds: feeds.clone(),
            lookup: Arc::new(lookup),
            reloader: reloader.clone(),
        };
        let router = build_router(state, Duration::from_secs(10));

        Self {
            dir,
            path,
            feeds,
            reloader,
            router,
        }
    }

    pub fn file(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(req).await
    }

    pub async fn post_form(&self, uri: &str, form: &[(&str, &str)]) -> (StatusCode, serde_json::Value) {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }
}

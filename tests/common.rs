#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use sessiongate::backends::LoginBackend;
use sessiongate::errors::{BackendError, PlatformError};
use sessiongate::models::{LoginParams, LoginResponse, User};
use sessiongate::platform::{LoadingOptions, Platform, PlatformLoginOptions};
use sessiongate::session::manager::SessionOptions;
use sessiongate::session::SessionManager;
use tokio::sync::Notify;

/// A platform that records every call made to it.
pub struct FakePlatform {
    pub code: Result<String, PlatformError>,
    pub route: Option<String>,
    pub code_calls: AtomicUsize,
    pub shown: AtomicUsize,
    pub hidden: AtomicUsize,
    pub last_loading: Mutex<Option<LoadingOptions>>,
}

impl FakePlatform {
    pub fn with_code(code: &str) -> Self {
        Self::returning(Ok(code.to_string()))
    }

    pub fn returning(code: Result<String, PlatformError>) -> Self {
        FakePlatform {
            code,
            route: Some("pages/index/index".to_string()),
            code_calls: AtomicUsize::new(0),
            shown: AtomicUsize::new(0),
            hidden: AtomicUsize::new(0),
            last_loading: Mutex::new(None),
        }
    }

    pub fn loading_visible(&self) -> bool {
        self.shown.load(Ordering::SeqCst) > self.hidden.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Platform for FakePlatform {
    fn get_name(&self) -> &str {
        "fake"
    }

    async fn login_code(&self, _options: &PlatformLoginOptions) -> Result<String, PlatformError> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        self.code.clone()
    }

    fn show_loading(&self, options: &LoadingOptions) {
        self.shown.fetch_add(1, Ordering::SeqCst);
        *self.last_loading.lock().unwrap() = Some(options.clone());
    }

    fn hide_loading(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn current_route(&self) -> Option<String> {
        self.route.clone()
    }
}

/// A backend that counts calls, remembers the params it saw and can be held
/// open until the test releases it.
pub struct FakeBackend {
    pub response: Result<LoginResponse, BackendError>,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<LoginParams>>,
    pub gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn ok(user: Value, token: Option<&str>) -> Self {
        FakeBackend {
            response: Ok(LoginResponse::new(
                User::from_value(user).expect("user must be an object"),
                token.map(str::to_string),
            )),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing(error: BackendError) -> Self {
        FakeBackend {
            response: Err(error),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LoginBackend for FakeBackend {
    fn get_name(&self) -> &str {
        "fake"
    }

    async fn login(&self, params: LoginParams) -> Result<LoginResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(params);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response.clone()
    }
}

pub fn default_user() -> Value {
    json!({"nickname": "adam", "token": "embedded-token"})
}

pub fn build_manager(
    platform: FakePlatform,
    backend: FakeBackend,
) -> (SessionManager, Arc<FakePlatform>, Arc<FakeBackend>) {
    let platform = Arc::new(platform);
    let backend = Arc::new(backend);
    let manager = SessionManager::new(platform.clone(), backend.clone(), SessionOptions::default());
    (manager, platform, backend)
}

/// A callback that appends `name` to `log` when it runs.
pub fn record(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl FnOnce() + Send + 'static {
    let log = log.clone();
    move || log.lock().unwrap().push(name)
}

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::callbacks::{lock_registry, run_callbacks, CallbackRegistry, LoginSubscription};
use crate::backends::{unimplemented_backend::UnimplementedBackend, LoginBackend};
use crate::errors::{LoginError, PlatformError, ValidationError};
use crate::models::{LoginParams, LoginResponse, Session, User};
use crate::platform::{LoadingOptions, Platform, PlatformLoginOptions};

/// What a successful `login()` resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The session was already valid; nothing was sent anywhere.
    AlreadyLoggedIn,
    /// A fresh exchange succeeded with this user.
    LoggedIn(User),
}

pub type LoginResult = Result<LoginOutcome, LoginError>;

/// A cloneable handle on a login. Every caller that asks while a login is
/// running gets a clone of the same handle (see [`Shared::ptr_eq`]).
pub type LoginFuture = Shared<BoxFuture<'static, LoginResult>>;

/// Options the manager applies to every login it starts.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    #[serde(default)]
    pub loading: LoadingOptions,
    #[serde(default)]
    pub login: PlatformLoginOptions,
}

struct SessionInner {
    session: Mutex<Session>,
    callbacks: Arc<Mutex<CallbackRegistry>>,
    in_flight: Mutex<Option<LoginFuture>>,
    platform: Arc<dyn Platform>,
    backend: Arc<dyn LoginBackend>,
    options: SessionOptions,
}

impl SessionInner {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<LoginFuture>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the in-flight slot and hides the loading indicator when the login
/// task ends, whether it returned, failed or panicked.
struct InFlightGuard {
    inner: Arc<SessionInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight().take();
        self.inner.platform.hide_loading();
        debug!("login finished; in-flight handle cleared");
    }
}

/// Tracks who is logged in and coordinates logins.
///
/// Cloning is cheap and every clone sees the same session, callback queue and
/// in-flight login. Locks are never held across an await point or while
/// user callbacks run.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    pub fn new(
        platform: Arc<dyn Platform>,
        backend: Arc<dyn LoginBackend>,
        options: SessionOptions,
    ) -> Self {
        info!(
            "Creating session manager (platform='{}', backend='{}')",
            platform.get_name(),
            backend.get_name()
        );
        SessionManager {
            inner: Arc::new(SessionInner {
                session: Mutex::new(Session::new()),
                callbacks: Arc::new(Mutex::new(CallbackRegistry::new())),
                in_flight: Mutex::new(None),
                platform,
                backend,
                options,
            }),
        }
    }

    /// A manager whose logins fail until the application supplies a real backend.
    pub fn with_default_backend(platform: Arc<dyn Platform>, options: SessionOptions) -> Self {
        Self::new(platform, Arc::new(UnimplementedBackend::new()), options)
    }

    // -- Login gate

    pub fn validate_login(&self) -> Result<(), ValidationError> {
        self.inner.session().validate()
    }

    pub fn is_login(&self) -> bool {
        self.validate_login().is_ok()
    }

    pub fn session(&self) -> Session {
        self.inner.session().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.session().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.session().token.clone()
    }

    // -- Login callbacks

    /// Run `callback` once the user is logged in.
    ///
    /// If the session is already valid the callback runs right here and is
    /// never queued. Otherwise it waits for the next successful login under
    /// `group`; a missing or empty group falls back to the current route.
    pub fn on_login<F>(&self, callback: F, group: Option<&str>) -> LoginSubscription
    where
        F: FnOnce() + Send + 'static,
    {
        let group = self.resolve_group(group);

        // Check and push under the registry lock so a concurrent drain either
        // sees this entry or has already made the session valid.
        let mut registry = lock_registry(&self.inner.callbacks);
        if self.is_login() {
            drop(registry);
            callback();
            return LoginSubscription::noop();
        }

        let id = registry.push(group.clone(), Box::new(callback));
        debug!(group = group.as_str(), queued = registry.len(), "login callback queued");
        LoginSubscription::new(&self.inner.callbacks, id)
    }

    /// Drop queued callbacks for `group` (resolved like in [`Self::on_login`]),
    /// or all of them when the group is `"all"`. Returns how many were removed.
    pub fn off_login(&self, group: Option<&str>) -> usize {
        let group = self.resolve_group(group);
        let removed = lock_registry(&self.inner.callbacks).remove_group(&group);
        debug!(group = group.as_str(), removed, "login callbacks removed");
        removed
    }

    pub fn pending_callbacks(&self) -> usize {
        lock_registry(&self.inner.callbacks).len()
    }

    fn resolve_group(&self, group: Option<&str>) -> String {
        match group {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => self.inner.platform.current_route().unwrap_or_default(),
        }
    }

    fn handle_login(&self) {
        let callbacks = lock_registry(&self.inner.callbacks).take_all();
        if callbacks.is_empty() {
            return;
        }
        info!(count = callbacks.len(), "running login callbacks");
        run_callbacks(callbacks);
    }

    // -- Login flow

    /// Log in with no extra parameters for the backend.
    pub fn login(&self) -> LoginFuture {
        self.login_with_params(LoginParams::default())
    }

    /// Start a login, or join the one already running.
    ///
    /// The exchange runs on its own Tokio task, so it completes even if every
    /// caller drops its handle. While it runs, further calls get the same
    /// handle and their `params` are ignored.
    pub fn login_with_params(&self, params: LoginParams) -> LoginFuture {
        let mut in_flight = self.inner.in_flight();

        if self.is_login() {
            debug!("login requested but session is already valid");
            return ready(Ok(LoginOutcome::AlreadyLoggedIn));
        }

        if let Some(pending) = in_flight.as_ref() {
            debug!("joining in-flight login");
            return pending.clone();
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Cannot start login outside a Tokio runtime: {}", e);
                return ready(Err(LoginError::Aborted(e.to_string())));
            }
        };

        info!(
            platform = self.inner.platform.get_name(),
            backend = self.inner.backend.get_name(),
            "starting login"
        );
        self.inner.platform.show_loading(&self.inner.options.loading);

        let guard = InFlightGuard {
            inner: self.inner.clone(),
        };
        let manager = self.clone();
        let task = runtime.spawn(async move {
            let _guard = guard;
            manager.run_login(params).await
        });

        let shared = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(LoginError::Aborted(e.to_string())),
            }
        }
        .boxed()
        .shared();

        *in_flight = Some(shared.clone());
        shared
    }

    /// Whether a login exchange is currently running.
    pub fn is_login_pending(&self) -> bool {
        self.inner.in_flight().is_some()
    }

    async fn run_login(&self, params: LoginParams) -> LoginResult {
        match self.fetch_login_data(params).await {
            Ok(response) => {
                let user = response.user.clone();
                self.login_with(response.user, response.token);
                info!("login succeeded");
                Ok(LoginOutcome::LoggedIn(user))
            }
            Err(e) => {
                warn!("login failed: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_login_data(&self, mut params: LoginParams) -> Result<LoginResponse, LoginError> {
        let code = self
            .inner
            .platform
            .login_code(&self.inner.options.login)
            .await?;
        if code.is_empty() {
            return Err(PlatformError::NoCode.into());
        }
        params.set_code(&code);
        debug!("exchanging platform code with backend");
        Ok(self.inner.backend.login(params).await?)
    }

    /// Record a login result. Without `token`, the token embedded in the user
    /// record is used. Queued callbacks run if the session became valid.
    pub fn login_with(&self, user: User, token: Option<String>) {
        let valid = {
            let mut session = self.inner.session();
            session.commit(user, token);
            session.is_valid()
        };

        if valid {
            self.handle_login();
        } else {
            warn!("login data committed but session is still incomplete");
        }
    }

    /// Forget the current user and token. Queued callbacks stay queued.
    pub fn logout(&self) {
        self.inner.session().clear();
        info!("logged out");
    }
}

fn ready(result: LoginResult) -> LoginFuture {
    future::ready(result).boxed().shared()
}

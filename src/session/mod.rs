//! Session state tracking: the login gate, the deferred callback queue and
//! the coalescing login orchestrator.

pub mod callbacks;
pub mod manager;

pub use callbacks::{CallbackRegistry, LoginSubscription};
pub use manager::{LoginFuture, LoginOutcome, SessionManager};

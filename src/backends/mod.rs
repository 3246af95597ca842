pub mod base;
pub mod http_backend;
pub mod unimplemented_backend;

// Re-export from base.rs so we can do "use crate::backends::*;"
pub use base::{create_backend, BackendConfig, LoginBackend};

pub mod session;
pub mod user;

// Re-export so callers can do "use crate::models::{Session, User};"
pub use session::Session;
pub use user::{LoginParams, LoginResponse, User};

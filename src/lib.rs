//! Library exports for sessiongate, shared between the binary and tests.

pub mod backends;
pub mod config;
pub mod errors;
pub mod models;
pub mod platform;
pub mod session;
pub mod startup;
pub mod utils;

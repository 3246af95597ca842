pub mod base;
pub mod static_platform;

// Re-export the primary Platform items so code outside can do
// "use crate::platform::{Platform, create_platform};"
pub use base::{create_platform, LoadingOptions, Platform, PlatformConfig, PlatformLoginOptions};

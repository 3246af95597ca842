use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::backends::BackendConfig;
use crate::platform::PlatformConfig;
use crate::session::manager::SessionOptions;

pub const CONFIG_FILE: &str = "./config.yaml";
pub const ENV_PREFIX: &str = "SESSIONGATE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: which platform and backend to use, plus logging
/// and the options applied to every login.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    pub platform: PlatformConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionOptions,
}

/// `./config.yaml`, overridden by `SESSIONGATE_*` environment variables
/// (`__` separates nested keys, e.g. `SESSIONGATE_BACKEND__URI`).
pub fn figment() -> Figment {
    Figment::new()
        .merge(Yaml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

fn extract(figment: Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

pub fn try_load_config() -> Result<ConfigV1, figment::Error> {
    extract(figment())
}

/// Load the configuration, exiting the process if it is unusable.
pub fn load_config() -> ConfigV1 {
    match try_load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse a configuration from a YAML string, without touching files or the environment.
pub fn parse_config(yaml: &str) -> Result<ConfigV1, figment::Error> {
    extract(Figment::new().merge(Yaml::string(yaml)))
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error rendering configuration schema: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const FULL_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
platform:
  type: "static"
  name: "dev"
  code: "dev-code"
  route: "pages/index/index"
backend:
  type: "http"
  name: "api"
  uri: "http://127.0.0.1:8080/login"
  timeout_in_ms: 3000
session:
  loading:
    title: "Signing in"
    mask: false
  login:
    timeout_in_ms: 5000
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(FULL_CONFIG).expect("config should parse");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        match &config.platform {
            PlatformConfig::Static(p) => {
                assert_eq!(p.code, "dev-code");
                assert_eq!(p.route.as_deref(), Some("pages/index/index"));
            }
        }
        match &config.backend {
            BackendConfig::Http(b) => {
                assert_eq!(b.uri, "http://127.0.0.1:8080/login");
                assert_eq!(b.timeout_in_ms, Some(3000));
            }
            other => panic!("unexpected backend: {:?}", other),
        }
        assert_eq!(config.session.loading.title, "Signing in");
        assert!(!config.session.loading.mask);
        assert_eq!(config.session.login.timeout_in_ms, Some(5000));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config(
            r#"
version: "1.0.0"
platform:
  type: "static"
  name: "dev"
  code: "c"
"#,
        )
        .expect("config should parse");
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(matches!(config.backend, BackendConfig::Unimplemented));
        assert_eq!(config.session, SessionOptions::default());
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let result = parse_config(
            r#"
version: "0.9.0"
platform:
  type: "static"
  name: "dev"
  code: "c"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", FULL_CONFIG)?;
            jail.set_env("SESSIONGATE_LOGGING__LEVEL", "warn");
            jail.set_env("SESSIONGATE_BACKEND__URI", "http://example.invalid/login");

            let config = try_load_config()?;
            assert_eq!(config.logging.level, "warn");
            match config.backend {
                BackendConfig::Http(b) => assert_eq!(b.uri, "http://example.invalid/login"),
                other => panic!("unexpected backend: {:?}", other),
            }
            Ok(())
        });
    }
}

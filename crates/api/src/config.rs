//! Runtime configuration from environment variables.
//!
//! Every setting has a default. Unparseable values fall back to the default and
//! produce a warning that `main` logs once tracing is up.

use std::net::SocketAddr;
use std::time::Duration;

use marketplace_observability::LogFormat;

pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub throttle_max_requests: u32,
    pub throttle_window: Duration,
    pub log_format: LogFormat,
    pub seed_demo_data: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            throttle_max_requests: 30,
            throttle_window: Duration::from_secs(60),
            log_format: LogFormat::Json,
            seed_demo_data: false,
        }
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("throttle_max_requests", &self.throttle_max_requests)
            .field("throttle_window", &self.throttle_window)
            .field("log_format", &self.log_format)
            .field("seed_demo_data", &self.seed_demo_data)
            .finish()
    }
}

impl ApiConfig {
    /// Read the process environment. Returns the config and any warnings.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => config.jwt_secret = secret,
            _ => warnings.push("JWT_SECRET not set; using insecure dev default".to_string()),
        }

        parse_into(&lookup, "BIND_ADDR", &mut config.bind_addr, &mut warnings);
        parse_into(&lookup, "THROTTLE_MAX_REQUESTS", &mut config.throttle_max_requests, &mut warnings);
        parse_into(&lookup, "LOG_FORMAT", &mut config.log_format, &mut warnings);

        let mut window_secs = config.throttle_window.as_secs();
        parse_into(&lookup, "THROTTLE_WINDOW_SECS", &mut window_secs, &mut warnings);
        config.throttle_window = Duration::from_secs(window_secs.max(1));

        if let Some(raw) = lookup("SEED_DEMO_DATA") {
            match parse_bool(&raw) {
                Some(v) => config.seed_demo_data = v,
                None => warnings.push(format!("SEED_DEMO_DATA='{raw}' is not a boolean; using false")),
            }
        }

        if config.throttle_max_requests == 0 {
            warnings.push("THROTTLE_MAX_REQUESTS must be positive; using 30".to_string());
            config.throttle_max_requests = 30;
        }

        (config, warnings)
    }
}

fn parse_into<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T, warnings: &mut Vec<String>)
where
    T: core::str::FromStr + core::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => warnings.push(format!("{key}='{raw}' is invalid; using {slot:?}")),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> (ApiConfig, Vec<String>) {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let (config, warnings) = load(&[]);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.throttle_max_requests, 30);
        assert_eq!(config.throttle_window, Duration::from_secs(60));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.seed_demo_data);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn env_values_override_defaults() {
        let (config, warnings) = load(&[
            ("JWT_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("THROTTLE_MAX_REQUESTS", "5"),
            ("THROTTLE_WINDOW_SECS", "10"),
            ("LOG_FORMAT", "pretty"),
            ("SEED_DEMO_DATA", "yes"),
        ]);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.throttle_max_requests, 5);
        assert_eq!(config.throttle_window, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn invalid_values_fall_back_with_warning() {
        let (config, warnings) = load(&[
            ("JWT_SECRET", "x"),
            ("BIND_ADDR", "nowhere"),
            ("THROTTLE_MAX_REQUESTS", "0"),
            ("SEED_DEMO_DATA", "maybe"),
        ]);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.throttle_max_requests, 30);
        assert!(!config.seed_demo_data);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn debug_redacts_secret() {
        let (config, _) = load(&[("JWT_SECRET", "hunter2")]);
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}

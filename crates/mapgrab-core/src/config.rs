use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function. Decoupled from the real environment so tests can drive it with
/// a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected a boolean, got \"{other}\""),
                }),
            },
        }
    };

    let env = parse_environment(&or_default("MAPGRAB_ENV", "development"));

    let bind_addr = parse_addr("MAPGRAB_BIND_ADDR", "127.0.0.1:8080")?;
    let log_level = or_default("MAPGRAB_LOG_LEVEL", "info");
    let sink_path = PathBuf::from(or_default("MAPGRAB_SINK_PATH", "./output.csv"));
    let maps_url = or_default("MAPGRAB_MAPS_URL", "https://www.google.com/maps");

    let browser_headless = parse_bool("MAPGRAB_HEADLESS", false)?;
    let profile_dir = lookup("MAPGRAB_PROFILE_DIR").ok().map(PathBuf::from);
    let chrome_executable = lookup("MAPGRAB_CHROME_EXECUTABLE").ok().map(PathBuf::from);

    let nav_timeout_secs = parse_u64("MAPGRAB_NAV_TIMEOUT_SECS", "60")?;
    let input_wait_ms = parse_u64("MAPGRAB_INPUT_WAIT_MS", "5000")?;
    let results_settle_secs = parse_u64("MAPGRAB_RESULTS_SETTLE_SECS", "3")?;
    let feed_end_marker = or_default("MAPGRAB_FEED_END_MARKER", "height: 64px");

    let max_body_bytes = parse_usize("MAPGRAB_MAX_BODY_BYTES", "2097152")?;
    let request_timeout_secs = parse_u64("MAPGRAB_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sink_path,
        maps_url,
        browser_headless,
        profile_dir,
        chrome_executable,
        nav_timeout_secs,
        input_wait_ms,
        results_settle_secs,
        feed_end_marker,
        max_body_bytes,
        request_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
        assert_eq!(parse_environment("whatever"), Environment::Development);
    }

    #[test]
    fn build_app_config_all_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.sink_path.to_str(), Some("./output.csv"));
        assert_eq!(cfg.maps_url, "https://www.google.com/maps");
        assert!(!cfg.browser_headless);
        assert!(cfg.profile_dir.is_none());
        assert!(cfg.chrome_executable.is_none());
        assert_eq!(cfg.nav_timeout_secs, 60);
        assert_eq!(cfg.input_wait_ms, 5000);
        assert_eq!(cfg.results_settle_secs, 3);
        assert_eq!(cfg.feed_end_marker, "height: 64px");
        assert_eq!(cfg.max_body_bytes, 2_097_152);
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn build_app_config_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAPGRAB_BIND_ADDR"),
            "expected InvalidEnvVar(MAPGRAB_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_headless_override() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_HEADLESS", "true");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.browser_headless);
    }

    #[test]
    fn build_app_config_invalid_headless_value() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_HEADLESS", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAPGRAB_HEADLESS"),
            "expected InvalidEnvVar(MAPGRAB_HEADLESS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_profile_dir_override() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_PROFILE_DIR", "/tmp/profile");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.profile_dir.as_deref(),
            Some(std::path::Path::new("/tmp/profile"))
        );
    }

    #[test]
    fn build_app_config_sink_path_override() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_SINK_PATH", "./data/results.csv");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.sink_path.to_str(), Some("./data/results.csv"));
    }

    #[test]
    fn build_app_config_feed_end_marker_override() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_FEED_END_MARKER", "data-done=\"1\"");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.feed_end_marker, "data-done=\"1\"");
    }

    #[test]
    fn build_app_config_invalid_body_limit() {
        let mut map = HashMap::new();
        map.insert("MAPGRAB_MAX_BODY_BYTES", "lots");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAPGRAB_MAX_BODY_BYTES"),
            "expected InvalidEnvVar(MAPGRAB_MAX_BODY_BYTES), got: {result:?}"
        );
    }
}

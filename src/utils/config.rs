use std::path::Path;

use anyhow::Context;

use crate::models::{ConfigError, DashboardSettings};

pub const ENV_SETTINGS_FILE: &str = "PATTERN_DASHBOARD_SETTINGS";
const ENV_API_BASE_URL: &str = "PATTERN_API_BASE_URL";
const ENV_REFRESH_SECS: &str = "PATTERN_REFRESH_SECS";
const ENV_REQUEST_TIMEOUT_SECS: &str = "PATTERN_REQUEST_TIMEOUT_SECS";
const ENV_BIND_ADDR: &str = "PATTERN_DASHBOARD_ADDR";
const ENV_STALE_INDICATOR: &str = "PATTERN_STALE_INDICATOR";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Defaults, then the optional settings file, then environment overrides.
pub fn load_settings() -> anyhow::Result<DashboardSettings> {
    let mut settings = match env_value(ENV_SETTINGS_FILE) {
        Some(path) => read_settings_file(Path::new(&path))?,
        None => DashboardSettings::default(),
    };
    apply_env_overrides(&mut settings, env_value)?;
    settings.validate()?;
    Ok(settings)
}

pub fn read_settings_file(path: &Path) -> anyhow::Result<DashboardSettings> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}

/// `lookup` is injected so tests don't have to touch the process environment.
pub fn apply_env_overrides<F>(settings: &mut DashboardSettings, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL) {
        settings.api_base_url = url;
    }
    if let Some(raw) = lookup(ENV_REFRESH_SECS) {
        settings.refresh_interval_secs = parse_env(ENV_REFRESH_SECS, raw)?;
    }
    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        settings.request_timeout_secs = parse_env(ENV_REQUEST_TIMEOUT_SECS, raw)?;
    }
    if let Some(addr) = lookup(ENV_BIND_ADDR) {
        settings.bind_addr = addr;
    }
    if let Some(raw) = lookup(ENV_STALE_INDICATOR) {
        settings.show_stale_indicator = match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    key: ENV_STALE_INDICATOR,
                    value: raw,
                })
            }
        };
    }
    Ok(())
}

fn parse_env(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_win_over_defaults() {
        let mut settings = DashboardSettings::default();
        let lookup = lookup_from(&[
            (ENV_API_BASE_URL, "https://monitor.example.net"),
            (ENV_REFRESH_SECS, "120"),
            (ENV_STALE_INDICATOR, "off"),
        ]);

        apply_env_overrides(&mut settings, lookup).unwrap();

        assert_eq!(settings.api_base_url, "https://monitor.example.net");
        assert_eq!(settings.refresh_interval_secs, 120);
        assert!(!settings.show_stale_indicator);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_number_is_reported_with_its_key() {
        let mut settings = DashboardSettings::default();
        let err = apply_env_overrides(&mut settings, lookup_from(&[(ENV_REFRESH_SECS, "5m")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                key: ENV_REFRESH_SECS,
                value: "5m".to_string()
            }
        );
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let err = read_settings_file(Path::new("/nonexistent/pattern-dashboard.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read settings file"));
    }
}

use anyhow::{Context, Result};
use ifpa_api::client::IfpaApi;
use log::debug;
use std::time::Duration;

pub const API_KEY_VAR: &str = "IFPA_API_KEY";
pub const BASE_URL_VAR: &str = "IFPA_BASE_URL";
pub const TIMEOUT_VAR: &str = "IFPA_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl Settings {
    /// Read settings from the environment, after loading `.env` if one exists.
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("failed to read .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR)
            .with_context(|| format!("{API_KEY_VAR} is not set"))?;
        let base_url = non_empty(BASE_URL_VAR);
        let timeout = non_empty(TIMEOUT_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"))
            })
            .transpose()?;

        Ok(Self { api_key, base_url, timeout })
    }

    pub fn client(&self) -> IfpaApi {
        let mut api = IfpaApi::new(self.api_key.clone());
        if let Some(base_url) = &self.base_url {
            api = api.with_base_url(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            api = api.with_timeout(timeout);
        }
        api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn api_key_is_required() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));

        assert!(Settings::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).is_err());
    }

    #[test]
    fn optional_values_are_picked_up() {
        let settings = Settings::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (BASE_URL_VAR, "http://localhost:8080"),
            (TIMEOUT_VAR, "3"),
        ]))
        .unwrap();
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(settings.timeout, Some(Duration::from_secs(3)));
        assert_eq!(settings.client().base_url(), "http://localhost:8080");
    }

    #[test]
    fn defaults_point_at_ifpa() {
        let settings = Settings::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap();
        assert_eq!(settings.base_url, None);
        assert_eq!(settings.timeout, None);
        assert_eq!(settings.client().base_url(), "https://api.ifpapinball.com");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::from_lookup(lookup(&[(API_KEY_VAR, "secret"), (TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(TIMEOUT_VAR));
    }
}

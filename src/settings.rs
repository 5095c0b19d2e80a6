use anyhow::Context;
use srinfo_api::client::{ASSET_URL, BASE_URL, Language};
use std::path::PathBuf;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub language: Language,
    /// Local raw payload to use instead of the network.
    pub profile_json: Option<PathBuf>,
    pub api_url: String,
    pub asset_url: String,
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            profile_json: None,
            api_url: BASE_URL.to_owned(),
            asset_url: ASSET_URL.to_owned(),
            log_filter: "warn".to_owned(),
        }
    }
}

impl AppSettings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(lang) = get("SRINFO_LANG") {
            settings.language = lang.parse().context("SRINFO_LANG")?;
        }
        settings.profile_json = get("SRINFO_PROFILE_JSON").map(PathBuf::from);
        if let Some(url) = get("SRINFO_API_URL") {
            settings.api_url = url;
        }
        if let Some(url) = get("SRINFO_ASSET_URL") {
            settings.asset_url = url;
        }
        if let Some(filter) = get("SRINFO_LOG") {
            settings.log_filter = filter;
        }
        Ok(settings)
    }
}

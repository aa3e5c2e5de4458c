use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::inbox::MarkReadFailurePolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_VAPID_PUBLIC_KEY: &str =
    "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_NOTIFICATION_ICON: &str = "/icon.png";
pub const DEFAULT_PUSH_TITLE: &str = "Momentum Academy";
pub const AGENT_SCRIPT_PATH: &str = "/sw.js";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: Url,
    pub vapid_public_key: String,
    pub vapid_private_key: Option<String>,
    pub vapid_subject: Option<String>,
    pub poll_interval: Duration,
    pub notification_icon: String,
    pub push_title: String,
    pub mark_read_failure: MarkReadFailurePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            vapid_public_key: DEFAULT_VAPID_PUBLIC_KEY.to_string(),
            vapid_private_key: None,
            vapid_subject: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            notification_icon: DEFAULT_NOTIFICATION_ICON.to_string(),
            push_title: DEFAULT_PUSH_TITLE.to_string(),
            mark_read_failure: MarkReadFailurePolicy::default(),
        }
    }
}

/// Optional TOML file layered under command-line flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub vapid_public_key: Option<String>,
    pub vapid_private_key: Option<String>,
    pub vapid_subject: Option<String>,
    pub poll_interval: Option<String>,
    pub notification_icon: Option<String>,
    pub push_title: Option<String>,
    pub mark_read_failure: Option<MarkReadFailurePolicy>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(api_url) = self.api_url {
            config.api_url = parse_api_url(&api_url)?;
        }
        if let Some(key) = self.vapid_public_key {
            config.vapid_public_key = key;
        }
        if let Some(key) = self.vapid_private_key {
            config.vapid_private_key = Some(key);
        }
        if let Some(subject) = self.vapid_subject {
            config.vapid_subject = Some(subject);
        }
        if let Some(raw) = self.poll_interval {
            config.poll_interval = parse_interval(&raw)?;
        }
        if let Some(icon) = self.notification_icon {
            config.notification_icon = icon;
        }
        if let Some(title) = self.push_title {
            config.push_title = title;
        }
        if let Some(policy) = self.mark_read_failure {
            config.mark_read_failure = policy;
        }
        Ok(())
    }
}

/// The returned url always ends in `/`, so endpoint paths join under it.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidApiUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parses `<number>[s|m|h]`; a bare number means seconds.
pub fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ConfigError::Invalid("poll interval cannot be empty".to_string()));
    }

    let (amount, unit) = match value.chars().last() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            (&value[..value.len() - 1], ch.to_ascii_lowercase())
        }
        _ => (value, 's'),
    };

    let amount: u64 = amount.parse().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid poll interval '{value}'; expected <number>[s|m|h]"
        ))
    })?;

    if amount == 0 {
        return Err(ConfigError::Invalid(
            "poll interval must be greater than 0".to_string(),
        ));
    }

    let seconds = match unit {
        's' => Some(amount),
        'm' => amount.checked_mul(60),
        'h' => amount.checked_mul(60 * 60),
        _ => {
            return Err(ConfigError::Invalid(format!(
                "invalid poll interval '{value}'; expected <number>[s|m|h]"
            )));
        }
    };

    seconds.map(Duration::from_secs).ok_or_else(|| {
        ConfigError::Invalid(format!("poll interval '{value}' is too large"))
    })
}

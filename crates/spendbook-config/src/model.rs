use serde::{de::Deserializer, Deserialize, Serialize};
use std::{env, fmt, path::PathBuf};

use crate::ConfigError;

/// Environment variable that relocates every Spendbook file.
pub const HOME_ENV: &str = "SPENDBOOK_HOME";
const HOME_DIR_NAME: &str = ".spendbook";
const VIEW_MODES: [&str; 5] = ["daily", "monthly", "yearly", "custom", "all"];
const MAX_TREND_DAYS: u32 = 366;

/// Stores user-configurable preferences and connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "Config::default_view_value")]
    pub default_view: String,
    #[serde(default = "Config::default_trend_days")]
    pub trend_days: u32,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    /// Authenticated user id; an anonymous `temp_` id is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the local store. Defaults to `<home>/data`.
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            theme: Theme::default(),
            default_view: Self::default_view_value(),
            trend_days: Self::default_trend_days(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            user_id: None,
            user_name: None,
            remote: None,
            data_dir: None,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-IN".into()
    }

    pub fn default_currency() -> String {
        "INR".into()
    }

    pub fn default_view_value() -> String {
        "all".into()
    }

    pub fn default_trend_days() -> u32 {
        7
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// `$SPENDBOOK_HOME`, else `~/.spendbook`.
    pub fn default_home() -> PathBuf {
        if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR_NAME)
    }

    pub fn resolve_data_dir(&self, home: &std::path::Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home.join("data"))
    }

    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("User")
    }

    /// Remote settings only when every field needed for a request is present.
    pub fn active_remote(&self) -> Option<&RemoteSettings> {
        self.remote.as_ref().filter(|remote| remote.is_complete())
    }

    /// Keys accepted by [`Config::set`].
    pub fn keys() -> &'static [&'static str] {
        &[
            "locale",
            "currency",
            "theme",
            "default_view",
            "trend_days",
            "ui_color_enabled",
            "user_id",
            "user_name",
            "remote.url",
            "remote.api_key",
            "remote.access_token",
            "data_dir",
            "log_filter",
        ]
    }

    /// Updates one setting from its textual form. An empty value clears optional settings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let optional = || (!value.is_empty()).then(|| value.to_string());
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "locale" if value.is_empty() => return Err(invalid("locale cannot be empty")),
            "locale" => self.locale = value.to_string(),
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter ISO code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "theme" => self.theme = Theme::from_str(value),
            "default_view" => {
                let normalized = value.to_ascii_lowercase();
                if !VIEW_MODES.contains(&normalized.as_str()) {
                    return Err(invalid("expected daily, monthly, yearly, custom or all"));
                }
                self.default_view = normalized;
            }
            "trend_days" => {
                let days: u32 = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number of days"))?;
                if !(1..=MAX_TREND_DAYS).contains(&days) {
                    return Err(invalid(&format!("must be between 1 and {MAX_TREND_DAYS}")));
                }
                self.trend_days = days;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(invalid("expected true or false")),
                }
            }
            "user_id" => self.user_id = optional(),
            "user_name" => self.user_name = optional(),
            "remote.url" => self.remote_mut().url = value.trim_end_matches('/').to_string(),
            "remote.api_key" => self.remote_mut().api_key = value.to_string(),
            "remote.access_token" => self.remote_mut().access_token = optional(),
            "data_dir" => self.data_dir = optional().map(PathBuf::from),
            "log_filter" => self.log_filter = optional(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs for display. Secrets are masked.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let unset = || "-".to_string();
        let remote = self.remote.as_ref();
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("theme", self.theme.to_string()),
            ("default_view", self.default_view.clone()),
            ("trend_days", self.trend_days.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("user_id", self.user_id.clone().unwrap_or_else(unset)),
            ("user_name", self.display_name().to_string()),
            (
                "remote.url",
                remote
                    .map(|r| r.url.clone())
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(unset),
            ),
            (
                "remote.api_key",
                remote
                    .filter(|r| !r.api_key.is_empty())
                    .map(|_| "********".to_string())
                    .unwrap_or_else(unset),
            ),
            (
                "remote.access_token",
                remote
                    .and_then(|r| r.access_token.as_ref())
                    .map(|_| "********".to_string())
                    .unwrap_or_else(unset),
            ),
            (
                "data_dir",
                self.data_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(unset),
            ),
            ("log_filter", self.log_filter.clone().unwrap_or_else(unset)),
        ]
    }

    fn remote_mut(&mut self) -> &mut RemoteSettings {
        self.remote.get_or_insert_with(RemoteSettings::default)
    }
}

/// Hosted database endpoint and credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl RemoteSettings {
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty()
            && !self.api_key.is_empty()
            && self
                .access_token
                .as_deref()
                .is_some_and(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_str(v.trim()))
            .unwrap_or_default()
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}

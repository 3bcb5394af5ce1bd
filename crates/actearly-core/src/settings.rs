//! User preferences.
//!
//! Stores:
//! - Break interval and session length
//! - Sound / edge-glow toggles and theme
//! - Prioritized body parts and work environment
//! - Free-text instructions forwarded to the content provider
//!
//! Settings are persisted as one JSON blob under [`STORAGE_KEY`]; see
//! [`crate::storage::Database::load_settings`].

use serde::{Deserialize, Serialize};
use url::Url;

use crate::body::Category;
use crate::error::ConfigError;
use crate::exercise::Environment;

/// Fixed key of the serialized settings blob.
pub const STORAGE_KEY: &str = "actearly_preferences_v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds of sitting between break reminders.
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// Session length in minutes, i.e. number of one-minute exercises.
    #[serde(default = "default_session_duration_minutes")]
    pub session_duration_minutes: u32,
    #[serde(default)]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub glow_enabled: bool,
    #[serde(default)]
    pub prioritized_body_parts: Vec<Category>,
    #[serde(default = "default_environment")]
    pub work_environment: Environment,
    #[serde(default = "default_theme")]
    pub theme: Theme,
    #[serde(default)]
    pub custom_instructions: String,
    #[serde(default = "default_focus_mode_minutes")]
    pub focus_mode_minutes: u64,
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: u64,
    /// Base URL of the content backend. Unset means local library only.
    #[serde(default)]
    pub provider_endpoint: Option<Url>,
}

fn default_interval_seconds() -> u64 {
    25 * 60
}
/// Longest regular session, one exercise per minute.
pub const MAX_SESSION_MINUTES: u32 = 30;

fn default_session_duration_minutes() -> u32 {
    5
}
fn default_true() -> bool {
    true
}
fn default_environment() -> Environment {
    Environment::Office
}
fn default_theme() -> Theme {
    Theme::Light
}
fn default_focus_mode_minutes() -> u64 {
    60
}
fn default_snooze_minutes() -> u64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            session_duration_minutes: default_session_duration_minutes(),
            sound_enabled: false,
            glow_enabled: true,
            prioritized_body_parts: Vec::new(),
            work_environment: default_environment(),
            theme: default_theme(),
            custom_instructions: String::new(),
            focus_mode_minutes: default_focus_mode_minutes(),
            snooze_minutes: default_snooze_minutes(),
            provider_endpoint: None,
        }
    }
}

impl Settings {
    /// Number of exercises in a regular session, within
    /// `1..=MAX_SESSION_MINUTES` even for unvalidated values.
    pub fn session_exercise_count(&self) -> usize {
        self.session_duration_minutes.clamp(1, MAX_SESSION_MINUTES) as usize
    }

    pub fn custom_instructions(&self) -> Option<&str> {
        let trimmed = self.custom_instructions.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Reject values the timer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "interval_seconds".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !(1..=MAX_SESSION_MINUTES).contains(&self.session_duration_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "session_duration_minutes".into(),
                message: format!("must be between 1 and {MAX_SESSION_MINUTES}"),
            });
        }
        if self.snooze_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "snooze_minutes".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    _ if value == "null" => serde_json::Value::Null,
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Array(_) if !value.trim_start().starts_with('[') => {
                        // Comma list: "Neck, Back"
                        serde_json::Value::Array(
                            value
                                .split(',')
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(|s| serde_json::Value::String(s.to_string()))
                                .collect(),
                        )
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Return a copy with one key changed. The original is left untouched so
    /// the caller can diff old against new.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, ConfigError> {
        let mut json = serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Settings =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed: Settings = serde_json::from_str(r#"{"interval_seconds": 600}"#).unwrap();
        assert_eq!(parsed.interval_seconds, 600);
        assert_eq!(parsed.session_duration_minutes, 5);
        assert!(parsed.glow_enabled);
        assert_eq!(parsed.theme, Theme::Light);
    }

    #[test]
    fn get_returns_string_for_all_types() {
        let settings = Settings::default();
        assert_eq!(settings.get("interval_seconds").as_deref(), Some("1500"));
        assert_eq!(settings.get("sound_enabled").as_deref(), Some("false"));
        assert_eq!(settings.get("work_environment").as_deref(), Some("Office"));
        assert!(settings.get("missing_key").is_none());
    }

    #[test]
    fn with_value_updates_number_and_bool() {
        let settings = Settings::default()
            .with_value("interval_seconds", "900")
            .unwrap()
            .with_value("sound_enabled", "true")
            .unwrap();
        assert_eq!(settings.interval_seconds, 900);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn with_value_accepts_comma_list_of_parts() {
        let settings = Settings::default()
            .with_value("prioritized_body_parts", "Neck, Back")
            .unwrap();
        assert_eq!(
            settings.prioritized_body_parts,
            vec![Category::Neck, Category::Back]
        );
    }

    #[test]
    fn with_value_rejects_bad_enum_and_unknown_key() {
        let settings = Settings::default();
        assert!(matches!(
            settings.with_value("theme", "Sepia"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.with_value("nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(settings.with_value("interval_seconds", "0").is_err());
    }

    #[test]
    fn session_length_is_bounded() {
        let settings = Settings::default();
        assert!(settings.with_value("session_duration_minutes", "0").is_err());
        assert!(settings
            .with_value("session_duration_minutes", "4000000000")
            .is_err());
        assert!(settings.with_value("session_duration_minutes", "31").is_err());
        let longest = settings
            .with_value("session_duration_minutes", "30")
            .unwrap();
        assert_eq!(longest.session_exercise_count(), 30);

        let unchecked = Settings {
            session_duration_minutes: u32::MAX,
            ..Settings::default()
        };
        assert_eq!(unchecked.session_exercise_count(), MAX_SESSION_MINUTES as usize);
    }

    #[test]
    fn with_value_sets_and_clears_endpoint() {
        let settings = Settings::default()
            .with_value("provider_endpoint", "http://localhost:3000")
            .unwrap();
        assert!(settings.provider_endpoint.is_some());
        assert!(settings.with_value("provider_endpoint", "").is_err());
        let cleared = settings.with_value("provider_endpoint", "null").unwrap();
        assert!(cleared.provider_endpoint.is_none());
    }

    #[test]
    fn blank_custom_instructions_are_none() {
        let mut settings = Settings::default();
        settings.custom_instructions = "   ".into();
        assert!(settings.custom_instructions().is_none());
        settings.custom_instructions = " knee pain ".into();
        assert_eq!(settings.custom_instructions(), Some("knee pain"));
    }
}

//! Exercise model shared by the library, the selector and the provider.
//!
//! The JSON form uses camelCase keys so generated sessions from the content
//! backend deserialize directly.

use serde::{Deserialize, Serialize};

use crate::body::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Posture {
    Seated,
    Standing,
}

/// Where the user is working right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Office,
    Home,
}

/// Environments an exercise can be done in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compatibility {
    Office,
    Home,
    #[default]
    Both,
}

impl Compatibility {
    pub fn allows(self, env: Environment) -> bool {
        matches!(
            (self, env),
            (Compatibility::Both, _)
                | (Compatibility::Office, Environment::Office)
                | (Compatibility::Home, Environment::Home)
        )
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Office => f.write_str("Office"),
            Environment::Home => f.write_str("Home"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "office" => Ok(Environment::Office),
            "home" => Ok(Environment::Home),
            _ => Err(format!("unknown environment: {s} (expected Office or Home)")),
        }
    }
}

/// One guided micro-exercise. Read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Unique within a session.
    pub name: String,
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
    pub instructions: Vec<String>,
    pub benefits: String,
    pub prevention: String,
    pub category: Category,
    pub posture: Posture,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_standing_recommended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default)]
    pub environment_compatibility: Compatibility,
}

fn default_duration_seconds() -> u32 {
    60
}

impl Exercise {
    /// Counts toward the standing quota of a session.
    pub fn is_standing_capable(&self) -> bool {
        self.is_standing_recommended.unwrap_or(false) || self.posture == Posture::Standing
    }

    pub fn suits(&self, env: Environment) -> bool {
        self.environment_compatibility.allows(env)
    }
}

//! Exercise selection.
//!
//! A session is either generated by the content provider (when the user
//! wrote custom instructions) or picked from the local library. Provider
//! failures never surface: they are logged and the local path takes over.

mod local;
mod provider;
mod wisdom;

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use indoc::formatdoc;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::body::Category;
use crate::exercise::{Environment, Exercise};
use crate::library;

pub use local::{min_standing, select_local, MAX_VISITS};
pub use provider::{parse_payload, BackendProvider, ContentProvider, UNAVAILABLE_MARKER};
pub use wisdom::{wisdom_prompt, TipCategory, WisdomDeck, WisdomTip};

/// Constraints for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub count: usize,
    /// Visited in order; empty means all canonical parts, shuffled.
    pub priorities: Vec<Category>,
    pub environment: Environment,
    pub exclude_names: Vec<String>,
    /// Non-blank text routes the request to the content provider.
    pub custom_instructions: Option<String>,
}

impl SessionRequest {
    /// Generation prompt sent to the content provider.
    pub fn prompt(&self) -> String {
        let excluded = if self.exclude_names.is_empty() {
            "none".to_string()
        } else {
            self.exclude_names.join(", ")
        };
        formatdoc! {"
            Generate {count} unique micro-exercises (60 seconds each).
            User Instructions: \"{instructions}\".
            Environment: {environment}.
            Do NOT generate exercises from: {excluded}.
            Return exercises that directly address the user's specific needs.",
            count = self.count,
            instructions = self.custom_instructions.as_deref().unwrap_or_default(),
            environment = self.environment,
        }
    }

    fn delegated_instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanSource {
    Generated,
    Library,
}

/// Selected queue plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub exercises: Vec<Exercise>,
    pub source: PlanSource,
    /// False when a provider call was attempted and did not deliver.
    pub ai_available: bool,
}

impl SessionPlan {
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

/// Selection front-end shared between the foreground and prefetch tasks.
pub struct SessionSelector<P> {
    provider: P,
    library: Vec<Exercise>,
    rng: Mutex<Mcg128Xsl64>,
}

impl<P: ContentProvider> SessionSelector<P> {
    pub fn new(provider: P) -> Self {
        Self::with_rng(provider, Mcg128Xsl64::from_entropy())
    }

    /// Deterministic selection for tests and replays.
    pub fn with_seed(provider: P, seed: u64) -> Self {
        Self::with_rng(provider, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(provider: P, rng: Mcg128Xsl64) -> Self {
        Self {
            provider,
            library: library::builtin().to_vec(),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the built-in library.
    pub fn with_library(mut self, library: Vec<Exercise>) -> Self {
        self.library = library;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn library(&self) -> &[Exercise] {
        &self.library
    }

    /// Produce a session for `request`. Never fails; the result may be short
    /// or empty when the pool is exhausted.
    pub async fn select(&self, request: &SessionRequest) -> SessionPlan {
        if request.delegated_instructions().is_none() {
            return self.select_from_library(request, true);
        }

        match self.provider.generate_session(request).await {
            Ok(generated) if generated.is_empty() => {
                tracing::warn!("provider returned an empty session, using local library");
                self.select_from_library(request, false)
            }
            Ok(generated) => {
                let mut seen = HashSet::new();
                let exercises: Vec<Exercise> = generated
                    .into_iter()
                    .filter(|ex| seen.insert(ex.name.clone()))
                    .collect();
                tracing::debug!(count = exercises.len(), "using generated session");
                SessionPlan {
                    exercises,
                    source: PlanSource::Generated,
                    ai_available: true,
                }
            }
            Err(e) => {
                tracing::warn!("session generation failed, using local library: {e}");
                self.select_from_library(request, false)
            }
        }
    }

    /// Local path only, ignoring custom instructions.
    pub fn select_from_library(&self, request: &SessionRequest, ai_available: bool) -> SessionPlan {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        SessionPlan {
            exercises: select_local(&self.library, request, &mut *rng),
            source: PlanSource::Library,
            ai_available,
        }
    }

    /// Tips for the active session, falling back to the built-in deck.
    pub async fn wisdom_tips(&self, custom_instructions: Option<&str>) -> WisdomDeck {
        match self.provider.generate_wisdom_tips(custom_instructions).await {
            Ok(tips) => WisdomDeck {
                tips,
                ai_available: true,
            },
            Err(e) => {
                tracing::warn!("wisdom generation failed, using built-in tips: {e}");
                WisdomDeck::fallback()
            }
        }
    }
}

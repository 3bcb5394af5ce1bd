//! Playback of one exercise session.

use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;
use crate::selector::{PlanSource, SessionPlan};

/// Outcome of moving past the current exercise.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Another exercise follows.
    Next { index: usize },
    /// The queue is exhausted; `completed` holds the exercises not skipped.
    Finished {
        completed: Vec<Exercise>,
        skipped: usize,
    },
}

/// Queue being played back. Exists only while the app is ACTIVE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSession {
    queue: Vec<Exercise>,
    index: usize,
    completed: Vec<Exercise>,
    skipped: usize,
    source: PlanSource,
    ai_available: bool,
}

impl ActiveSession {
    /// `None` for an empty plan.
    pub fn start(plan: SessionPlan) -> Option<Self> {
        if plan.exercises.is_empty() {
            return None;
        }
        Some(Self {
            queue: plan.exercises,
            index: 0,
            completed: Vec::new(),
            skipped: 0,
            source: plan.source,
            ai_available: plan.ai_available,
        })
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.queue.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queue(&self) -> &[Exercise] {
        &self.queue
    }

    pub fn source(&self) -> PlanSource {
        self.source
    }

    pub fn ai_available(&self) -> bool {
        self.ai_available
    }

    /// Complete or skip the current exercise.
    pub fn advance(&mut self, skipped: bool) -> Advance {
        if let Some(current) = self.queue.get(self.index) {
            if skipped {
                self.skipped += 1;
            } else {
                self.completed.push(current.clone());
            }
        }

        self.index += 1;
        if self.index < self.queue.len() {
            return Advance::Next { index: self.index };
        }

        Advance::Finished {
            completed: std::mem::take(&mut self.completed),
            skipped: self.skipped,
        }
    }
}

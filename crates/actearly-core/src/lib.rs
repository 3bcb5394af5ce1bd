//! # ActEarly Core Library
//!
//! This library provides the core logic of the ActEarly desk-break reminder.
//! It tracks sedentary time, interrupts the user with short guided
//! micro-exercise sessions and keeps a rolling health picture per body
//! region. The `actearly` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Selector**: Local library selection, with delegated generation through
//!   a content provider when the user wrote custom instructions
//! - **Health / Ledger**: Per-part decay, Ergo Score, streaks and daily counts
//!   derived from the append-only exercise log
//! - **Prefetch**: Background selection shortly before a break is due
//! - **Storage**: SQLite key-value and log tables
//!
//! ## Key Components
//!
//! - [`AppContext`]: Owns all mutable state and returns side effects as events
//! - [`BreakTimer`]: Core timer state machine
//! - [`SessionSelector`]: Exercise selection front-end
//! - [`Database`]: Settings, log and snapshot persistence

pub mod app;
pub mod body;
pub mod clock;
pub mod error;
pub mod events;
pub mod exercise;
pub mod health;
pub mod ledger;
pub mod library;
pub mod prefetch;
pub mod selector;
pub mod session;
pub mod settings;
pub mod storage;
pub mod timer;

pub use app::{AppContext, AppSnapshot, Stats, FULL_BODY_COUNT};
pub use body::Category;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ProviderError};
pub use events::Event;
pub use exercise::{Compatibility, Environment, Exercise, Posture};
pub use health::{BodyReport, CelebrationTracker, HealthStatus};
pub use ledger::{BodyPartHistory, ExerciseLogEntry, Ledger};
pub use prefetch::PrefetchCoordinator;
pub use selector::{
    BackendProvider, ContentProvider, PlanSource, SessionPlan, SessionRequest, SessionSelector,
    WisdomDeck, WisdomTip,
};
pub use session::ActiveSession;
pub use settings::{Settings, Theme};
pub use storage::Database;
pub use timer::{AppState, BreakTimer, TimerState};

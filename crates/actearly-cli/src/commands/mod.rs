pub mod config;
pub mod hydration;
pub mod session;
pub mod stats;
pub mod timer;
pub mod tips;
pub mod watch;

//! gradle-step - Gradle CI step
//!
//! Provisions and invokes Gradle for a CI job while caching the Gradle
//! user home between job runs. The host runs `gradle-step run` at the
//! start of the step and `gradle-step save` at the end of the job; the
//! two processes share nothing but a persisted key/value store.

pub mod caching;
pub mod cli;
pub mod config;
pub mod error;
pub mod invoke;
pub mod provision;
pub mod state;
pub mod ui;

pub use error::{StepError, StepResult};

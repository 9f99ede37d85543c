#![forbid(unsafe_code)]

//! Core engine for the Sous cooking assistant.
//!
//! This crate provides:
//! - Timer hints extracted from recipe step text
//! - Immutable step sequences and the cooking session state machine
//! - Lazily finalized countdown timers
//! - An in-memory session store with per-session locking
//! - The `CookingService` façade, configuration, logging and the cooking journal

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod clock;
pub mod extractor;
pub mod steps;
pub mod countdown;
pub mod session;
pub mod store;
pub mod journal;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use clock::{Clock, ManualClock, SystemClock};
pub use extractor::{extract_duration, has_timer, parse_custom_duration};
pub use steps::StepSequence;
pub use countdown::{format_clock, CountdownTimer, MAX_DURATION_SECONDS};
pub use session::{CookingSession, SessionState};
pub use store::{SessionHandle, SessionStore};
pub use journal::{read_records, JsonlSink, RecordSink};
pub use service::CookingService;

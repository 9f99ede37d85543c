//! Cooking service: the operations external callers use.
//!
//! Wraps the session store with:
//! - Timer duration derivation from the current step's text
//! - Idle-session sweeping (run on every new session, no background task)
//! - Journaling of finished and abandoned sessions

use crate::clock::{Clock, SystemClock};
use crate::extractor::duration_or_default;
use crate::journal::{JsonlSink, RecordSink};
use crate::steps::StepSequence;
use crate::store::{lock_session, SessionHandle, SessionStore};
use crate::types::{
    Advance, ArmedTimer, CookingRecord, Recipe, SessionStatus, StartedSession, TimerStatus,
};
use crate::{Config, CookingSession, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct CookingService {
    store: SessionStore,
    clock: Arc<dyn Clock>,
    sink: Option<Arc<dyn RecordSink>>,
    default_timer: Duration,
    idle_timeout: chrono::Duration,
}

impl CookingService {
    /// Service configured from `config`, journaling to the data directory if enabled.
    pub fn new(config: &Config) -> Self {
        let sink: Option<Arc<dyn RecordSink>> = if config.journal.enabled {
            Some(Arc::new(JsonlSink::new(config.journal_path())))
        } else {
            None
        };

        Self {
            store: SessionStore::new(),
            clock: Arc::new(SystemClock),
            sink,
            default_timer: Duration::from_secs(config.timer.default_seconds),
            idle_timeout: chrono::Duration::minutes(
                i64::try_from(config.sessions.idle_timeout_minutes)
                    .unwrap_or(i64::MAX)
                    .min(i64::MAX / 60_000),
            ),
        }
    }

    /// Default settings, no journal.
    pub fn in_memory() -> Self {
        let mut config = Config::default();
        config.journal.enabled = false;
        Self::new(&config)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn journal(&self, record: CookingRecord) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.append(&record) {
                tracing::warn!("Failed to journal session {}: {}", record.session_id, e);
            }
        }
    }

    /// Run `f` on session `id` and refresh its activity stamp if `f` succeeds.
    fn with_active<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut CookingSession, DateTime<Utc>) -> Result<R>,
    ) -> Result<R> {
        let now = self.now();
        self.store.with_session(id, |session| {
            let result = f(session, now)?;
            session.touch(now);
            Ok(result)
        })
    }

    /// Start cooking: register a session on step 1.
    pub fn start_session<I, S>(&self, recipe_name: &str, steps: I) -> Result<StartedSession>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sweep_idle();

        let steps = StepSequence::build(steps)?;
        let handle = self.store.create(steps, recipe_name, self.now());
        let session = lock_session(&handle);
        let step = session.current_step()?;

        tracing::info!(
            "Started {:?} ({} steps) as session {}",
            recipe_name,
            step.total_steps,
            session.id()
        );

        Ok(StartedSession {
            session_id: session.id(),
            recipe_name: session.recipe_name().to_string(),
            step,
        })
    }

    /// Start cooking a recipe as delivered by the recipe service.
    pub fn start_recipe(&self, recipe: &Recipe) -> Result<StartedSession> {
        let steps = recipe.ordered_steps()?;
        self.start_session(&recipe.name, steps)
    }

    /// Move session `id` to its next step.
    ///
    /// Returns [`Advance::Completed`] exactly once; the session then stays
    /// registered, rejecting further work with `SessionAlreadyCompleted`,
    /// until it is ended or swept.
    pub fn advance_session(&self, id: Uuid) -> Result<Advance> {
        let (advance, record) = self.with_active(id, |session, now| {
            let advance = session.advance()?;
            let record = advance.is_completed().then(|| session.to_record(now));
            Ok((advance, record))
        })?;

        if let Some(record) = record {
            tracing::info!("Session {} finished {:?}", id, record.recipe_name);
            self.journal(record);
        }
        Ok(advance)
    }

    /// Arm the countdown for the current step, replacing any running one.
    ///
    /// Without an explicit duration, it is read from the step text, falling
    /// back to the configured default.
    pub fn arm_timer(&self, id: Uuid, duration_seconds: Option<i64>) -> Result<ArmedTimer> {
        let default_timer = self.default_timer;
        self.with_active(id, |session, now| {
            let seconds = match duration_seconds {
                Some(seconds) => seconds,
                None => {
                    let step = session.current_step()?;
                    let derived = duration_or_default(&step.step_text, default_timer);
                    i64::try_from(derived.as_secs()).unwrap_or(i64::MAX)
                }
            };

            let duration_seconds = session.arm_timer(seconds, now)?;
            Ok(ArmedTimer {
                active: true,
                duration_seconds,
            })
        })
    }

    pub fn query_timer(&self, id: Uuid) -> Result<TimerStatus> {
        self.with_active(id, |session, now| session.query_timer(now))
    }

    pub fn cancel_timer(&self, id: Uuid) -> Result<()> {
        self.with_active(id, |session, _| session.cancel_timer())
    }

    pub fn pause_timer(&self, id: Uuid) -> Result<TimerStatus> {
        self.with_active(id, |session, now| session.pause_timer(now))
    }

    pub fn resume_timer(&self, id: Uuid) -> Result<TimerStatus> {
        self.with_active(id, |session, now| session.resume_timer(now))
    }

    /// Read-only view of a session, including completed ones.
    pub fn session_status(&self, id: Uuid) -> Result<SessionStatus> {
        let now = self.now();
        self.store.with_session(id, |session| {
            let completed = session.is_completed();
            let (step, timer) = if completed {
                (None, TimerStatus::inactive())
            } else {
                (Some(session.current_step()?), session.query_timer(now)?)
            };

            Ok(SessionStatus {
                session_id: session.id(),
                recipe_name: session.recipe_name().to_string(),
                completed,
                step,
                timer,
            })
        })
    }

    /// Stop cooking. Idempotent; the id is unknown afterwards, including to
    /// calls already waiting on the session.
    pub fn end_session(&self, id: Uuid) -> Result<()> {
        if let Some(handle) = self.store.evict(id) {
            self.journal_abandoned(&handle);
        }
        Ok(())
    }

    /// Evict sessions idle longer than the configured timeout.
    pub fn sweep_idle(&self) -> Vec<Uuid> {
        let evicted = self.store.evict_idle(self.now(), self.idle_timeout);
        evicted
            .iter()
            .map(|handle| {
                self.journal_abandoned(handle);
                lock_session(handle).id()
            })
            .collect()
    }

    /// Completed sessions were journaled when they finished.
    fn journal_abandoned(&self, handle: &SessionHandle) {
        let record = {
            let session = lock_session(handle);
            if session.is_completed() {
                return;
            }
            session.to_record(self.now())
        };
        self.journal(record);
    }
}

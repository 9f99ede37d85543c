//! Cooking session and its step state machine.
//!
//! A session is either in progress on some step or completed. Advancing is
//! one-directional: there is no way back to an earlier step, and once the
//! cursor moves past the last step the session is terminal.

use crate::countdown::CountdownTimer;
use crate::steps::StepSequence;
use crate::types::{Advance, CookingRecord, StepView, TimerStatus};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    InProgress { index: usize },
    Completed,
}

#[derive(Debug)]
pub struct CookingSession {
    id: Uuid,
    recipe_name: String,
    steps: StepSequence,
    current_index: usize,
    completed: bool,
    ended: bool,
    timer: Option<CountdownTimer>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl CookingSession {
    pub fn new(
        id: Uuid,
        recipe_name: impl Into<String>,
        steps: StepSequence,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recipe_name: recipe_name.into(),
            steps,
            current_index: 0,
            completed: false,
            ended: false,
            timer: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn recipe_name(&self) -> &str {
        &self.recipe_name
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether the session was ended or swept; its id is dead from then on.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Mark the session ended and drop its timer.
    ///
    /// Returns `false` if it was already ended.
    pub fn end(&mut self) -> bool {
        if self.ended {
            return false;
        }
        self.ended = true;
        self.timer = None;
        true
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn state(&self) -> SessionState {
        if self.completed {
            SessionState::Completed
        } else {
            SessionState::InProgress {
                index: self.current_index,
            }
        }
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.completed {
            return Err(Error::SessionAlreadyCompleted(self.id));
        }
        Ok(())
    }

    /// Snapshot of the step at the cursor.
    fn view(&self) -> Result<StepView> {
        let index = self.current_index;
        let lookup = self.steps.text_at(index).and_then(|text| {
            let has_timer = self.steps.has_timer(index)?;
            Ok(StepView {
                step_number: index + 1,
                total_steps: self.steps.len(),
                step_text: text.to_string(),
                has_timer,
            })
        });

        lookup.map_err(|e| {
            tracing::error!("Session {} cursor invariant violated: {}", self.id, e);
            e
        })
    }

    /// Read-only snapshot of the current step.
    pub fn current_step(&self) -> Result<StepView> {
        self.ensure_in_progress()?;
        self.view()
    }

    /// Move to the next step, or complete the session after the last one.
    ///
    /// Completion clears any armed timer. The returned `has_timer` flag is
    /// advisory and arms nothing.
    pub fn advance(&mut self) -> Result<Advance> {
        self.ensure_in_progress()?;

        let next = self.current_index + 1;
        if next >= self.steps.len() {
            self.completed = true;
            self.timer = None;
            tracing::debug!("Session {} completed {:?}", self.id, self.recipe_name);
            return Ok(Advance::Completed);
        }

        self.current_index = next;
        let view = self.view()?;
        tracing::debug!(
            "Session {} advanced to step {}/{}",
            self.id,
            view.step_number,
            view.total_steps
        );
        Ok(Advance::Step(view))
    }

    /// Arm (or re-arm) the countdown for this session.
    pub fn arm_timer(&mut self, duration_seconds: i64, now: DateTime<Utc>) -> Result<u64> {
        self.ensure_in_progress()?;
        let timer = CountdownTimer::arm(duration_seconds, now)?;
        let duration = timer.duration_seconds();

        if self.timer.replace(timer).is_some() {
            tracing::debug!("Session {} timer replaced with {}s", self.id, duration);
        } else {
            tracing::debug!("Session {} timer armed for {}s", self.id, duration);
        }
        Ok(duration)
    }

    pub fn query_timer(&mut self, now: DateTime<Utc>) -> Result<TimerStatus> {
        self.ensure_in_progress()?;
        Ok(self
            .timer
            .as_mut()
            .map(|t| t.query(now))
            .unwrap_or_else(TimerStatus::inactive))
    }

    pub fn cancel_timer(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        if let Some(timer) = self.timer.as_mut() {
            timer.cancel();
        }
        Ok(())
    }

    pub fn pause_timer(&mut self, now: DateTime<Utc>) -> Result<TimerStatus> {
        self.ensure_in_progress()?;
        Ok(self
            .timer
            .as_mut()
            .map(|t| t.pause(now))
            .unwrap_or_else(TimerStatus::inactive))
    }

    pub fn resume_timer(&mut self, now: DateTime<Utc>) -> Result<TimerStatus> {
        self.ensure_in_progress()?;
        Ok(self
            .timer
            .as_mut()
            .map(|t| t.resume(now))
            .unwrap_or_else(TimerStatus::inactive))
    }

    /// Journal entry describing how far this session got.
    pub fn to_record(&self, finished_at: DateTime<Utc>) -> CookingRecord {
        let steps_reached = if self.completed {
            self.steps.len()
        } else {
            self.current_index + 1
        };

        CookingRecord {
            session_id: self.id,
            recipe_name: self.recipe_name.clone(),
            total_steps: self.steps.len(),
            steps_reached,
            completed: self.completed,
            started_at: self.created_at,
            finished_at,
        }
    }
}

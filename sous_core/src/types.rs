//! Core domain types for the Sous cooking engine.
//!
//! This module defines the values that cross the engine boundary:
//! - Recipes as delivered by the recipe service
//! - Step and timer snapshots returned to callers
//! - Cooking records written to the journal

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

// ============================================================================
// Recipe Input
// ============================================================================

/// Step list as delivered by the recipe service.
///
/// Either a plain array or a map keyed by 1-based step number
/// (`{"1": "...", "2": "..."}`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeSteps {
    List(Vec<String>),
    Numbered(BTreeMap<String, String>),
}

/// A structured recipe ready to cook.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub steps: RecipeSteps,
}

impl Recipe {
    /// Load a recipe from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let recipe: Recipe = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded recipe {:?} from {:?}", recipe.name, path);
        Ok(recipe)
    }

    /// Step texts in cooking order.
    ///
    /// Numbered keys are sorted numerically, so "10" follows "9".
    pub fn ordered_steps(&self) -> Result<Vec<String>> {
        match &self.steps {
            RecipeSteps::List(steps) => Ok(steps.clone()),
            RecipeSteps::Numbered(map) => {
                let mut numbered = Vec::with_capacity(map.len());
                for (key, text) in map {
                    let number: u32 = key.trim().parse().map_err(|_| {
                        Error::InvalidRecipe(format!("step key {:?} is not a number", key))
                    })?;
                    numbered.push((number, text.clone()));
                }
                numbered.sort_by_key(|(number, _)| *number);
                Ok(numbered.into_iter().map(|(_, text)| text).collect())
            }
        }
    }
}

// ============================================================================
// Step Snapshots
// ============================================================================

/// The step a session is currently on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepView {
    /// 1-based
    pub step_number: usize,
    pub total_steps: usize,
    pub step_text: String,
    /// Advisory only; never arms a timer by itself
    pub has_timer: bool,
}

/// Outcome of advancing a session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Advance {
    Step(StepView),
    Completed,
}

impl Advance {
    pub fn is_completed(&self) -> bool {
        matches!(self, Advance::Completed)
    }
}

/// Result of starting a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub recipe_name: String,
    pub step: StepView,
}

// ============================================================================
// Timer Snapshots
// ============================================================================

/// Countdown state at the moment of a query.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerStatus {
    pub active: bool,
    pub paused: bool,
    pub remaining_seconds: u64,
}

impl TimerStatus {
    pub fn inactive() -> Self {
        Self {
            active: false,
            paused: false,
            remaining_seconds: 0,
        }
    }
}

/// Confirmation returned when a timer is armed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArmedTimer {
    pub active: bool,
    pub duration_seconds: u64,
}

// ============================================================================
// Session Status and Records
// ============================================================================

/// Full read-only view of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub recipe_name: String,
    pub completed: bool,
    /// Flattened into the status; absent once the session is completed
    #[serde(flatten)]
    pub step: Option<StepView>,
    pub timer: TimerStatus,
}

/// Journal entry for a finished or abandoned session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CookingRecord {
    pub session_id: Uuid,
    pub recipe_name: String,
    pub total_steps: usize,
    /// Highest 1-based step number the cook reached
    pub steps_reached: usize,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

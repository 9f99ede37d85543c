//! Immutable step sequence for one recipe.

use crate::extractor::extract_duration;
use crate::{Error, Result};
use std::time::Duration;

/// A single instruction with its timer hint computed once at build time.
#[derive(Clone, Debug)]
struct Step {
    text: String,
    timer_hint: Option<Duration>,
}

/// Ordered, non-empty list of step texts.
///
/// Indices are 0-based internally; step numbers shown to users are 1-based.
#[derive(Clone, Debug)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    /// Build a sequence, rejecting an empty step list.
    pub fn build<I, S>(steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<Step> = steps
            .into_iter()
            .map(|s| {
                let text = s.into();
                let timer_hint = extract_duration(&text);
                Step { text, timer_hint }
            })
            .collect();

        if steps.is_empty() {
            return Err(Error::InvalidRecipe("recipe has no cooking steps".into()));
        }

        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for a built sequence.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn step(&self, index: usize) -> Result<&Step> {
        self.steps.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    /// Text of the step at `index`.
    pub fn text_at(&self, index: usize) -> Result<&str> {
        self.step(index).map(|s| s.text.as_str())
    }

    /// Whether the step at `index` mentions a wait.
    pub fn has_timer(&self, index: usize) -> Result<bool> {
        self.step(index).map(|s| s.timer_hint.is_some())
    }

    /// Duration extracted from the step at `index`, if any.
    pub fn timer_hint(&self, index: usize) -> Result<Option<Duration>> {
        self.step(index).map(|s| s.timer_hint)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.text.as_str())
    }
}

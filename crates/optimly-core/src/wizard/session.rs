//! Generic linear wizard session.

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::error::{OptimlyError, Result};

/// Describes one multi-step flow: its ordered steps, per-step validation and
/// how the accumulated fields become the finished artifact.
pub trait WizardFlow {
    type Step: Copy + PartialEq + Display + 'static;
    type Fields: Default;
    type Artifact;

    /// Fixed, ordered step list. Must not be empty.
    fn steps(&self) -> &'static [Self::Step];

    /// Checks that `step`'s required inputs are present.
    fn validate(&self, step: Self::Step, fields: &Self::Fields) -> Result<()>;

    /// Packages the fields once the terminal step is reached.
    fn complete(&self, fields: &Self::Fields) -> Result<Self::Artifact>;
}

/// Lifecycle of a wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Completed,
}

/// Result of [`WizardSession::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome<A> {
    /// Moved to the given 1-based step index.
    Moved { step_index: usize },
    /// The terminal step was completed and produced the artifact.
    Completed(A),
}

/// State of one run through a [`WizardFlow`].
///
/// The step index is 1-based and only ever moves by one. Once completed, the
/// session rejects every further change; start a new session to run again.
pub struct WizardSession<F: WizardFlow> {
    flow: F,
    current_step_index: usize,
    fields: F::Fields,
    lifecycle: Lifecycle,
}

impl<F: WizardFlow> WizardSession<F> {
    pub fn new(flow: F) -> Self {
        Self::with_fields(flow, F::Fields::default())
    }

    /// Starts a session with pre-filled fields.
    pub fn with_fields(flow: F, fields: F::Fields) -> Self {
        debug_assert!(!flow.steps().is_empty());
        Self {
            flow,
            current_step_index: 1,
            fields,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn total_steps(&self) -> usize {
        self.flow.steps().len()
    }

    pub fn current_step(&self) -> F::Step {
        self.flow.steps()[self.current_step_index - 1]
    }

    pub fn steps(&self) -> &'static [F::Step] {
        self.flow.steps()
    }

    pub fn is_terminal_step(&self) -> bool {
        self.current_step_index == self.total_steps()
    }

    pub fn is_completed(&self) -> bool {
        self.lifecycle == Lifecycle::Completed
    }

    pub fn fields(&self) -> &F::Fields {
        &self.fields
    }

    /// Mutable access for field-level edits within the current step.
    pub fn fields_mut(&mut self) -> Result<&mut F::Fields> {
        self.ensure_active()?;
        Ok(&mut self.fields)
    }

    /// Moves forward one step, or completes the flow on the terminal step.
    ///
    /// A validation failure leaves the step index unchanged.
    pub fn advance(&mut self) -> Result<AdvanceOutcome<F::Artifact>> {
        self.ensure_active()?;
        if self.is_terminal_step() {
            return self.complete().map(AdvanceOutcome::Completed);
        }

        let step = self.current_step();
        if let Err(err) = self.flow.validate(step, &self.fields) {
            warn!(%step, error = %err, "step validation failed");
            return Err(err);
        }

        self.current_step_index += 1;
        debug!(from = %step, to = %self.current_step(), "wizard advanced");
        Ok(AdvanceOutcome::Moved {
            step_index: self.current_step_index,
        })
    }

    /// Moves back one step. No-op on the first step.
    pub fn retreat(&mut self) -> Result<usize> {
        self.ensure_active()?;
        if self.current_step_index > 1 {
            self.current_step_index -= 1;
            debug!(to = %self.current_step(), "wizard retreated");
        }
        Ok(self.current_step_index)
    }

    /// Packages the accumulated fields and terminates the session.
    pub fn complete(&mut self) -> Result<F::Artifact> {
        self.ensure_active()?;
        if !self.is_terminal_step() {
            return Err(OptimlyError::InvalidStep(format!(
                "cannot complete from step '{}'",
                self.current_step()
            )));
        }

        self.flow.validate(self.current_step(), &self.fields)?;
        let artifact = self.flow.complete(&self.fields)?;
        self.lifecycle = Lifecycle::Completed;
        info!(steps = self.total_steps(), "wizard completed");
        Ok(artifact)
    }

    fn ensure_active(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Completed => Err(OptimlyError::SessionTerminated),
        }
    }
}

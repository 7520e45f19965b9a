//! Generation state machine: `Idle -> Generating -> {Ready, Failed}`.
//!
//! Every trigger hands out a [`GenerationTicket`]. Only the completion that
//! carries the most recent ticket may change state; late answers from
//! superseded requests are dropped.

use serde::{Deserialize, Serialize};

/// Message shown when a failure carries no usable text.
pub const DEFAULT_GENERATION_ERROR: &str = "Generation failed, please try again.";

/// Message shown when generation is triggered without a canvas.
pub const NO_CANVAS_MESSAGE: &str = "No canvas is active.";

/// Phase of the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Generating,
    /// The latest request produced a model.
    Ready,
    /// The latest request failed.
    Failed,
}

/// Result of one successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Backend task identifier.
    pub task_id: String,
    /// URL of the GLB scene.
    pub model_url: String,
    /// URL of the printable STL.
    pub stl_url: String,
    /// Optional status message from the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Token identifying one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    /// Raw sequence number.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GenerationTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of the generation result and the error message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationState {
    phase: GenerationPhase,
    result: Option<GenerationResult>,
    error: Option<String>,
    issued: u64,
}

impl GenerationState {
    /// Create an idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// The live result, if any.
    #[must_use]
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// The current error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.phase == GenerationPhase::Generating
    }

    /// Enter `Generating`, clearing the previous error. Returns the new ticket.
    pub fn begin(&mut self) -> GenerationTicket {
        self.issued += 1;
        self.phase = GenerationPhase::Generating;
        self.error = None;
        let ticket = GenerationTicket(self.issued);
        tracing::debug!("Generation {ticket} started");
        ticket
    }

    /// Whether `ticket` belongs to the most recent request.
    #[must_use]
    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Complete a request successfully.
    ///
    /// Returns `false` and changes nothing when the ticket is stale.
    pub fn succeed(&mut self, ticket: GenerationTicket, result: GenerationResult) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!("Dropping stale generation result {ticket} (task {})", result.task_id);
            return false;
        }
        tracing::info!("Generation {ticket} ready: task {}", result.task_id);
        self.phase = GenerationPhase::Ready;
        self.result = Some(result);
        self.error = None;
        true
    }

    /// Complete a request with a failure message.
    ///
    /// An empty message is replaced by [`DEFAULT_GENERATION_ERROR`]. Returns
    /// `false` and changes nothing when the ticket is stale.
    pub fn fail(&mut self, ticket: GenerationTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!("Dropping stale generation failure {ticket}");
            return false;
        }
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_GENERATION_ERROR.to_string()
        } else {
            message
        };
        tracing::info!("Generation {ticket} failed: {message}");
        self.phase = GenerationPhase::Failed;
        self.result = None;
        self.error = Some(message);
        true
    }

    /// Record an error from a side action (download, missing canvas).
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Clear the error after a successful action.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Discard the live result (the drawing was cleared).
    ///
    /// An in-flight request is invalidated as well.
    pub fn discard_result(&mut self) {
        if self.phase == GenerationPhase::Generating {
            self.issued += 1;
        }
        self.result = None;
        self.phase = GenerationPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(task: &str) -> GenerationResult {
        GenerationResult {
            task_id: task.to_string(),
            model_url: format!("/outputs/{task}_model.glb"),
            stl_url: format!("/outputs/{task}_model.stl"),
            message: None,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut state = GenerationState::new();
        assert_eq!(state.phase(), GenerationPhase::Idle);

        let ticket = state.begin();
        assert!(state.is_generating());
        assert!(state.succeed(ticket, result("t1")));
        assert_eq!(state.phase(), GenerationPhase::Ready);
        assert_eq!(state.result().map(|r| r.task_id.as_str()), Some("t1"));
    }

    #[test]
    fn test_begin_clears_error() {
        let mut state = GenerationState::new();
        let ticket = state.begin();
        state.fail(ticket, "boom");
        assert_eq!(state.error(), Some("boom"));
        state.begin();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_failure_drops_result() {
        let mut state = GenerationState::new();
        let first = state.begin();
        state.succeed(first, result("t1"));
        let second = state.begin();
        assert!(state.fail(second, "backend down"));
        assert!(state.result().is_none());
        assert_eq!(state.phase(), GenerationPhase::Failed);
    }

    #[test]
    fn test_empty_failure_message_falls_back() {
        let mut state = GenerationState::new();
        let ticket = state.begin();
        state.fail(ticket, "  ");
        assert_eq!(state.error(), Some(DEFAULT_GENERATION_ERROR));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut state = GenerationState::new();
        let old = state.begin();
        let new = state.begin();

        assert!(state.succeed(new, result("fresh")));
        assert!(!state.succeed(old, result("stale")));
        assert!(!state.fail(old, "late error"));

        assert_eq!(state.result().map(|r| r.task_id.as_str()), Some("fresh"));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_discard_invalidates_in_flight() {
        let mut state = GenerationState::new();
        let ticket = state.begin();
        state.discard_result();
        assert!(!state.succeed(ticket, result("late")));
        assert!(state.result().is_none());
        assert_eq!(state.phase(), GenerationPhase::Idle);
    }
}

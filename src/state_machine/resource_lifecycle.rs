// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cloud Resource Lifecycle State Machine
//!
//! # States
//!
//! - Creating: create call submitted
//! - Active: exists and is managed by the deployment
//! - Failed: creation failed (may hold partial state)
//! - Deleting: delete call submitted
//! - Deleted: removed (terminal)
//! - Retained: left in the account and no longer managed (terminal)
//!
//! # Inputs
//!
//! - Complete: Creating → Active
//! - Fail: Creating → Failed, Deleting → Active (delete refused)
//! - Update: Active → Active (idempotent reapplication)
//! - BeginDelete: Active | Failed → Deleting
//! - FinishDelete: Deleting → Deleted
//! - Retain: Active | Failed → Retained

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};

/// Lifecycle state of a provisioned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    Creating,
    Active,
    Failed,
    Deleting,
    Deleted,
    Retained,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Lifecycle command (FSM input)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    Complete,
    Fail(String),
    Update,
    BeginDelete,
    FinishDelete,
    Retain,
}

impl fmt::Display for LifecycleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail(_) => f.write_str("Fail"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// Transition output with metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionOutput {
    pub warnings: Vec<String>,
    /// The transition changed or lost real cloud state
    pub is_critical: bool,
}

impl TransitionOutput {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn with_warnings(warnings: Vec<String>) -> Self {
        Self {
            warnings,
            is_critical: false,
        }
    }

    pub fn critical(warnings: Vec<String>) -> Self {
        Self {
            warnings,
            is_critical: true,
        }
    }
}

impl StateMachine for ResourceState {
    type Input = LifecycleCommand;
    type Output = TransitionOutput;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use LifecycleCommand::*;
        use ResourceState::*;

        match (self, input) {
            (Deleted | Retained, _) => Err(TransitionError::Terminal(self.to_string())),

            (Creating, Complete) => Ok((Active, TransitionOutput::ok())),
            (Creating, Fail(reason)) => Ok((
                Failed,
                TransitionOutput::critical(vec![format!("Creation failed: {}", reason)]),
            )),

            (Active, Update) => Ok((Active, TransitionOutput::ok())),
            (Active | Failed, BeginDelete) => Ok((Deleting, TransitionOutput::ok())),
            (Active | Failed, Retain) => Ok((
                Retained,
                TransitionOutput::with_warnings(vec![
                    "Resource left in the account".to_string()
                ]),
            )),

            (Deleting, FinishDelete) => Ok((Deleted, TransitionOutput::critical(Vec::new()))),
            (Deleting, Fail(reason)) => Ok((
                Active,
                TransitionOutput::with_warnings(vec![format!("Deletion refused: {}", reason)]),
            )),

            (from, input) => Err(TransitionError::InvalidTransition {
                from: from.to_string(),
                input: input.to_string(),
            }),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, ResourceState::Deleted | ResourceState::Retained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creating_to_active() {
        let (state, output) = ResourceState::Creating
            .transition(&LifecycleCommand::Complete)
            .expect("Transition should succeed");

        assert_eq!(state, ResourceState::Active);
        assert!(!output.is_critical);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_creation_failure_is_critical() {
        let (state, output) = ResourceState::Creating
            .transition(&LifecycleCommand::Fail("quota".to_string()))
            .unwrap();

        assert_eq!(state, ResourceState::Failed);
        assert!(output.is_critical);
        assert_eq!(output.warnings, vec!["Creation failed: quota".to_string()]);
    }

    #[test]
    fn test_delete_cycle() {
        let (state, _) = ResourceState::Active
            .transition(&LifecycleCommand::BeginDelete)
            .unwrap();
        assert_eq!(state, ResourceState::Deleting);

        let (state, _) = state.transition(&LifecycleCommand::FinishDelete).unwrap();
        assert_eq!(state, ResourceState::Deleted);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_refused_delete_returns_to_active() {
        let (state, output) = ResourceState::Deleting
            .transition(&LifecycleCommand::Fail("not empty".to_string()))
            .unwrap();
        assert_eq!(state, ResourceState::Active);
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for state in [ResourceState::Deleted, ResourceState::Retained] {
            assert!(matches!(
                state.transition(&LifecycleCommand::Update),
                Err(TransitionError::Terminal(_))
            ));
            assert!(!state.can_transition(&LifecycleCommand::BeginDelete));
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(matches!(
            ResourceState::Creating.transition(&LifecycleCommand::BeginDelete),
            Err(TransitionError::InvalidTransition { .. })
        ));
        assert!(!ResourceState::Active.can_transition(&LifecycleCommand::Complete));
        assert!(!ResourceState::Failed.can_transition(&LifecycleCommand::Update));
    }
}

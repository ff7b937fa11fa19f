// State history for stepping backward

use super::{AlgorithmState, StepId};

/// LIFO stack of frozen states, one per executed step
///
/// Each entry is the state captured just before its step ran, so the stack is always a
/// prefix of the execution trace in execution order.
#[derive(Debug, Default)]
pub struct StateHistory {
    states: Vec<AlgorithmState>,
}

impl StateHistory {
    pub fn new() -> Self {
        StateHistory { states: Vec::new() }
    }

    /// Push a state, freezing it if the caller has not done so yet
    pub fn push(&mut self, mut state: AlgorithmState) {
        if !state.is_frozen() {
            state.freeze();
        }
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<AlgorithmState> {
        self.states.pop()
    }

    /// The most recently pushed state
    pub fn top(&self) -> Option<&AlgorithmState> {
        self.states.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut AlgorithmState> {
        self.states.last_mut()
    }

    /// Step of the most recently pushed state
    pub fn top_step(&self) -> Option<StepId> {
        self.top().map(AlgorithmState::step)
    }

    /// Get the number of states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Total encoded size of all frozen payloads
    pub fn memory_usage(&self) -> usize {
        self.states.iter().map(AlgorithmState::payload_len).sum()
    }

    /// Steps in push order, oldest first
    pub fn steps(&self) -> Vec<StepId> {
        self.states.iter().map(AlgorithmState::step).collect()
    }
}

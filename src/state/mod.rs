//! Algorithm state snapshots
//!
//! This module provides the data the runtime environment records while an algorithm runs:
//! - [`StepId`]: identifier of one step of the algorithm, with a [`StepId::NONE`] sentinel
//! - [`AlgorithmState`]: a freezable capture of the variables an algorithm registers
//! - [`value`]: the tagged [`StateValue`] stored per variable
//! - [`history`]: the LIFO [`StateHistory`] used for stepping backward
//!
//! # Freeze / unfreeze
//!
//! A snapshot accepts new variables until [`AlgorithmState::freeze`] encodes them into an
//! opaque payload. [`AlgorithmState::unfreeze`] decodes the payload again, so every call
//! reverts whatever was done to the live fields since the freeze:
//!
//! ```text
//! add(..) → freeze() → get_mut(..) edits → unfreeze() → fields == frozen values
//! ```

pub mod history;
pub mod value;

use rustc_hash::FxHashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

pub use history::StateHistory;
pub use value::StateValue;

/// Identifier of a step in the algorithm's step sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(i32);

impl StepId {
    /// No step: the initial state, or "finished" when returned as a next step
    pub const NONE: StepId = StepId(-1);

    pub const fn new(id: i32) -> Self {
        StepId(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether this identifies an actual step (anything but [`StepId::NONE`])
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "<none>")
        }
    }
}

impl From<i32> for StepId {
    fn from(id: i32) -> Self {
        StepId(id)
    }
}

/// Errors raised while filling or encoding a snapshot
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("cannot add '{key}': state of step {step} is frozen")]
    Frozen { key: String, step: StepId },

    #[error("failed to encode state: {0}")]
    Encode(String),

    #[error("failed to decode state: {0}")]
    Decode(String),
}

/// Scratch objects attached to a snapshot
///
/// Attachments live only as long as the snapshot object itself. They are never part of the
/// frozen payload and are not carried over by [`Clone`].
#[derive(Default)]
pub struct Attachments {
    objects: FxHashMap<String, Box<dyn Any + Send>>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an object, returning whether a previous object under `key` was replaced
    pub fn insert<T: Any + Send>(&mut self, key: impl Into<String>, object: T) -> bool {
        self.objects.insert(key.into(), Box::new(object)).is_some()
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.objects.get(key).and_then(|o| o.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.objects.get_mut(key).and_then(|o| o.downcast_mut::<T>())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.objects.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl fmt::Debug for Attachments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.objects.keys()).finish()
    }
}

/// Snapshot of the variables an algorithm registered for one step
#[derive(Debug)]
pub struct AlgorithmState {
    /// Name of the plugin whose algorithm produced this state
    plugin: String,
    /// The step this state belongs to
    step: StepId,
    /// Live field values
    fields: BTreeMap<String, StateValue>,
    /// Encoded fields, written by `freeze`
    payload: Vec<u8>,
    frozen: bool,
    attachments: Attachments,
}

impl AlgorithmState {
    /// Create an empty, unfrozen state
    pub fn new(plugin: impl Into<String>, step: StepId) -> Self {
        AlgorithmState {
            plugin: plugin.into(),
            step,
            fields: BTreeMap::new(),
            payload: Vec::new(),
            frozen: false,
            attachments: Attachments::new(),
        }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Register a variable. Rejected once the state is frozen.
    pub fn add(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StateValue>,
    ) -> Result<&mut Self, StateError> {
        let key = key.into();
        if self.frozen {
            return Err(StateError::Frozen {
                key,
                step: self.step,
            });
        }
        self.fields.insert(key, value.into());
        Ok(self)
    }

    /// Register an arbitrary serializable object, stored as [`StateValue::Bytes`]
    pub fn add_object<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        object: &T,
    ) -> Result<&mut Self, StateError> {
        let bytes = bincode::serde::encode_to_vec(object, bincode::config::standard())
            .map_err(|e| StateError::Encode(e.to_string()))?;
        self.add(key, StateValue::Bytes(bytes))
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.fields.get(key)
    }

    /// Mutable access to a live field. Changes survive only until the next `unfreeze`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut StateValue> {
        self.fields.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(StateValue::as_bool)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(StateValue::as_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(StateValue::as_float)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StateValue::as_text)
    }

    pub fn int_list(&self, key: &str) -> Option<Vec<i64>> {
        self.get(key).and_then(StateValue::to_int_vec)
    }

    /// Decode an object registered with [`add_object`](Self::add_object)
    pub fn object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get(key)? {
            StateValue::Bytes(bytes) => {
                bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                    .map(|(object, _)| object)
                    .ok()
            }
            _ => None,
        }
    }

    /// Encode the current fields into the payload and stop accepting new variables.
    ///
    /// On encoding failure the previous payload is kept and a warning is logged.
    pub fn freeze(&mut self) {
        match bincode::serde::encode_to_vec(&self.fields, bincode::config::standard()) {
            Ok(payload) => self.payload = payload,
            Err(e) => warn!(
                "Failed to freeze state of step {} ({}): {}",
                self.step, self.plugin, e
            ),
        }
        self.frozen = true;
    }

    /// Re-derive the fields from the frozen payload.
    ///
    /// Safe to call any number of times; a never-frozen state is left untouched. On decoding
    /// failure the fields keep their current (possibly stale) values and a warning is logged.
    pub fn unfreeze(&mut self) {
        if !self.frozen {
            return;
        }
        match bincode::serde::decode_from_slice::<BTreeMap<String, StateValue>, _>(
            &self.payload,
            bincode::config::standard(),
        ) {
            Ok((fields, _)) => self.fields = fields,
            Err(e) => warn!(
                "Failed to unfreeze state of step {} ({}): {}",
                self.step, self.plugin, e
            ),
        }
    }

    /// Size of the frozen payload in bytes
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }

    pub(crate) fn take_attachments(&mut self) -> Attachments {
        std::mem::take(&mut self.attachments)
    }

    pub(crate) fn set_attachments(&mut self, attachments: Attachments) {
        self.attachments = attachments;
    }
}

impl Clone for AlgorithmState {
    fn clone(&self) -> Self {
        AlgorithmState {
            plugin: self.plugin.clone(),
            step: self.step,
            fields: self.fields.clone(),
            payload: self.payload.clone(),
            frozen: self.frozen,
            attachments: Attachments::new(),
        }
    }
}

//! Per-run execution state.
//!
//! A program is immutable; everything that changes while it runs lives
//! here. Keeping the state outside the executor is what makes a run
//! resumable: after a `Yield`, the embedder keeps the state, optionally
//! replaces [`result`](ProgramState::result), and executes again.

use std::rc::Rc;

use crate::command::Command;
use crate::outcome::Outcome;
use crate::value::Value;

pub struct ProgramState {
    /// Never empty; the first frame is the root frame.
    frames: Vec<Vec<Value>>,
    pub(crate) pc: usize,
    pub(crate) cc: usize,
    pub(crate) command: Option<Rc<dyn Command>>,
    pub(crate) result: Outcome,
}

impl Default for ProgramState {
    fn default() -> Self {
        ProgramState {
            frames: vec![Vec::new()],
            pc: 0,
            cc: 0,
            command: None,
            result: Outcome::nil(),
        }
    }
}

impl ProgramState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next opcode to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Index of the next constant to push.
    pub fn cc(&self) -> usize {
        self.cc
    }

    /// The last command dispatched by `EvaluateSentence`.
    pub fn command(&self) -> Option<&Rc<dyn Command>> {
        self.command.as_ref()
    }

    /// The last result produced.
    pub fn result(&self) -> &Outcome {
        &self.result
    }

    /// Replace the last result, e.g. to pass a value back into a yielded
    /// command before resuming.
    pub fn set_result(&mut self, result: Outcome) {
        self.result = result;
    }

    /// Values of the innermost frame.
    pub fn frame(&self) -> &[Value] {
        self.frames.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of open frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push(&mut self, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(value);
        }
    }

    pub(crate) fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.extend(values);
        }
    }

    /// Pop the innermost frame's last value, nil when there is none.
    pub(crate) fn pop(&mut self) -> Value {
        self.frames
            .last_mut()
            .and_then(Vec::pop)
            .unwrap_or_default()
    }

    pub(crate) fn open_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Close the innermost frame. `None` when only the root frame is left.
    pub(crate) fn close_frame(&mut self) -> Option<Vec<Value>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Last value left in the root frame once the program has run out.
    pub(crate) fn last_value(&self) -> Option<&Value> {
        self.frames.first().and_then(|frame| frame.last())
    }
}

//! Compiled programs.
//!
//! A program is a flat list of opcodes plus a constant pool. Opcodes carry
//! no operands: `PushConstant` takes the next constant in pool order, and
//! everything else works on the executor's frame stack.

use std::rc::Rc;

use helena_ir::{Source, SourcePosition};

use crate::value::Value;

/// Executor instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Push nil onto the current frame.
    PushNil,
    /// Push the next constant.
    PushConstant,
    /// Start a new frame.
    OpenFrame,
    /// Close the current frame and push its values as a tuple.
    CloseFrame,
    /// Pop a value, resolve it as a variable reference, push the result.
    ResolveValue,
    /// Pop a tuple and push its elements into the current frame.
    ExpandValue,
    /// Pop a value and push a qualified value with it as source.
    SetSource,
    /// Pop an index, then a value; push the value selected by index.
    SelectIndex,
    /// Pop a key tuple, then a value; push the value selected by keys.
    SelectKeys,
    /// Pop a rule tuple, then a value; push the value selected by rules.
    SelectRules,
    /// Pop a tuple and execute it as a command invocation.
    EvaluateSentence,
    /// Push the value of the last result.
    PushResult,
    /// Pop a tuple and push the concatenation of its string forms.
    JoinStrings,
}

/// Compiled, immutable program. Safe to execute any number of times,
/// each run with its own [`ProgramState`](crate::ProgramState).
#[derive(Clone, Debug, Default)]
pub struct Program {
    op_codes: Vec<OpCode>,
    positions: Vec<Option<SourcePosition>>,
    constants: Vec<Value>,
    source: Option<Rc<Source>>,
}

impl Program {
    pub(crate) fn new(source: Option<Rc<Source>>) -> Self {
        Program {
            source,
            ..Program::default()
        }
    }

    pub(crate) fn push_op_code(&mut self, op_code: OpCode, position: Option<SourcePosition>) {
        self.op_codes.push(op_code);
        self.positions.push(position);
    }

    pub(crate) fn push_constant(&mut self, value: Value) {
        self.constants.push(value);
    }

    pub fn op_codes(&self) -> &[OpCode] {
        &self.op_codes
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    /// Source position of the construct that emitted opcode `pc`.
    pub fn position(&self, pc: usize) -> Option<SourcePosition> {
        self.positions.get(pc).copied().flatten()
    }

    pub fn source(&self) -> Option<&Rc<Source>> {
        self.source.as_ref()
    }

    pub fn len(&self) -> usize {
        self.op_codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.op_codes.is_empty()
    }
}

//! AST to opcode compiler.
//!
//! Emission per construct:
//!
//! | construct                  | opcodes                                                  |
//! |----------------------------|----------------------------------------------------------|
//! | script                     | per sentence, then `PushResult` (`PushNil` if empty)     |
//! | sentence                   | `OpenFrame` words `CloseFrame` `EvaluateSentence`        |
//! | literal, here/tagged string| `PushConstant`                                           |
//! | block                      | `PushConstant` (script value)                            |
//! | tuple                      | `OpenFrame` words `CloseFrame`                           |
//! | expression                 | the nested script, inline                                |
//! | string, compound word      | `OpenFrame` stems `CloseFrame` `JoinStrings`             |
//! | qualified word             | source `SetSource` selectors                             |
//! | substitution               | source `ResolveValue` selectors, one more `ResolveValue` per extra `$`, `ExpandValue` for `$*` |
//! | keys / rules / index       | `... SelectKeys` / `... SelectRules` / `... SelectIndex` |
//!
//! An expression used as a substitution source is not resolved: `$[cmd]`
//! is the result of `cmd`.

use std::rc::Rc;

use helena_ir::{Morpheme, MorphemeKind, Script, Sentence, Source, SourcePosition, Word};
use helena_parse::{SyntaxChecker, WordType};
use thiserror::Error;
use tracing::debug;

use crate::program::{OpCode, Program};
use crate::value::Value;

/// Failure to compile a word the syntax checker rejects.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("invalid word structure")]
    InvalidWord { position: Option<SourcePosition> },
    #[error("unexpected {kind} morpheme")]
    UnexpectedMorpheme {
        kind: &'static str,
        position: Option<SourcePosition>,
    },
}

impl CompileError {
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            CompileError::InvalidWord { position }
            | CompileError::UnexpectedMorpheme { position, .. } => *position,
        }
    }
}

/// Stateless compiler. Every program it produces carries `source`, so
/// errors raised while executing it can point back at the script.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    source: Option<Rc<Source>>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: Rc<Source>) -> Self {
        Compiler {
            source: Some(source),
        }
    }

    pub fn source(&self) -> Option<&Rc<Source>> {
        self.source.as_ref()
    }

    /// Compile a script; the program's result is its last sentence's.
    pub fn compile_script(&self, script: &Script) -> Result<Program, CompileError> {
        self.emit_with(|e| e.script(script))
    }

    /// Compile a single sentence into a program that evaluates it.
    pub fn compile_sentence(&self, sentence: &Sentence) -> Result<Program, CompileError> {
        self.emit_with(|e| {
            e.sentence(sentence)?;
            e.op(OpCode::PushResult, sentence.position);
            Ok(())
        })
    }

    /// Compile sentences into a program whose value is the tuple of all
    /// their words. Nothing is evaluated as a command.
    pub fn compile_sentences(&self, sentences: &[Sentence]) -> Result<Program, CompileError> {
        self.emit_with(|e| {
            let position = sentences.first().and_then(|s| s.position);
            e.op(OpCode::OpenFrame, position);
            for sentence in sentences {
                e.words(&sentence.words)?;
            }
            e.op(OpCode::CloseFrame, position);
            Ok(())
        })
    }

    /// Compile a single word into a program producing its value.
    pub fn compile_word(&self, word: &Word) -> Result<Program, CompileError> {
        self.emit_with(|e| e.word(word))
    }

    /// Program producing `value` as-is.
    pub fn compile_constant(&self, value: Value) -> Program {
        let mut program = Program::new(self.source.clone());
        program.push_op_code(OpCode::PushConstant, None);
        program.push_constant(value);
        program
    }

    fn emit_with(
        &self,
        f: impl FnOnce(&mut Emitter) -> Result<(), CompileError>,
    ) -> Result<Program, CompileError> {
        let mut emitter = Emitter {
            program: Program::new(self.source.clone()),
        };
        f(&mut emitter)?;
        debug!(
            ops = emitter.program.len(),
            constants = emitter.program.constants().len(),
            "compiled"
        );
        Ok(emitter.program)
    }
}

struct Emitter {
    program: Program,
}

impl Emitter {
    fn op(&mut self, op_code: OpCode, position: Option<SourcePosition>) {
        self.program.push_op_code(op_code, position);
    }

    fn constant(&mut self, value: Value, position: Option<SourcePosition>) {
        self.op(OpCode::PushConstant, position);
        self.program.push_constant(value);
    }

    fn script(&mut self, script: &Script) -> Result<(), CompileError> {
        let Some(last) = script.sentences.last() else {
            self.op(OpCode::PushNil, script.position);
            return Ok(());
        };
        for sentence in &script.sentences {
            self.sentence(sentence)?;
        }
        self.op(OpCode::PushResult, last.position);
        Ok(())
    }

    fn sentence(&mut self, sentence: &Sentence) -> Result<(), CompileError> {
        self.op(OpCode::OpenFrame, sentence.position);
        self.words(&sentence.words)?;
        self.op(OpCode::CloseFrame, sentence.position);
        self.op(OpCode::EvaluateSentence, sentence.position);
        Ok(())
    }

    fn words(&mut self, words: &[Word]) -> Result<(), CompileError> {
        words.iter().try_for_each(|word| self.word(word))
    }

    fn word(&mut self, word: &Word) -> Result<(), CompileError> {
        let morphemes = word.morphemes.as_slice();
        match SyntaxChecker::check_word(word) {
            WordType::Root => match morphemes.first() {
                Some(root) => self.root(root),
                None => Err(CompileError::InvalidWord {
                    position: word.position,
                }),
            },
            WordType::Compound => {
                self.op(OpCode::OpenFrame, word.position);
                self.stems(morphemes)?;
                self.op(OpCode::CloseFrame, word.position);
                self.op(OpCode::JoinStrings, word.position);
                Ok(())
            }
            WordType::Substitution => self.substitution(morphemes),
            WordType::Qualified => self.qualified(morphemes),
            WordType::Ignored => Ok(()),
            WordType::Invalid => Err(CompileError::InvalidWord {
                position: word.position,
            }),
        }
    }

    fn root(&mut self, morpheme: &Morpheme) -> Result<(), CompileError> {
        let position = morpheme.position;
        match &morpheme.kind {
            MorphemeKind::Literal(value)
            | MorphemeKind::HereString { value, .. }
            | MorphemeKind::TaggedString { value, .. } => {
                self.constant(Value::string(value.as_str()), position);
            }
            MorphemeKind::Tuple(script) => self.tuple(script, position)?,
            MorphemeKind::Block { subscript, value } => {
                self.constant(
                    Value::script(Rc::clone(subscript), Some(value.clone())),
                    position,
                );
            }
            MorphemeKind::Expression(script) => self.script(script)?,
            MorphemeKind::String(parts) => {
                self.op(OpCode::OpenFrame, position);
                self.stems(parts)?;
                self.op(OpCode::CloseFrame, position);
                self.op(OpCode::JoinStrings, position);
            }
            other => return Err(unexpected(other, position)),
        }
        Ok(())
    }

    fn tuple(
        &mut self,
        script: &Script,
        position: Option<SourcePosition>,
    ) -> Result<(), CompileError> {
        self.op(OpCode::OpenFrame, position);
        for sentence in &script.sentences {
            self.words(&sentence.words)?;
        }
        self.op(OpCode::CloseFrame, position);
        Ok(())
    }

    /// Literal text, expressions and substitutions of a compound word or
    /// a quoted string, each pushing one string part.
    fn stems(&mut self, morphemes: &[Morpheme]) -> Result<(), CompileError> {
        let mut rest = morphemes;
        while let Some(first) = rest.first() {
            let length = match &first.kind {
                MorphemeKind::Literal(value) => {
                    self.constant(Value::string(value.as_str()), first.position);
                    1
                }
                MorphemeKind::Expression(script) => {
                    self.script(script)?;
                    1
                }
                MorphemeKind::SubstituteNext { .. } => {
                    let length = SyntaxChecker::substitution_length(rest).ok_or(
                        CompileError::InvalidWord {
                            position: first.position,
                        },
                    )?;
                    self.substitution(&rest[..length])?;
                    length
                }
                other => return Err(unexpected(other, first.position)),
            };
            rest = &rest[length..];
        }
        Ok(())
    }

    fn substitution(&mut self, morphemes: &[Morpheme]) -> Result<(), CompileError> {
        let [marker, source, selectors @ ..] = morphemes else {
            return Err(CompileError::InvalidWord {
                position: morphemes.first().and_then(|m| m.position),
            });
        };
        let MorphemeKind::SubstituteNext {
            expansion, levels, ..
        } = marker.kind
        else {
            return Err(unexpected(&marker.kind, marker.position));
        };
        let position = marker.position;
        match &source.kind {
            MorphemeKind::Literal(name) => {
                self.constant(Value::string(name.as_str()), source.position);
                self.op(OpCode::ResolveValue, position);
            }
            MorphemeKind::Tuple(script) => {
                self.tuple(script, source.position)?;
                self.op(OpCode::ResolveValue, position);
            }
            MorphemeKind::Block { value, .. } => {
                self.constant(Value::string(value.as_str()), source.position);
                self.op(OpCode::ResolveValue, position);
            }
            MorphemeKind::Expression(script) => self.script(script)?,
            other => return Err(unexpected(other, source.position)),
        }
        self.selectors(selectors)?;
        for _ in 1..levels {
            self.op(OpCode::ResolveValue, position);
        }
        if expansion {
            self.op(OpCode::ExpandValue, position);
        }
        Ok(())
    }

    fn qualified(&mut self, morphemes: &[Morpheme]) -> Result<(), CompileError> {
        let Some((source, selectors)) = morphemes.split_first() else {
            return Err(CompileError::InvalidWord { position: None });
        };
        match &source.kind {
            MorphemeKind::Literal(value) | MorphemeKind::Block { value, .. } => {
                self.constant(Value::string(value.as_str()), source.position);
            }
            MorphemeKind::Tuple(script) => self.tuple(script, source.position)?,
            other => return Err(unexpected(other, source.position)),
        }
        self.op(OpCode::SetSource, source.position);
        self.selectors(selectors)
    }

    fn selectors(&mut self, selectors: &[Morpheme]) -> Result<(), CompileError> {
        selectors.iter().try_for_each(|s| self.selector(s))
    }

    fn selector(&mut self, morpheme: &Morpheme) -> Result<(), CompileError> {
        let position = morpheme.position;
        match &morpheme.kind {
            MorphemeKind::Tuple(script) => {
                self.tuple(script, position)?;
                self.op(OpCode::SelectKeys, position);
            }
            MorphemeKind::Block { subscript, .. } => {
                self.op(OpCode::OpenFrame, position);
                for rule in &subscript.sentences {
                    self.op(OpCode::OpenFrame, rule.position);
                    self.words(&rule.words)?;
                    self.op(OpCode::CloseFrame, rule.position);
                }
                self.op(OpCode::CloseFrame, position);
                self.op(OpCode::SelectRules, position);
            }
            MorphemeKind::Expression(script) => {
                self.script(script)?;
                self.op(OpCode::SelectIndex, position);
            }
            other => return Err(unexpected(other, position)),
        }
        Ok(())
    }
}

#[cold]
fn unexpected(kind: &MorphemeKind, position: Option<SourcePosition>) -> CompileError {
    CompileError::UnexpectedMorpheme {
        kind: kind.name(),
        position,
    }
}

//! Code generator: VM instructions → Hack assembly.
//!
//! `CodeWriter` owns all state of one translation run: the label counters,
//! the name of the unit being translated (qualifies `static` symbols) and
//! the name of the enclosing function (qualifies user labels). Every
//! operation appends complete lines to the sink and never reads it back.

mod hack;
mod labels;

use std::io::Write;

use crate::config::TranslateOptions;
use crate::error::{Result, TranslateError};
use crate::instruction::{Addressing, ArithOp, Instruction, OpShape, Segment, StackOp};

use hack::{Asm, ARG, FRAME_WORDS, LCL, R13, R14, SP, THAT, THIS};
pub use labels::{LabelCounters, LabelKind};

pub struct CodeWriter<W: Write> {
    out: W,
    options: TranslateOptions,
    labels: LabelCounters,
    unit_name: Option<String>,
    current_function: String,
    /// Assembly lines written so far.
    lines_written: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, TranslateOptions::default())
    }

    pub fn with_options(out: W, options: TranslateOptions) -> Self {
        Self {
            out,
            options,
            labels: LabelCounters::new(),
            unit_name: None,
            current_function: String::new(),
            lines_written: 0,
        }
    }

    /// Set the unit whose instructions follow. Only `static` addressing
    /// depends on it.
    pub fn set_unit_name(&mut self, name: &str) {
        tracing::debug!(unit = name, "translating unit");
        self.unit_name = Some(name.to_string());
    }

    /// Function opened by the most recent `function` instruction; empty before any.
    pub fn current_function(&self) -> &str {
        &self.current_function
    }

    pub fn labels(&self) -> &LabelCounters {
        &self.labels
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush the sink and hand it back.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        tracing::debug!(lines = self.lines_written, labels = %self.labels, "translation finished");
        Ok(self.out)
    }

    /// Translate one instruction.
    pub fn translate(&mut self, instruction: &Instruction) -> Result<()> {
        if self.options.annotate {
            let mut asm = Asm::new();
            asm.comment(instruction);
            self.emit(&asm)?;
        }
        match instruction {
            Instruction::Arithmetic(op) => self.write_arithmetic(*op),
            Instruction::Push(segment, index) => {
                self.write_push_pop(StackOp::Push, *segment, *index)
            }
            Instruction::Pop(segment, index) => self.write_push_pop(StackOp::Pop, *segment, *index),
            Instruction::Label(name) => self.write_label(name),
            Instruction::Goto(name) => self.write_goto(name),
            Instruction::IfGoto(name) => self.write_if_goto(name),
            Instruction::Function { name, locals } => self.write_function(name, *locals),
            Instruction::Call { name, args } => self.write_call(name, *args),
            Instruction::Return => self.write_return(),
        }
    }

    /// Bootstrap prologue: `SP = stack_base`, then call the entry function.
    /// Must come before anything else and at most once.
    pub fn write_init(&mut self) -> Result<()> {
        if self.lines_written > 0 {
            return Err(TranslateError::Misuse(
                "bootstrap must be the first code of a run".to_string(),
            ));
        }
        let mut asm = Asm::new();
        if self.options.annotate {
            asm.comment("bootstrap");
        }
        asm.at(self.options.stack_base)
            .line("D=A")
            .at(SP)
            .line("M=D");
        self.emit(&asm)?;
        let entry = self.options.entry.clone();
        self.write_call(&entry, 0)
    }

    pub fn write_arithmetic(&mut self, op: ArithOp) -> Result<()> {
        let mut asm = Asm::new();
        match op.shape() {
            OpShape::Binary(comp) => {
                asm.binary_operands().line(format!("M={}", comp));
            }
            OpShape::Unary(comp) => {
                asm.unary_operand().line(format!("M={}", comp));
            }
            OpShape::Compare(jump) => {
                let n = self.labels.next(LabelKind::Comparison);
                asm.binary_operands()
                    .line("D=M-D")
                    .at(format!("TRUE_{}", n))
                    .line(format!("D;{}", jump))
                    .at(SP)
                    .line("A=M-1")
                    .line("M=0")
                    .jump(format!("END_{}", n))
                    .label(format!("TRUE_{}", n))
                    .at(SP)
                    .line("A=M-1")
                    .line("M=-1")
                    .label(format!("END_{}", n));
            }
        }
        self.emit(&asm)
    }

    /// Push or pop. The target address is computed before SP moves; a pop
    /// parks it in R13 because popping needs D.
    pub fn write_push_pop(&mut self, op: StackOp, segment: Segment, index: u16) -> Result<()> {
        let mut asm = Asm::new();
        match segment.addressing() {
            Addressing::Constant => {
                if op == StackOp::Pop {
                    return Err(TranslateError::Misuse(
                        "pop into the constant segment".to_string(),
                    ));
                }
                asm.at(index);
            }
            Addressing::Indirect(register) => {
                asm.address_at(register, index);
            }
            Addressing::Fixed(register) => {
                asm.address_of(register, index);
            }
            Addressing::Static => {
                let unit = self.unit_name.as_deref().ok_or_else(|| {
                    TranslateError::Misuse(format!(
                        "static {} used before a unit name was set",
                        index
                    ))
                })?;
                asm.at(format!("{}.{}", unit, index));
            }
        }

        match op {
            StackOp::Push => {
                let load = if segment == Segment::Constant {
                    "D=A"
                } else {
                    "D=M"
                };
                asm.line(load).push_d();
            }
            StackOp::Pop => {
                asm.line("D=A")
                    .at(R13)
                    .line("M=D")
                    .pop_d()
                    .at(R13)
                    .line("A=M")
                    .line("M=D");
            }
        }
        self.emit(&asm)
    }

    pub fn write_label(&mut self, name: &str) -> Result<()> {
        let mut asm = Asm::new();
        asm.label(self.scoped_label(name));
        self.emit(&asm)
    }

    pub fn write_goto(&mut self, name: &str) -> Result<()> {
        let mut asm = Asm::new();
        asm.jump(self.scoped_label(name));
        self.emit(&asm)
    }

    /// Pop the condition; jump when it is nonzero, fall through on false (0).
    pub fn write_if_goto(&mut self, name: &str) -> Result<()> {
        let n = self.labels.next(LabelKind::IfFalse);
        let skip = format!("IF_FALSE_{}", n);
        let mut asm = Asm::new();
        asm.pop_d()
            .at(&skip)
            .line("D;JEQ")
            .jump(self.scoped_label(name))
            .label(&skip);
        self.emit(&asm)
    }

    /// Calling sequence: push the return address and the caller's LCL, ARG,
    /// THIS, THAT; LCL = SP; ARG = SP - args - 5; jump; define the return site.
    pub fn write_call(&mut self, name: &str, args: u16) -> Result<()> {
        let n = self.labels.next(LabelKind::ReturnSite);
        let return_site = format!("RETURN_{}", n);
        let mut asm = Asm::new();
        asm.at(&return_site).line("D=A").push_d();
        for register in [LCL, ARG, THIS, THAT] {
            asm.push_register(register);
        }
        asm.at(SP)
            .line("D=M")
            .at(LCL)
            .line("M=D")
            .at(args)
            .line("D=D-A")
            .at(FRAME_WORDS)
            .line("D=D-A")
            .at(ARG)
            .line("M=D")
            .jump(name)
            .label(&return_site);
        self.emit(&asm)
    }

    /// Epilogue. The return address is read before the return value is
    /// stored, since with zero arguments `*ARG` is the return-address slot.
    pub fn write_return(&mut self) -> Result<()> {
        let mut asm = Asm::new();
        asm.at(LCL)
            .line("D=M")
            .at(R13)
            .line("M=D")
            .at(FRAME_WORDS)
            .line("A=D-A")
            .line("D=M")
            .at(R14)
            .line("M=D")
            .pop_d()
            .at(ARG)
            .line("A=M")
            .line("M=D")
            .line("D=A+1")
            .at(SP)
            .line("M=D")
            .restore_from_frame(THAT, 1)
            .restore_from_frame(THIS, 2)
            .restore_from_frame(ARG, 3)
            .restore_from_frame(LCL, 4)
            .at(R14)
            .line("A=M")
            .line("0;JMP");
        self.emit(&asm)
    }

    /// Entry label, then a counted loop pushing `locals` zeros.
    pub fn write_function(&mut self, name: &str, locals: u16) -> Result<()> {
        let n = self.labels.next(LabelKind::LocalsLoop);
        let start = format!("START_LOOP_{}", n);
        let end = format!("END_LOOP_{}", n);
        let mut asm = Asm::new();
        asm.label(name)
            .at(locals)
            .line("D=A")
            .label(&start)
            .at(&end)
            .line("D;JLE")
            .line("D=D-1")
            .at(R13)
            .line("M=D")
            .at(0)
            .line("D=A")
            .push_d()
            .at(R13)
            .line("D=M")
            .jump(&start)
            .label(&end);
        self.emit(&asm)?;
        tracing::trace!(function = name, locals, "entered function");
        self.current_function = name.to_string();
        Ok(())
    }

    fn scoped_label(&self, name: &str) -> String {
        format!("{}.{}", self.current_function, name)
    }

    fn emit(&mut self, asm: &Asm) -> Result<()> {
        for line in asm.lines() {
            writeln!(self.out, "{}", line)?;
        }
        self.lines_written += asm.lines().len();
        Ok(())
    }
}

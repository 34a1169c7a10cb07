//! Hack machine vocabulary: fixed registers and the instruction fragments
//! every VM instruction is assembled from.

use std::fmt::Display;

pub(crate) const SP: &str = "SP";
pub(crate) const LCL: &str = "LCL";
pub(crate) const ARG: &str = "ARG";
pub(crate) const THIS: &str = "THIS";
pub(crate) const THAT: &str = "THAT";
/// Scratch: pop target address, frame pointer in `return`, loop count in `function`.
pub(crate) const R13: &str = "R13";
/// Scratch: return address in `return`.
pub(crate) const R14: &str = "R14";

/// Words a call pushes below the callee frame: return address, LCL, ARG, THIS, THAT.
pub(crate) const FRAME_WORDS: u16 = 5;

/// Assembly lines for one VM instruction, built fragment by fragment.
#[derive(Debug, Default)]
pub(crate) struct Asm {
    lines: Vec<String>,
}

impl Asm {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    pub(crate) fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    /// `@value`: load a symbol or constant into A.
    pub(crate) fn at(&mut self, value: impl Display) -> &mut Self {
        self.line(format!("@{}", value))
    }

    /// `(name)`: define a label.
    pub(crate) fn label(&mut self, name: impl Display) -> &mut Self {
        self.line(format!("({})", name))
    }

    pub(crate) fn comment(&mut self, text: impl Display) -> &mut Self {
        self.line(format!("// {}", text))
    }

    /// *SP = D; SP++
    pub(crate) fn push_d(&mut self) -> &mut Self {
        self.at(SP).line("A=M").line("M=D").at(SP).line("M=M+1")
    }

    /// SP--; D = *SP
    pub(crate) fn pop_d(&mut self) -> &mut Self {
        self.at(SP).line("M=M-1").line("A=M").line("D=M")
    }

    /// SP--; D = top; A = address of the second operand.
    pub(crate) fn binary_operands(&mut self) -> &mut Self {
        self.at(SP)
            .line("M=M-1")
            .line("A=M")
            .line("D=M")
            .line("A=A-1")
    }

    /// A = address of the top of stack.
    pub(crate) fn unary_operand(&mut self) -> &mut Self {
        self.at(SP).line("A=M").line("A=A-1")
    }

    /// A = RAM[register] + offset
    pub(crate) fn address_at(&mut self, register: &str, offset: u16) -> &mut Self {
        self.at(register).line("D=M").at(offset).line("A=D+A")
    }

    /// A = address of register + offset
    pub(crate) fn address_of(&mut self, register: &str, offset: u16) -> &mut Self {
        self.at(register).line("D=A").at(offset).line("A=D+A")
    }

    /// D = RAM[register]; push D
    pub(crate) fn push_register(&mut self, register: &str) -> &mut Self {
        self.at(register).line("D=M").push_d()
    }

    /// register = RAM[RAM[R13] - offset], R13 holding the callee frame pointer.
    pub(crate) fn restore_from_frame(&mut self, register: &str, offset: u16) -> &mut Self {
        self.at(R13)
            .line("D=M")
            .at(offset)
            .line("A=D-A")
            .line("D=M")
            .at(register)
            .line("M=D")
    }

    /// Unconditional jump to `target`.
    pub(crate) fn jump(&mut self, target: impl Display) -> &mut Self {
        self.at(target).line("0;JMP")
    }
}

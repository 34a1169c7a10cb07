//! Instruction vocabulary of the VM language.
//!
//! Every string-keyed choice in the input (command keyword, operator,
//! segment) resolves to a closed enum here, so the generator matches
//! exhaustively and unknown names surface as reader errors.

use std::fmt;

/// Largest value a Hack A-instruction can load (15 bits).
pub const MAX_CONSTANT: u16 = 0x7FFF;

/// The nine instruction kinds of the VM language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    IfGoto,
    Function,
    Call,
    Return,
}

impl CommandKind {
    /// Match a lowercased command keyword. Arithmetic mnemonics map to
    /// `Arithmetic`; the operator itself comes from `ArithOp::from_name`.
    pub fn from_keyword(s: &str) -> Option<CommandKind> {
        if ArithOp::from_name(s).is_some() {
            return Some(CommandKind::Arithmetic);
        }
        match s {
            "push" => Some(CommandKind::Push),
            "pop" => Some(CommandKind::Pop),
            "label" => Some(CommandKind::Label),
            "goto" => Some(CommandKind::Goto),
            "if-goto" => Some(CommandKind::IfGoto),
            "function" => Some(CommandKind::Function),
            "call" => Some(CommandKind::Call),
            "return" => Some(CommandKind::Return),
            _ => None,
        }
    }
}

/// Arithmetic and logical operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

/// How an operator uses the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpShape {
    /// Pops two, pushes the combined value: `M=<comp>` on the second operand.
    Binary(&'static str),
    /// Rewrites the top value in place.
    Unary(&'static str),
    /// Pops two, pushes true/false chosen by a conditional jump.
    Compare(&'static str),
}

impl ArithOp {
    pub fn from_name(s: &str) -> Option<ArithOp> {
        match s {
            "add" => Some(ArithOp::Add),
            "sub" => Some(ArithOp::Sub),
            "neg" => Some(ArithOp::Neg),
            "eq" => Some(ArithOp::Eq),
            "gt" => Some(ArithOp::Gt),
            "lt" => Some(ArithOp::Lt),
            "and" => Some(ArithOp::And),
            "or" => Some(ArithOp::Or),
            "not" => Some(ArithOp::Not),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Neg => "neg",
            ArithOp::Eq => "eq",
            ArithOp::Gt => "gt",
            ArithOp::Lt => "lt",
            ArithOp::And => "and",
            ArithOp::Or => "or",
            ArithOp::Not => "not",
        }
    }

    /// Operator → Hack computation (or jump mnemonic for comparisons).
    pub fn shape(self) -> OpShape {
        match self {
            ArithOp::Add => OpShape::Binary("D+M"),
            ArithOp::Sub => OpShape::Binary("M-D"),
            ArithOp::And => OpShape::Binary("D&M"),
            ArithOp::Or => OpShape::Binary("D|M"),
            ArithOp::Neg => OpShape::Unary("-M"),
            ArithOp::Not => OpShape::Unary("!M"),
            ArithOp::Eq => OpShape::Compare("JEQ"),
            ArithOp::Gt => OpShape::Compare("JGT"),
            ArithOp::Lt => OpShape::Compare("JLT"),
        }
    }
}

/// Named memory segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Local,
    Argument,
    This,
    That,
    Pointer,
    Temp,
    Static,
}

/// How a segment turns an index into a RAM address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addressing {
    /// No address; the index itself is the value.
    Constant,
    /// `*base + index`, base held in the named pointer register.
    Indirect(&'static str),
    /// `&base + index`, base is the address of the named register.
    Fixed(&'static str),
    /// `<unit>.<index>`, a symbol allocated by the assembler.
    Static,
}

impl Segment {
    pub fn from_name(s: &str) -> Option<Segment> {
        match s {
            "constant" => Some(Segment::Constant),
            "local" => Some(Segment::Local),
            "argument" => Some(Segment::Argument),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "pointer" => Some(Segment::Pointer),
            "temp" => Some(Segment::Temp),
            "static" => Some(Segment::Static),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
            Segment::Static => "static",
        }
    }

    pub fn addressing(self) -> Addressing {
        match self {
            Segment::Constant => Addressing::Constant,
            Segment::Local => Addressing::Indirect("LCL"),
            Segment::Argument => Addressing::Indirect("ARG"),
            Segment::This => Addressing::Indirect("THIS"),
            Segment::That => Addressing::Indirect("THAT"),
            // THIS lives at RAM[3], temp starts at RAM[5].
            Segment::Pointer => Addressing::Fixed("THIS"),
            Segment::Temp => Addressing::Fixed("R5"),
            Segment::Static => Addressing::Static,
        }
    }
}

/// Direction of a stack transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackOp {
    Push,
    Pop,
}

/// One parsed VM instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Arithmetic(ArithOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, locals: u16 },
    Call { name: String, args: u16 },
    Return,
}

impl Instruction {
    pub fn kind(&self) -> CommandKind {
        match self {
            Instruction::Arithmetic(_) => CommandKind::Arithmetic,
            Instruction::Push(..) => CommandKind::Push,
            Instruction::Pop(..) => CommandKind::Pop,
            Instruction::Label(_) => CommandKind::Label,
            Instruction::Goto(_) => CommandKind::Goto,
            Instruction::IfGoto(_) => CommandKind::IfGoto,
            Instruction::Function { .. } => CommandKind::Function,
            Instruction::Call { .. } => CommandKind::Call,
            Instruction::Return => CommandKind::Return,
        }
    }

    /// Operator name, segment name, label or function name; empty for `return`.
    pub fn primary(&self) -> &str {
        match self {
            Instruction::Arithmetic(op) => op.name(),
            Instruction::Push(seg, _) | Instruction::Pop(seg, _) => seg.name(),
            Instruction::Label(name)
            | Instruction::Goto(name)
            | Instruction::IfGoto(name)
            | Instruction::Function { name, .. }
            | Instruction::Call { name, .. } => name,
            Instruction::Return => "",
        }
    }

    /// Segment index, local count or argument count; 0 when unused.
    pub fn secondary(&self) -> u16 {
        match self {
            Instruction::Push(_, index) | Instruction::Pop(_, index) => *index,
            Instruction::Function { locals, .. } => *locals,
            Instruction::Call { args, .. } => *args,
            _ => 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            CommandKind::Arithmetic => write!(f, "{}", self.primary()),
            CommandKind::Push => write!(f, "push {} {}", self.primary(), self.secondary()),
            CommandKind::Pop => write!(f, "pop {} {}", self.primary(), self.secondary()),
            CommandKind::Label => write!(f, "label {}", self.primary()),
            CommandKind::Goto => write!(f, "goto {}", self.primary()),
            CommandKind::IfGoto => write!(f, "if-goto {}", self.primary()),
            CommandKind::Function => {
                write!(f, "function {} {}", self.primary(), self.secondary())
            }
            CommandKind::Call => write!(f, "call {} {}", self.primary(), self.secondary()),
            CommandKind::Return => write!(f, "return"),
        }
    }
}

//! Translator from the stack-based VM language to Hack assembly.
//!
//! `reader` turns one unit of VM text into instructions, `codegen` lowers
//! them onto the Hack machine, and `api` runs whole files and directories
//! through one `CodeWriter` per run.

pub mod api;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod instruction;
pub mod reader;
pub mod span;

pub use api::*;
pub use codegen::CodeWriter;
pub use config::TranslateOptions;
pub use error::{Result, SyntaxErrorKind, TranslateError};
pub use instruction::{ArithOp, CommandKind, Instruction, Segment, StackOp};
pub use reader::Reader;

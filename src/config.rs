//! Run configuration.

/// Initial stack pointer of the Hack platform.
pub const DEFAULT_STACK_BASE: u16 = 256;

/// Function the bootstrap prologue calls.
pub const DEFAULT_ENTRY: &str = "Sys.init";

/// Options for one translation run.
#[derive(Clone, Debug)]
pub struct TranslateOptions {
    /// Emit the prologue (`SP = stack_base`, then `call <entry> 0`) before the first unit.
    pub bootstrap: bool,
    /// Precede the code of each instruction with a `// <vm text>` comment.
    pub annotate: bool,
    pub entry: String,
    pub stack_base: u16,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            bootstrap: true,
            annotate: false,
            entry: DEFAULT_ENTRY.to_string(),
            stack_base: DEFAULT_STACK_BASE,
        }
    }
}

impl TranslateOptions {
    /// Options for translating a program fragment with no entry function.
    pub fn without_bootstrap() -> Self {
        Self {
            bootstrap: false,
            ..Self::default()
        }
    }
}

use std::path::PathBuf;

use clap::Args;

use vmtranslate::config::{DEFAULT_ENTRY, DEFAULT_STACK_BASE};
use vmtranslate::TranslateOptions;

use super::exit_with;

#[derive(Args)]
pub struct BuildArgs {
    /// Input .vm file or directory of .vm files
    pub input: PathBuf,
    /// Output .asm file (default: <input>.asm, or <dir>/<dir>.asm)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Skip the bootstrap prologue (SP setup and call to the entry function)
    #[arg(long)]
    pub no_bootstrap: bool,
    /// Precede each instruction's code with its VM source as a comment
    #[arg(long)]
    pub annotate: bool,
    /// Function called by the bootstrap prologue
    #[arg(long, default_value = DEFAULT_ENTRY)]
    pub entry: String,
    /// Initial stack pointer
    #[arg(long, default_value_t = DEFAULT_STACK_BASE)]
    pub stack_base: u16,
}

pub fn cmd_build(args: BuildArgs) {
    let BuildArgs {
        input,
        output,
        no_bootstrap,
        annotate,
        entry,
        stack_base,
    } = args;

    let options = TranslateOptions {
        bootstrap: !no_bootstrap,
        annotate,
        entry,
        stack_base,
    };
    let out_path = output.unwrap_or_else(|| vmtranslate::default_output_path(&input));

    match vmtranslate::translate_path(&input, &out_path, &options) {
        Ok(summary) => eprintln!(
            "Translated {} unit(s), {} instructions -> {}",
            summary.units,
            summary.instructions,
            summary.output.display()
        ),
        Err(err) => exit_with(&err),
    }
}

use std::path::PathBuf;

use clap::Args;

use super::exit_with;

#[derive(Args)]
pub struct CheckArgs {
    /// Input .vm file or directory of .vm files
    pub input: PathBuf,
}

pub fn cmd_check(args: CheckArgs) {
    let CheckArgs { input } = args;

    match vmtranslate::check_path(&input) {
        Ok(summary) => eprintln!(
            "OK: {} ({} unit(s), {} instructions)",
            input.display(),
            summary.units,
            summary.instructions
        ),
        Err(err) => exit_with(&err),
    }
}

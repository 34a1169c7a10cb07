pub mod build;
pub mod check;

use std::process;

use vmtranslate::TranslateError;

/// Report a fatal error and exit. Located errors were already rendered
/// against their source, so only the rest get a plain message.
pub fn exit_with(err: &TranslateError) -> ! {
    if err.span().is_none() {
        eprintln!("error: {}", err);
    }
    process::exit(1);
}

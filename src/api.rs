//! Translation pipeline: discover units, read them, drive one `CodeWriter`
//! per run, and write the output file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::codegen::CodeWriter;
use crate::config::TranslateOptions;
use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::error::{Result, TranslateError};
use crate::reader::Reader;

/// Extension of VM source units.
pub const VM_EXTENSION: &str = "vm";
/// Extension of the generated assembly.
pub const ASM_EXTENSION: &str = "asm";

/// One input unit: its name (qualifies `static` symbols) and source text.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.{}", name, VM_EXTENSION)),
            source: source.to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| TranslateError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            name: unit_name(path),
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render a located error against this unit's source.
    pub fn report(&self, err: &TranslateError) {
        if let Some(diag) = Diagnostic::from_error(err) {
            diag.render(&self.path.display().to_string(), &self.source);
        }
    }

    /// Render reader warnings against this unit's source.
    pub fn warn(&self, warnings: &[Diagnostic]) {
        render_diagnostics(warnings, &self.path.display().to_string(), &self.source);
    }
}

/// Outcome of a successful `translate_path`.
#[derive(Clone, Debug)]
pub struct TranslateSummary {
    pub output: PathBuf,
    pub units: usize,
    pub instructions: usize,
    pub lines: usize,
    /// Generated-label numbers issued: one per comparison, if-goto, call and function.
    pub labels: u32,
}

/// Outcome of a successful `check_path`.
#[derive(Clone, Debug)]
pub struct CheckSummary {
    pub units: usize,
    pub instructions: usize,
}

/// Unit name of a source path: the file name without its extension.
pub fn unit_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Translate every instruction of one unit into `writer`. Returns the
/// number of instructions translated. Warnings and located errors are
/// rendered against the unit's source.
pub fn translate_source<W: Write>(
    writer: &mut CodeWriter<W>,
    unit: &SourceUnit,
) -> Result<usize> {
    writer.set_unit_name(&unit.name);
    let mut reader = Reader::new(&unit.source);
    let mut count = 0;
    let outcome = reader.by_ref().try_for_each(|instruction| -> Result<()> {
        writer.translate(&instruction?.node)?;
        count += 1;
        Ok(())
    });
    unit.warn(&reader.take_warnings());
    if let Err(err) = outcome {
        unit.report(&err);
        return Err(err);
    }
    tracing::debug!(unit = %unit.name, instructions = count, "unit translated");
    Ok(count)
}

/// Assembly text and counts of one finished run.
struct Translation {
    asm: Vec<u8>,
    instructions: usize,
    lines: usize,
    labels: u32,
}

/// Drive one `CodeWriter` over the units in order, bootstrap first when enabled.
fn translate_all(units: &[SourceUnit], options: &TranslateOptions) -> Result<Translation> {
    let mut writer = CodeWriter::with_options(Vec::new(), options.clone());
    if options.bootstrap {
        writer.write_init()?;
    }
    let mut instructions = 0;
    for unit in units {
        instructions += translate_source(&mut writer, unit)?;
    }
    let lines = writer.lines_written();
    let labels = writer.labels().total();
    let asm = writer.finish()?;
    Ok(Translation {
        asm,
        instructions,
        lines,
        labels,
    })
}

/// Translate units in order into one assembly program, with the bootstrap
/// prologue first when enabled.
pub fn translate_units(units: &[SourceUnit], options: &TranslateOptions) -> Result<String> {
    let translation = translate_all(units, options)?;
    Ok(String::from_utf8_lossy(&translation.asm).into_owned())
}

/// Resolve an input path to the units of one run: the file itself, or every
/// `.vm` file directly inside a directory, sorted by path.
pub fn resolve_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let entries = fs::read_dir(input).map_err(|source| TranslateError::Open {
            path: input.to_path_buf(),
            source,
        })?;
        let mut files = vm_files(input, entries.map(|entry| entry.map(|e| e.path())))?;
        files.sort();
        if files.is_empty() {
            return Err(TranslateError::NoInputs {
                path: input.to_path_buf(),
            });
        }
        return Ok(files);
    }

    if !has_vm_extension(input) {
        return Err(TranslateError::NoInputs {
            path: input.to_path_buf(),
        });
    }
    Ok(vec![input.to_path_buf()])
}

/// `Foo.vm` → `Foo.asm` beside it; directory `Prog/` → `Prog/Prog.asm`.
pub fn default_output_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .or_else(|| {
                input
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            })
            .unwrap_or_else(|| "out".to_string());
        input.join(format!("{}.{}", name, ASM_EXTENSION))
    } else {
        input.with_extension(ASM_EXTENSION)
    }
}

/// Translate a file or directory into `output`. Located errors are rendered
/// to stderr before returning. Nothing is written unless every unit succeeds.
pub fn translate_path(
    input: &Path,
    output: &Path,
    options: &TranslateOptions,
) -> Result<TranslateSummary> {
    let units = load_units(input)?;
    let translation = translate_all(&units, options)?;

    fs::write(output, &translation.asm).map_err(|source| TranslateError::Open {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::info!(
        output = %output.display(),
        units = units.len(),
        instructions = translation.instructions,
        lines = translation.lines,
        labels = translation.labels,
        "assembly written"
    );

    Ok(TranslateSummary {
        output: output.to_path_buf(),
        units: units.len(),
        instructions: translation.instructions,
        lines: translation.lines,
        labels: translation.labels,
    })
}

/// Parse every unit of a file or directory without generating code.
pub fn check_path(input: &Path) -> Result<CheckSummary> {
    let units = load_units(input)?;
    let mut instructions = 0;
    for unit in &units {
        let mut reader = Reader::new(&unit.source);
        let outcome = reader
            .by_ref()
            .try_for_each(|instruction| instruction.map(|_| instructions += 1));
        unit.warn(&reader.take_warnings());
        if let Err(err) = outcome {
            unit.report(&err);
            return Err(err);
        }
    }
    Ok(CheckSummary {
        units: units.len(),
        instructions,
    })
}

fn load_units(input: &Path) -> Result<Vec<SourceUnit>> {
    let paths = resolve_inputs(input)?;
    tracing::debug!(count = paths.len(), input = %input.display(), "resolved inputs");
    paths.iter().map(|p| SourceUnit::load(p)).collect()
}

/// Regular `.vm` files among directory entries. A failed entry fails the run.
fn vm_files(
    dir: &Path,
    entries: impl Iterator<Item = io::Result<PathBuf>>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| TranslateError::Open {
            path: dir.to_path_buf(),
            source,
        })?;
        if path.is_file() && has_vm_extension(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn has_vm_extension(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == VM_EXTENSION)
}

use crate::error::{SyntaxErrorKind, TranslateError};
use crate::span::Span;

/// A translator diagnostic (error or warning) tied to a source line.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Diagnostic {
    pub fn error(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn warning(message: String, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    /// Build a diagnostic for errors that point at a source line.
    /// I/O and misuse errors have no location and yield `None`.
    pub fn from_error(err: &TranslateError) -> Option<Self> {
        match err {
            TranslateError::Syntax { kind, span, .. } => {
                let diag = Diagnostic::error(err.to_string(), *span);
                Some(match kind {
                    SyntaxErrorKind::NotACommand(_) => diag.with_help(
                        "commands are: add sub neg eq gt lt and or not, push, pop, \
                         label, goto, if-goto, function, call, return"
                            .to_string(),
                    ),
                    SyntaxErrorKind::UnknownSegment(_) => diag.with_help(
                        "segments are: constant local argument this that pointer temp static"
                            .to_string(),
                    ),
                    SyntaxErrorKind::PopConstant => diag
                        .with_note("the constant segment has no storage".to_string()),
                    SyntaxErrorKind::MissingArguments => diag.with_help(
                        "push/pop take a segment and an index; function/call take a name \
                         and a count"
                            .to_string(),
                    ),
                    SyntaxErrorKind::UnknownToken(_) => diag,
                })
            }
            TranslateError::MalformedInteger { span, .. } => Some(
                Diagnostic::error(err.to_string(), *span).with_note(format!(
                    "expected a decimal integer between 0 and {} ({} for static)",
                    crate::instruction::MAX_CONSTANT,
                    u16::MAX
                )),
            ),
            _ => None,
        }
    }

    /// Render the diagnostic to stderr using ariadne.
    pub fn render(&self, filename: &str, source: &str) {
        use ariadne::{Color, Label, Report, ReportKind, Source};

        let kind = match self.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
        };

        let color = match self.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
        };

        let mut report = Report::build(kind, filename, self.span.start as usize)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.start as usize..self.span.end as usize))
                    .with_message(&self.message)
                    .with_color(color),
            );

        for note in &self.notes {
            report = report.with_note(note);
        }

        if let Some(help) = &self.help {
            report = report.with_help(help);
        }

        if let Err(e) = report.finish().eprint((filename, Source::from(source))) {
            tracing::warn!("cannot render diagnostic: {}", e);
        }
    }
}

/// Render a list of diagnostics.
pub fn render_diagnostics(diagnostics: &[Diagnostic], filename: &str, source: &str) {
    for diag in diagnostics {
        diag.render(filename, source);
    }
}

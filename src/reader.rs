//! Instruction reader: one unit of VM source text → `Spanned<Instruction>`.
//!
//! The reader always holds the next non-blank, comment-stripped line in
//! `current`, so `has_more` is a plain check and `advance` parses the held
//! line before looking ahead again.


use crate::diagnostic::Diagnostic;
use crate::error::{Result, SyntaxErrorKind, TranslateError};
use crate::instruction::{ArithOp, CommandKind, Instruction, Segment, MAX_CONSTANT};
use crate::span::{Span, Spanned};

/// A logical line: code part only, trimmed, with its location.
struct Line<'src> {
    number: u32,
    text: &'src str,
    /// Byte offset of `text` within the whole unit.
    offset: usize,
}

#[derive(Clone, Copy)]
struct Token<'src> {
    text: &'src str,
    span: Span,
}

pub struct Reader<'src> {
    source: &'src str,
    /// Start of the next unread physical line.
    pos: usize,
    /// Number of physical lines consumed so far, blank and comment lines included.
    line: u32,
    current: Option<Line<'src>>,
    warnings: Vec<Diagnostic>,
}

impl<'src> Reader<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut reader = Self {
            source,
            pos: 0,
            line: 0,
            current: None,
            warnings: Vec::new(),
        };
        reader.advance_to_next_line();
        reader
    }

    /// Whether another instruction is available.
    pub fn has_more(&self) -> bool {
        self.current.is_some()
    }

    /// Parse the next instruction. Calling this when `has_more` is false
    /// is a misuse error.
    pub fn advance(&mut self) -> Result<Spanned<Instruction>> {
        let line = self
            .current
            .take()
            .ok_or_else(|| TranslateError::Misuse("advance past end of input".to_string()))?;
        self.advance_to_next_line();
        parse_line(&line, &mut self.warnings)
    }

    /// Warnings raised by the lines read so far, oldest first.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    fn advance_to_next_line(&mut self) {
        while self.pos < self.source.len() {
            let rest = &self.source[self.pos..];
            let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            let offset = self.pos;
            let raw = &rest[..len];
            self.pos += len;
            self.line += 1;

            let code = raw.find("//").map_or(raw, |i| &raw[..i]);
            let leading = code.len() - code.trim_start().len();
            let text = code.trim();
            if !text.is_empty() {
                self.current = Some(Line {
                    number: self.line,
                    text,
                    offset: offset + leading,
                });
                return;
            }
        }
        self.current = None;
    }
}

impl<'src> Iterator for Reader<'src> {
    type Item = Result<Spanned<Instruction>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_more() {
            Some(self.advance())
        } else {
            None
        }
    }
}

/// Parse a whole unit, stopping at the first error.
pub fn parse_source(source: &str) -> Result<Vec<Spanned<Instruction>>> {
    Reader::new(source).collect()
}

fn parse_line(line: &Line<'_>, warnings: &mut Vec<Diagnostic>) -> Result<Spanned<Instruction>> {
    let tokens = split_tokens(line);
    let (head, rest) = tokens
        .split_first()
        .ok_or_else(|| TranslateError::Misuse("parse of an empty line".to_string()))?;
    let span = rest.last().map_or(head.span, |last| head.span.merge(last.span));
    let keyword = head.text.to_lowercase();

    let kind = CommandKind::from_keyword(&keyword).ok_or_else(|| {
        TranslateError::syntax(SyntaxErrorKind::NotACommand(keyword.clone()), head.span)
    })?;

    let node = match kind {
        CommandKind::Arithmetic => {
            if let Some(extra) = rest.first() {
                return Err(unknown_token(extra));
            }
            let op = ArithOp::from_name(&keyword).ok_or_else(|| {
                TranslateError::syntax(SyntaxErrorKind::NotACommand(keyword.clone()), head.span)
            })?;
            Instruction::Arithmetic(op)
        }
        CommandKind::Push | CommandKind::Pop => {
            let (segment, index) = match rest {
                [segment, index] => (segment, index),
                [_, _, extra, ..] => return Err(unknown_token(extra)),
                _ => {
                    return Err(TranslateError::syntax(
                        SyntaxErrorKind::MissingArguments,
                        span,
                    ))
                }
            };
            let seg = Segment::from_name(segment.text).ok_or_else(|| {
                TranslateError::syntax(
                    SyntaxErrorKind::UnknownSegment(segment.text.to_string()),
                    segment.span,
                )
            })?;
            // Static indices become symbol names, not `@N` literals.
            let limit = if seg == Segment::Static {
                u16::MAX
            } else {
                MAX_CONSTANT
            };
            let index = parse_integer(index, limit)?;
            if kind == CommandKind::Push {
                Instruction::Push(seg, index)
            } else if seg == Segment::Constant {
                return Err(TranslateError::syntax(
                    SyntaxErrorKind::PopConstant,
                    segment.span,
                ));
            } else {
                Instruction::Pop(seg, index)
            }
        }
        CommandKind::Label | CommandKind::Goto | CommandKind::IfGoto => {
            let (label, tail) = rest.split_first().ok_or_else(|| {
                TranslateError::syntax(SyntaxErrorKind::MissingArguments, span)
            })?;
            warn_trailing(&keyword, tail, warnings);
            let label = label.text.to_string();
            match kind {
                CommandKind::Label => Instruction::Label(label),
                CommandKind::Goto => Instruction::Goto(label),
                _ => Instruction::IfGoto(label),
            }
        }
        CommandKind::Function | CommandKind::Call => {
            let [name, count, tail @ ..] = rest else {
                return Err(TranslateError::syntax(
                    SyntaxErrorKind::MissingArguments,
                    span,
                ));
            };
            warn_trailing(&keyword, tail, warnings);
            let name = name.text.to_string();
            let count = parse_integer(count, MAX_CONSTANT)?;
            if kind == CommandKind::Function {
                Instruction::Function {
                    name,
                    locals: count,
                }
            } else {
                Instruction::Call { name, args: count }
            }
        }
        CommandKind::Return => {
            warn_trailing(&keyword, rest, warnings);
            Instruction::Return
        }
    };

    Ok(Spanned::new(node, span))
}

fn split_tokens<'src>(line: &Line<'src>) -> Vec<Token<'src>> {
    let bytes = line.text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let start = pos;
        while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if start < pos {
            tokens.push(Token {
                text: &line.text[start..pos],
                span: Span::new(
                    line.number,
                    (line.offset + start) as u32,
                    (line.offset + pos) as u32,
                ),
            });
        }
    }
    tokens
}

fn parse_integer(token: &Token<'_>, limit: u16) -> Result<u16> {
    let malformed = || TranslateError::MalformedInteger {
        line: token.span.line,
        token: token.text.to_string(),
        span: token.span,
    };
    if !token.text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    match token.text.parse::<u16>() {
        Ok(value) if value <= limit => Ok(value),
        _ => Err(malformed()),
    }
}

fn unknown_token(token: &Token<'_>) -> TranslateError {
    TranslateError::syntax(
        SyntaxErrorKind::UnknownToken(token.text.to_string()),
        token.span,
    )
}

fn warn_trailing(keyword: &str, tail: &[Token<'_>], warnings: &mut Vec<Diagnostic>) {
    let (Some(first), Some(last)) = (tail.first(), tail.last()) else {
        return;
    };
    let span = first.span.merge(last.span);
    warnings.push(
        Diagnostic::warning(
            format!("ignoring trailing text after `{}` (line {})", keyword, span.line),
            span,
        )
        .with_note("extra operands have no effect".to_string()),
    );
}

//! Generated-label counters.
//!
//! Each label-producing construct numbers its labels independently. The
//! prefixes never overlap, and scoped user labels always contain a `.`.
//! Function names are emitted verbatim, so a dotless name such as `END_0`
//! can still clash with a generated label.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    /// `TRUE_n` / `END_n` around eq, gt, lt.
    Comparison,
    /// `IF_FALSE_n` skip point of if-goto.
    IfFalse,
    /// `RETURN_n` return site of a call.
    ReturnSite,
    /// `START_LOOP_n` / `END_LOOP_n` local zeroing loop of a function.
    LocalsLoop,
}

impl LabelKind {
    const ALL: [LabelKind; 4] = [
        LabelKind::Comparison,
        LabelKind::IfFalse,
        LabelKind::ReturnSite,
        LabelKind::LocalsLoop,
    ];

    fn slot(self) -> usize {
        match self {
            LabelKind::Comparison => 0,
            LabelKind::IfFalse => 1,
            LabelKind::ReturnSite => 2,
            LabelKind::LocalsLoop => 3,
        }
    }
}

/// Monotonic per-kind counters, owned by one `CodeWriter` for one run.
#[derive(Clone, Debug, Default)]
pub struct LabelCounters {
    counts: [u32; 4],
}

impl LabelCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next number for `kind`. Numbers start at 0 and are never reused.
    pub fn next(&mut self, kind: LabelKind) -> u32 {
        let slot = &mut self.counts[kind.slot()];
        let n = *slot;
        *slot += 1;
        n
    }

    /// How many numbers of `kind` have been handed out.
    pub fn issued(&self, kind: LabelKind) -> u32 {
        self.counts[kind.slot()]
    }

    pub fn total(&self) -> u32 {
        LabelKind::ALL.iter().map(|k| self.issued(*k)).sum()
    }
}

impl fmt::Display for LabelCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "comparison={} if_false={} return={} locals_loop={}",
            self.issued(LabelKind::Comparison),
            self.issued(LabelKind::IfFalse),
            self.issued(LabelKind::ReturnSite),
            self.issued(LabelKind::LocalsLoop)
        )
    }
}

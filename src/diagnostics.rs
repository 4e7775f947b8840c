// Diagnostics
//
// This file is part of asm14.
// Copyright (C) 2024 asm14 contributors
//
// asm14 is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// asm14 is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with asm14.  If not, see <http://www.gnu.org/licenses/>.

//! The closed set of assembler error kinds and the sticky, per-file
//! collector that lets every pass keep going after an error so the user
//! sees a complete report in one run.

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

use crate::pos::LineNo;

/// One of the canonical error kinds. Each variant is reported with the
/// line number and offending line text it occurred on.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum AssemblerError {
    #[error("line exceeds the 80-character limit")]
    LineTooLong,

    #[error("invalid line")]
    InvalidLine,

    #[error("malformed directive: {0}")]
    MalformedDirective(String),

    #[error("malformed macro: {0}")]
    MalformedMacro(String),

    #[error("symbol conflict: {0}")]
    SymbolConflict(String),

    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error("malformed string: {0}")]
    MalformedString(String),

    #[error("mnemonic written in the wrong case: {0}")]
    CaseMismatch(String),

    #[error("internal resource error: {0}")]
    InternalResource(String),
}

/// An error tied to the line it was raised on, ready for display in the
/// `Error in line N: <msg>\n\t<offending-line>` format.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub line: LineNo,
    pub source_line: String,
    pub error: AssemblerError,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Error in line {}: {}\n\t{}", self.line, self.error, self.source_line)
    }
}

/// Collects diagnostics for one input file and tracks the sticky
/// "something failed" flag: every non-fatal error is recorded and
/// processing continues.
#[derive(Default, Debug)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, line: LineNo, source_line: &str, error: AssemblerError) {
        log::warn!("line {line}: {error}");
        self.items.push(Diagnostic {
            line,
            source_line: source_line.to_string(),
            error,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn print_to_stderr(&self) {
        for d in &self.items {
            eprintln!("{d}");
        }
    }
}

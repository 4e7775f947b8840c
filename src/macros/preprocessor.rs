// Preprocessor
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

//! Component C: a single streaming pass over the comment-stripped source
//! that captures `mcr`/`endmcr` bodies into the [`MacroTable`](super::MacroTable)
//! and emits every other line, expanding macro calls as it goes. This is
//! the textual macro expander; the object it returns is the `.am` content
//! fed to both passes.

use crate::diagnostics::{AssemblerError, Diagnostics};
use crate::macros::table::MacroTable;
use crate::pos::LineNo;

const MACRO_BODY_INDENT: &str = "    ";

enum State {
    Outside,
    Capturing { name: String, body: Vec<String> },
}

/// Runs the macro preprocessor over `source` (already comment-stripped),
/// reporting failures against `diagnostics` and returning the expanded
/// text plus the populated macro table.
pub fn preprocess(source: &str, diagnostics: &mut Diagnostics) -> (String, MacroTable) {
    let mut table = MacroTable::new();
    let mut state = State::Outside;
    let mut out = String::new();

    for (i, raw_line) in source.lines().enumerate() {
        let line_no = LineNo((i + 1) as u32);
        let first_token = raw_line.trim().split_whitespace().next().unwrap_or("");

        match &mut state {
            State::Capturing { name, body } => {
                if first_token == "endmcr" {
                    let name = name.clone();
                    let body = std::mem::take(body);
                    if let Err(e) = table.insert(&name, body) {
                        diagnostics.report(line_no, raw_line, e);
                    }
                    state = State::Outside;
                } else if first_token == "mcr" {
                    diagnostics.report(
                        line_no,
                        raw_line,
                        AssemblerError::MalformedMacro("nested macro definitions are not allowed".into()),
                    );
                } else {
                    body.push(strip_body_indent(raw_line));
                }
            }
            State::Outside => {
                if first_token == "mcr" {
                    match raw_line.trim().split_whitespace().nth(1) {
                        Some(name) => {
                            if table.contains(name) {
                                diagnostics.report(
                                    line_no,
                                    raw_line,
                                    AssemblerError::MalformedMacro(format!("macro '{name}' already defined")),
                                );
                            }
                            // Capture regardless, so a duplicate name doesn't throw off
                            // the endmcr/outside state tracking for the rest of the file.
                            state = State::Capturing { name: name.to_string(), body: Vec::new() };
                        }
                        None => {
                            diagnostics.report(
                                line_no,
                                raw_line,
                                AssemblerError::MalformedMacro("'mcr' requires a name".into()),
                            );
                        }
                    }
                } else if let Some(body) = table.lookup(first_token) {
                    for body_line in body {
                        if contains_macro_call(body_line, &table) {
                            diagnostics.report(
                                line_no,
                                raw_line,
                                AssemblerError::MalformedMacro(
                                    "macro bodies may not call other macros".into(),
                                ),
                            );
                            continue;
                        }
                        out.push_str(body_line);
                        out.push('\n');
                    }
                } else {
                    out.push_str(raw_line);
                    out.push('\n');
                }
            }
        }
    }

    if let State::Capturing { name, .. } = &state {
        diagnostics.report(
            LineNo((source.lines().count() + 1) as u32),
            "",
            AssemblerError::MalformedMacro(format!("macro '{name}' missing 'endmcr'")),
        );
    }

    (out, table)
}

fn strip_body_indent(line: &str) -> String {
    line.strip_prefix(MACRO_BODY_INDENT).unwrap_or(line).to_string()
}

fn contains_macro_call(line: &str, table: &MacroTable) -> bool {
    match line.trim().split_whitespace().next() {
        Some(tok) => table.contains(tok),
        None => false,
    }
}

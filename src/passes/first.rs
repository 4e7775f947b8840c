// First Pass Driver
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

//! Component J: walks the expanded (`.am`) text line by line, classifying
//! and dispatching to the Directive Processor / Instruction Encoder,
//! tracking `IC`/`DC` via the context's [`Image`](crate::image::Image) and
//! keeping the sticky per-file error flag alive across failures.

use crate::classify::{classify, Classified, DirectiveKind};
use crate::context::AssemblyContext;
use crate::directives;
use crate::encoder::encode_instruction;
use crate::isa::{ADDRESS_ORIGIN, MAX_LINE_LEN};
use crate::pos::LineNo;
use crate::symtab::SymbolKind;

/// Runs pass one over `expanded`, mutating `ctx` in place. Always completes
/// to end of file -- errors are recorded, not propagated -- so pass two can
/// rely on the same line numbering.
pub fn run_first_pass(expanded: &str, ctx: &mut AssemblyContext) {
    for (i, raw_line) in expanded.lines().enumerate() {
        ctx.line_no = LineNo((i + 1) as u32);
        ctx.line_error = false;

        if raw_line.len() > MAX_LINE_LEN {
            report(ctx, raw_line, crate::diagnostics::AssemblerError::LineTooLong);
            continue;
        }

        process_line(raw_line, raw_line, ctx);
    }

    if (ctx.ic() as usize + ctx.dc() as usize) > crate::isa::MEMORY_CAPACITY {
        report(
            ctx,
            "",
            crate::diagnostics::AssemblerError::InternalResource("image exceeds memory capacity".into()),
        );
    }

    ctx.symbols.relocate_data(ctx.ic());
}

fn process_line(original_line: &str, line: &str, ctx: &mut AssemblyContext) {
    match classify(line) {
        Classified::Blank | Classified::Comment => {}

        Classified::Directive { kind, rest } => dispatch_directive(original_line, kind, rest, ctx),

        Classified::Label { name, rest } => {
            bind_label(original_line, &name, rest, ctx);
            process_line(original_line, rest, ctx);
        }

        Classified::Instruction { mnemonic, rest } => {
            if let Err(e) = encode_instruction(mnemonic, rest, ctx) {
                report(ctx, original_line, e);
            }
        }

        Classified::Invalid(e) => report(ctx, original_line, e),
    }
}

fn dispatch_directive(original_line: &str, kind: DirectiveKind, rest: &str, ctx: &mut AssemblyContext) {
    let result = match kind {
        DirectiveKind::Define => directives::process_define(rest, ctx),
        DirectiveKind::Data => directives::process_data(rest, ctx),
        DirectiveKind::String => directives::process_string(rest, ctx),
        DirectiveKind::Extern => directives::process_extern(rest, ctx),
        DirectiveKind::Entry => directives::process_entry(rest, ctx),
    };
    if let Err(e) = result {
        report(ctx, original_line, e);
    }
}

/// Binds a label according to the kind of construct it prefixes: Code for
/// an instruction, Data for `.data`/`.string`, silently ignored for
/// `.entry`/`.extern`.
fn bind_label(original_line: &str, name: &str, rest: &str, ctx: &mut AssemblyContext) {
    let kind = match classify(rest) {
        Classified::Instruction { .. } => Some((SymbolKind::Code, ADDRESS_ORIGIN + ctx.ic())),
        Classified::Directive { kind: DirectiveKind::Data | DirectiveKind::String, .. } => {
            Some((SymbolKind::Data, ctx.dc()))
        }
        Classified::Directive { kind: DirectiveKind::Entry | DirectiveKind::Extern, .. } => None,
        _ => None,
    };
    if let Some((kind, value)) = kind {
        if let Err(e) = ctx.insert_symbol(name, kind, value) {
            report(ctx, original_line, e);
        }
    }
}

fn report(ctx: &mut AssemblyContext, line_text: &str, error: crate::diagnostics::AssemblerError) {
    ctx.line_error = true;
    let line_no = ctx.line_no;
    ctx.diagnostics.report(line_no, line_text, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_macro_expansion_scenario() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("hlt\n", &mut ctx);
        assert_eq!(ctx.ic(), 1);
        assert_eq!(ctx.dc(), 0);
        assert!(!ctx.diagnostics.has_errors());
    }

    #[test]
    fn constant_fold_in_data_scenario() {
        let mut ctx = AssemblyContext::new();
        run_first_pass(".define SZ = 3\nLEN: .data SZ, -1, SZ\n", &mut ctx);
        assert!(!ctx.diagnostics.has_errors());
        assert_eq!(ctx.symbols.lookup("LEN").unwrap().value, 100);
    }

    #[test]
    fn label_on_instruction_gets_code_kind_and_address() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("START: hlt\n", &mut ctx);
        let sym = ctx.symbols.lookup("START").unwrap();
        assert_eq!(sym.kind, SymbolKind::Code);
        assert_eq!(sym.value, 100);
    }

    #[test]
    fn label_on_entry_directive_does_not_bind() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("X: .entry X\n", &mut ctx);
        assert!(ctx.symbols.lookup("X").is_none());
        assert_eq!(ctx.entry_names.len(), 1);
        assert_eq!(ctx.entry_names[0].name, "X");
    }

    #[test]
    fn label_named_after_a_reserved_word_is_rejected() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("mov: hlt\n", &mut ctx);
        assert!(ctx.diagnostics.has_errors());
        assert!(ctx.symbols.lookup("mov").is_none());
    }

    #[test]
    fn register_named_label_on_data_is_rejected() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("r3: .data 1\n", &mut ctx);
        assert!(ctx.diagnostics.has_errors());
        assert!(ctx.symbols.lookup("r3").is_none());
    }

    #[test]
    fn invalid_line_sets_sticky_flag_but_keeps_going() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("bogus line here\nhlt\n", &mut ctx);
        assert!(ctx.diagnostics.has_errors());
        assert_eq!(ctx.ic(), 1);
    }

    #[test]
    fn line_length_limit_is_enforced() {
        let mut ctx = AssemblyContext::new();
        let long = "a".repeat(81);
        run_first_pass(&long, &mut ctx);
        assert!(ctx.diagnostics.has_errors());
    }
}

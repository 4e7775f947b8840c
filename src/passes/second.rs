// Second Pass Driver
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

//! Component K: finalizes the entry set and resolves every fixup left by
//! pass one into its encoded, ARE-tagged word.
//!
//! Pass one already built the complete fixup list and entry-name set while
//! walking the expanded file once, so this pass does not need a second
//! text scan of its own -- it resolves those two collections directly
//! against the now-complete symbol table. Re-reading the file would only
//! rediscover the same lines pass one already classified. Each fixup and
//! entry name carries the line it was recorded on, so a pass-two failure
//! is reported against its actual origin rather than wherever pass one's
//! cursor happened to end up.

use crate::context::AssemblyContext;
use crate::diagnostics::AssemblerError;
use crate::image::{address_of, ExternalUsage};
use crate::isa::{encode_symbol_ref, Are};
use crate::pos::LineNo;
use crate::symtab::SymbolKind;

/// Runs pass two over the fixups and entry names gathered by pass one.
/// Always completes; per-fixup and per-entry failures are recorded on
/// `ctx.diagnostics` without aborting the rest of the pass.
pub fn run_second_pass(ctx: &mut AssemblyContext) {
    resolve_entries(ctx);
    resolve_fixups(ctx);
}

fn resolve_entries(ctx: &mut AssemblyContext) {
    let entries = ctx.entry_names.clone();
    for entry in entries {
        if let Err(e) = ctx.symbols.update_kind(&entry.name, SymbolKind::Entry) {
            report(ctx, entry.line, &e);
        }
    }
}

fn resolve_fixups(ctx: &mut AssemblyContext) {
    let fixups = std::mem::take(&mut ctx.fixups);
    for fixup in &fixups {
        match ctx.symbols.lookup(&fixup.symbol) {
            None => {
                let e = AssemblerError::UndefinedSymbol(fixup.symbol.clone());
                report(ctx, fixup.line, &e);
            }
            Some(sym) if sym.kind == SymbolKind::External => {
                let word = encode_symbol_ref(0, Are::External);
                ctx.image.resolve(fixup.image_index, word);
                let address = address_of(fixup.image_index);
                ctx.external_usages.push(ExternalUsage { symbol: fixup.symbol.clone(), address });
            }
            Some(sym) => {
                // Direct and Index-base fixups resolve identically; only
                // their image placement differs, and that was fixed at
                // reservation time in pass one.
                let word = encode_symbol_ref(sym.value, Are::Relocatable);
                ctx.image.resolve(fixup.image_index, word);
            }
        }
    }
}

fn report(ctx: &mut AssemblyContext, line: LineNo, error: &AssemblerError) {
    ctx.diagnostics.report(line, "", error.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::first::run_first_pass;

    #[test]
    fn external_fixup_resolves_to_zero_with_external_are() {
        let mut ctx = AssemblyContext::new();
        run_first_pass(".extern X\njmp X\n", &mut ctx);
        run_second_pass(&mut ctx);
        assert!(!ctx.diagnostics.has_errors());
        assert_eq!(ctx.external_usages.len(), 1);
        assert_eq!(ctx.external_usages[0].symbol, "X");
    }

    #[test]
    fn relocatable_fixup_resolves_to_symbol_value() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("jmp DONE\nDONE: hlt\n", &mut ctx);
        run_second_pass(&mut ctx);
        assert!(!ctx.diagnostics.has_errors());
        assert!(ctx.external_usages.is_empty());
    }

    #[test]
    fn entry_upgrade_applies_after_pass_one() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("START: hlt\n.entry START\n", &mut ctx);
        run_second_pass(&mut ctx);
        assert!(!ctx.diagnostics.has_errors());
        assert_eq!(ctx.symbols.lookup("START").unwrap().kind, SymbolKind::Entry);
    }

    #[test]
    fn entry_on_external_is_a_conflict() {
        let mut ctx = AssemblyContext::new();
        run_first_pass(".extern X\n.entry X\n", &mut ctx);
        run_second_pass(&mut ctx);
        assert!(ctx.diagnostics.has_errors());
    }

    #[test]
    fn undefined_fixup_symbol_is_reported() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("jmp GHOST\n", &mut ctx);
        run_second_pass(&mut ctx);
        assert!(ctx.diagnostics.has_errors());
    }

    #[test]
    fn undefined_fixup_is_reported_against_its_own_line_not_the_last_line() {
        let mut ctx = AssemblyContext::new();
        run_first_pass("jmp GHOST\nhlt\nhlt\nhlt\n", &mut ctx);
        run_second_pass(&mut ctx);
        let diag = ctx.diagnostics.iter().next().unwrap();
        assert_eq!(diag.line, LineNo(1));
    }
}

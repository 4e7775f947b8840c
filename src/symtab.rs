// Symbol Table
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

//! Component E: a keyed store of [`Symbol`]s with kind and value, plus the
//! end-of-pass-one data relocation walk.

use std::collections::HashMap;

use crate::diagnostics::AssemblerError;
use crate::isa::ADDRESS_ORIGIN;

/// The kind of a symbol.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    Data,
    Code,
    External,
    Entry,
    MacroDefine,
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub value: u16,
}

/// Symbols are unique by name across all kinds; a
/// hash map keyed by name gives O(1)-amortised lookup without needing the
/// arena/interner machinery a longer-lived compiler would (this assembler's
/// whole symbol table lives and dies with one source file and tops out at a
/// few hundred entries).
#[derive(Default, Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new symbol. Re-inserting an existing name is a diagnostic,
    /// never a silent overwrite.
    pub fn insert(&mut self, name: &str, kind: SymbolKind, value: u16) -> Result<(), AssemblerError> {
        if self.symbols.contains_key(name) {
            return Err(AssemblerError::SymbolConflict(format!("symbol '{name}' already defined")));
        }
        self.symbols.insert(
            name.to_string(),
            Symbol { name: name.to_string(), kind, value },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Transitions a symbol's kind in place. Only Data/Code → Entry is
    /// permitted; External → Entry is a conflict, and a
    /// symbol already Entry cannot be re-declared as Entry.
    pub fn update_kind(&mut self, name: &str, new_kind: SymbolKind) -> Result<(), AssemblerError> {
        let sym = self
            .symbols
            .get_mut(name)
            .ok_or_else(|| AssemblerError::UndefinedSymbol(name.to_string()))?;

        match (sym.kind, new_kind) {
            (SymbolKind::Data, SymbolKind::Entry) | (SymbolKind::Code, SymbolKind::Entry) => {
                sym.kind = SymbolKind::Entry;
                Ok(())
            }
            (SymbolKind::Entry, SymbolKind::Entry) => Err(AssemblerError::SymbolConflict(format!(
                "symbol '{name}' already declared .entry"
            ))),
            (SymbolKind::External, SymbolKind::Entry) => Err(AssemblerError::SymbolConflict(format!(
                "external symbol '{name}' cannot be declared .entry"
            ))),
            _ => Err(AssemblerError::SymbolConflict(format!(
                "symbol '{name}' cannot transition to the requested kind"
            ))),
        }
    }

    /// Walks every Data symbol and adds `ic_final + ADDRESS_ORIGIN` to its
    /// value exactly once. Called at the end of pass one.
    pub fn relocate_data(&mut self, ic_final: u16) {
        let offset = ic_final + ADDRESS_ORIGIN;
        for sym in self.symbols.values_mut() {
            if sym.kind == SymbolKind::Data {
                sym.value += offset;
            }
        }
    }

    /// All symbols of kind Entry, for `.ent` emission. Sorted by name so
    /// output is deterministic regardless of hash map iteration order.
    pub fn entries(&self) -> Vec<&Symbol> {
        let mut v: Vec<&Symbol> = self.symbols.values().filter(|s| s.kind == SymbolKind::Entry).collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup() {
        let mut t = SymbolTable::new();
        t.insert("LEN", SymbolKind::Data, 0).unwrap();
        assert_eq!(t.lookup("LEN").unwrap().kind, SymbolKind::Data);
    }

    #[test]
    fn duplicate_insert_is_a_conflict() {
        let mut t = SymbolTable::new();
        t.insert("LEN", SymbolKind::Data, 0).unwrap();
        let err = t.insert("LEN", SymbolKind::Code, 100).unwrap_err();
        assert!(matches!(err, AssemblerError::SymbolConflict(_)));
    }

    #[test]
    fn relocate_data_applies_once() {
        let mut t = SymbolTable::new();
        t.insert("LEN", SymbolKind::Data, 0).unwrap();
        t.insert("START", SymbolKind::Code, 100).unwrap();
        t.relocate_data(1);
        assert_eq!(t.lookup("LEN").unwrap().value, 101);
        assert_eq!(t.lookup("START").unwrap().value, 100);
    }

    #[test]
    fn entry_upgrade_rejects_external() {
        let mut t = SymbolTable::new();
        t.insert("X", SymbolKind::External, 0).unwrap();
        let err = t.update_kind("X", SymbolKind::Entry).unwrap_err();
        assert!(matches!(err, AssemblerError::SymbolConflict(_)));
    }

    #[test]
    fn entry_upgrade_rejects_duplicate_entry() {
        let mut t = SymbolTable::new();
        t.insert("X", SymbolKind::Code, 100).unwrap();
        t.update_kind("X", SymbolKind::Entry).unwrap();
        let err = t.update_kind("X", SymbolKind::Entry).unwrap_err();
        assert!(matches!(err, AssemblerError::SymbolConflict(_)));
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let mut t = SymbolTable::new();
        t.insert("ZETA", SymbolKind::Code, 100).unwrap();
        t.insert("ALPHA", SymbolKind::Code, 101).unwrap();
        t.update_kind("ZETA", SymbolKind::Entry).unwrap();
        t.update_kind("ALPHA", SymbolKind::Entry).unwrap();
        let names: Vec<_> = t.entries().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["ALPHA".to_string(), "ZETA".to_string()]);
    }
}

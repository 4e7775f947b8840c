// Directive Processor
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

//! Component H: `.data`, `.string`, `.extern`, `.entry`, and `.define`.
//! Each function here is called from the First Pass Driver once a line has
//! been classified as that directive kind.

use crate::context::{AssemblyContext, EntryRef};
use crate::diagnostics::AssemblerError;
use crate::isa::{is_reserved_word, to_fourteen_bit};
use crate::lexer::{is_identifier, parse_integer, split_strict_comma_list};
use crate::symtab::SymbolKind;

const DEFINE_MIN: i32 = -2048;
const DEFINE_MAX: i32 = 2047;

/// `.define NAME = VALUE`
pub fn process_define(rest: &str, ctx: &mut AssemblyContext) -> Result<(), AssemblerError> {
    let (name, value_text) = rest
        .split_once('=')
        .ok_or_else(|| AssemblerError::MalformedDirective("expected 'NAME = VALUE'".into()))?;
    let name = name.trim();
    let value_text = value_text.trim();

    if !is_identifier(name) {
        return Err(AssemblerError::InvalidLabel(name.to_string()));
    }
    if is_reserved_word(name) {
        return Err(AssemblerError::InvalidLabel(format!("'{name}' is a reserved word")));
    }
    let value = parse_integer(value_text)
        .ok_or_else(|| AssemblerError::InvalidNumber(value_text.to_string()))?;
    if !(DEFINE_MIN..=DEFINE_MAX).contains(&value) {
        return Err(AssemblerError::InvalidNumber(format!("{value} is outside [-2048, 2047]")));
    }

    ctx.insert_symbol(name, SymbolKind::MacroDefine, to_fourteen_bit(value))
}

/// `.data v1, v2, ...`; returns the count of words appended, for the
/// caller to advance DC and (if labeled) bind the label to the pre-call DC.
pub fn process_data(rest: &str, ctx: &mut AssemblyContext) -> Result<(), AssemblerError> {
    let items = split_strict_comma_list(rest)?;
    let mut words = Vec::with_capacity(items.len());
    for item in &items {
        let value = if let Some(value) = parse_integer(item) {
            value
        } else if let Some(sym) = ctx.symbols.lookup(item) {
            if sym.kind != SymbolKind::MacroDefine {
                return Err(AssemblerError::InvalidNumber(item.clone()));
            }
            sym.value as i32
        } else {
            return Err(AssemblerError::InvalidNumber(item.clone()));
        };
        words.push(to_fourteen_bit(value));
    }
    for word in words {
        ctx.image.push_data_word(word);
    }
    Ok(())
}

const LEGAL_STRING_PUNCT: &[char] = &[',', '.', '!', '?', ';', ':', '\'', '"'];

/// `.string "..."`, accepting ASCII `"` or the Unicode curly-quote pair.
pub fn process_string(rest: &str, ctx: &mut AssemblyContext) -> Result<(), AssemblerError> {
    let body = unquote(rest.trim())
        .ok_or_else(|| AssemblerError::MalformedString("missing or mismatched quotes".into()))?;

    for ch in body.chars() {
        if !(ch.is_alphanumeric() || ch.is_whitespace() || LEGAL_STRING_PUNCT.contains(&ch)) {
            return Err(AssemblerError::MalformedString(format!("illegal character '{ch}'")));
        }
        ctx.image.push_data_word(to_fourteen_bit(ch as u32 as i32));
    }
    ctx.image.push_data_word(0);
    Ok(())
}

fn unquote(s: &str) -> Option<&str> {
    let s = s
        .strip_prefix('"')
        .or_else(|| s.strip_prefix('\u{201C}'))?;
    s.strip_suffix('"').or_else(|| s.strip_suffix('\u{201D}'))
}

/// `.extern sym[, sym...]`
pub fn process_extern(rest: &str, ctx: &mut AssemblyContext) -> Result<(), AssemblerError> {
    let names = split_strict_comma_list(rest)?;
    for name in names {
        if !is_identifier(&name) || is_reserved_word(&name) {
            return Err(AssemblerError::InvalidLabel(name));
        }
        match ctx.symbols.lookup(&name) {
            None => {
                ctx.insert_symbol(&name, SymbolKind::External, 0)?;
            }
            Some(sym) if sym.kind == SymbolKind::External => {}
            Some(_) => {
                return Err(AssemblerError::SymbolConflict(format!(
                    "'{name}' is already defined and cannot be declared .extern"
                )));
            }
        }
    }
    Ok(())
}

/// `.entry sym[, sym...]`, pass-one half: just records the names. The
/// second pass performs the actual kind upgrade once every symbol in the
/// file is known.
pub fn process_entry(rest: &str, ctx: &mut AssemblyContext) -> Result<(), AssemblerError> {
    let names = split_strict_comma_list(rest)?;
    for name in names {
        if !is_identifier(&name) || is_reserved_word(&name) {
            return Err(AssemblerError::InvalidLabel(name));
        }
        let line = ctx.line_no;
        ctx.entry_names.push(EntryRef { name, line });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_inserts_macro_symbol_in_range() {
        let mut ctx = AssemblyContext::new();
        process_define("SZ = 3", &mut ctx).unwrap();
        assert_eq!(ctx.symbols.lookup("SZ").unwrap().value, 3);
    }

    #[test]
    fn define_boundaries_are_inclusive() {
        let mut ctx = AssemblyContext::new();
        process_define("A = 2047", &mut ctx).unwrap();
        process_define("B = -2048", &mut ctx).unwrap();
        assert!(process_define("C = 2048", &mut ctx).is_err());
    }

    #[test]
    fn data_accepts_literal_and_macro_define_name() {
        let mut ctx = AssemblyContext::new();
        process_define("SZ = 3", &mut ctx).unwrap();
        process_data("SZ, -1, SZ", &mut ctx).unwrap();
        assert_eq!(ctx.dc(), 3);
    }

    #[test]
    fn data_rejects_doubled_commas() {
        let mut ctx = AssemblyContext::new();
        assert!(process_data("1,, 2", &mut ctx).is_err());
    }

    #[test]
    fn string_appends_one_word_per_char_plus_terminator() {
        let mut ctx = AssemblyContext::new();
        process_string("\"hi\"", &mut ctx).unwrap();
        assert_eq!(ctx.dc(), 3);
    }

    #[test]
    fn string_rejects_missing_quotes() {
        let mut ctx = AssemblyContext::new();
        assert!(process_string("hi", &mut ctx).is_err());
    }

    #[test]
    fn extern_noop_on_existing_external() {
        let mut ctx = AssemblyContext::new();
        process_extern("X", &mut ctx).unwrap();
        process_extern("X", &mut ctx).unwrap();
        assert_eq!(ctx.symbols.lookup("X").unwrap().kind, SymbolKind::External);
    }

    #[test]
    fn extern_conflicts_with_existing_data_symbol() {
        let mut ctx = AssemblyContext::new();
        ctx.symbols.insert("X", SymbolKind::Data, 0).unwrap();
        assert!(process_extern("X", &mut ctx).is_err());
    }

    #[test]
    fn entry_pass_one_only_records_names() {
        let mut ctx = AssemblyContext::new();
        process_entry("X, Y", &mut ctx).unwrap();
        let names: Vec<_> = ctx.entry_names.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["X".to_string(), "Y".to_string()]);
        assert!(ctx.symbols.lookup("X").is_none());
    }

    #[test]
    fn entry_rejects_reserved_word() {
        let mut ctx = AssemblyContext::new();
        assert!(process_entry("mov", &mut ctx).is_err());
    }
}

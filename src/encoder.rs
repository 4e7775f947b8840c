// Instruction Encoder
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

//! Component I: validates a normalized instruction line against the
//! Command Table and emits its header word plus zero to two operand
//! words, enqueueing fixups for any symbol reference.

use crate::context::AssemblyContext;
use crate::diagnostics::AssemblerError;
use crate::image::{Fixup, FixupMode};
use crate::isa::{
    encode_immediate, encode_instruction_header, encode_registers, from_fourteen_bit,
    lookup_command, AddrMode, CommandSpec,
};
use crate::lexer::{is_identifier, parse_integer, parse_register, split_index_operand, split_strict_comma_list};
use crate::symtab::SymbolKind;

#[derive(Clone, Debug)]
enum Operand {
    Immediate(i32),
    Direct(String),
    Index { base: String, offset: i32 },
    Register(u8),
}

impl Operand {
    fn mode(&self) -> AddrMode {
        match self {
            Operand::Immediate(_) => AddrMode::Immediate,
            Operand::Direct(_) => AddrMode::Direct,
            Operand::Index { .. } => AddrMode::Index,
            Operand::Register(_) => AddrMode::Register,
        }
    }
}

/// Parses and encodes one instruction line (mnemonic already split from
/// its operand text by the caller). `mnemonic` must already be a
/// case-sensitive hit in the Command Table; this function re-validates it
/// anyway so it can be called directly from tests.
pub fn encode_instruction(mnemonic: &str, operand_text: &str, ctx: &mut AssemblyContext) -> Result<(), AssemblerError> {
    let spec = lookup_command(mnemonic)
        .ok_or_else(|| AssemblerError::InvalidOperand(format!("unknown mnemonic '{mnemonic}'")))?;

    let operand_text = operand_text.trim();
    let raw_operands: Vec<String> = if operand_text.is_empty() {
        Vec::new()
    } else {
        split_strict_comma_list(operand_text)?
    };

    if raw_operands.len() != spec.operand_count as usize {
        return Err(AssemblerError::InvalidOperand(format!(
            "'{mnemonic}' takes {} operand(s), found {}",
            spec.operand_count,
            raw_operands.len()
        )));
    }

    let operands: Vec<Operand> = raw_operands
        .iter()
        .map(|text| parse_operand(text, ctx))
        .collect::<Result<_, _>>()?;

    let (src, dst) = split_src_dst(&operands, spec);
    validate_modes(src.as_ref(), dst.as_ref(), spec)?;

    let header = encode_instruction_header(spec.opcode, src.as_ref().map(Operand::mode), dst.as_ref().map(Operand::mode));
    ctx.image.push_header(header);

    match (src, dst) {
        (Some(Operand::Register(s)), Some(Operand::Register(d))) => {
            ctx.image.push_registers(encode_registers(Some(s), Some(d)));
        }
        (src, dst) => {
            if let Some(op) = src {
                emit_operand(op, ctx);
            }
            if let Some(op) = dst {
                emit_operand(op, ctx);
            }
        }
    }

    Ok(())
}

fn split_src_dst(operands: &[Operand], spec: &CommandSpec) -> (Option<Operand>, Option<Operand>) {
    match (spec.operand_count, operands) {
        (2, [src, dst]) => (Some(src.clone()), Some(dst.clone())),
        (1, [dst]) => (None, Some(dst.clone())),
        _ => (None, None),
    }
}

fn validate_modes(src: Option<&Operand>, dst: Option<&Operand>, spec: &CommandSpec) -> Result<(), AssemblerError> {
    if let Some(op) = src {
        if !spec.src_modes.contains(&op.mode()) {
            return Err(AssemblerError::InvalidOperand(format!(
                "'{}' does not accept that source addressing mode",
                spec.mnemonic
            )));
        }
    }
    if let Some(op) = dst {
        if !spec.dst_modes.contains(&op.mode()) {
            return Err(AssemblerError::InvalidOperand(format!(
                "'{}' does not accept that destination addressing mode",
                spec.mnemonic
            )));
        }
    }
    Ok(())
}

fn emit_operand(op: Operand, ctx: &mut AssemblyContext) {
    match op {
        Operand::Immediate(value) => ctx.image.push_immediate(encode_immediate(value)),
        Operand::Register(r) => {
            // A lone register shares the coalesced-pair encoding with the
            // other half left at zero.
            ctx.image.push_registers(encode_registers(None, Some(r)));
        }
        Operand::Direct(name) => {
            let idx = ctx.image.push_direct_placeholder(&name);
            ctx.fixups.push(Fixup { image_index: idx, symbol: name, mode: FixupMode::Direct, line: ctx.line_no });
        }
        Operand::Index { base, offset } => {
            let idx = ctx.image.push_index_base_placeholder(&base);
            ctx.fixups.push(Fixup { image_index: idx, symbol: base, mode: FixupMode::Index, line: ctx.line_no });
            ctx.image.push_index_offset(encode_immediate(offset));
        }
    }
}

fn parse_operand(text: &str, ctx: &AssemblyContext) -> Result<Operand, AssemblerError> {
    if let Some(reg) = parse_register(text) {
        return Ok(Operand::Register(reg));
    }
    if let Some(rest) = text.strip_prefix('#') {
        let value = resolve_value(rest, ctx)?;
        return Ok(Operand::Immediate(value));
    }
    if let Some((base, expr)) = split_index_operand(text) {
        if !is_identifier(base) {
            return Err(AssemblerError::InvalidOperand(format!("'{base}' is not a valid label")));
        }
        let offset = resolve_value(expr, ctx)?;
        return Ok(Operand::Index { base: base.to_string(), offset });
    }
    if is_identifier(text) {
        return Ok(Operand::Direct(text.to_string()));
    }
    Err(AssemblerError::InvalidOperand(text.to_string()))
}

/// Resolves an immediate/offset operand's text to its signed value: either
/// a decimal literal or a previously `.define`d constant.
fn resolve_value(text: &str, ctx: &AssemblyContext) -> Result<i32, AssemblerError> {
    if let Some(v) = parse_integer(text) {
        return Ok(v);
    }
    match ctx.symbols.lookup(text) {
        Some(sym) if sym.kind == SymbolKind::MacroDefine => Ok(from_fourteen_bit(sym.value)),
        Some(_) => Err(AssemblerError::InvalidNumber(format!("'{text}' is not a constant"))),
        None => Err(AssemblerError::InvalidNumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hlt_takes_no_operands_and_emits_one_word() {
        let mut ctx = AssemblyContext::new();
        encode_instruction("hlt", "", &mut ctx).unwrap();
        assert_eq!(ctx.ic(), 1);
    }

    #[test]
    fn mov_rejects_immediate_destination() {
        let mut ctx = AssemblyContext::new();
        let err = encode_instruction("mov", "#0, #0", &mut ctx).unwrap_err();
        assert!(matches!(err, AssemblerError::InvalidOperand(_)));
    }

    #[test]
    fn two_register_operands_share_one_word() {
        let mut ctx = AssemblyContext::new();
        encode_instruction("mov", "r1, r2", &mut ctx).unwrap();
        assert_eq!(ctx.ic(), 2);
    }

    #[test]
    fn direct_operand_reserves_placeholder_and_fixup() {
        let mut ctx = AssemblyContext::new();
        encode_instruction("jmp", "LOOP", &mut ctx).unwrap();
        assert_eq!(ctx.ic(), 2);
        assert_eq!(ctx.fixups.len(), 1);
        assert_eq!(ctx.fixups[0].symbol, "LOOP");
    }

    #[test]
    fn index_operand_reserves_two_words() {
        let mut ctx = AssemblyContext::new();
        encode_instruction("mov", "ARR[2], r1", &mut ctx).unwrap();
        assert_eq!(ctx.ic(), 3);
        assert_eq!(ctx.fixups.len(), 1);
        assert_eq!(ctx.fixups[0].mode, FixupMode::Index);
    }

    #[test]
    fn wrong_operand_count_is_rejected() {
        let mut ctx = AssemblyContext::new();
        let err = encode_instruction("hlt", "r1", &mut ctx).unwrap_err();
        assert!(matches!(err, AssemblerError::InvalidOperand(_)));
    }

    #[test]
    fn immediate_accepts_a_define_constant() {
        let mut ctx = AssemblyContext::new();
        ctx.symbols.insert("SZ", SymbolKind::MacroDefine, crate::isa::to_fourteen_bit(3)).unwrap();
        encode_instruction("mov", "#SZ, r1", &mut ctx).unwrap();
        assert_eq!(ctx.ic(), 2);
    }
}

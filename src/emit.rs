// Emitter
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

//! Component L: renders the final image, entry set, and external usages
//! into the `.ob`/`.ent`/`.ext` text formats. Only called once the sticky
//! error flag is clear.

use crate::context::AssemblyContext;
use crate::isa::ADDRESS_ORIGIN;

const BASE4_DIGITS: [char; 4] = ['*', '#', '%', '!'];

/// Renders a 14-bit word as seven base-4 digits, most significant first.
pub fn encode_base4(word: u16) -> String {
    let mut digits = [BASE4_DIGITS[0]; 7];
    let mut w = word;
    for slot in digits.iter_mut().rev() {
        *slot = BASE4_DIGITS[(w & 0b11) as usize];
        w >>= 2;
    }
    digits.iter().collect()
}

pub struct EmittedArtifacts {
    pub object_file: String,
    pub entries_file: Option<String>,
    pub externals_file: Option<String>,
}

/// Builds the three output artifacts' text content from a context that has
/// completed both passes cleanly.
pub fn emit(ctx: &AssemblyContext) -> EmittedArtifacts {
    EmittedArtifacts {
        object_file: emit_object(ctx),
        entries_file: emit_entries(ctx),
        externals_file: emit_externals(ctx),
    }
}

fn emit_object(ctx: &AssemblyContext) -> String {
    let mut out = format!("{} {}\n", ctx.ic(), ctx.dc());
    for (i, entry) in ctx.image.words().enumerate() {
        let addr = ADDRESS_ORIGIN + i as u16;
        out.push_str(&format!("{:04} {}\n", addr, encode_base4(entry.value)));
    }
    out
}

fn emit_entries(ctx: &AssemblyContext) -> Option<String> {
    let entries = ctx.symbols.entries();
    if entries.is_empty() {
        return None;
    }
    let mut out = String::new();
    for sym in entries {
        out.push_str(&format!("{} {:04}\n", sym.name, sym.value));
    }
    Some(out)
}

fn emit_externals(ctx: &AssemblyContext) -> Option<String> {
    if ctx.external_usages.is_empty() {
        return None;
    }
    let mut out = String::new();
    for usage in &ctx.external_usages {
        out.push_str(&format!("{} {:04}\n", usage.symbol, usage.address));
    }
    Some(out)
}

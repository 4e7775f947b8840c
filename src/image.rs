// Image Model & Fixup List
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

//! Components F and G: the instruction/data memory image and the deferred
//! symbol-reference fixup list.

use crate::isa::ADDRESS_ORIGIN;
use crate::pos::LineNo;

/// What an image entry's word represents.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WordKind {
    InstructionHeader,
    Immediate,
    Direct,
    IndexBase,
    IndexOffset,
    Register,
    Data,
}

/// One word-sized slot in the final memory image.
#[derive(Clone, Debug)]
pub struct ImageEntry {
    pub kind: WordKind,
    pub value: u16,
    pub symbol: Option<String>,
    pub needs_encoding: bool,
}

impl ImageEntry {
    fn resolved(kind: WordKind, value: u16) -> Self {
        ImageEntry { kind, value, symbol: None, needs_encoding: false }
    }

    fn pending(kind: WordKind, symbol: &str) -> Self {
        ImageEntry { kind, value: 0, symbol: Some(symbol.to_string()), needs_encoding: true }
    }
}

/// How a fixup's operand was written; kept even though pass two resolves
/// both discriminators identically.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FixupMode {
    Direct,
    Index,
}

/// A deferred back-patch: an index into the instruction region plus the
/// symbol name it must resolve to and the line the reference occurred on,
/// for pass two to report against if resolution fails.
#[derive(Clone, Debug)]
pub struct Fixup {
    pub image_index: usize,
    pub symbol: String,
    pub mode: FixupMode,
    pub line: LineNo,
}

/// The instruction region (grows with `IC`) and the data region (grows
/// with `DC`), kept separate until pass one finishes so the data region can
/// be appended after the complete instruction region.
#[derive(Default, Debug)]
pub struct Image {
    code: Vec<ImageEntry>,
    data: Vec<ImageEntry>,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ic(&self) -> u16 {
        self.code.len() as u16
    }

    pub fn dc(&self) -> u16 {
        self.data.len() as u16
    }

    pub fn push_header(&mut self, word: u16) {
        self.code.push(ImageEntry::resolved(WordKind::InstructionHeader, word));
    }

    pub fn push_immediate(&mut self, word: u16) {
        self.code.push(ImageEntry::resolved(WordKind::Immediate, word));
    }

    pub fn push_registers(&mut self, word: u16) {
        self.code.push(ImageEntry::resolved(WordKind::Register, word));
    }

    /// Reserves a word for a Direct operand reference, returning its index
    /// in the (eventual) final image for the caller to enqueue a [`Fixup`].
    pub fn push_direct_placeholder(&mut self, symbol: &str) -> usize {
        let idx = self.code.len();
        self.code.push(ImageEntry::pending(WordKind::Direct, symbol));
        idx
    }

    /// Reserves the base-address word of an Index operand.
    pub fn push_index_base_placeholder(&mut self, symbol: &str) -> usize {
        let idx = self.code.len();
        self.code.push(ImageEntry::pending(WordKind::IndexBase, symbol));
        idx
    }

    pub fn push_index_offset(&mut self, word: u16) {
        self.code.push(ImageEntry::resolved(WordKind::IndexOffset, word));
    }

    pub fn push_data_word(&mut self, word: u16) {
        self.data.push(ImageEntry::resolved(WordKind::Data, word));
    }

    /// Resolves a previously reserved code-region entry in place.
    pub fn resolve(&mut self, image_index: usize, word: u16) {
        let entry = &mut self.code[image_index];
        entry.value = word;
        entry.needs_encoding = false;
    }

    pub fn entry(&self, image_index: usize) -> &ImageEntry {
        &self.code[image_index]
    }

    /// Concatenates the instruction and data regions into the final,
    /// address-ordered memory image (index 0 == `ADDRESS_ORIGIN`).
    pub fn into_words(self) -> Vec<ImageEntry> {
        let mut code = self.code;
        code.extend(self.data);
        code
    }

    pub fn words(&self) -> impl Iterator<Item = &ImageEntry> {
        self.code.iter().chain(self.data.iter())
    }
}

/// Absolute address of image position `i`.
pub fn address_of(index: usize) -> u16 {
    ADDRESS_ORIGIN + index as u16
}

/// An external symbol's use site, appended during pass two as each fixup
/// resolves against an External symbol.
#[derive(Clone, Debug)]
pub struct ExternalUsage {
    pub symbol: String,
    pub address: u16,
}

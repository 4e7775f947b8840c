// Line Classifier
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

//! Component D: sorts one trimmed source line into exactly one category,
//! in a fixed priority order: blank, comment, directive, label, then
//! instruction.

use crate::diagnostics::AssemblerError;
use crate::isa::lookup_command_ci;
use crate::lexer::is_identifier;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DirectiveKind {
    Data,
    String,
    Entry,
    Extern,
    Define,
}

#[derive(Clone, Debug)]
pub enum Classified<'a> {
    Blank,
    Comment,
    Directive { kind: DirectiveKind, rest: &'a str },
    /// A label prefix; `rest` is the residual line, to be classified again.
    Label { name: String, rest: &'a str },
    Instruction { mnemonic: &'a str, rest: &'a str },
    Invalid(AssemblerError),
}

/// Classifies one already-trimmed line. Callers that encounter `Label`
/// should classify `rest` themselves to get the labeled construct.
pub fn classify(line: &str) -> Classified<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Classified::Blank;
    }
    if trimmed.starts_with(';') {
        return Classified::Comment;
    }
    if let Some(rest) = trimmed.strip_prefix('.') {
        return classify_directive(rest);
    }
    if let Some((name, rest)) = split_label(trimmed) {
        return Classified::Label { name, rest };
    }

    let mnemonic = trimmed.split_whitespace().next().unwrap_or("");
    let rest = trimmed[mnemonic.len()..].trim_start();
    match lookup_command_ci(mnemonic) {
        Some(spec) if spec.mnemonic == mnemonic => Classified::Instruction { mnemonic, rest },
        Some(_) => Classified::Invalid(AssemblerError::CaseMismatch(mnemonic.to_string())),
        None => Classified::Invalid(AssemblerError::InvalidLine),
    }
}

fn classify_directive(rest: &str) -> Classified<'_> {
    let name = rest.split_whitespace().next().unwrap_or("");
    let tail = rest[name.len()..].trim_start();
    let kind = match name {
        "data" => DirectiveKind::Data,
        "string" => DirectiveKind::String,
        "entry" => DirectiveKind::Entry,
        "extern" => DirectiveKind::Extern,
        "define" => DirectiveKind::Define,
        _ => return Classified::Invalid(AssemblerError::MalformedDirective(format!(".{name}"))),
    };
    Classified::Directive { kind, rest: tail }
}

/// Splits a leading `identifier:` label off `line`, if present.
fn split_label(line: &str) -> Option<(String, &str)> {
    let colon = line.find(':')?;
    let candidate = &line[..colon];
    if candidate.is_empty() || candidate.contains(char::is_whitespace) {
        return None;
    }
    if !is_identifier(candidate) {
        return None;
    }
    let rest = line[colon + 1..].trim_start();
    Some((candidate.to_string(), rest))
}

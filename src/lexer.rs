// Lexical Helpers
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

//! Small, shared tokenizing helpers used by the Directive Processor and the
//! Instruction Encoder: comma-separated lists, identifiers, and integer
//! literals. A line-oriented assembler like this one dispatches on the
//! first token of a line rather than parsing a context-free grammar, so
//! there is no single `Token` stream shared by every component -- each
//! caller pulls only the pieces it needs.

use crate::diagnostics::AssemblerError;

pub const MAX_LABEL_LEN: usize = 31;

/// `true` if `s` is a legal label/constant identifier: starts with an
/// ASCII letter, remainder alphanumeric, at most [`MAX_LABEL_LEN`] chars.
pub fn is_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_LABEL_LEN {
        return false;
    }
    let mut chars = s.chars();
    let first = chars.next().unwrap();
    first.is_ascii_alphabetic() && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Parses `r1`..`r7` into a register number; `r0` and anything else is not
/// a register token; `r0` is not a valid register on this machine.
pub fn parse_register(s: &str) -> Option<u8> {
    let rest = s.strip_prefix('r')?;
    let n: u8 = rest.parse().ok()?;
    if (1..=7).contains(&n) {
        Some(n)
    } else {
        None
    }
}

/// Parses a plain decimal integer literal, e.g. `42`, `-17`. No range
/// checking is performed here; callers apply the range appropriate to
/// their context (`.define`'s +/-2048, or none at all for `.data`).
pub fn parse_integer(s: &str) -> Option<i32> {
    if s.is_empty() {
        return None;
    }
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().map(|v| v * sign)
}

/// Splits a comma-separated operand/value list, rejecting empty elements
/// from leading, trailing, or doubled commas. Each
/// returned element is trimmed of surrounding whitespace.
pub fn split_strict_comma_list(s: &str) -> Result<Vec<String>, AssemblerError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(AssemblerError::MalformedDirective("empty operand list".into()));
    }
    let parts: Vec<&str> = trimmed.split(',').collect();
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        let item = part.trim();
        if item.is_empty() {
            return Err(AssemblerError::MalformedDirective(
                "leading, trailing, or consecutive commas are not allowed".into(),
            ));
        }
        out.push(item.to_string());
    }
    Ok(out)
}

/// Splits `name[expr]` into its base name and bracketed expression text.
pub fn split_index_operand(s: &str) -> Option<(&str, &str)> {
    let open = s.find('[')?;
    if !s.ends_with(']') {
        return None;
    }
    let name = &s[..open];
    let expr = &s[open + 1..s.len() - 1];
    if name.is_empty() || expr.is_empty() {
        return None;
    }
    Some((name, expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_must_start_alphabetic() {
        assert!(is_identifier("START"));
        assert!(is_identifier("a1"));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn label_length_is_bounded() {
        let long = "a".repeat(32);
        assert!(!is_identifier(&long));
        let ok = "a".repeat(31);
        assert!(is_identifier(&ok));
    }

    #[test]
    fn registers_are_r1_through_r7_only() {
        assert_eq!(parse_register("r1"), Some(1));
        assert_eq!(parse_register("r7"), Some(7));
        assert_eq!(parse_register("r0"), None);
        assert_eq!(parse_register("r8"), None);
        assert_eq!(parse_register("ARR"), None);
    }

    #[test]
    fn integers_parse_with_optional_sign() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-2048"), Some(-2048));
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("-"), None);
    }

    #[test]
    fn strict_comma_list_rejects_doubled_and_trailing_commas() {
        assert!(split_strict_comma_list("1, 2, 3").is_ok());
        assert!(split_strict_comma_list("1,, 3").is_err());
        assert!(split_strict_comma_list("1, 2,").is_err());
        assert!(split_strict_comma_list(",1").is_err());
        assert!(split_strict_comma_list("").is_err());
    }

    #[test]
    fn index_operand_splits_name_and_expr() {
        assert_eq!(split_index_operand("ARR[K]"), Some(("ARR", "K")));
        assert_eq!(split_index_operand("ARR[2]"), Some(("ARR", "2")));
        assert_eq!(split_index_operand("ARR"), None);
        assert_eq!(split_index_operand("[2]"), None);
    }
}

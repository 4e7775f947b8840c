// Source Cleaner
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

//! Component A: strips `;`-led comments, copying everything else through
//! unchanged. No other transformation happens here -- the line-length
//! limit is the First Pass Driver's concern, since it applies to the
//! expanded file, not the raw one.

/// Strips comments line by line. A `;` only starts a comment outside an
/// open string literal, so `.string "hi; there"` survives intact instead
/// of being truncated mid-literal.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.lines() {
        out.push_str(comment_start(line).map_or(line, |idx| &line[..idx]));
        out.push('\n');
    }
    out
}

/// Byte index of the first `;` that lies outside an ASCII `"..."` or
/// curly-quote `“...”` string literal, if any.
fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in line.char_indices() {
        match quote {
            Some(open) => {
                let closes = (open == '"' && ch == '"') || (open == '\u{201C}' && ch == '\u{201D}');
                if closes {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\u{201C}' => quote = Some(ch),
                ';' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_comment() {
        let out = strip_comments("mov r1, r2 ; copy\n");
        assert_eq!(out, "mov r1, r2 \n");
    }

    #[test]
    fn whole_line_comment_becomes_blank() {
        let out = strip_comments("; just a comment\n");
        assert_eq!(out, "\n");
    }

    #[test]
    fn semicolon_inside_ascii_string_is_not_a_comment() {
        let out = strip_comments(".string \"hi; there\" ; real comment\n");
        assert_eq!(out, ".string \"hi; there\" \n");
    }

    #[test]
    fn semicolon_inside_curly_quoted_string_is_not_a_comment() {
        let out = strip_comments(".string \u{201C}hi; there\u{201D} ; real comment\n");
        assert_eq!(out, ".string \u{201C}hi; there\u{201D} \n");
    }

    #[test]
    fn unterminated_string_treats_rest_of_line_as_literal() {
        let out = strip_comments(".string \"hi; there\n");
        assert_eq!(out, ".string \"hi; there\n");
    }
}

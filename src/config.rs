// Assembler Configuration
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

//! The options that actually vary per run. The machine constants
//! (`ADDRESS_ORIGIN`, `MEMORY_CAPACITY`, the line-length limit) are fixed
//! properties of the 14-bit target, not run-time configuration, so they
//! stay where the rest of the target definition lives, in `isa`.

#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    pub keep_intermediate: bool,
}

impl Config {
    pub fn from_cli(keep_intermediate: bool) -> Self {
        Config { keep_intermediate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cli_carries_the_flag_through() {
        assert!(Config::from_cli(true).keep_intermediate);
        assert!(!Config::from_cli(false).keep_intermediate);
    }
}

// Command-Line Interface
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

//! `assembler FILE1 [FILE2 ...]`: each `FILE` is given without extension,
//! and the assembler looks for `FILE.as`.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "asm14", about = "Two-pass assembler for the 14-bit teaching machine")]
pub struct Cli {
    /// Input files, given without the `.as` extension.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Keep the expanded (`.am`) intermediate file after assembly.
    #[arg(long)]
    pub keep_intermediate: bool,
}

// Pass Drivers
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

pub mod first;
pub mod second;

pub use first::run_first_pass;
pub use second::run_second_pass;

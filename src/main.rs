// asm14
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

mod classify;
mod cli;
mod config;
mod context;
mod diagnostics;
mod directives;
mod emit;
mod encoder;
mod image;
mod isa;
mod lexer;
mod macros;
mod passes;
mod pos;
mod source;
mod symtab;

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use config::Config;
use context::AssemblyContext;
use diagnostics::AssemblerError;
use macros::preprocessor::preprocess;
use passes::{run_first_pass, run_second_pass};
use source::strip_comments;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::from_cli(cli.keep_intermediate);

    let mut any_failed = false;
    for name in &cli.files {
        match assemble_file(name, &config) {
            Ok(true) => {}
            Ok(false) => any_failed = true,
            Err(e) => {
                log::error!("{name}: {e}");
                any_failed = true;
            }
        }
    }

    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Assembles one named input (`<name>.as`). Returns `Ok(true)` if the file
/// assembled cleanly, `Ok(false)` if it produced diagnostics (already
/// printed), and `Err` only for a fatal, per-file resource failure.
fn assemble_file(name: &str, config: &Config) -> Result<bool, AssemblerError> {
    let source_path = format!("{name}.as");
    let source = fs::read_to_string(&source_path)
        .map_err(|e| AssemblerError::InternalResource(format!("{source_path}: {e}")))?;

    let mut ctx = AssemblyContext::new();
    let cleaned = strip_comments(&source);
    let (expanded, macro_table) = preprocess(&cleaned, &mut ctx.diagnostics);
    ctx.set_macro_names(macro_table.iter().map(|(name, _)| name.clone()));

    let am_path = format!("{name}.am");
    fs::write(&am_path, &expanded).map_err(|e| AssemblerError::InternalResource(format!("{am_path}: {e}")))?;

    run_first_pass(&expanded, &mut ctx);
    run_second_pass(&mut ctx);

    let failed = ctx.diagnostics.has_errors();
    if failed {
        ctx.diagnostics.print_to_stderr();
    } else {
        write_artifacts(name, &ctx)?;
    }

    if !failed && !config.keep_intermediate {
        let _ = fs::remove_file(&am_path);
    }

    Ok(!failed)
}

fn write_artifacts(name: &str, ctx: &AssemblyContext) -> Result<(), AssemblerError> {
    let artifacts = emit::emit(ctx);

    let ob_path = format!("{name}.ob");
    fs::write(&ob_path, &artifacts.object_file)
        .map_err(|e| AssemblerError::InternalResource(format!("{ob_path}: {e}")))?;

    if let Some(entries) = artifacts.entries_file {
        let ent_path = format!("{name}.ent");
        fs::write(&ent_path, entries).map_err(|e| AssemblerError::InternalResource(format!("{ent_path}: {e}")))?;
    }

    if let Some(externals) = artifacts.externals_file {
        let ext_path = format!("{name}.ext");
        fs::write(&ext_path, externals).map_err(|e| AssemblerError::InternalResource(format!("{ext_path}: {e}")))?;
    }

    Ok(())
}

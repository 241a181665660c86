// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the FF-A endpoint table compiler.
// Author: Lukas Bower

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use ffa_endpoints::{compile, CompileOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory scanned for partition manifest (.dts) files.
    manifest_dir: PathBuf,
    /// Exception-level selector: 0 keeps *_el0 manifests, 1 keeps the rest.
    el_mode: u8,
    /// Directory receiving val_endpoints.c and val_endpoints.h.
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    // The parsed-field trace is part of the tool's output; RUST_LOG overrides.
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let options = CompileOptions {
        manifest_dir: args.manifest_dir,
        el_mode: args.el_mode,
        output_dir: args.output_dir,
    };
    let output = compile(&options)?;
    println!("ffa-endpoints: wrote {}", output.summary());
    Ok(())
}

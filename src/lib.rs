// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Expose the manifest-to-endpoint-table compilation pipeline.
// Author: Lukas Bower

pub mod codegen;
pub mod ir;
pub mod order;

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub manifest_dir: PathBuf,
    /// 0 compiles the `*_el0` manifests, 1 compiles everything else.
    pub el_mode: u8,
    pub output_dir: PathBuf,
}

/// Compile every eligible manifest under `manifest_dir` into the endpoint
/// table artifacts. Fails before touching any file on a bad EL mode, and
/// writes nothing unless the whole table assembles.
pub fn compile(options: &CompileOptions) -> Result<codegen::GeneratedArtifacts> {
    if options.el_mode > 1 {
        bail!("EL mode must be 0 (el0) or 1 (el1), got {}", options.el_mode);
    }
    if !options.manifest_dir.is_dir() {
        bail!(
            "manifest directory does not exist: {}",
            options.manifest_dir.display()
        );
    }

    let pattern = format!("{}/*.dts", options.manifest_dir.display());
    let all_files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid manifest glob {}", pattern))?
        .collect::<Result<_, _>>()
        .with_context(|| format!("failed to scan {}", options.manifest_dir.display()))?;

    let filtered = order::filter_by_el_mode(all_files, options.el_mode);
    let ordered = order::classify_and_sort(filtered);

    let mut entries = Vec::with_capacity(ordered.len() + 1);
    for path in &ordered {
        entries.push(ir::load_manifest(path)?);
    }

    let vm1_present = entries.iter().any(|entry| entry.name == "VM1");
    if !vm1_present {
        log::info!("no VM1 manifest compiled, appending the fallback entry");
        entries.push(ir::EndpointDescriptor::vm1_fallback());
    }

    codegen::emit_all(&entries, &options.output_dir)
}

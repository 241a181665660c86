// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Emit the endpoint table artifacts consumed by the val harness.
// Author: Lukas Bower

mod header;
mod source;

use crate::ir::EndpointDescriptor;
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCE_FILE_NAME: &str = "val_endpoints.c";
pub const HEADER_FILE_NAME: &str = "val_endpoints.h";

#[derive(Debug)]
pub struct GeneratedArtifacts {
    pub source: PathBuf,
    pub header: PathBuf,
    pub entry_count: usize,
}

impl GeneratedArtifacts {
    pub fn summary(&self) -> String {
        format!(
            "source={}, header={} ({} entries plus the null slot)",
            self.source.display(),
            self.header.display(),
            self.entry_count
        )
    }
}

/// Render both artifacts, then write both. Nothing touches the filesystem
/// until the full table has been rendered.
pub fn emit_all(entries: &[EndpointDescriptor], output_dir: &Path) -> Result<GeneratedArtifacts> {
    let license = license_header(Utc::now().year());
    let source_text = source::render(entries, &license);
    let header_text = header::render(entries.len(), &license);

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let source_path = output_dir.join(SOURCE_FILE_NAME);
    fs::write(&source_path, source_text)
        .with_context(|| format!("failed to write {}", source_path.display()))?;

    let header_path = output_dir.join(HEADER_FILE_NAME);
    fs::write(&header_path, header_text)
        .with_context(|| format!("failed to write {}", header_path.display()))?;

    Ok(GeneratedArtifacts {
        source: source_path,
        header: header_path,
        entry_count: entries.len(),
    })
}

/// Copyright block prefixed to both generated artifacts, stamped with the
/// year of the run.
pub fn license_header(year: i32) -> String {
    format!(
        "/*\n * Copyright (c) {}, Arm Limited or its affiliates. All rights reserved.\n *\n * SPDX-License-Identifier: BSD-3-Clause\n *\n */\n",
        year
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_header_carries_the_year() {
        let header = license_header(2026);
        assert!(header.starts_with("/*\n * Copyright (c) 2026,"));
        assert!(header.contains("SPDX-License-Identifier: BSD-3-Clause"));
        assert!(header.ends_with(" */\n"));
    }
}

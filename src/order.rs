// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Filter and order partition manifests for table assembly.
// Author: Lukas Bower

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static SP_INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^sp(\d+)").expect("pattern"));
static VM_INDEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^vm(\d+)").expect("pattern"));

fn lowercase_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

/// EL-mode filter: mode 0 keeps only `*_el0.dts` manifests, mode 1 keeps
/// everything else. Files without an EL suffix are EL1-eligible.
pub fn filter_by_el_mode(files: Vec<PathBuf>, el_mode: u8) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter(|path| {
            let is_el0 = lowercase_file_name(path).ends_with("_el0.dts");
            if el_mode == 0 {
                is_el0
            } else {
                !is_el0
            }
        })
        .collect()
}

/// Merge the `sp<N>` and `vm<N>` families into one ascending numeric order.
/// Files matching neither prefix are dropped; equal indices fall back to the
/// path so the order stays deterministic.
pub fn classify_and_sort(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut indexed: Vec<(u32, PathBuf)> = files
        .into_iter()
        .filter_map(|path| partition_index(&path).map(|index| (index, path)))
        .collect();
    indexed.sort();
    indexed.into_iter().map(|(_, path)| path).collect()
}

fn partition_index(path: &Path) -> Option<u32> {
    let name = lowercase_file_name(path);
    SP_INDEX_RE
        .captures(&name)
        .or_else(|| VM_INDEX_RE.captures(&name))
        .and_then(|caps| caps.get(1))
        .and_then(|index| index.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn families_merge_into_one_numeric_order() {
        let ordered = classify_and_sort(paths(&["sp2.dts", "vm1.dts", "sp1.dts"]));
        assert_eq!(names(&ordered), ["sp1.dts", "vm1.dts", "sp2.dts"]);
    }

    #[test]
    fn indices_sort_numerically_not_lexically() {
        let ordered = classify_and_sort(paths(&["sp10.dts", "sp2.dts", "vm3.dts"]));
        assert_eq!(names(&ordered), ["sp2.dts", "vm3.dts", "sp10.dts"]);
    }

    #[test]
    fn unmatched_files_are_dropped_silently() {
        let ordered = classify_and_sort(paths(&["readme.dts", "sp1.dts", "partition.dts"]));
        assert_eq!(names(&ordered), ["sp1.dts"]);
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let ordered = classify_and_sort(paths(&["SP2.dts", "VM1.dts"]));
        assert_eq!(names(&ordered), ["VM1.dts", "SP2.dts"]);
    }

    #[test]
    fn mode_zero_keeps_only_el0_manifests() {
        let kept = filter_by_el_mode(paths(&["foo_el0.dts", "foo_el1.dts", "foo.dts"]), 0);
        assert_eq!(names(&kept), ["foo_el0.dts"]);
    }

    #[test]
    fn mode_one_keeps_everything_without_el0_suffix() {
        let kept = filter_by_el_mode(paths(&["foo_el0.dts", "foo_el1.dts", "foo.dts"]), 1);
        assert_eq!(names(&kept), ["foo_el1.dts", "foo.dts"]);
    }

    #[test]
    fn el0_suffix_check_ignores_case() {
        let kept = filter_by_el_mode(paths(&["SP1_EL0.dts"]), 0);
        assert_eq!(names(&kept), ["SP1_EL0.dts"]);
    }
}

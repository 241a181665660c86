// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define the endpoint descriptor IR and its manifest encoding rules.
// Author: Lukas Bower

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Shift placing the execution-state flag inside `el_info`.
const EL_WIDTH_SHIFT: u32 = 4;

/// Manifest `exception-level` code to effective EL. The table is part of the
/// binary contract with the consumer harness; codes outside it map to EL1.
const EXCEPTION_LEVEL_MAP: [(u32, u8); 3] = [
    (0, 1), // EL1
    (1, 0), // S_EL0
    (2, 1), // S_EL1
];

const DEFAULT_EXCEPTION_LEVEL: u8 = 1;

/// Manifest `messaging-method` bit to `ep_properties` bit.
const MESSAGING_PROPERTY_MAP: [(u32, u32); 5] = [
    (0x001, 0),  // direct message
    (0x002, 1),  // indirect message
    (0x004, 2),  // doorbell
    (0x200, 9),  // memory share
    (0x400, 10), // memory lend
];

/// `ep_properties` bit set when the manifest declares notification support.
const EP_NOTIFICATION_BIT: u32 = 3;
/// `ep_properties` bit set for AArch64 endpoints.
const EP_AARCH64_BIT: u32 = 8;

/// OR-ed into every compiled endpoint id to mark the secure world.
const SECURE_ID_BIT: u16 = 0x8000;

/// partition_status assigned to every descriptor compiled from a manifest.
const STATUS_SECURE_NOT_VALID: u8 = 0xF0;
/// partition_status of the synthetic VM1 fallback.
const STATUS_NONSECURE_VALID: u8 = 0x0F;

static UUID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"uuid\s*=\s*<([^>]+)>").expect("pattern"));
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bid\s*=\s*<(\d+)>").expect("pattern"));
static GRANULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"xlat-granule\s*=\s*<(\d+)>").expect("pattern"));
static EC_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"execution-ctx-count\s*=\s*<(\d+)>").expect("pattern"));
static MESSAGING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"messaging-method\s*=\s*<(\w+)>").expect("pattern"));
static NOTIFICATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"notification-support").expect("pattern"));
static EXC_LEVEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"exception-level\s*=\s*<(\d+)>").expect("pattern"));
static EXEC_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"execution-state\s*=\s*<(\d+)>").expect("pattern"));
static EL_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)_el[01]$").expect("pattern"));

/// One compiled entry of the endpoint table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub name: String,
    pub partition_status: u8,
    pub id: u16,
    pub tg0: u8,
    pub el_info: u8,
    pub ec_count: u16,
    pub ep_properties: u32,
    pub uuid: [u32; 4],
}

impl EndpointDescriptor {
    /// Minimal non-secure entry appended when no manifest compiles to VM1.
    pub fn vm1_fallback() -> Self {
        Self {
            name: "VM1".to_string(),
            partition_status: STATUS_NONSECURE_VALID,
            id: 0x0000,
            tg0: 0,
            el_info: 0x11,
            ec_count: 1,
            ep_properties: 0x70f,
            uuid: [0, 0, 0, 0],
        }
    }
}

pub fn load_manifest(path: &Path) -> Result<EndpointDescriptor> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    Ok(parse_manifest(path, &content))
}

/// Compile one manifest into a descriptor. Absent or malformed fields fall
/// back to their defaults; this never fails.
pub fn parse_manifest(path: &Path, content: &str) -> EndpointDescriptor {
    let uuid = parse_uuid(content);
    let id_raw = extract_field(content, &ID_RE, 0, parse_dec);
    let id = id_raw as u16 | SECURE_ID_BIT;

    let tg0 = extract_field(content, &GRANULE_RE, 0, parse_dec) as u8;
    let ec_count = extract_field(content, &EC_COUNT_RE, 1, parse_dec) as u16;
    let messaging = extract_field(content, &MESSAGING_RE, 0, parse_hex);
    let notification = NOTIFICATION_RE.is_match(content);

    let exc_level_code = extract_field(content, &EXC_LEVEL_RE, 0, parse_dec);
    let exec_state = extract_field(content, &EXEC_STATE_RE, 0, parse_dec);
    let exc_level = map_exception_level(exc_level_code);

    let el_info = encode_el_info(exec_state, exc_level);
    let ep_properties = encode_ep_properties(messaging, notification, exec_state);
    let name = normalize_name(path);

    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or_default();
    log::info!("parsed manifest {}", file_name);
    log::info!("  name          = {}", name);
    log::info!("  id            = {} -> 0x{:04x}", id_raw, id);
    log::info!("  tg0           = {}", tg0);
    log::info!("  ec_count      = {}", ec_count);
    log::info!("  el code       = {} -> EL{}", exc_level_code, exc_level);
    log::info!(
        "  exec_state    = {} ({})",
        exec_state,
        if exec_state == 0 { "AArch64" } else { "AArch32" }
    );
    log::info!("  el_info       = 0x{:02x}", el_info);
    log::info!("  messaging     = 0x{:03x}", messaging);
    log::info!("  notification  = {}", if notification { "yes" } else { "no" });
    log::info!("  ep_properties = 0x{:08x}", ep_properties);
    log::info!(
        "  uuid          = {}",
        uuid.map(|w| format!("0x{:08x}", w)).join(", ")
    );

    EndpointDescriptor {
        name,
        partition_status: STATUS_SECURE_NOT_VALID,
        id,
        tg0,
        el_info,
        ec_count,
        ep_properties,
        uuid,
    }
}

/// Return the first capture of `pattern` in `content` run through `cast`, or
/// `default` (unchanged, never cast) when the field is absent or malformed.
fn extract_field<T>(
    content: &str,
    pattern: &Regex,
    default: T,
    cast: impl Fn(&str) -> Option<T>,
) -> T {
    pattern
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| cast(m.as_str()))
        .unwrap_or(default)
}

fn parse_dec(raw: &str) -> Option<u32> {
    raw.parse().ok()
}

fn parse_hex(raw: &str) -> Option<u32> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u32::from_str_radix(digits, 16).ok()
}

/// The descriptor uuid is always exactly four words: missing, empty, or
/// unparseable manifest values leave the remaining slots zero.
fn parse_uuid(content: &str) -> [u32; 4] {
    let raw = extract_field(content, &UUID_RE, String::new(), |m| Some(m.to_string()));
    let mut uuid = [0u32; 4];
    let words = raw.split_whitespace().filter_map(parse_hex);
    for (slot, word) in uuid.iter_mut().zip(words) {
        *slot = word;
    }
    uuid
}

fn map_exception_level(code: u32) -> u8 {
    EXCEPTION_LEVEL_MAP
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|(_, el)| *el)
        .unwrap_or(DEFAULT_EXCEPTION_LEVEL)
}

/// Bit 4 carries the execution state (set for AArch64), the low nibble the
/// effective exception level.
fn encode_el_info(exec_state: u32, exc_level: u8) -> u8 {
    (u8::from(exec_state == 0) << EL_WIDTH_SHIFT) | exc_level
}

fn encode_ep_properties(messaging: u32, notification: bool, exec_state: u32) -> u32 {
    let mut properties = 0;
    for (messaging_bit, property_bit) in MESSAGING_PROPERTY_MAP {
        if messaging & messaging_bit != 0 {
            properties |= 1 << property_bit;
        }
    }
    if notification {
        properties |= 1 << EP_NOTIFICATION_BIT;
    }
    if exec_state == 0 {
        properties |= 1 << EP_AARCH64_BIT;
    }
    properties
}

/// Descriptor name: file stem, one trailing `_el0`/`_el1` stripped
/// case-insensitively, the rest uppercased. Internal underscores survive.
pub fn normalize_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    EL_SUFFIX_RE.replace(stem, "").to_uppercase()
}

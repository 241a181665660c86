// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Render the val_endpoints.c initializer table.
// Author: Lukas Bower

use crate::ir::EndpointDescriptor;
use std::fmt::Write as _;

pub(crate) fn render(entries: &[EndpointDescriptor], license: &str) -> String {
    let mut out = String::new();
    out.push_str(license);
    out.push('\n');
    out.push_str("#include \"val_endpoints.h\"\n\nval_endpoint_info_t endpoint_info_table[] = {\n");
    out.push_str(&render_null_entry());
    let blocks: Vec<String> = entries.iter().map(render_entry).collect();
    out.push_str(&blocks.join(",\n"));
    out.push_str("\n};\n");
    out
}

// Index 0 is reserved by the consumer; it always reads as all zeroes.
fn render_null_entry() -> String {
    let mut block = String::new();
    writeln!(block, "    {{").ok();
    writeln!(block, "        .name           = \"\",").ok();
    writeln!(block, "        .partition_status = 0x00,").ok();
    writeln!(block, "        .id             = 0x0000,").ok();
    writeln!(block, "        .tg0            = 0x00,").ok();
    writeln!(block, "        .el_info        = 0x00,").ok();
    writeln!(block, "        .ec_count       = 0x0000,").ok();
    writeln!(block, "        .ep_properties  = 0x00000000,").ok();
    writeln!(block, "        .uuid           = {{ 0 }}").ok();
    writeln!(block, "    }},").ok();
    block
}

fn render_entry(entry: &EndpointDescriptor) -> String {
    let uuid = entry
        .uuid
        .iter()
        .map(|word| format!("0x{:08x}", word))
        .collect::<Vec<_>>()
        .join(", ");

    let mut block = String::new();
    writeln!(block, "    {{").ok();
    writeln!(block, "        .name           = \"{}\",", entry.name).ok();
    writeln!(
        block,
        "        .partition_status = 0x{:02x},",
        entry.partition_status
    )
    .ok();
    writeln!(block, "        .id             = 0x{:04x},", entry.id).ok();
    writeln!(block, "        .tg0            = 0x{:02x},", entry.tg0).ok();
    writeln!(block, "        .el_info        = 0x{:02x},", entry.el_info).ok();
    writeln!(block, "        .ec_count       = 0x{:04x},", entry.ec_count).ok();
    writeln!(
        block,
        "        .ep_properties  = 0x{:08x},",
        entry.ep_properties
    )
    .ok();
    writeln!(block, "        .uuid           = {{ {} }}", uuid).ok();
    write!(block, "    }}").ok();
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_fields_use_fixed_hex_widths() {
        let entry = EndpointDescriptor {
            name: "SP1".to_string(),
            partition_status: 0xf0,
            id: 0x8001,
            tg0: 0,
            el_info: 0x11,
            ec_count: 8,
            ep_properties: 0x30b,
            uuid: [0xb4b5671e, 0x4a904fe1, 0xb81ffb13, 0xdae1dacb],
        };
        let block = render_entry(&entry);
        assert!(block.contains(".name           = \"SP1\","));
        assert!(block.contains(".partition_status = 0xf0,"));
        assert!(block.contains(".id             = 0x8001,"));
        assert!(block.contains(".tg0            = 0x00,"));
        assert!(block.contains(".el_info        = 0x11,"));
        assert!(block.contains(".ec_count       = 0x0008,"));
        assert!(block.contains(".ep_properties  = 0x0000030b,"));
        assert!(block.contains(".uuid           = { 0xb4b5671e, 0x4a904fe1, 0xb81ffb13, 0xdae1dacb }"));
    }

    #[test]
    fn table_starts_with_the_null_entry() {
        let rendered = render(&[EndpointDescriptor::vm1_fallback()], "/* header */\n");
        let null_at = rendered.find(".name           = \"\",").expect("null entry");
        let vm1_at = rendered.find(".name           = \"VM1\",").expect("vm1 entry");
        assert!(null_at < vm1_at);
        assert!(rendered.starts_with("/* header */\n"));
        assert!(rendered.ends_with("\n};\n"));
    }
}

// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Render the val_endpoints.h table declaration.
// Author: Lukas Bower

/// The declared count covers every assembled descriptor plus the null slot
/// at index 0; consumers start iterating at FFA_ENDPOINT_START_INDEX.
pub(crate) fn render(real_count: usize, license: &str) -> String {
    let total_count = real_count + 1;
    format!(
        "{}\n\n#ifndef FFA_ENDPOINTS_H\n#define FFA_ENDPOINTS_H\n\n#include \"val.h\"\n#include \"val_endpoint_info.h\"\n\n#define FFA_ENDPOINT_START_INDEX 1\n#define FFA_ENDPOINT_COUNT {}\n\nextern val_endpoint_info_t endpoint_info_table[FFA_ENDPOINT_COUNT];\n\n#endif /* FFA_ENDPOINTS_H */\n",
        license, total_count
    )
}

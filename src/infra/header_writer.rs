// ============================================================
// Layer 6 — Firmware Table Writer
// ============================================================
// Renders extracted sub-samples as a C header the firmware
// build compiles in directly:
//
//   typedef struct { float channels[C]; int32_t label; } eeg_sample_t;
//   const eeg_sample_t eeg_data_array[N] = { { { 0.000000f, ... }, 0 }, ... };
//   const size_t eeg_data_size = N;
//
// Floats are printed with six decimals and an `f` suffix.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::sample::SubSample;

const GUARD: &str = "EEG_DATA_GENERATED_H";

/// Render the header text for `rows`, each with `channel_dim` values.
pub fn render_header(rows: &[SubSample], channel_dim: usize) -> String {
    let mut out = String::with_capacity(256 + rows.len() * (channel_dim * 12 + 16));

    out.push_str(&format!("#ifndef {GUARD}\n#define {GUARD}\n\n"));
    out.push_str("#include <stddef.h>\n#include <stdint.h>\n\n");

    out.push_str("typedef struct {\n");
    out.push_str(&format!("    float channels[{channel_dim}];\n"));
    out.push_str("    int32_t label;\n} eeg_sample_t;\n\n");

    out.push_str(&format!("const eeg_sample_t eeg_data_array[{}] = {{\n", rows.len()));
    for row in rows {
        let channels = row
            .channels
            .iter()
            .map(|v| format!("{v:.6}f"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("    {{ {{ {channels} }}, {} }},\n", row.label));
    }
    out.push_str("};\n\n");

    out.push_str(&format!("const size_t eeg_data_size = {};\n\n", rows.len()));
    out.push_str(&format!("#endif /* {GUARD} */\n"));
    out
}

/// Render and write the header to `path`.
pub fn write_header(path: impl AsRef<Path>, rows: &[SubSample], channel_dim: usize) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }
    fs::write(path, render_header(rows, channel_dim))
        .with_context(|| format!("Cannot write header '{}'", path.display()))?;

    tracing::info!("C header '{}' generated with {} samples", path.display(), rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_with_six_decimals() {
        let rows = vec![
            SubSample { channels: vec![1.0, -0.25], label: 0 },
            SubSample { channels: vec![3.1415927, 2.0], label: 1 },
        ];
        let text = render_header(&rows, 2);
        assert!(text.contains("float channels[2];"));
        assert!(text.contains("const eeg_sample_t eeg_data_array[2] = {"));
        assert!(text.contains("    { { 1.000000f, -0.250000f }, 0 },"));
        assert!(text.contains("    { { 3.141593f, 2.000000f }, 1 },"));
        assert!(text.contains("const size_t eeg_data_size = 2;"));
        assert!(text.trim_end().ends_with("#endif /* EEG_DATA_GENERATED_H */"));
    }

    #[test]
    fn test_write_header_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src").join("eeg_data.h");
        write_header(&path, &[SubSample { channels: vec![0.5], label: 1 }], 1).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("{ { 0.500000f }, 1 },"));
    }
}

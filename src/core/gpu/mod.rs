//! GPU probe
//!
//! Informational check for graphics adapters the game is known to struggle on.

use crate::core::platform::GpuProbe;
use std::process::Command;

/// Substrings (lowercase) that identify unsupported or software renderers
pub const UNSUPPORTED_GPU_KEYWORDS: &[&str] = &[
    "microsoft basic display",
    "vmware",
    "virtualbox",
    "intel gma",
    "llvmpipe",
    "software renderer",
    "vboxsvga",
];

/// Run the probe and return its stdout, or the error text if it could not run
pub fn probe(gpu_probe: &GpuProbe) -> String {
    match Command::new(gpu_probe.program).args(gpu_probe.args).output() {
        Ok(output) => String::from_utf8_lossy(&output.stdout).into_owned(),
        Err(e) => {
            tracing::debug!("GPU probe {} failed: {}", gpu_probe.program, e);
            e.to_string()
        }
    }
}

/// First denylisted keyword found in the probe output
pub fn unsupported_keyword(gpu_info: &str) -> Option<&'static str> {
    let lower = gpu_info.to_lowercase();
    UNSUPPORTED_GPU_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lower.contains(keyword))
}

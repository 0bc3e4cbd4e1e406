use std::io::Write;

use anyhow::Result;
use mei_script::{DiscoveredOpcode, RunSummary};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FileDiscovery {
    pub file: String,
    pub discovered: Vec<DiscoveredOpcode>,
}

/// One stub per line, in first-occurrence order.
pub fn write_stubs(out: &mut impl Write, discovered: &[DiscoveredOpcode]) -> Result<()> {
    for report in discovered {
        writeln!(out, "{report}")?;
    }
    Ok(())
}

pub fn describe_run(file: &str, summary: &RunSummary) -> String {
    format!(
        concat!(
            "{}: {} commands ({} dialogue, {} bound, {} default), ",
            "{} unknown opcode(s), {} coercion fallback(s), {} failed"
        ),
        file,
        summary.records,
        summary.dialogue,
        summary.operations,
        summary.defaults,
        summary.discovered.len(),
        summary.coercion_fallbacks.len(),
        summary.failures.len()
    )
}
